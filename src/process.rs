use chrono::{DateTime, Local, Utc};
use reqwest::Client;

use crate::dataset::Dataset;
use crate::normalize::normalize;
use crate::output::{read_redirects_prefix, write_dataset, Paths};
use crate::parse::parse_html;
use crate::request::request_page_html;
use crate::{info_time, Result, SOURCE_URL};

/// Fetches the VAT rates page and writes every artifact under `paths.dist`.
pub async fn process_site(paths: &Paths) -> Result<Dataset> {
    let start_time = Local::now();
    let now = Utc::now();
    let client = Client::new();

    info_time!("Started scraping");
    let html = request_page_html(&client, SOURCE_URL).await?;
    let dataset = run(html, now, paths).await?;

    info_time!(start_time, "Finished, {} countries", dataset.records.len());
    Ok(dataset)
}

/// Builds the dataset from fetched markup and writes it out.
/// Nothing is written unless the whole table was understood.
pub async fn run(html: String, updated_at: DateTime<Utc>, paths: &Paths) -> Result<Dataset> {
    let dataset = build_dataset(html, updated_at).await?;
    let prefix = read_redirects_prefix(paths).await?;
    write_dataset(&dataset, paths, &prefix).await?;
    Ok(dataset)
}

/// Extracts and normalizes the table from already fetched markup.
pub async fn build_dataset(html: String, updated_at: DateTime<Utc>) -> Result<Dataset> {
    let cells = parse_html(html).await?;
    let records = normalize(cells)?;
    Ok(Dataset::new(updated_at, records))
}
