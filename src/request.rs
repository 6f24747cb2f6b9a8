use chrono::Local;
use reqwest::Client;

use crate::{info_time, Result};

/// Requests the page and returns a `Result<String>` containing the HTML.
/// Non-success statuses are errors, so the parser never sees an error page.
pub async fn request_page_html(client: &Client, url: &str) -> Result<String> {
    let start_time = Local::now();
    info_time!("Requesting page: {url}");

    let res = client.get(url).send().await?.error_for_status()?;
    let html = res.text().await?;

    info_time!(start_time, "Received {} bytes", html.len());
    Ok(html)
}
