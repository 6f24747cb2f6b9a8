use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::{
    dataset::{CountryRecord, Rate},
    parse::TableCells,
    Error, Result,
};

/// Country names exactly as the VAT table spells them, with their VAT country codes.
/// Has to be kept in sync with the page by hand: a new or renamed country fails the run.
static COUNTRY_CODES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("Austria", "AT"),
        ("Belgium", "BE"),
        ("Bulgaria", "BG"),
        ("Croatia", "HR"),
        ("Cyprus", "CY"),
        ("Czech Republic", "CZ"),
        ("Denmark", "DK"),
        ("Estonia", "EE"),
        ("Finland", "FI"),
        ("France", "FR"),
        ("Germany", "DE"),
        ("Greece", "EL"),
        ("Hungary", "HU"),
        ("Ireland", "IE"),
        ("Italy", "IT"),
        ("Latvia", "LV"),
        ("Lithuania", "LT"),
        ("Luxembourg", "LU"),
        ("Malta", "MT"),
        ("Netherlands", "NL"),
        ("Poland", "PL"),
        ("Portugal", "PT"),
        ("Romania", "RO"),
        ("Slovakia", "SK"),
        ("Slovenia", "SI"),
        ("Spain", "ES"),
        ("Sweden", "SE"),
        ("United Kingdom", "UK"),
    ])
});

/// One table row before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    pub name: String,
    pub rate: String,
}

/// Turns the extracted cells into records, keeping table order.
/// Fails on the first row it can't make sense of; no row is ever skipped.
pub fn normalize(cells: TableCells) -> Result<Vec<CountryRecord>> {
    pair_rows(cells)?.into_iter().map(normalize_row).collect()
}

/// Zips the two columns back into rows, refusing columns of different length.
pub fn pair_rows(cells: TableCells) -> Result<Vec<RawRow>> {
    let TableCells { names, rates } = cells;
    if names.len() != rates.len() {
        return Err(Error::RowCountMismatch {
            names: names.len(),
            rates: rates.len(),
        });
    }

    Ok(names
        .into_iter()
        .zip(rates)
        .map(|(name, rate)| RawRow { name, rate })
        .collect())
}

pub fn normalize_row(row: RawRow) -> Result<CountryRecord> {
    let code = country_code(&row.name)?;
    let rate = parse_rate(&row.rate)?;
    Ok(CountryRecord {
        code,
        name: row.name,
        rate,
    })
}

/// Exact, case-sensitive lookup.
pub fn country_code(name: &str) -> Result<&'static str> {
    COUNTRY_CODES
        .get(name)
        .copied()
        .ok_or_else(|| Error::UnrecognizedCountry(name.into()))
}

pub fn parse_rate(text: &str) -> Result<Rate> {
    text.trim()
        .parse::<f64>()
        .ok()
        .and_then(Rate::new)
        .ok_or_else(|| Error::RateParse(text.into()))
}
