//! Scrapes the EU "VAT rates" page and turns its table into static JSON files
//! plus a `_redirects` file for the static host.

mod error;
mod macros;

pub mod dataset;
pub mod normalize;
pub mod output;
pub mod parse;
pub mod process;
pub mod request;

pub use dataset::{CountryRecord, Dataset, Rate};
pub use error::{Error, Result};
pub use output::Paths;

pub const SOURCE_URL: &str = "https://ec.europa.eu/taxation_customs/business/vat/telecommunications-broadcasting-electronic-services/vat-rates_en";

const DIST_DIR: &str = "dist";
const STATIC_DIR: &str = "static";
const API_DIR: &str = "api";
const REDIRECTS_FILE: &str = "_redirects";
const ALL_FILE: &str = "all.json";

const TABLE_ROWS_SELECTOR: &str = "table.table-vat-rates tbody tr";
const NAME_CELL_SELECTOR: &str = "td:first-child";
const RATE_CELL_SELECTOR: &str = "td:nth-child(2)";
