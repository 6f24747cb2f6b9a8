use chrono::Local;
use scraper::{ElementRef, Html, Node, Selector};
use tokio::task::spawn_blocking;
use tracing::info;

use crate::{
    info_time, Error, Result, NAME_CELL_SELECTOR, RATE_CELL_SELECTOR, TABLE_ROWS_SELECTOR,
};

/// The name and rate cells of the VAT table, in document order.
/// The two columns are selected independently, so their lengths can differ
/// on a malformed table; the normalizer is the one that checks it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableCells {
    pub names: Vec<String>,
    pub rates: Vec<String>,
}

/// Parses the page on the blocking pool and extracts the VAT table cells.
pub async fn parse_html(html: String) -> Result<TableCells> {
    let start_time = Local::now();
    let cells = spawn_blocking(move || extract_cells(&html)).await??;
    info!(
        names = cells.names.len(),
        rates = cells.rates.len(),
        "extracted table cells"
    );
    info_time!(start_time, "Parsed the page");
    Ok(cells)
}

/// Locates the rows of `table.table-vat-rates` and takes the first text node of the
/// first and second cell of every row.
pub fn extract_cells(html: &str) -> Result<TableCells> {
    let doc = Html::parse_document(html);

    let row_selector = create_selector(TABLE_ROWS_SELECTOR)?;
    let name_selector = create_selector(NAME_CELL_SELECTOR)?;
    let rate_selector = create_selector(RATE_CELL_SELECTOR)?;

    let rows = doc.select(&row_selector).collect::<Vec<_>>();
    if rows.is_empty() {
        return Err(Error::StructuralMismatch(TABLE_ROWS_SELECTOR.into()));
    }

    let names = rows
        .iter()
        .flat_map(|row| row.select(&name_selector))
        .map(first_text_node)
        .collect::<Vec<_>>();
    let rates = rows
        .iter()
        .flat_map(|row| row.select(&rate_selector))
        .map(first_text_node)
        .collect::<Vec<_>>();

    if names.is_empty() && rates.is_empty() {
        return Err(Error::StructuralMismatch(format!(
            "{TABLE_ROWS_SELECTOR} {NAME_CELL_SELECTOR}"
        )));
    }

    Ok(TableCells { names, rates })
}

/// Returns the trimmed text of the first child of `cell` that carries any text,
/// ignoring whatever follows it. Cells look like `19<sup>(1)</sup>`, where only
/// the leading value is wanted and the footnote markers are dropped.
pub fn first_text_node(cell: ElementRef<'_>) -> String {
    cell.children()
        .find_map(|child| {
            let text = match child.value() {
                Node::Text(text) => text.trim().to_owned(),
                Node::Element(_) => ElementRef::wrap(child)?
                    .text()
                    .collect::<String>()
                    .trim()
                    .to_owned(),
                _ => return None,
            };
            (!text.is_empty()).then_some(text)
        })
        .unwrap_or_default()
}

#[inline]
fn create_selector(sel_str: &str) -> Result<Selector> {
    Selector::parse(sel_str).map_err(|_| Error::InvalidSelector(sel_str.into()))
}
