//! Shared `<table>` plumbing for the profile-page extractors.
//!
//! Tables are selected by a header signature rather than by position, so an
//! upstream column shuffle is absorbed by the extractor's index mapping and
//! a layout change elsewhere on the page is absorbed here.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};

static TABLE_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("table").unwrap());
static HEADER_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("th").unwrap());
static ROW_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("tbody tr").unwrap());
static CELL_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("td").unwrap());

/// A header signature: every group must have at least one alternative that
/// substring-matches some header. Headers are matched lowercased, order
/// independent.
pub type HeaderSignature = &'static [&'static [&'static str]];

/// One `<table>` flattened to text: lowercased header cells plus body rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Flatten every table on the page, in document order.
pub fn extract_tables(html: &str) -> Vec<TableData> {
    let document = Html::parse_document(html);
    document
        .select(&TABLE_SEL)
        .map(|table| TableData {
            headers: table
                .select(&HEADER_SEL)
                .map(|th| th.text().collect::<String>().trim().to_lowercase())
                .collect(),
            rows: table
                .select(&ROW_SEL)
                .map(|tr| {
                    tr.select(&CELL_SEL)
                        .map(|td| td.text().collect::<String>().trim().to_string())
                        .collect()
                })
                .collect(),
        })
        .collect()
}

/// First table whose headers satisfy the signature, in page order.
pub fn select_table<'a>(tables: &'a [TableData], signature: HeaderSignature) -> Option<&'a TableData> {
    tables.iter().find(|table| {
        signature.iter().all(|alternatives| {
            table
                .headers
                .iter()
                .any(|h| alternatives.iter().any(|needle| h.contains(needle)))
        })
    })
}

/// Positional cell read; a missing cell yields an empty string, never an error.
pub fn cell(cells: &[String], idx: usize) -> String {
    cells.get(idx).cloned().unwrap_or_default()
}
