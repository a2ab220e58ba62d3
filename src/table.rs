use crate::constants::SEYLAN_DESCRIPTION_CELL;
use crate::error::{Result, ScraperError};
use crate::text::clean;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

/// A `<tr>` reduced to what the classifiers look at
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableRow {
    pub cells: Vec<String>,
    /// The description cell is rendered bold, which some banks use to open a group
    pub bold_description: bool,
}

impl TableRow {
    pub fn new<S: Into<String>>(cells: impl IntoIterator<Item = S>) -> Self {
        Self {
            cells: cells.into_iter().map(Into::into).collect(),
            bold_description: false,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold_description = true;
        self
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| ScraperError::Selector(format!("{}: {:?}", css, e)))
}

fn has_bold_description(row: &ElementRef, description_cell: &Selector, bold: &Selector) -> bool {
    row.select(description_cell)
        .next()
        .map(|cell| cell.select(bold).next().is_some())
        .unwrap_or(false)
}

/// Extracts the body rows of the first table matching `table_selector`.
///
/// A page without the table yields no rows rather than an error; the caller has
/// normally already waited for the selector, so this only happens when the table
/// disappears between the wait and the read.
pub fn extract_rows(html: &str, table_selector: &str) -> Result<Vec<TableRow>> {
    let table_sel = selector(table_selector)?;
    let row_sel = selector("tbody tr")?;
    let cell_sel = selector("td")?;
    let description_sel = selector(SEYLAN_DESCRIPTION_CELL)?;
    let bold_sel = selector("b")?;

    let document = Html::parse_document(html);
    let Some(table) = document.select(&table_sel).next() else {
        warn!("Table `{}` not found in page", table_selector);
        return Ok(Vec::new());
    };

    let rows: Vec<TableRow> = table
        .select(&row_sel)
        .map(|tr| TableRow {
            cells: tr
                .select(&cell_sel)
                .map(|td| clean(&td.text().collect::<String>()))
                .collect(),
            bold_description: has_bold_description(&tr, &description_sel, &bold_sel),
        })
        .collect();

    debug!("Extracted {} rows from `{}`", rows.len(), table_selector);
    Ok(rows)
}
