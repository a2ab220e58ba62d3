pub mod hnb;
pub mod seylan;

pub use hnb::HnbTariffScraper;
pub use seylan::SeylanTariffScraper;

use crate::browser::{accept_any_cookie, NavigateOptions, PageSession, WaitUntil};
use crate::constants::{HNB_KEY, SEYLAN_KEY};
use crate::table::{extract_rows, TableRow};
use crate::types::{ScrapeOptions, TariffScraper};
use crate::error::Result;
use tracing::{debug, info};

pub fn create_scraper(bank_key: &str) -> Option<Box<dyn TariffScraper>> {
    match bank_key {
        HNB_KEY => Some(Box::new(HnbTariffScraper::new())),
        SEYLAN_KEY => Some(Box::new(SeylanTariffScraper::new())),
        _ => None,
    }
}

/// Navigates to `url`, clears any cookie banner, waits for the table and reads its rows
pub(crate) async fn load_table(
    page: &dyn PageSession,
    url: &str,
    table_selector: &str,
    options: &ScrapeOptions,
) -> Result<Vec<TableRow>> {
    debug!("Navigating to {}", url);
    page.goto(
        url,
        NavigateOptions {
            wait_until: WaitUntil::DomContentLoaded,
            timeout: options.navigation_timeout,
        },
    )
    .await?;

    accept_any_cookie(page).await;

    page.wait_for_selector(table_selector, options.selector_timeout)
        .await?;

    let html = page.content().await?;
    let rows = extract_rows(&html, table_selector)?;
    info!("Read {} table rows from {}", rows.len(), url);
    Ok(rows)
}
