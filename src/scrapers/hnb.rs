use super::load_table;
use crate::browser::{BrowserLauncher, BrowserSession};
use crate::classify::scan_keyword_rows;
use crate::constants::{HNB_BANK, HNB_KEY, HNB_PRODUCTS, HNB_TABLE_SELECTOR, HNB_TARIFF_URL};
use crate::emit::{expand_products, RecordContext};
use crate::error::Result;
use crate::types::{FeeRow, ScrapeOptions, TariffScraper};
use chrono::Utc;
use tracing::{info, instrument, warn};

/// HNB retail services tariff. The table has a fixed three-column layout and group
/// rows are recognised by their wording.
pub struct HnbTariffScraper {
    url: String,
    table_selector: String,
}

impl Default for HnbTariffScraper {
    fn default() -> Self {
        Self::new()
    }
}

impl HnbTariffScraper {
    pub fn new() -> Self {
        Self {
            url: HNB_TARIFF_URL.to_string(),
            table_selector: HNB_TABLE_SELECTOR.to_string(),
        }
    }

    async fn collect(&self, browser: &dyn BrowserSession, options: &ScrapeOptions) -> Result<Vec<FeeRow>> {
        let page = browser.new_page(options.viewport).await?;
        let ctx = RecordContext::new(HNB_BANK, Utc::now(), &self.url);

        let rows = load_table(page.as_ref(), &self.url, &self.table_selector, options).await?;
        let entries = scan_keyword_rows(&rows);
        info!("Classified {} fee entries", entries.len());

        // The table has no product column, so every fee is listed under each product
        Ok(expand_products(&entries, &HNB_PRODUCTS, &ctx))
    }
}

#[async_trait::async_trait]
impl TariffScraper for HnbTariffScraper {
    fn name(&self) -> &'static str {
        HNB_KEY
    }

    fn bank(&self) -> &'static str {
        HNB_BANK
    }

    #[instrument(skip_all, fields(bank = HNB_BANK))]
    async fn scrape(&self, launcher: &dyn BrowserLauncher, options: &ScrapeOptions) -> Result<Vec<FeeRow>> {
        let browser = launcher.launch(&options.launch).await?;
        let outcome = self.collect(browser.as_ref(), options).await;

        if let Err(e) = browser.close().await {
            warn!("Failed to close browser: {}", e);
        }

        let rows = outcome?;
        info!("Scraped {} fee rows", rows.len());
        Ok(rows)
    }
}
