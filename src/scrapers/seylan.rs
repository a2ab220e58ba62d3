use super::load_table;
use crate::browser::{BrowserLauncher, BrowserSession};
use crate::classify::scan_bold_rows;
use crate::constants::{
    HOME_LOAN_PRODUCT, LAP_PRODUCT, SEYLAN_BANK, SEYLAN_HOME_LOAN_SELECTOR, SEYLAN_HOME_LOAN_URL,
    SEYLAN_KEY, SEYLAN_LAP_SELECTOR, SEYLAN_LAP_URL,
};
use crate::emit::{tag_product, RecordContext};
use crate::error::Result;
use crate::types::{FeeRow, ScrapeOptions, TariffScraper};
use chrono::Utc;
use tracing::{info, info_span, instrument, warn, Instrument};

/// One service-charges category page and the product its table covers
#[derive(Debug, Clone)]
pub struct ChargeSection {
    pub product: &'static str,
    pub url: &'static str,
    pub table_selector: &'static str,
}

/// Seylan service charges. Each product has its own category page; group rows are
/// the ones whose description cell is bold.
pub struct SeylanTariffScraper {
    sections: Vec<ChargeSection>,
}

impl Default for SeylanTariffScraper {
    fn default() -> Self {
        Self::new()
    }
}

impl SeylanTariffScraper {
    pub fn new() -> Self {
        Self {
            sections: vec![
                ChargeSection {
                    product: HOME_LOAN_PRODUCT,
                    url: SEYLAN_HOME_LOAN_URL,
                    table_selector: SEYLAN_HOME_LOAN_SELECTOR,
                },
                ChargeSection {
                    product: LAP_PRODUCT,
                    url: SEYLAN_LAP_URL,
                    table_selector: SEYLAN_LAP_SELECTOR,
                },
            ],
        }
    }

    pub fn sections(&self) -> &[ChargeSection] {
        &self.sections
    }

    /// Visits every section on one page, strictly in order. Any failure discards
    /// the rows of sections already read.
    async fn collect(&self, browser: &dyn BrowserSession, options: &ScrapeOptions) -> Result<Vec<FeeRow>> {
        let page = browser.new_page(options.viewport).await?;
        let ctx = RecordContext::new(SEYLAN_BANK, Utc::now(), "");

        let mut all_rows = Vec::new();
        for section in &self.sections {
            let span = info_span!("section", product = section.product);
            let rows = load_table(page.as_ref(), section.url, section.table_selector, options)
                .instrument(span)
                .await?;

            let entries = scan_bold_rows(&rows);
            info!("{}: {} fee entries", section.product, entries.len());
            all_rows.extend(tag_product(&entries, section.product, &ctx.with_source(section.url)));
        }
        Ok(all_rows)
    }
}

#[async_trait::async_trait]
impl TariffScraper for SeylanTariffScraper {
    fn name(&self) -> &'static str {
        SEYLAN_KEY
    }

    fn bank(&self) -> &'static str {
        SEYLAN_BANK
    }

    #[instrument(skip_all, fields(bank = SEYLAN_BANK))]
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sections_in_visit_order() {
        let scraper = SeylanTariffScraper::new();
        let products: Vec<&str> = scraper.sections().iter().map(|s| s.product).collect();
        assert_eq!(products, vec!["Home Loan", "LAP"]);
        assert_eq!(scraper.sections()[1].table_selector, "#lap .table-responsive table");
    }
}
