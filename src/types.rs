use crate::browser::{BrowserLauncher, LaunchOptions, Viewport};
use crate::constants::{
    DEFAULT_NAVIGATION_TIMEOUT_SECS, DEFAULT_SELECTOR_TIMEOUT_SECS, DEFAULT_VIEWPORT_HEIGHT,
    DEFAULT_VIEWPORT_WIDTH,
};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One fee line as published by a bank, ready for output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeRow {
    pub bank: String,
    pub products: Vec<String>,
    pub fee_type: String,
    pub description: String,
    pub amount: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub updated_at: String,
    pub source: String,
}

/// Everything a scrape needs from the caller, resolved before the scrape starts
#[derive(Debug, Clone)]
pub struct ScrapeOptions {
    pub launch: LaunchOptions,
    pub viewport: Viewport,
    pub navigation_timeout: Duration,
    pub selector_timeout: Duration,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            launch: LaunchOptions::default(),
            viewport: Viewport {
                width: DEFAULT_VIEWPORT_WIDTH,
                height: DEFAULT_VIEWPORT_HEIGHT,
            },
            navigation_timeout: Duration::from_secs(DEFAULT_NAVIGATION_TIMEOUT_SECS),
            selector_timeout: Duration::from_secs(DEFAULT_SELECTOR_TIMEOUT_SECS),
        }
    }
}

/// Core trait that every bank tariff scraper implements
#[async_trait::async_trait]
pub trait TariffScraper: Send + Sync {
    /// CLI key for this scraper
    fn name(&self) -> &'static str;

    /// Bank name written into every record
    fn bank(&self) -> &'static str;

    /// Run one complete scrape. The browser launched here is closed before returning,
    /// whether the scrape succeeded or not.
    async fn scrape(
        &self,
        launcher: &dyn BrowserLauncher,
        options: &ScrapeOptions,
    ) -> Result<Vec<FeeRow>>;
}
