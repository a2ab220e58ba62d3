pub mod browser;
pub mod classify;
pub mod config;
pub mod constants;
pub mod emit;
pub mod error;
pub mod logging;
pub mod scrapers;
pub mod table;
pub mod text;
pub mod types;

pub use error::{Result, ScraperError};
pub use types::{FeeRow, ScrapeOptions, TariffScraper};
