//! Page acquisition: the narrow browser surface the scrapers drive.
//!
//! Scrapers only see these traits, so the real Chrome backend in [`chrome`]
//! and the in-memory fakes used by tests are interchangeable.

pub mod chrome;

use crate::error::Result;
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, warn};

pub use chrome::ChromeLauncher;

/// Extra Chromium flags used when running in production containers
pub const PRODUCTION_ARGS: [&str; 3] = [
    "--disable-setuid-sandbox",
    "--disable-dev-shm-usage",
    "--disable-gpu",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// Page lifecycle point at which a navigation counts as finished
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WaitUntil {
    #[default]
    DomContentLoaded,
    Load,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigateOptions {
    pub wait_until: WaitUntil,
    pub timeout: Duration,
}

/// Browser launch settings. Built once by the caller via [`LaunchOptions::resolve`].
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchOptions {
    pub headless: bool,
    pub sandbox: bool,
    pub slow_mo: Option<Duration>,
    pub chrome_path: Option<PathBuf>,
    pub window: Option<Viewport>,
    pub extra_args: Vec<String>,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            headless: true,
            sandbox: true,
            slow_mo: None,
            chrome_path: None,
            window: None,
            extra_args: Vec::new(),
        }
    }
}

impl LaunchOptions {
    /// Resolves the caller's preferences against the environment. Production always runs
    /// headless, unsandboxed and with the container-safe flags, whatever `show` says.
    pub fn resolve(show: bool, slow_ms: u64, production: bool, chrome_path: Option<PathBuf>) -> Self {
        let slow_mo = (slow_ms > 0).then(|| Duration::from_millis(slow_ms));
        let extra_args = if production {
            PRODUCTION_ARGS.iter().map(|a| a.to_string()).collect()
        } else {
            Vec::new()
        };

        Self {
            headless: production || !show,
            sandbox: !production,
            slow_mo,
            chrome_path,
            window: None,
            extra_args,
        }
    }

    pub fn with_window(mut self, viewport: Viewport) -> Self {
        self.window = Some(viewport);
        self
    }
}

#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    async fn launch(&self, options: &LaunchOptions) -> Result<Box<dyn BrowserSession>>;
}

#[async_trait]
pub trait BrowserSession: Send + Sync {
    async fn new_page(&self, viewport: Viewport) -> Result<Box<dyn PageSession>>;

    /// Releases the browser process. Callers invoke this exactly once per session.
    async fn close(&self) -> Result<()>;
}

#[async_trait]
pub trait PageSession: Send + Sync {
    async fn goto(&self, url: &str, options: NavigateOptions) -> Result<()>;

    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> Result<()>;

    /// Clicks a cookie-consent control if one is present. `Ok(false)` means nothing matched.
    async fn dismiss_cookie_banner(&self) -> Result<bool>;

    /// Rendered HTML of the current document
    async fn content(&self) -> Result<String>;
}

/// Best-effort cookie banner dismissal; failures never abort a scrape.
pub async fn accept_any_cookie(page: &dyn PageSession) {
    match page.dismiss_cookie_banner().await {
        Ok(true) => debug!("Dismissed cookie banner"),
        Ok(false) => debug!("No cookie banner found"),
        Err(e) => warn!("Cookie banner dismissal failed: {}", e),
    }
}
