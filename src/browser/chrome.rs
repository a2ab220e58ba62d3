//! Headless Chrome backend.
//!
//! `headless_chrome` is blocking, so every call runs on the blocking pool and is
//! bounded by a tokio timeout on top of Chrome's own.

use super::{
    BrowserLauncher, BrowserSession, LaunchOptions, NavigateOptions, PageSession, Viewport,
    WaitUntil,
};
use crate::constants::COOKIE_ACCEPT_SELECTORS;
use crate::error::{Result, ScraperError};
use async_trait::async_trait;
use headless_chrome::{Browser, Tab};
use std::ffi::{OsStr, OsString};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument};

/// Chrome kills itself after this long without CDP traffic; slow-mo runs need headroom
const IDLE_BROWSER_TIMEOUT: Duration = Duration::from_secs(300);
const READY_STATE_POLL: Duration = Duration::from_millis(100);
/// Lets Chrome's own wait report its error before the outer bound fires
const TIMEOUT_GRACE: Duration = Duration::from_secs(2);
const COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

/// Set on the outgoing document so a readiness poll cannot mistake it for the new one
const STALE_DOCUMENT_MARK: &str = "window.__tariffScraperStale = true";
const DOCUMENT_STATE_SCRIPT: &str =
    r#"window.__tariffScraperStale === true ? "stale" : document.readyState"#;

const COOKIE_TEXT_SCRIPT: &str = r#"(() => {
    const pattern = /^(accept|accept all|accept cookies|i agree|agree|allow all|allow cookies|got it|ok)$/i;
    const candidates = Array.from(document.querySelectorAll("button, a[role=button], [role=button]"));
    for (const el of candidates) {
        const text = (el.textContent || "").replace(/\s+/g, " ").trim();
        const visible = el.offsetParent !== null;
        if (visible && pattern.test(text)) {
            el.click();
            return true;
        }
    }
    return false;
})()"#;

fn browser_err(context: &str, e: impl std::fmt::Display) -> ScraperError {
    ScraperError::Browser(format!("{}: {}", context, e))
}

/// Runs a blocking Chrome call off the async runtime, failing with a timeout after `limit`.
async fn run_blocking<T, F>(operation: &str, limit: Duration, f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    let handle = tokio::task::spawn_blocking(f);
    match tokio::time::timeout(limit, handle).await {
        Err(_) => Err(ScraperError::timeout(operation, limit)),
        Ok(joined) => joined.map_err(|e| browser_err("Browser task panicked", e))?,
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ChromeLauncher;

impl ChromeLauncher {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl BrowserLauncher for ChromeLauncher {
    #[instrument(skip(self, options), fields(headless = options.headless))]
    async fn launch(&self, options: &LaunchOptions) -> Result<Box<dyn BrowserSession>> {
        let opts = options.clone();
        let browser = run_blocking("browser launch", COMMAND_TIMEOUT, move || {
            let args: Vec<OsString> = opts.extra_args.iter().map(OsString::from).collect();
            let arg_refs: Vec<&OsStr> = args.iter().map(|a| a.as_os_str()).collect();

            let launch_options = headless_chrome::LaunchOptions::default_builder()
                .headless(opts.headless)
                .sandbox(opts.sandbox)
                .path(opts.chrome_path.clone())
                .window_size(opts.window.map(|v| (v.width, v.height)))
                .idle_browser_timeout(IDLE_BROWSER_TIMEOUT)
                .args(arg_refs)
                .build()
                .map_err(|e| browser_err("Failed to build Chrome launch options", e))?;

            Browser::new(launch_options).map_err(|e| browser_err("Failed to launch headless Chrome", e))
        })
        .await?;

        info!("Launched Chrome");
        Ok(Box::new(ChromeSession {
            browser: Mutex::new(Some(Arc::new(browser))),
            window: options.window,
            slow_mo: options.slow_mo,
        }))
    }
}

pub struct ChromeSession {
    browser: Mutex<Option<Arc<Browser>>>,
    window: Option<Viewport>,
    slow_mo: Option<Duration>,
}

impl ChromeSession {
    fn handle(&self) -> Result<Arc<Browser>> {
        let guard = self
            .browser
            .lock()
            .map_err(|e| browser_err("Browser lock poisoned", e))?;
        guard
            .clone()
            .ok_or_else(|| ScraperError::Browser("Browser already closed".into()))
    }
}

#[async_trait]
impl BrowserSession for ChromeSession {
    async fn new_page(&self, viewport: Viewport) -> Result<Box<dyn PageSession>> {
        if self.window != Some(viewport) {
            debug!(
                "Requested viewport {}x{} differs from launch window {:?}",
                viewport.width, viewport.height, self.window
            );
        }

        let browser = self.handle()?;
        let tab = run_blocking("new tab", COMMAND_TIMEOUT, move || {
            browser
                .new_tab()
                .map_err(|e| browser_err("Failed to create tab", e))
        })
        .await?;

        Ok(Box::new(ChromePage {
            tab,
            slow_mo: self.slow_mo,
        }))
    }

    async fn close(&self) -> Result<()> {
        let taken = self
            .browser
            .lock()
            .map_err(|e| browser_err("Browser lock poisoned", e))?
            .take();

        if let Some(browser) = taken {
            // Dropping the last handle kills the Chrome process, which can block briefly
            run_blocking("browser close", COMMAND_TIMEOUT, move || {
                drop(browser);
                Ok(())
            })
            .await?;
            info!("Closed Chrome");
        }
        Ok(())
    }
}

pub struct ChromePage {
    tab: Arc<Tab>,
    slow_mo: Option<Duration>,
}

impl ChromePage {
    async fn pause(&self) {
        if let Some(delay) = self.slow_mo {
            tokio::time::sleep(delay).await;
        }
    }
}

/// True once the navigated-to document has parsed. The outgoing document reports
/// `stale` until Chrome commits the new one.
fn dom_content_loaded(observed: Option<&str>) -> bool {
    matches!(observed, Some("interactive") | Some("complete"))
}

fn wait_for_dom_ready(tab: &Tab, timeout: Duration) -> Result<()> {
    let started = Instant::now();
    loop {
        let state = tab
            .evaluate(DOCUMENT_STATE_SCRIPT, false)
            .map_err(|e| browser_err("Failed to read document state", e))?
            .value;
        if dom_content_loaded(state.as_ref().and_then(|v| v.as_str())) {
            return Ok(());
        }
        if started.elapsed() >= timeout {
            return Err(ScraperError::timeout("DOMContentLoaded", timeout));
        }
        std::thread::sleep(READY_STATE_POLL);
    }
}

/// Maps a failed element wait: only Chrome's own wait timeout counts as a timeout
fn selector_wait_error(operation: String, timeout: Duration, e: anyhow::Error) -> ScraperError {
    if e.downcast_ref::<headless_chrome::util::Timeout>().is_some() {
        ScraperError::timeout(operation, timeout)
    } else {
        browser_err(&format!("Waiting for {} failed", operation), e)
    }
}

#[async_trait]
impl PageSession for ChromePage {
    #[instrument(skip(self, options))]
    async fn goto(&self, url: &str, options: NavigateOptions) -> Result<()> {
        self.pause().await;
        let tab = self.tab.clone();
        let target = url.to_string();
        let limit = options.timeout;

        run_blocking(&format!("navigation to {}", url), limit + TIMEOUT_GRACE, move || {
            tab.set_default_timeout(limit);
            tab.evaluate(STALE_DOCUMENT_MARK, false)
                .map_err(|e| browser_err("Failed to mark current document", e))?;
            tab.navigate_to(&target)
                .map_err(|e| browser_err(&format!("Failed to navigate to {}", target), e))?;
            match options.wait_until {
                WaitUntil::Load => {
                    tab.wait_until_navigated()
                        .map_err(|e| browser_err("Page failed to load", e))?;
                }
                WaitUntil::DomContentLoaded => wait_for_dom_ready(&tab, limit)?,
            }
            Ok(())
        })
        .await?;

        debug!("Navigation finished");
        Ok(())
    }

    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> Result<()> {
        self.pause().await;
        let tab = self.tab.clone();
        let sel = selector.to_string();
        let operation = format!("selector `{}`", selector);
        let inner_operation = operation.clone();

        run_blocking(&operation, timeout + TIMEOUT_GRACE, move || {
            tab.wait_for_element_with_custom_timeout(&sel, timeout)
                .map(|_| ())
                .map_err(|e| selector_wait_error(inner_operation, timeout, e))
        })
        .await
    }

    async fn dismiss_cookie_banner(&self) -> Result<bool> {
        self.pause().await;
        let tab = self.tab.clone();

        run_blocking("cookie banner dismissal", COMMAND_TIMEOUT, move || {
            for selector in COOKIE_ACCEPT_SELECTORS {
                if let Ok(element) = tab.find_element(selector) {
                    if element.click().is_ok() {
                        return Ok(true);
                    }
                }
            }

            let clicked = tab
                .evaluate(COOKIE_TEXT_SCRIPT, false)
                .map_err(|e| browser_err("Cookie script failed", e))?
                .value
                .and_then(|v| v.as_bool())
                .unwrap_or(false);
            Ok(clicked)
        })
        .await
    }

    async fn content(&self) -> Result<String> {
        self.pause().await;
        let tab = self.tab.clone();

        run_blocking("page content", COMMAND_TIMEOUT, move || {
            tab.get_content()
                .map_err(|e| browser_err("Failed to get page content", e))
        })
        .await
    }
}
