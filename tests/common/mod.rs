#![allow(dead_code)]

use async_trait::async_trait;
use scraper::{Html, Selector};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tariff_scraper::browser::{
    BrowserLauncher, BrowserSession, LaunchOptions, NavigateOptions, PageSession, Viewport,
};
use tariff_scraper::error::{Result, ScraperError};

/// Where the fake browser should fail. Indexed points count calls from zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailPoint {
    Launch,
    NewPage,
    Goto(usize),
    WaitForSelector(usize),
    Content(usize),
    Cookie,
}

#[derive(Debug, Default)]
pub struct FakeState {
    pub launches: AtomicUsize,
    pub closes: AtomicUsize,
    pub visited: Mutex<Vec<String>>,
    pub waits: AtomicUsize,
    pub contents: AtomicUsize,
    pub cookie_attempts: AtomicUsize,
    pub launch_options: Mutex<Option<LaunchOptions>>,
}

impl FakeState {
    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    pub fn visited(&self) -> Vec<String> {
        self.visited.lock().unwrap().clone()
    }
}

/// Serves canned HTML per URL and records every call
#[derive(Clone, Default)]
pub struct FakeLauncher {
    pages: Arc<HashMap<String, String>>,
    fail: Option<FailPoint>,
    pub state: Arc<FakeState>,
}

impl FakeLauncher {
    pub fn new(pages: &[(&str, &str)]) -> Self {
        Self {
            pages: Arc::new(
                pages
                    .iter()
                    .map(|(url, html)| (url.to_string(), html.to_string()))
                    .collect(),
            ),
            fail: None,
            state: Arc::new(FakeState::default()),
        }
    }

    pub fn failing_at(mut self, point: FailPoint) -> Self {
        self.fail = Some(point);
        self
    }
}

fn injected(step: &str) -> ScraperError {
    ScraperError::Browser(format!("injected failure at {}", step))
}

#[async_trait]
impl BrowserLauncher for FakeLauncher {
    async fn launch(&self, options: &LaunchOptions) -> Result<Box<dyn BrowserSession>> {
        self.state.launches.fetch_add(1, Ordering::SeqCst);
        *self.state.launch_options.lock().unwrap() = Some(options.clone());
        if self.fail == Some(FailPoint::Launch) {
            return Err(injected("launch"));
        }
        Ok(Box::new(FakeBrowser {
            pages: self.pages.clone(),
            fail: self.fail,
            state: self.state.clone(),
        }))
    }
}

struct FakeBrowser {
    pages: Arc<HashMap<String, String>>,
    fail: Option<FailPoint>,
    state: Arc<FakeState>,
}

#[async_trait]
impl BrowserSession for FakeBrowser {
    async fn new_page(&self, _viewport: Viewport) -> Result<Box<dyn PageSession>> {
        if self.fail == Some(FailPoint::NewPage) {
            return Err(injected("new page"));
        }
        Ok(Box::new(FakePage {
            pages: self.pages.clone(),
            fail: self.fail,
            state: self.state.clone(),
            current: Mutex::new(None),
        }))
    }

    async fn close(&self) -> Result<()> {
        self.state.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

struct FakePage {
    pages: Arc<HashMap<String, String>>,
    fail: Option<FailPoint>,
    state: Arc<FakeState>,
    current: Mutex<Option<String>>,
}

impl FakePage {
    fn current_html(&self) -> String {
        self.current
            .lock()
            .unwrap()
            .as_ref()
            .and_then(|url| self.pages.get(url).cloned())
            .unwrap_or_else(|| "<html><body></body></html>".to_string())
    }
}

#[async_trait]
impl PageSession for FakePage {
    async fn goto(&self, url: &str, _options: NavigateOptions) -> Result<()> {
        let index = {
            let mut visited = self.state.visited.lock().unwrap();
            visited.push(url.to_string());
            visited.len() - 1
        };
        if self.fail == Some(FailPoint::Goto(index)) {
            return Err(ScraperError::timeout(format!("navigation to {}", url), Duration::from_secs(45)));
        }
        *self.current.lock().unwrap() = Some(url.to_string());
        Ok(())
    }

    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> Result<()> {
        let index = self.state.waits.fetch_add(1, Ordering::SeqCst);
        if self.fail == Some(FailPoint::WaitForSelector(index)) {
            return Err(ScraperError::timeout(format!("selector `{}`", selector), timeout));
        }

        let sel = Selector::parse(selector).map_err(|e| ScraperError::Selector(format!("{:?}", e)))?;
        let present = Html::parse_document(&self.current_html()).select(&sel).next().is_some();
        if present {
            Ok(())
        } else {
            Err(ScraperError::timeout(format!("selector `{}`", selector), timeout))
        }
    }

    async fn dismiss_cookie_banner(&self) -> Result<bool> {
        self.state.cookie_attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail == Some(FailPoint::Cookie) {
            return Err(injected("cookie banner"));
        }
        Ok(false)
    }

    async fn content(&self) -> Result<String> {
        let index = self.state.contents.fetch_add(1, Ordering::SeqCst);
        if self.fail == Some(FailPoint::Content(index)) {
            return Err(injected("content"));
        }
        Ok(self.current_html())
    }
}
