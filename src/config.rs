use crate::browser::{LaunchOptions, Viewport};
use crate::constants::{
    DEFAULT_NAVIGATION_TIMEOUT_SECS, DEFAULT_SELECTOR_TIMEOUT_SECS, DEFAULT_VIEWPORT_HEIGHT,
    DEFAULT_VIEWPORT_WIDTH,
};
use crate::error::{Result, ScraperError};
use crate::types::ScrapeOptions;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub browser: BrowserConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    pub chrome_path: Option<PathBuf>,
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub navigation_timeout_secs: u64,
    pub selector_timeout_secs: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            chrome_path: None,
            viewport_width: DEFAULT_VIEWPORT_WIDTH,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
            navigation_timeout_secs: DEFAULT_NAVIGATION_TIMEOUT_SECS,
            selector_timeout_secs: DEFAULT_SELECTOR_TIMEOUT_SECS,
        }
    }
}

/// Where the process is running; decided once at startup from the environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunEnvironment {
    #[default]
    Development,
    Production,
}

impl RunEnvironment {
    /// Production when `APP_ENV` or `NODE_ENV` is `production`
    pub fn from_env() -> Self {
        let is_production = ["APP_ENV", "NODE_ENV"]
            .iter()
            .filter_map(|key| std::env::var(key).ok())
            .any(|v| v.eq_ignore_ascii_case("production"));
        if is_production {
            RunEnvironment::Production
        } else {
            RunEnvironment::Development
        }
    }

    pub fn is_production(self) -> bool {
        self == RunEnvironment::Production
    }
}

impl Config {
    /// Loads the config file, falling back to defaults when it does not exist
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Config::default());
        }

        let config_content = fs::read_to_string(path).map_err(|e| {
            ScraperError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;

        let config: Config = toml::from_str(&config_content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let b = &self.browser;
        if b.viewport_width == 0 || b.viewport_height == 0 {
            return Err(ScraperError::Config("viewport dimensions must be positive".into()));
        }
        if b.navigation_timeout_secs == 0 || b.selector_timeout_secs == 0 {
            return Err(ScraperError::Config("timeouts must be positive".into()));
        }
        Ok(())
    }

    /// Combines file settings with the caller's flags. `CHROME_PATH` in the environment
    /// wins over the configured binary.
    pub fn scrape_options(
        &self,
        show: bool,
        slow_ms: u64,
        env: RunEnvironment,
        chrome_path_override: Option<PathBuf>,
    ) -> ScrapeOptions {
        let viewport = Viewport {
            width: self.browser.viewport_width,
            height: self.browser.viewport_height,
        };
        let chrome_path = chrome_path_override.or_else(|| self.browser.chrome_path.clone());

        ScrapeOptions {
            launch: LaunchOptions::resolve(show, slow_ms, env.is_production(), chrome_path)
                .with_window(viewport),
            viewport,
            navigation_timeout: Duration::from_secs(self.browser.navigation_timeout_secs),
            selector_timeout: Duration::from_secs(self.browser.selector_timeout_secs),
        }
    }
}
