use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://groww.in";
const DEFAULT_LISTING_URL: &str = "https://groww.in/mutual-funds/filter?q=&fundSize=&investType=%5B%22SIP%22%5D&pageNo={page}&sortBy=3";

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct SiteConfig {
    /// Prefix for the site-relative links found on fund and listing pages.
    pub base_url: String,
    /// Listing page template; `{page}` is replaced by the page number.
    pub listing_url: String,
    pub listing_pages: u32,
}

impl Default for SiteConfig {
    fn default() -> Self {
        SiteConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            listing_url: DEFAULT_LISTING_URL.to_string(),
            listing_pages: 95,
        }
    }
}

impl SiteConfig {
    pub fn listing_urls(&self) -> Vec<String> {
        (1..=self.listing_pages)
            .map(|page| self.listing_url.replace("{page}", &page.to_string()))
            .collect()
    }

    /// Resolves a site-relative link such as `/stocks/infosys-ltd`.
    pub fn resolve(&self, link: &str) -> String {
        if link.starts_with("http://") || link.starts_with("https://") {
            return link.to_string();
        }
        format!("{}{}", self.base_url.trim_end_matches('/'), link)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ScrapeConfig {
    pub wait_timeout_secs: u64,
    pub poll_interval_ms: u64,
    pub request_delay_ms: u64,
    pub user_agent: String,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        ScrapeConfig {
            wait_timeout_secs: 10,
            poll_interval_ms: 500,
            request_delay_ms: 500,
            user_agent: concat!("navcast/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ScrapeConfig {
    pub fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout_secs)
    }

    /// Pause between re-fetches while waiting for a page to render.
    /// Never shorter than the request delay, since every poll is a request.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(self.request_delay_ms))
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub scrape: ScrapeConfig,
    pub data_path: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("in", "navcast", "navcast")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn default_data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        let proj_dirs = ProjectDirs::from("in", "navcast", "navcast")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}
