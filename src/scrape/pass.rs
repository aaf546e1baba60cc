//! Sequential scrape passes over a single rendering session.
//!
//! Each pass takes the renderer by value and closes it before returning. If
//! the pass is dropped early (panic, cancelled future) the session is aborted
//! instead. A page that fails to load, render or parse is logged and skipped;
//! nothing short of failing to create the session stops a pass.

use super::holdings::{HOLDINGS_EXPANDER_SELECTOR, HOLDINGS_TABLE_SELECTOR, extract_holdings};
use super::listing::{FUND_LINK_SELECTOR, extract_fund_links};
use super::price::{PRICE_SELECTOR, extract_price};
use crate::core::config::{ScrapeConfig, SiteConfig};
use crate::core::error::ScrapeError;
use crate::core::model::{FundCatalog, FundSnapshot};
use crate::core::render::Renderer;
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy)]
pub struct PassSettings {
    /// Upper bound on waiting for a page's content to appear.
    pub wait_timeout: Duration,
    /// Fixed pause between consecutive page loads.
    pub request_delay: Duration,
}

impl From<&ScrapeConfig> for PassSettings {
    fn from(config: &ScrapeConfig) -> Self {
        PassSettings {
            wait_timeout: config.wait_timeout(),
            request_delay: config.request_delay(),
        }
    }
}

#[derive(Debug)]
pub struct PricingFailure {
    pub stock_name: String,
    pub url: String,
    pub error: ScrapeError,
}

/// Priced snapshot plus the holdings that had to be dropped from it.
#[derive(Debug)]
pub struct PricingOutcome {
    pub snapshot: FundSnapshot,
    pub failures: Vec<PricingFailure>,
}

/// Visits every listing page and gathers the fund links found on it.
pub async fn collect_fund_links<R: Renderer>(
    mut renderer: R,
    listing_urls: &[String],
    site: &SiteConfig,
    settings: &PassSettings,
) -> Vec<String> {
    info!(pages = listing_urls.len(), "Collecting fund links");
    let mut session = Session::new(&mut renderer);
    let mut links = Vec::new();

    for (index, url) in listing_urls.iter().enumerate() {
        pace(index, settings).await;
        match load(session.renderer(), url, FUND_LINK_SELECTOR, settings.wait_timeout).await {
            Ok(page) => {
                let found = extract_fund_links(&page, site);
                debug!(%url, count = found.len(), "Listing page scraped");
                links.extend(found);
            }
            Err(e) => warn!(%url, error = %e, "Skipping listing page"),
        }
    }

    session.release().await;
    info!(count = links.len(), "Collected fund links");
    links
}

/// Scrapes the holdings of every fund page into a catalog.
///
/// Blank URLs are ignored. Pages without a scheme heading or holdings table
/// are left out of the catalog.
pub async fn build_catalog<R: Renderer>(
    mut renderer: R,
    fund_urls: &[String],
    settings: &PassSettings,
    progress: &(dyn Fn() + Sync),
) -> FundCatalog {
    let started = chrono::Local::now();
    info!(funds = fund_urls.len(), %started, "Building fund catalog");
    let mut session = Session::new(&mut renderer);
    let mut catalog = FundCatalog::new();

    let urls = fund_urls.iter().map(|url| url.trim()).filter(|url| !url.is_empty());
    for (index, url) in urls.enumerate() {
        pace(index, settings).await;
        match load_all_holdings(session.renderer(), url, settings.wait_timeout).await {
            Ok(page) => match extract_holdings(&page) {
                Some(snapshot) => {
                    debug!(%url, fund = %snapshot.scheme_name, holdings = snapshot.holdings.len(), "Fund scraped");
                    catalog.push(snapshot);
                }
                None => debug!(%url, "No scheme name or holdings table on page"),
            },
            Err(e) => warn!(%url, error = %e, "Skipping fund page"),
        }
        progress();
    }

    session.release().await;
    let elapsed = chrono::Local::now() - started;
    info!(funds = catalog.len(), elapsed_secs = elapsed.num_seconds(), "Fund catalog built");
    catalog
}

/// Prices every holding of a catalog snapshot.
///
/// Holdings whose page cannot be priced are dropped from the returned snapshot
/// and reported in [`PricingOutcome::failures`].
pub async fn price_fund<R: Renderer>(
    mut renderer: R,
    catalog: &FundSnapshot,
    site: &SiteConfig,
    settings: &PassSettings,
    progress: &(dyn Fn() + Sync),
) -> PricingOutcome {
    info!(fund = %catalog.scheme_name, holdings = catalog.holdings.len(), "Pricing fund holdings");
    let mut session = Session::new(&mut renderer);
    let mut priced = Vec::with_capacity(catalog.holdings.len());
    let mut failures = Vec::new();

    for (index, holding) in catalog.holdings.iter().enumerate() {
        pace(index, settings).await;
        let url = site.resolve(&holding.stock_url);

        let observation = load(session.renderer(), &url, PRICE_SELECTOR, settings.wait_timeout)
            .await
            .and_then(|page| extract_price(&page));

        match observation {
            Ok(observation) => {
                debug!(%url, current = %observation.current, previous = %observation.previous, "Stock priced");
                priced.push(holding.priced(observation));
            }
            Err(error) => {
                warn!(%url, %error, "Data could not be added");
                failures.push(PricingFailure {
                    stock_name: holding.stock_name.clone(),
                    url,
                    error,
                });
            }
        }
        progress();
    }

    session.release().await;
    info!(priced = priced.len(), failed = failures.len(), "Pricing finished");

    PricingOutcome {
        snapshot: FundSnapshot {
            scheme_name: catalog.scheme_name.clone(),
            holdings: priced,
        },
        failures,
    }
}

/// Navigates to `url` and returns its source once `selector` is present.
async fn load<R: Renderer>(
    renderer: &mut R,
    url: &str,
    selector: &str,
    timeout: Duration,
) -> Result<String, ScrapeError> {
    renderer.navigate(url).await.map_err(ScrapeError::Navigation)?;

    let ready = renderer
        .wait_for(selector, timeout)
        .await
        .map_err(ScrapeError::Navigation)?;
    if !ready {
        return Err(ScrapeError::RenderTimeout {
            selector: selector.to_string(),
            timeout,
        });
    }

    Ok(renderer.page_source().unwrap_or_default().to_string())
}

/// Loads a fund page and opens its full holdings list before reading it.
///
/// A fund without a "See All" control, or one that fails to expand, is read
/// as loaded.
async fn load_all_holdings<R: Renderer>(
    renderer: &mut R,
    url: &str,
    timeout: Duration,
) -> Result<String, ScrapeError> {
    let page = load(renderer, url, HOLDINGS_TABLE_SELECTOR, timeout).await?;

    match renderer.expand(HOLDINGS_EXPANDER_SELECTOR, timeout).await {
        Ok(true) => Ok(renderer.page_source().map(str::to_string).unwrap_or(page)),
        Ok(false) => {
            debug!(%url, "Either 'See All' not present or unable to click");
            Ok(page)
        }
        Err(e) => {
            warn!(%url, error = %e, "Could not expand holdings, using first rows only");
            Ok(page)
        }
    }
}

async fn pace(index: usize, settings: &PassSettings) {
    if index > 0 && !settings.request_delay.is_zero() {
        tokio::time::sleep(settings.request_delay).await;
    }
}

/// Borrow of the pass's renderer that aborts it when dropped unreleased.
struct Session<'a, R: Renderer> {
    renderer: &'a mut R,
    released: bool,
}

impl<'a, R: Renderer> Session<'a, R> {
    fn new(renderer: &'a mut R) -> Self {
        Session {
            renderer,
            released: false,
        }
    }

    fn renderer(&mut self) -> &mut R {
        &mut *self.renderer
    }

    async fn release(mut self) {
        if let Err(e) = self.renderer.close().await {
            warn!(error = %e, "Failed to close rendering session");
        }
        self.released = true;
    }
}

impl<R: Renderer> Drop for Session<'_, R> {
    fn drop(&mut self) {
        if !self.released {
            warn!("Pass ended early, aborting rendering session");
            self.renderer.abort();
        }
    }
}
