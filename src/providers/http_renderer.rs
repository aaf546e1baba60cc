use super::util::{page_matches, poll_until};
use crate::core::config::ScrapeConfig;
use crate::core::render::Renderer;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Renderer backed by plain HTTP fetches.
///
/// Waiting for a selector re-fetches the page at `poll_interval`, never faster
/// than the request delay, until the selector matches. This covers
/// server-rendered pages and pages filled in by a later server-side refresh. Script-driven pages need a
/// browser-backed [`Renderer`] instead.
pub struct HttpRenderer {
    client: reqwest::Client,
    poll_interval: Duration,
    current_url: Option<String>,
    source: Option<String>,
}

impl HttpRenderer {
    pub fn new(config: &ScrapeConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to start HTTP rendering session")?;

        Ok(HttpRenderer {
            client,
            poll_interval: config.poll_interval(),
            current_url: None,
            source: None,
        })
    }
}

async fn fetch_page(client: &reqwest::Client, url: &str) -> Result<String> {
    debug!("Requesting page {}", url);
    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to send request for {url}"))?
        .error_for_status()
        .with_context(|| format!("Unexpected status for {url}"))?;

    response
        .text()
        .await
        .with_context(|| format!("Failed to get response text for {url}"))
}

#[async_trait]
impl Renderer for HttpRenderer {
    async fn navigate(&mut self, url: &str) -> Result<()> {
        self.source = None;
        self.current_url = Some(url.to_string());
        self.source = Some(fetch_page(&self.client, url).await?);
        Ok(())
    }

    async fn wait_for(&mut self, selector: &str, timeout: Duration) -> Result<bool> {
        let url = self
            .current_url
            .clone()
            .context("No page loaded in rendering session")?;

        if let Some(source) = &self.source
            && page_matches(source, selector)?
        {
            return Ok(true);
        }

        let client = &self.client;
        let settled = poll_until(
            || {
                let url = url.clone();
                async move {
                    let source = fetch_page(client, &url).await?;
                    Ok::<_, anyhow::Error>(page_matches(&source, selector)?.then_some(source))
                }
            },
            timeout,
            self.poll_interval,
        )
        .await?;

        match settled {
            Some(source) => {
                self.source = Some(source);
                Ok(true)
            }
            None => {
                debug!("Selector `{}` never matched on {}", selector, url);
                Ok(false)
            }
        }
    }

    /// Served HTML is complete as fetched; there is nothing to click or
    /// scroll, so this only reports whether the expander is on the page.
    async fn expand(&mut self, selector: &str, _timeout: Duration) -> Result<bool> {
        let source = self
            .source
            .as_deref()
            .context("No page loaded in rendering session")?;
        page_matches(source, selector)
    }

    fn page_source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    async fn close(&mut self) -> Result<()> {
        debug!("Closing HTTP rendering session");
        self.abort();
        Ok(())
    }

    fn abort(&mut self) {
        self.current_url = None;
        self.source = None;
    }
}
