use super::util::page_matches;
use crate::core::render::Renderer;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Renderer serving fixed page sources by URL.
///
/// Pages never change after loading, so `wait_for` answers immediately and
/// `expand` has nothing to reveal beyond noting the request.
pub struct StaticRenderer {
    pages: HashMap<String, String>,
    current_url: Option<String>,
    current: Option<String>,
    closed: Arc<AtomicBool>,
    expanded: Arc<Mutex<Vec<String>>>,
}

impl StaticRenderer {
    pub fn new<I>(pages: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Self {
            pages: pages.into_iter().collect(),
            current_url: None,
            current: None,
            closed: Arc::new(AtomicBool::new(false)),
            expanded: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Flag set once the session has been closed, readable after the renderer
    /// has been moved into a pass.
    pub fn closed_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.closed)
    }

    /// URLs of the pages on which an expander was found, in visiting order.
    pub fn expanded_pages(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.expanded)
    }
}

#[async_trait]
impl Renderer for StaticRenderer {
    async fn navigate(&mut self, url: &str) -> Result<()> {
        self.current = None;
        let page = self
            .pages
            .get(url)
            .ok_or_else(|| anyhow!("No page for {url}"))?;
        self.current = Some(page.clone());
        self.current_url = Some(url.to_string());
        Ok(())
    }

    async fn wait_for(&mut self, selector: &str, _timeout: Duration) -> Result<bool> {
        let source = self
            .current
            .as_deref()
            .ok_or_else(|| anyhow!("No page loaded in rendering session"))?;
        page_matches(source, selector)
    }

    async fn expand(&mut self, selector: &str, _timeout: Duration) -> Result<bool> {
        let source = self
            .current
            .as_deref()
            .ok_or_else(|| anyhow!("No page loaded in rendering session"))?;
        let found = page_matches(source, selector)?;
        if found && let Some(url) = &self.current_url {
            self.expanded
                .lock()
                .map_err(|_| anyhow!("Expansion log poisoned"))?
                .push(url.clone());
        }
        Ok(found)
    }

    fn page_source(&self) -> Option<&str> {
        self.current.as_deref()
    }

    async fn close(&mut self) -> Result<()> {
        self.abort();
        Ok(())
    }

    fn abort(&mut self) {
        self.current_url = None;
        self.current = None;
        self.closed.store(true, Ordering::SeqCst);
    }
}
