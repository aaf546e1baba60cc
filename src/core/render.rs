//! Rendering session abstraction.

use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;

/// A browsing session that can load a page and report when it has settled.
///
/// Extractors never talk to a renderer directly; they only see the page source
/// handed out once `wait_for` has confirmed the content they need is present.
#[async_trait]
pub trait Renderer: Send {
    /// Loads `url`, replacing the current page.
    async fn navigate(&mut self, url: &str) -> Result<()>;

    /// Polls the current page until `selector` matches or `timeout` elapses.
    /// Returns `Ok(false)` on timeout.
    async fn wait_for(&mut self, selector: &str, timeout: Duration) -> Result<bool>;

    /// Reveals content collapsed behind the element matching `selector`: clicks
    /// it once it is clickable, then scrolls until the page stops growing.
    /// Returns `Ok(false)` when no such element shows up within `timeout`, in
    /// which case the page is left as it was.
    async fn expand(&mut self, selector: &str, timeout: Duration) -> Result<bool>;

    /// Source of the current page, if one has been loaded.
    fn page_source(&self) -> Option<&str>;

    /// Releases the session. Called exactly once at the end of every pass.
    async fn close(&mut self) -> Result<()>;

    /// Tears the session down without waiting. Used when a pass is dropped
    /// before it could `close`, on panic or cancellation.
    fn abort(&mut self);
}
