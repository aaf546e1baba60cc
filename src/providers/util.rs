use anyhow::{Result, anyhow};
use scraper::{Html, Selector};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Re-runs an async check until it yields a value or the time budget runs out
///
/// # Parameters
/// - `check`: Closure returning a future; `Ok(Some(_))` ends the poll
/// - `timeout`: Total time budget, measured from the call
/// - `interval`: Pause before each attempt
///
/// # Returns
/// `Ok(None)` on timeout. Errors from `check` end the poll immediately.
pub async fn poll_until<F, Fut, T>(mut check: F, timeout: Duration, interval: Duration) -> Result<Option<T>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>>>,
{
    let deadline = Instant::now() + timeout;
    let mut attempt = 1;
    loop {
        let now = Instant::now();
        if now >= deadline {
            debug!("Gave up after {} attempts", attempt - 1);
            return Ok(None);
        }
        tokio::time::sleep(interval.min(deadline - now)).await;

        if let Some(value) = check().await? {
            return Ok(Some(value));
        }
        debug!("Attempt {} not ready. Polling again...", attempt);
        attempt += 1;
    }
}

/// Whether `selector` matches anything in `source`.
pub fn page_matches(source: &str, selector: &str) -> Result<bool> {
    let selector =
        Selector::parse(selector).map_err(|e| anyhow!("Invalid selector `{selector}`: {e:?}"))?;
    Ok(Html::parse_document(source).select(&selector).next().is_some())
}
