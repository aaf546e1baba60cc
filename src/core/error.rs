//! Error types for page extraction.

use std::time::Duration;
use thiserror::Error;

/// Failures while turning rendered price text into numbers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceError {
    #[error("price text not found")]
    NotFound,
    #[error("no signed price delta in {0:?}")]
    NoMatch(String),
}

/// Per-page failures. None of these abort a scrape pass.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("extraction failed: {0}")]
    ExtractionFailed(#[from] PriceError),
    #[error("`{selector}` did not render within {timeout:?}")]
    RenderTimeout { selector: String, timeout: Duration },
    #[error("could not load page: {0:#}")]
    Navigation(anyhow::Error),
}
