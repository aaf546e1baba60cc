//! Page extractors and the passes that drive a renderer over them.
//!
//! Extractors are plain functions over page source. They never see the
//! renderer, so any page fixture can be fed to them directly.

pub mod holdings;
pub mod listing;
pub mod pass;
pub mod price;

pub use holdings::extract_holdings;
pub use listing::extract_fund_links;
pub use pass::{PassSettings, PricingFailure, PricingOutcome, build_catalog, collect_fund_links, price_fund};
pub use price::extract_price;

use scraper::{ElementRef, Selector};

fn selector(css: &'static str) -> Selector {
    Selector::parse(css).expect("static selector is valid")
}

/// Whitespace-trimmed text of an element and its descendants.
fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
