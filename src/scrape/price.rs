//! Current and previous price of a stock detail page.

use super::selector;
use crate::core::error::{PriceError, ScrapeError};
use crate::core::model::PriceObservation;
use crate::core::normalize::{parse_current_price, reconstruct_previous_price};
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

/// Present once the price row has been rendered.
pub const PRICE_SELECTOR: &str = "span.lpu38Pri";

/// Inline style carried by the visible price spans. Decoy spans use other styles.
const PRICE_SPAN_STYLE: &str = "overflow: hidden; display: inline-block; position: relative;";

static PRICE_SPAN: LazyLock<Selector> = LazyLock::new(|| selector(PRICE_SELECTOR));
static DAY_CHANGE: LazyLock<Selector> = LazyLock::new(|| selector("div.lpu38Day"));

/// Reads today's price and reconstructs yesterday's from a rendered stock page.
pub fn extract_price(page: &str) -> Result<PriceObservation, ScrapeError> {
    let document = Html::parse_document(page);

    let fragments: Vec<String> = document
        .select(&PRICE_SPAN)
        .filter(is_price_span)
        .map(|span| span.text().collect())
        .collect();
    let current = parse_current_price(fragments.as_slice())?;

    let day_change = document
        .select(&DAY_CHANGE)
        .next()
        .ok_or(PriceError::NotFound)?;
    let delta_text: String = day_change.text().map(str::trim).collect();
    let previous = reconstruct_previous_price(&delta_text, current)?;

    Ok(PriceObservation { current, previous })
}

fn is_price_span(span: &ElementRef<'_>) -> bool {
    span.value()
        .attr("style")
        .is_some_and(|style| squash(style) == squash(PRICE_SPAN_STYLE))
}

fn squash(style: &str) -> String {
    style.chars().filter(|c| !c.is_whitespace()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const STYLE: &str = "overflow: hidden; display: inline-block; position: relative;";

    fn price_spans(price: &str) -> String {
        price
            .chars()
            .map(|c| format!(r#"<span class="lpu38Pri" style="{STYLE}">{c}<br>{c}</span>"#))
            .collect()
    }

    fn stock_page(spans: &str, day_change: Option<&str>) -> String {
        let day_change = day_change
            .map(|d| format!(r#"<div class="lpu38Day"><span> {d} </span><span>1D</span></div>"#))
            .unwrap_or_default();
        format!(r#"<html><body><div class="lpu38Head">{spans}</div>{day_change}</body></html>"#)
    }

    #[test]
    fn test_extract_price_up_day() {
        let page = stock_page(&price_spans("₹1,510.25"), Some("+12.25 (0.81%)"));
        assert_eq!(
            extract_price(&page).unwrap(),
            PriceObservation {
                current: dec!(510.25),
                previous: dec!(498.00),
            }
        );

        let page = stock_page(&price_spans("₹1510.25"), Some("+12.25"));
        assert_eq!(
            extract_price(&page).unwrap(),
            PriceObservation {
                current: dec!(1510.25),
                previous: dec!(1498.00),
            }
        );
    }

    #[test]
    fn test_extract_price_down_day() {
        let page = stock_page(&price_spans("245.60"), Some("-4.40"));
        let observation = extract_price(&page).unwrap();
        assert_eq!(observation.current, dec!(245.60));
        assert_eq!(observation.previous, dec!(250.00));
    }

    #[test]
    fn test_decoy_spans_are_ignored() {
        let decoy = r#"<span class="lpu38Pri" style="display: none;">9</span>"#;
        let spans = format!("{decoy}{}{decoy}", price_spans("101.00"));
        let page = stock_page(&spans, Some("0.00"));

        let observation = extract_price(&page).unwrap();
        assert_eq!(observation.current, dec!(101.00));
        assert_eq!(observation.previous, dec!(101.00));
    }

    #[test]
    fn test_missing_price_spans() {
        let page = stock_page("", Some("+1.00"));
        assert!(matches!(
            extract_price(&page),
            Err(ScrapeError::ExtractionFailed(PriceError::NotFound))
        ));
    }

    #[test]
    fn test_missing_day_change() {
        let page = stock_page(&price_spans("100.00"), None);
        assert!(matches!(
            extract_price(&page),
            Err(ScrapeError::ExtractionFailed(PriceError::NotFound))
        ));
    }

    #[test]
    fn test_unparsable_day_change() {
        let page = stock_page(&price_spans("100.00"), Some("--"));
        assert!(matches!(
            extract_price(&page),
            Err(ScrapeError::ExtractionFailed(PriceError::NoMatch(_)))
        ));
    }

    #[test]
    fn test_extraction_is_repeatable() {
        let page = stock_page(&price_spans("77.70"), Some("-0.30"));
        assert_eq!(extract_price(&page).unwrap(), extract_price(&page).unwrap());
    }
}
