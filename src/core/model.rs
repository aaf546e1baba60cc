//! Fund snapshot types shared by the scrape passes, the store and the aggregator.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One stock position within a fund.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holding {
    pub stock_name: String,
    /// Weight in percent as published by the fund page. Never renormalized.
    pub holding_percent: Decimal,
    /// Site-relative link to the stock detail page.
    pub stock_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yesterday_price: Option<Decimal>,
}

impl Holding {
    pub fn new(stock_name: &str, holding_percent: Decimal, stock_url: &str) -> Self {
        Self {
            stock_name: stock_name.to_string(),
            holding_percent,
            stock_url: stock_url.to_string(),
            current_price: None,
            yesterday_price: None,
        }
    }

    /// Returns a copy of this holding carrying the observed prices.
    pub fn priced(&self, observation: PriceObservation) -> Self {
        Self {
            current_price: Some(observation.current),
            yesterday_price: Some(observation.previous),
            ..self.clone()
        }
    }

    /// Both prices, if the holding has been priced.
    pub fn prices(&self) -> Option<(Decimal, Decimal)> {
        Some((self.current_price?, self.yesterday_price?))
    }
}

/// Point-in-time record of a fund's holdings, with or without prices attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundSnapshot {
    #[serde(rename = "schemeName")]
    pub scheme_name: String,
    pub holdings: Vec<Holding>,
}

impl FundSnapshot {
    pub fn new(scheme_name: &str, holdings: Vec<Holding>) -> Self {
        Self {
            scheme_name: scheme_name.to_string(),
            holdings,
        }
    }
}

/// All catalog snapshots, in crawl order.
pub type FundCatalog = Vec<FundSnapshot>;

/// Prices read from a single stock page. Both values carry two decimals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceObservation {
    pub current: Decimal,
    pub previous: Decimal,
}
