//! Turns loosely formatted price text into decimals.
//!
//! Stock pages render the price as a row of positioned spans, usually one per
//! character, so the text has to be reassembled before it can be parsed.

use crate::core::error::PriceError;
use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;
use std::sync::LazyLock;

/// Decimal places kept for every stored price.
pub const PRICE_SCALE: u32 = 2;

static DECIMAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.\d+").expect("decimal pattern is valid"));
static SIGNED_DECIMAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([-+]?)(\d+\.\d+)").expect("signed decimal pattern is valid"));

/// Reassembles a price from its display fragments.
///
/// Takes the first non-blank character of every fragment, joins them in order
/// and parses the first `\d+\.\d+` run found in the result.
pub fn parse_current_price<S: AsRef<str>>(fragments: &[S]) -> Result<Decimal, PriceError> {
    let combined: String = fragments
        .iter()
        .filter_map(|fragment| fragment.as_ref().trim().chars().next())
        .collect();

    let found = DECIMAL.find(&combined).ok_or(PriceError::NotFound)?;
    let price = Decimal::from_str(found.as_str()).map_err(|_| PriceError::NotFound)?;
    Ok(round_price(price))
}

/// Works out yesterday's price from today's price and the day-change text.
///
/// `+x` means the price went up by `x` since yesterday, `-x` that it went down.
/// A magnitude without a sign is read as "unchanged".
pub fn reconstruct_previous_price(delta_text: &str, current: Decimal) -> Result<Decimal, PriceError> {
    let no_match = || PriceError::NoMatch(delta_text.to_string());

    let captures = SIGNED_DECIMAL.captures(delta_text).ok_or_else(no_match)?;
    let magnitude = Decimal::from_str(&captures[2]).map_err(|_| no_match())?;

    let previous = match &captures[1] {
        "+" => current.checked_sub(magnitude),
        "-" => current.checked_add(magnitude),
        _ => Some(current),
    }
    .ok_or_else(no_match)?;

    Ok(round_price(previous))
}

/// Rounds half away from zero and pins the scale so `100` is stored as `100.00`.
pub fn round_price(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(PRICE_SCALE);
    rounded
}
