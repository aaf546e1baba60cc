//! Weighted price change of a fund from its priced holdings.
use crate::core::model::FundSnapshot;
use crate::core::normalize::round_price;
use rust_decimal::Decimal;
use std::fmt::Display;
use tracing::{debug, warn};

/// Holding weights and stock moves are both percentages. A stock move is
/// already multiplied by this once; the weighted sum is divided by it once.
/// The estimate therefore comes out in percent.
pub const PERCENT_SCALE: Decimal = Decimal::ONE_HUNDRED;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExclusionReason {
    /// One or both prices could not be scraped.
    MissingPrice,
    /// Yesterday's price is zero, so the move is undefined.
    ZeroReferencePrice,
    /// The move or its weighted contribution does not fit in a `Decimal`.
    Overflow,
}

impl Display for ExclusionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ExclusionReason::MissingPrice => "MissingPrice",
                ExclusionReason::ZeroReferencePrice => "ZeroReferencePrice",
                ExclusionReason::Overflow => "Overflow",
            }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exclusion {
    pub stock_name: String,
    pub reason: ExclusionReason,
}

/// Result of aggregating one priced snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FundEstimate {
    pub scheme_name: String,
    /// Estimated move in percent, rounded to two places.
    pub change: Decimal,
    /// Holdings that contributed to `change`.
    pub priced: usize,
    pub excluded: Vec<Exclusion>,
}

impl FundEstimate {
    /// The estimate as shown to users, always with two decimals.
    pub fn formatted_change(&self) -> String {
        format!("{:.2}", self.change)
    }
}

/// Percentage move from `previous` to `current`.
pub fn stock_change_pct(current: Decimal, previous: Decimal) -> Result<Decimal, ExclusionReason> {
    if previous.is_zero() {
        return Err(ExclusionReason::ZeroReferencePrice);
    }
    current
        .checked_sub(previous)
        .and_then(|delta| delta.checked_div(previous))
        .and_then(|ratio| ratio.checked_mul(PERCENT_SCALE))
        .ok_or(ExclusionReason::Overflow)
}

/// Adds one holding's weighted move to the running total.
fn weighted_total(
    total: Decimal,
    current: Decimal,
    previous: Decimal,
    weight: Decimal,
) -> Result<Decimal, ExclusionReason> {
    stock_change_pct(current, previous)?
        .checked_mul(weight)
        .and_then(|contribution| total.checked_add(contribution))
        .ok_or(ExclusionReason::Overflow)
}

/// Sums each priced holding's move scaled by its weight.
///
/// Weights are used as published: they are not rescaled to the priced subset,
/// so unpriced holdings simply contribute nothing.
pub fn aggregate(snapshot: &FundSnapshot) -> FundEstimate {
    let mut total = Decimal::ZERO;
    let mut priced = 0;
    let mut excluded = Vec::new();

    for holding in &snapshot.holdings {
        let Some((current, previous)) = holding.prices() else {
            debug!(stock = %holding.stock_name, "Skipping holding without prices");
            excluded.push(Exclusion {
                stock_name: holding.stock_name.clone(),
                reason: ExclusionReason::MissingPrice,
            });
            continue;
        };

        match weighted_total(total, current, previous, holding.holding_percent) {
            Ok(updated) => {
                total = updated;
                priced += 1;
            }
            Err(reason) => {
                warn!(stock = %holding.stock_name, %reason, "Excluding holding from estimate");
                excluded.push(Exclusion {
                    stock_name: holding.stock_name.clone(),
                    reason,
                });
            }
        }
    }

    FundEstimate {
        scheme_name: snapshot.scheme_name.clone(),
        change: round_price(total / PERCENT_SCALE),
        priced,
        excluded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{Holding, PriceObservation};
    use rust_decimal_macros::dec;

    fn priced(name: &str, percent: Decimal, current: Decimal, previous: Decimal) -> Holding {
        Holding::new(name, percent, &format!("/stocks/{name}"))
            .priced(PriceObservation { current, previous })
    }

    #[test]
    fn test_single_full_weight_holding() {
        let snapshot = FundSnapshot::new(
            "Solo",
            vec![priced("a", dec!(100), dec!(110), dec!(100))],
        );

        let estimate = aggregate(&snapshot);
        assert_eq!(estimate.change, dec!(10.00));
        assert_eq!(estimate.formatted_change(), "10.00");
        assert_eq!(estimate.priced, 1);
        assert!(estimate.excluded.is_empty());
    }

    #[test]
    fn test_weights_are_not_renormalized() {
        // 10% weight moving +10% adds 1% to the fund, whatever the other 90% did.
        let snapshot = FundSnapshot::new(
            "Partial",
            vec![
                priced("a", dec!(10), dec!(110), dec!(100)),
                Holding::new("b", dec!(90), "/stocks/b"),
            ],
        );

        let estimate = aggregate(&snapshot);
        assert_eq!(estimate.change, dec!(1.00));
        assert_eq!(estimate.priced, 1);
        assert_eq!(
            estimate.excluded,
            vec![Exclusion {
                stock_name: "b".to_string(),
                reason: ExclusionReason::MissingPrice,
            }]
        );
    }

    #[test]
    fn test_mixed_moves() {
        let snapshot = FundSnapshot::new(
            "Mixed",
            vec![
                priced("up", dec!(40), dec!(105), dec!(100)),    // +5% * 40
                priced("down", dec!(35), dec!(98), dec!(100)),   // -2% * 35
                priced("flat", dec!(25), dec!(250), dec!(250)),  // 0
            ],
        );

        // (200 - 70 + 0) / 100
        assert_eq!(aggregate(&snapshot).change, dec!(1.30));
    }

    #[test]
    fn test_weights_above_hundred_are_used_as_is() {
        let snapshot = FundSnapshot::new(
            "Noisy",
            vec![
                priced("a", dec!(60), dec!(102), dec!(100)),
                priced("b", dec!(60), dec!(102), dec!(100)),
            ],
        );

        assert_eq!(aggregate(&snapshot).change, dec!(2.40));
    }

    #[test]
    fn test_empty_snapshot_is_zero() {
        let estimate = aggregate(&FundSnapshot::new("Empty", vec![]));
        assert_eq!(estimate.change, Decimal::ZERO);
        assert_eq!(estimate.formatted_change(), "0.00");
        assert_eq!(estimate.priced, 0);
    }

    #[test]
    fn test_zero_reference_price_is_excluded() {
        let snapshot = FundSnapshot::new(
            "Zero",
            vec![
                priced("broken", dec!(50), dec!(10), dec!(0)),
                priced("ok", dec!(50), dec!(99), dec!(100)),
            ],
        );

        let estimate = aggregate(&snapshot);
        assert_eq!(estimate.change, dec!(-0.50));
        assert_eq!(estimate.priced, 1);
        assert_eq!(estimate.excluded.len(), 1);
        assert_eq!(estimate.excluded[0].stock_name, "broken");
        assert_eq!(
            estimate.excluded[0].reason,
            ExclusionReason::ZeroReferencePrice
        );
    }

    #[test]
    fn test_holding_with_only_one_price_is_excluded() {
        let mut holding = Holding::new("half", dec!(100), "/stocks/half");
        holding.current_price = Some(dec!(120));

        let estimate = aggregate(&FundSnapshot::new("Half", vec![holding]));
        assert_eq!(estimate.change, Decimal::ZERO);
        assert_eq!(estimate.excluded[0].reason, ExclusionReason::MissingPrice);
    }

    #[test]
    fn test_overflowing_weight_is_excluded() {
        let snapshot = FundSnapshot::new(
            "Huge",
            vec![
                priced("huge", dec!(7922816251426433759354395033), dec!(200), dec!(100)),
                priced("ok", dec!(10), dec!(110), dec!(100)),
            ],
        );

        let estimate = aggregate(&snapshot);
        assert_eq!(estimate.change, dec!(1.00));
        assert_eq!(estimate.priced, 1);
        assert_eq!(
            estimate.excluded,
            vec![Exclusion {
                stock_name: "huge".to_string(),
                reason: ExclusionReason::Overflow,
            }]
        );
    }

    #[test]
    fn test_stock_change_pct() {
        assert_eq!(stock_change_pct(dec!(90), dec!(100)), Ok(dec!(-10)));
        assert_eq!(
            stock_change_pct(dec!(1), dec!(0)),
            Err(ExclusionReason::ZeroReferencePrice)
        );
        assert_eq!(
            stock_change_pct(Decimal::MAX, dec!(0.0000001)),
            Err(ExclusionReason::Overflow)
        );
    }
}
