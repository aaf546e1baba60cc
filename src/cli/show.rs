use super::estimate::display_estimate;
use super::ui;
use crate::core::aggregate::aggregate;
use crate::scrape::PricingOutcome;
use crate::store::DataStore;
use anyhow::Result;

/// Re-displays the estimate for the last priced fund without scraping again.
pub fn run(store: &DataStore) -> Result<()> {
    let snapshot = store.load_priced()?;
    let total = snapshot.holdings.len();

    println!(
        "\nFund: {} (last priced, {} stocks)",
        ui::style_text(&snapshot.scheme_name, ui::StyleType::Title),
        total
    );

    let estimate = aggregate(&snapshot);
    let outcome = PricingOutcome {
        snapshot,
        failures: Vec::new(),
    };
    println!("{}", display_estimate(&outcome, &estimate, total));
    Ok(())
}
