use super::ui;
use crate::core::aggregate::{FundEstimate, aggregate, stock_change_pct};
use crate::core::config::AppConfig;
use crate::core::model::{FundCatalog, FundSnapshot};
use crate::providers::HttpRenderer;
use crate::scrape::{PassSettings, PricingOutcome, price_fund};
use crate::store::DataStore;
use anyhow::{Result, anyhow};
use comfy_table::Cell;

pub async fn run(config: &AppConfig, store: &DataStore, fund: &str) -> Result<()> {
    let catalog = store.load_catalog()?;
    let snapshot =
        find_fund(&catalog, fund).ok_or_else(|| anyhow!("Fund not found in catalog: {fund}"))?;

    println!(
        "\nFund: {} ({} stocks)",
        ui::style_text(&snapshot.scheme_name, ui::StyleType::Title),
        snapshot.holdings.len()
    );

    let renderer = HttpRenderer::new(&config.scrape)?;
    let settings = PassSettings::from(&config.scrape);

    let pb = ui::new_progress_bar(snapshot.holdings.len() as u64, false);
    let outcome = price_fund(renderer, snapshot, &config.site, &settings, &|| pb.inc(1)).await;
    pb.finish_and_clear();

    store.save_priced(&outcome.snapshot)?;

    let estimate = aggregate(&outcome.snapshot);
    println!("{}", display_estimate(&outcome, &estimate, snapshot.holdings.len()));
    Ok(())
}

/// Catalog entry whose scheme name is exactly `name`.
pub fn find_fund<'a>(catalog: &'a FundCatalog, name: &str) -> Option<&'a FundSnapshot> {
    catalog.iter().find(|snapshot| snapshot.scheme_name == name)
}

pub(crate) fn display_estimate(outcome: &PricingOutcome, estimate: &FundEstimate, total: usize) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Stock"),
        ui::header_cell("Weight (%)"),
        ui::header_cell("Yesterday"),
        ui::header_cell("Current"),
        ui::header_cell("Change"),
    ]);

    for holding in &outcome.snapshot.holdings {
        let mut row = vec![
            Cell::new(&holding.stock_name),
            ui::number_cell(holding.holding_percent),
        ];
        match holding.prices() {
            Some((current, previous)) => {
                row.push(ui::number_cell(previous));
                row.push(ui::number_cell(current));
                row.push(
                    stock_change_pct(current, previous).map_or_else(|_| ui::na_cell(), ui::change_cell),
                );
            }
            None => row.extend([ui::na_cell(), ui::na_cell(), ui::na_cell()]),
        }
        table.add_row(row);
    }

    let mut output = table.to_string();

    let formatted = format!("{}%", estimate.formatted_change());
    output.push_str(&format!(
        "\n\n{} {}",
        ui::style_text("Estimated change:", ui::StyleType::TotalLabel),
        ui::style_change(estimate.change, &formatted)
    ));

    let excluded = outcome.failures.len() + estimate.excluded.len();
    output.push_str(&format!(
        "\n{}",
        ui::style_text(
            &format!(
                "{} of {} holdings priced, {} excluded",
                estimate.priced, total, excluded
            ),
            ui::StyleType::Subtle
        )
    ));

    for failure in &outcome.failures {
        output.push_str(&format!(
            "\n  {}",
            ui::style_text(
                &format!("{}: {} ({})", failure.stock_name, failure.error, failure.url),
                ui::StyleType::Error
            )
        ));
    }
    for exclusion in &estimate.excluded {
        output.push_str(&format!(
            "\n  {}",
            ui::style_text(
                &format!("{}: {}", exclusion.stock_name, exclusion.reason),
                ui::StyleType::Error
            )
        ));
    }

    output
}
