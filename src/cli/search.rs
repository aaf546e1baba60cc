use super::ui;
use crate::core::model::FundCatalog;
use crate::store::DataStore;
use anyhow::Result;

pub fn run(store: &DataStore, query: &str) -> Result<()> {
    let catalog = store.load_catalog()?;
    let matches = matching_funds(&catalog, query);

    if matches.is_empty() {
        println!("No funds match \"{query}\".");
        return Ok(());
    }

    for name in &matches {
        println!("{name}");
    }
    println!(
        "\n{}",
        ui::style_text(
            &format!("{} of {} funds", matches.len(), catalog.len()),
            ui::StyleType::Subtle
        )
    );
    Ok(())
}

/// Scheme names containing `query`, ignoring case, in catalog order.
pub fn matching_funds<'a>(catalog: &'a FundCatalog, query: &str) -> Vec<&'a str> {
    let query = query.to_lowercase();
    catalog
        .iter()
        .map(|snapshot| snapshot.scheme_name.as_str())
        .filter(|name| name.to_lowercase().contains(&query))
        .collect()
}
