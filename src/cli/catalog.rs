use super::ui;
use crate::core::config::AppConfig;
use crate::providers::HttpRenderer;
use crate::scrape::{PassSettings, build_catalog};
use crate::store::{CATALOG_FILE, DataStore};
use anyhow::Result;

pub async fn run(config: &AppConfig, store: &DataStore) -> Result<()> {
    let links = store.load_links()?;
    println!("Fetching holdings of {} funds. This can take a long time.", links.len());

    let renderer = HttpRenderer::new(&config.scrape)?;
    let settings = PassSettings::from(&config.scrape);

    let pb = ui::new_progress_bar(links.len() as u64, false);
    let catalog = build_catalog(renderer, &links, &settings, &|| pb.inc(1)).await;
    pb.finish_and_clear();

    store.save_catalog(&catalog)?;
    println!(
        "Saved {} of {} funds to {}",
        catalog.len(),
        links.len(),
        store.path(CATALOG_FILE).display()
    );
    Ok(())
}
