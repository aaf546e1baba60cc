use crate::core::config::AppConfig;
use crate::providers::HttpRenderer;
use crate::scrape::{PassSettings, collect_fund_links};
use crate::store::{DataStore, LINKS_FILE};
use anyhow::{Result, bail};

pub async fn run(config: &AppConfig, store: &DataStore) -> Result<()> {
    let listing_urls = config.site.listing_urls();
    println!("Fetching fund links from {} listing pages...", listing_urls.len());

    let renderer = HttpRenderer::new(&config.scrape)?;
    let settings = PassSettings::from(&config.scrape);
    let links = collect_fund_links(renderer, &listing_urls, &config.site, &settings).await;

    if links.is_empty() {
        bail!("No fund links found");
    }

    store.save_links(&links)?;
    println!(
        "Saved {} fund links to {}",
        links.len(),
        store.path(LINKS_FILE).display()
    );
    Ok(())
}
