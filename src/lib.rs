pub mod cli;
pub mod core;
pub mod providers;
pub mod scrape;
pub mod store;

use crate::core::config::AppConfig;
use crate::store::DataStore;
use anyhow::Result;
use tracing::{debug, info};

pub enum AppCommand {
    /// Collect fund page links from the listing pages
    Links,
    /// Scrape the holdings of every linked fund
    Catalog,
    /// Filter catalog fund names
    Search { query: String },
    /// Price one fund's holdings and estimate its move
    Estimate { fund: String },
    /// Show the estimate of the last priced fund again
    Show,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("navcast starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let store = DataStore::new(config.default_data_path()?);

    match command {
        AppCommand::Links => cli::links::run(&config, &store).await,
        AppCommand::Catalog => cli::catalog::run(&config, &store).await,
        AppCommand::Search { query } => cli::search::run(&store, &query),
        AppCommand::Estimate { fund } => cli::estimate::run(&config, &store, &fund).await,
        AppCommand::Show => cli::show::run(&store),
    }
}
