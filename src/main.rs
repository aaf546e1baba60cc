use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use navcast::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for navcast::AppCommand {
    fn from(cmd: Commands) -> navcast::AppCommand {
        match cmd {
            Commands::Links => navcast::AppCommand::Links,
            Commands::Catalog => navcast::AppCommand::Catalog,
            Commands::Search { query } => navcast::AppCommand::Search { query },
            Commands::Estimate { fund } => navcast::AppCommand::Estimate { fund },
            Commands::Show => navcast::AppCommand::Show,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Collect fund page links from the fund listing
    Links,
    /// Scrape holdings of every collected fund
    Catalog,
    /// Find funds in the catalog by name
    Search {
        /// Part of the fund name, case insensitive
        query: String,
    },
    /// Estimate today's change of a fund from its stock holdings
    Estimate {
        /// Exact fund name as shown by `search`
        fund: String,
    },
    /// Show the last estimate from the saved priced holdings
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => navcast::cli::setup::setup(),
        Some(cmd) => navcast::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
