mod cli;
mod commands;
mod config;
mod data;
mod error;
mod logging;
mod utils;

use crate::cli::{Cli, Commands};
use crate::config::PartialConfig;
use crate::data::MapManager;
use crate::error::{CliError, Result};
use clap::Parser;
use tracing::{debug, error, info};

#[tokio::main]
async fn main() {
    if let Err(e) = run_app().await {
        eprintln!("\n❌ Error: {}", e);
        std::process::exit(1);
    }
}

async fn run_app() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())?;

    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default().into_hooks();
    eyre_hook.install().map_err(|e| CliError::Other(e.into()))?;
    std::panic::set_hook(Box::new(move |pi| {
        error!("{}", panic_hook.panic_report(pi));
    }));

    info!("stdpopsim v{} starting up.", env!("CARGO_PKG_VERSION"));
    debug!("Full CLI arguments parsed: {:?}", &cli);

    if let Some(num_threads) = cli.threads {
        info!("Setting Rayon global thread pool to {} threads.", num_threads);
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .map_err(|e| {
                CliError::Other(anyhow::anyhow!("Failed to build global thread pool: {}", e))
            })?;
    }

    let file_config = PartialConfig::load(cli.config.as_deref())?;
    let maps = MapManager::new(cli.cache_dir.clone().or_else(|| file_config.cache_dir()))?;

    let result = match cli.command {
        Some(Commands::List(args)) => {
            info!("Dispatching to 'list' command.");
            commands::list::run(args, &maps)
        }
        Some(Commands::Debug(args)) => {
            info!("Dispatching to 'debug' command.");
            commands::debug::run(args)
        }
        Some(Commands::Maps(args)) => {
            info!("Dispatching to 'maps' command.");
            commands::maps::run(args, &maps).await
        }
        None => {
            info!("Dispatching to simulation.");
            commands::simulate::run(cli.simulate, &file_config, &maps).await
        }
    };

    match &result {
        Ok(_) => info!("✅ Command completed successfully."),
        Err(e) => error!("❌ Command failed: {}", e),
    }
    result
}
