use crate::cli::SimulateArgs;
use crate::config::PartialConfig;
use crate::data::MapManager;
use crate::error::{CliError, Result};
use crate::utils::progress::{CliProgressHandler, download_bar, download_callback};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use stdpopsim::catalog;
use stdpopsim::core::maps::GeneticMap;
use stdpopsim::engine::config::{MapSelection, SimulationConfig};
use stdpopsim::engine::progress::ProgressReporter;
use stdpopsim::engine::simulator::Simulator;
use stdpopsim::workflows::simulate::{self, SimulationRequest, SimulationSummary};
use tracing::{debug, info};

pub async fn run(args: SimulateArgs, file_config: &PartialConfig, maps: &MapManager) -> Result<()> {
    info!("Merging configuration from file and CLI arguments...");
    let config = file_config.merge_with_cli(&args)?;
    let simulator = file_config.simulator(args.simulator.as_deref());

    if let Some(map) = selected_map(&config)? {
        if !maps.is_cached(map) {
            if args.dry_run {
                return Err(CliError::Data(format!(
                    "Genetic map {} is not cached. Run 'stdpopsim maps download {} {}' first.",
                    map.id, map.species, map.id
                )));
            }
            eprintln!("Genetic map {} is not cached, downloading it now.", map.id);
            let pb = download_bar();
            maps.ensure_cached(map, download_callback(&pb)).await?;
            pb.finish_and_clear();
        }
    }

    info!("Resolving the simulation against the catalog...");
    let request = tokio::task::block_in_place(|| simulate::prepare(&config, maps.cache_root()))?;

    if args.dry_run {
        println!("{}", simulator.command_line(&request.arguments));
        return Ok(());
    }

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    let summary = match &args.output {
        Some(path) => {
            info!("Writing simulator output to {:?}", path);
            let summary = match run_to_file(&request, &simulator, &reporter, path) {
                Ok(summary) => summary,
                Err(e) => {
                    if let Err(remove_error) = fs::remove_file(path) {
                        debug!("Could not remove {:?}: {}", path, remove_error);
                    }
                    return Err(e);
                }
            };
            eprintln!("Output written to: {}", path.display());
            summary
        }
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            tokio::task::block_in_place(|| {
                simulate::run(&request, &simulator, &reporter, &mut out)
            })?
        }
    };

    info!(
        "Simulation of {} finished: {} bytes from `{}`",
        request.contig.chromosome, summary.bytes_written, summary.command_line
    );
    Ok(())
}

/// Streams the simulation into `path`. The caller removes the file on failure.
fn run_to_file(
    request: &SimulationRequest,
    simulator: &dyn Simulator,
    reporter: &ProgressReporter,
    path: &Path,
) -> Result<SimulationSummary> {
    let mut out = BufWriter::new(File::create(path)?);
    let summary =
        tokio::task::block_in_place(|| simulate::run(request, simulator, reporter, &mut out))?;
    out.flush()?;
    Ok(summary)
}

/// The genetic map the configuration needs on disk, if any.
fn selected_map(config: &SimulationConfig) -> Result<Option<&'static GeneticMap>> {
    let species = catalog::get_species(&config.species)?;
    let map = match &config.genetic_map {
        MapSelection::Uniform => return Ok(None),
        MapSelection::Default => species.genome.resolve_genetic_map(None),
        MapSelection::Named(id) => species.genome.resolve_genetic_map(Some(id.as_str())),
    };
    Ok(Some(map.map_err(catalog::CatalogError::from)?))
}
