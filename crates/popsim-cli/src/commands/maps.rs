use crate::cli::{MapsArgs, MapsCommands};
use crate::data::MapManager;
use crate::error::Result;
use crate::utils::progress::{download_bar, download_callback};
use std::path::PathBuf;
use stdpopsim::catalog;
use tracing::info;

pub async fn run(args: MapsArgs, maps: &MapManager) -> Result<()> {
    match args.command {
        MapsCommands::Download {
            species,
            map,
            force,
        } => handle_download(&species, &map, force, maps).await,
        MapsCommands::Path => {
            println!("{}", maps.cache_root().display());
            Ok(())
        }
        MapsCommands::SetPath { path } => handle_set_path(path),
        MapsCommands::ResetPath => {
            MapManager::reset_path()?;
            eprintln!("Genetic map cache path reset to the default location.");
            Ok(())
        }
    }
}

async fn handle_download(
    species: &str,
    map_id: &str,
    force: bool,
    maps: &MapManager,
) -> Result<()> {
    let species = catalog::get_species(species)?;
    let map = species.get_genetic_map(map_id)?;
    eprintln!(
        "Downloading {} to: {}",
        map,
        map.cache_dir(maps.cache_root()).display()
    );

    let pb = download_bar();
    let result = maps.download(map, force, download_callback(&pb)).await;
    match &result {
        Ok(_) => pb.finish_with_message("✓ Genetic map download and setup complete."),
        Err(_) => pb.finish_with_message("✗ Download failed."),
    }
    result
}

fn handle_set_path(path: PathBuf) -> Result<()> {
    let path = if path.is_absolute() {
        path
    } else {
        std::env::current_dir()?.join(path)
    };
    info!("Setting genetic map cache path to {:?}", path);
    MapManager::set_custom_path(&path)?;
    eprintln!("Genetic map cache path set to: {}", path.display());
    Ok(())
}
