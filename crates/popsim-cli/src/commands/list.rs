use crate::cli::ListArgs;
use crate::data::MapManager;
use crate::error::Result;
use std::io::{self, Write};
use stdpopsim::catalog::{self, Species};

pub fn run(args: ListArgs, maps: &MapManager) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match args.species {
        Some(id) => describe_species(&mut out, catalog::get_species(&id)?, maps)?,
        None => list_species(&mut out)?,
    }
    Ok(())
}

fn list_species(out: &mut dyn Write) -> io::Result<()> {
    writeln!(
        out,
        "{:<26} {:<26} {:>11} {:>6}",
        "ID", "NAME", "CHROMOSOMES", "MODELS"
    )?;
    for species in catalog::all_species() {
        writeln!(
            out,
            "{:<26} {:<26} {:>11} {:>6}",
            species.id,
            species.name,
            species.genome.num_chromosomes(),
            species.models().len()
        )?;
    }
    Ok(())
}

fn describe_species(out: &mut dyn Write, species: &Species, maps: &MapManager) -> io::Result<()> {
    writeln!(out, "{} ({})", species.name, species.common_name)?;
    writeln!(
        out,
        "Generation time: {} years; effective population size: {}",
        species.generation_time, species.population_size
    )?;
    writeln!(out)?;
    write!(out, "{}", species.genome)?;

    writeln!(out)?;
    writeln!(out, "Genetic maps:")?;
    for map in species.genome.genetic_maps() {
        let status = if maps.is_cached(map) { "cached" } else { "not downloaded" };
        writeln!(out, "  {:<20} [{}] {}", map.id, status, map.description)?;
    }

    writeln!(out)?;
    writeln!(out, "Models:")?;
    writeln!(
        out,
        "  {:<26} {}",
        "constant", "Constant size population at the species' effective size"
    )?;
    for model in species.models() {
        writeln!(out, "  {:<26} {}", model.id, model.name)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn species_table_lists_every_species() {
        let mut out = Vec::new();
        list_species(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        for species in catalog::all_species() {
            assert!(text.contains(species.id));
        }
    }

    #[test]
    fn species_description_includes_maps_and_models() {
        let dir = tempdir().unwrap();
        let maps = MapManager::with_root(dir.path().to_path_buf());
        let species = catalog::get_species("dromel").unwrap();

        let mut out = Vec::new();
        describe_species(&mut out, species, &maps).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("chr2L"));
        assert!(text.contains("Comeron2012_dm6"));
        assert!(text.contains("not downloaded"));
        assert!(text.contains("sheehan_song_three_epoch"));
    }
}
