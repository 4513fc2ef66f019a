use super::config::MapSelection;
use crate::core::genome::{Chromosome, Genome, GenomeError};
use crate::core::maps::RecombinationMap;
use std::path::Path;
use tracing::debug;

/// The stretch of a chromosome handed to the simulator.
#[derive(Debug, Clone, PartialEq)]
pub struct Contig {
    pub chromosome: String,
    /// Length in base pairs after the length multiplier is applied.
    pub length: u64,
    pub recombination_map: RecombinationMap,
    pub mutation_rate: f64,
}

impl Contig {
    /// Builds the contig for `chromosome`, keeping the leading `length_multiplier`
    /// fraction of it. The recombination map is cut at the same point.
    pub fn new(
        genome: &Genome,
        chromosome: &Chromosome,
        map: &MapSelection,
        length_multiplier: f64,
        map_root: &Path,
    ) -> Result<Self, GenomeError> {
        let full_map = match map {
            MapSelection::Uniform => chromosome.uniform_recombination_map(),
            MapSelection::Default => chromosome.recombination_map(genome, None, map_root)?,
            MapSelection::Named(name) => {
                chromosome.recombination_map(genome, Some(name.as_str()), map_root)?
            }
        };

        let length = ((chromosome.length as f64 * length_multiplier).round() as u64).max(1);
        let recombination_map = full_map.truncated(length as f64);
        debug!(
            chromosome = chromosome.name,
            length,
            mean_rate = recombination_map.mean_rate(),
            "Contig assembled"
        );

        Ok(Self {
            chromosome: chromosome.name.to_string(),
            length,
            recombination_map,
            mutation_rate: chromosome.default_mutation_rate,
        })
    }

    /// Mean recombination rate over the contig, per base per generation.
    pub fn recombination_rate(&self) -> f64 {
        self.recombination_map.mean_rate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use crate::core::maps::GeneticMapError;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn uniform_contig_uses_chromosome_defaults() {
        let species = catalog::get_species("homo_sapiens").unwrap();
        let chr22 = species.genome.chromosome("chr22").unwrap();
        let dir = tempdir().unwrap();

        let contig =
            Contig::new(&species.genome, chr22, &MapSelection::Uniform, 1.0, dir.path()).unwrap();
        assert_eq!(contig.length, chr22.length);
        assert_eq!(contig.mutation_rate, chr22.default_mutation_rate);
        assert!((contig.recombination_rate() - chr22.default_recombination_rate).abs() < 1e-20);
    }

    #[test]
    fn length_multiplier_shortens_contig_and_map() {
        let species = catalog::get_species("homo_sapiens").unwrap();
        let chr22 = species.genome.chromosome("chr22").unwrap();
        let dir = tempdir().unwrap();

        let contig =
            Contig::new(&species.genome, chr22, &MapSelection::Uniform, 0.01, dir.path()).unwrap();
        let expected = (chr22.length as f64 * 0.01).round() as u64;
        assert_eq!(contig.length, expected);
        assert_eq!(contig.recombination_map.sequence_length(), expected as f64);
    }

    #[test]
    fn named_map_must_be_cached() {
        let species = catalog::get_species("homo_sapiens").unwrap();
        let chr22 = species.genome.chromosome("chr22").unwrap();
        let dir = tempdir().unwrap();

        let result = Contig::new(&species.genome, chr22, &MapSelection::Default, 1.0, dir.path());
        assert!(matches!(
            result,
            Err(GenomeError::GeneticMap(GeneticMapError::NotCached { .. }))
        ));
    }

    #[test]
    fn cached_map_is_loaded_and_truncated() {
        let species = catalog::get_species("homo_sapiens").unwrap();
        let chr22 = species.genome.chromosome("chr22").unwrap();
        let map = species.get_genetic_map("HapmapII_GRCh37").unwrap();
        let dir = tempdir().unwrap();
        let map_dir = map.cache_dir(dir.path());
        fs::create_dir_all(&map_dir).unwrap();
        fs::write(
            map.chromosome_map_path(dir.path(), "chr22"),
            "Chromosome\tPosition(bp)\tRate(cM/Mb)\tMap(cM)\n\
             chr22\t0\t1.0\t0.0\n\
             chr22\t1000\t2.0\t0.001\n\
             chr22\t3000\t0.0\t0.005\n",
        )
        .unwrap();

        let contig = Contig::new(
            &species.genome,
            chr22,
            &MapSelection::Named("HapmapII_GRCh37".to_string()),
            1.0,
            dir.path(),
        )
        .unwrap();
        assert_eq!(contig.recombination_map.positions(), &[0.0, 1000.0, 3000.0]);
    }
}
