use crate::core::maps::{GeneticMap, GeneticMapError, RecombinationMap};
use std::fmt;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum GenomeError {
    #[error("Unknown chromosome '{chromosome}' for species '{species}'")]
    UnknownChromosome { species: String, chromosome: String },

    #[error("Unknown genetic map '{map}' for species '{species}'")]
    UnknownGeneticMap { species: String, map: String },

    #[error("Species '{0}' has no default genetic map")]
    NoDefaultGeneticMap(String),

    #[error(transparent)]
    GeneticMap(#[from] GeneticMapError),
}

/// Static reference data for a single chromosome.
#[derive(Debug, Clone, PartialEq)]
pub struct Chromosome {
    pub name: &'static str,
    /// Length in base pairs.
    pub length: u64,
    /// Per base, per generation.
    pub default_recombination_rate: f64,
    /// Per base, per generation.
    pub default_mutation_rate: f64,
}

impl Chromosome {
    pub fn uniform_recombination_map(&self) -> RecombinationMap {
        RecombinationMap::uniform(self.length as f64, self.default_recombination_rate)
    }

    /// Returns the recombination map for this chromosome from the named genetic map,
    /// or from the genome's default map when `map_name` is `None`.
    ///
    /// A cached map without a file for this chromosome yields a flat map at the
    /// chromosome's average rate.
    pub fn recombination_map(
        &self,
        genome: &Genome,
        map_name: Option<&str>,
        cache_root: &Path,
    ) -> Result<RecombinationMap, GenomeError> {
        let genetic_map = genome.resolve_genetic_map(map_name)?;
        let map_name = genetic_map.id;

        if genetic_map.contains_chromosome_map(cache_root, self.name) {
            return Ok(genetic_map.get_chromosome_map(cache_root, self.name)?);
        }
        if !genetic_map.is_cached(cache_root) {
            return Err(GeneticMapError::NotCached {
                species: genome.species.to_string(),
                map: map_name.to_string(),
            }
            .into());
        }

        warn!(
            "Recombination map not found for chromosome '{}' on map '{}', substituting a flat map with chromosome average rate",
            self.name, map_name
        );
        Ok(self.uniform_recombination_map())
    }
}

/// The chromosomes of one species, constructed once at catalog load time.
#[derive(Debug, Clone)]
pub struct Genome {
    pub species: &'static str,
    chromosomes: Vec<Chromosome>,
    pub default_genetic_map: Option<&'static str>,
    genetic_maps: Vec<GeneticMap>,
}

impl Genome {
    pub fn new(
        species: &'static str,
        chromosomes: Vec<Chromosome>,
        default_genetic_map: Option<&'static str>,
        genetic_maps: Vec<GeneticMap>,
    ) -> Self {
        Self {
            species,
            chromosomes,
            default_genetic_map,
            genetic_maps,
        }
    }

    pub fn chromosomes(&self) -> &[Chromosome] {
        &self.chromosomes
    }

    pub fn num_chromosomes(&self) -> usize {
        self.chromosomes.len()
    }

    pub fn chromosome(&self, name: &str) -> Result<&Chromosome, GenomeError> {
        self.chromosomes
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| GenomeError::UnknownChromosome {
                species: self.species.to_string(),
                chromosome: name.to_string(),
            })
    }

    pub fn genetic_maps(&self) -> &[GeneticMap] {
        &self.genetic_maps
    }

    pub fn get_genetic_map(&self, id: &str) -> Result<&GeneticMap, GenomeError> {
        self.genetic_maps
            .iter()
            .find(|m| m.id == id)
            .ok_or_else(|| GenomeError::UnknownGeneticMap {
                species: self.species.to_string(),
                map: id.to_string(),
            })
    }

    /// The named genetic map, or the default one when `id` is `None`.
    pub fn resolve_genetic_map(&self, id: Option<&str>) -> Result<&GeneticMap, GenomeError> {
        match id {
            Some(id) => self.get_genetic_map(id),
            None => {
                let id = self
                    .default_genetic_map
                    .ok_or_else(|| GenomeError::NoDefaultGeneticMap(self.species.to_string()))?;
                self.get_genetic_map(id)
            }
        }
    }

    pub fn total_length(&self) -> u64 {
        self.chromosomes.iter().map(|c| c.length).sum()
    }

    /// Length-weighted mean of the chromosomes' default recombination rates.
    pub fn mean_recombination_rate(&self) -> f64 {
        let total = self.total_length() as f64;
        if total == 0.0 {
            return 0.0;
        }
        self.chromosomes
            .iter()
            .map(|c| c.length as f64 * c.default_recombination_rate)
            .sum::<f64>()
            / total
    }
}

impl fmt::Display for Genome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Genome for {}:", self.species)?;
        writeln!(
            f,
            "Default genetic map: {}",
            self.default_genetic_map.unwrap_or("None")
        )?;
        writeln!(
            f,
            "{:<22}{:>14}{:>16}{:>16}",
            "chromosome", "length", "recomb_rate", "mut_rate"
        )?;
        for c in &self.chromosomes {
            writeln!(
                f,
                "{:<22}{:>14}{:>16.4e}{:>16.4e}",
                c.name, c.length, c.default_recombination_rate, c.default_mutation_rate
            )?;
        }
        Ok(())
    }
}
