use super::{GeneticMapError, RecombinationMap};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

const NAME_PLACEHOLDER: &str = "{name}";

/// A named, versioned recombination map for one species' genome build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneticMap {
    pub id: &'static str,
    pub species: &'static str,
    /// Location of the archive holding one map file per chromosome.
    pub url: &'static str,
    /// File name of a chromosome's map inside the archive, with `{name}` standing
    /// in for the chromosome name.
    pub file_pattern: &'static str,
    pub description: &'static str,
}

impl GeneticMap {
    /// Directory the unpacked archive lives in, relative to a cache root.
    pub fn cache_dir(&self, root: &Path) -> PathBuf {
        root.join("genetic_maps").join(self.species).join(self.id)
    }

    pub fn is_cached(&self, root: &Path) -> bool {
        self.cache_dir(root).is_dir()
    }

    pub fn chromosome_file_name(&self, chromosome: &str) -> String {
        self.file_pattern.replace(NAME_PLACEHOLDER, chromosome)
    }

    pub fn chromosome_map_path(&self, root: &Path, chromosome: &str) -> PathBuf {
        self.cache_dir(root).join(self.chromosome_file_name(chromosome))
    }

    pub fn contains_chromosome_map(&self, root: &Path, chromosome: &str) -> bool {
        self.chromosome_map_path(root, chromosome).is_file()
    }

    pub fn get_chromosome_map(
        &self,
        root: &Path,
        chromosome: &str,
    ) -> Result<RecombinationMap, GeneticMapError> {
        self.ensure_cached(root)?;
        let path = self.chromosome_map_path(root, chromosome);
        if !path.is_file() {
            return Err(GeneticMapError::UnknownChromosome {
                map: self.id.to_string(),
                chromosome: chromosome.to_string(),
            });
        }
        debug!("Reading recombination map for {} from {:?}", chromosome, &path);
        RecombinationMap::read_hapmap(&path)
    }

    /// Chromosome names with a map file in the cache, recovered from the file pattern.
    pub fn cached_chromosomes(&self, root: &Path) -> Result<Vec<String>, GeneticMapError> {
        self.ensure_cached(root)?;
        let dir = self.cache_dir(root);
        let (prefix, suffix) = self
            .file_pattern
            .split_once(NAME_PLACEHOLDER)
            .unwrap_or((self.file_pattern, ""));

        let entries = std::fs::read_dir(&dir).map_err(|e| GeneticMapError::Io {
            path: dir.to_string_lossy().to_string(),
            source: e,
        })?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| GeneticMapError::Io {
                path: dir.to_string_lossy().to_string(),
                source: e,
            })?;
            let file_name = entry.file_name().to_string_lossy().to_string();
            let name = file_name
                .strip_prefix(prefix)
                .and_then(|rest| rest.strip_suffix(suffix));
            if let Some(name) = name.filter(|n| !n.is_empty()) {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Parses every cached chromosome map. Files are read in parallel.
    pub fn load_all(
        &self,
        root: &Path,
    ) -> Result<BTreeMap<String, RecombinationMap>, GeneticMapError> {
        let chromosomes = self.cached_chromosomes(root)?;
        chromosomes
            .into_par_iter()
            .map(|name| {
                let map = RecombinationMap::read_hapmap(&self.chromosome_map_path(root, &name))?;
                Ok((name, map))
            })
            .collect()
    }

    fn ensure_cached(&self, root: &Path) -> Result<(), GeneticMapError> {
        if self.is_cached(root) {
            Ok(())
        } else {
            Err(GeneticMapError::NotCached {
                species: self.species.to_string(),
                map: self.id.to_string(),
            })
        }
    }
}

impl fmt::Display for GeneticMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}: {}", self.species, self.id, self.description)
    }
}
