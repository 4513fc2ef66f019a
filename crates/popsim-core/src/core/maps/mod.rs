//! # Genetic Maps
//!
//! Named recombination maps tied to a particular genome build, and the
//! per-chromosome [`RecombinationMap`] they expand into.
//!
//! A [`GeneticMap`] only describes where its archive lives and how its files are
//! named. The files themselves are materialized lazily: the caller downloads and
//! unpacks the archive into [`GeneticMap::cache_dir`], after which individual
//! chromosome maps can be read with [`GeneticMap::get_chromosome_map`].
//!
//! ```ignore
//! use stdpopsim::catalog;
//!
//! let species = catalog::get_species("homo_sapiens")?;
//! let hapmap = species.get_genetic_map("HapmapII_GRCh37")?;
//! let chr22 = hapmap.get_chromosome_map(&cache_root, "chr22")?;
//! ```

mod genetic_map;
mod recombination;

pub use genetic_map::GeneticMap;
pub use recombination::RecombinationMap;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeneticMapError {
    #[error("Genetic map '{species}/{map}' is not cached; download it first")]
    NotCached { species: String, map: String },

    #[error("Unknown chromosome '{chromosome}' for genetic map '{map}'")]
    UnknownChromosome { map: String, chromosome: String },

    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV parsing error for '{path}': {source}")]
    Csv { path: String, source: csv::Error },

    #[error("Malformed genetic map '{path}' at line {line}: {message}")]
    Parse {
        path: String,
        line: usize,
        message: String,
    },

    #[error("Invalid recombination map: {0}")]
    InvalidMap(String),
}
