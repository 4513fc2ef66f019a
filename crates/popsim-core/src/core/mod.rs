//! # Core Module
//!
//! The stateless building blocks of the catalog.
//!
//! - **Genomes** ([`genome`]) - Chromosome lengths and default per-base rates
//! - **Genetic Maps** ([`maps`]) - Named recombination maps and their on-disk cache layout
//! - **Demographic Models** ([`models`]) - Populations, migration and demographic events
//!
//! Nothing in this module touches the network or spawns processes; downloading
//! genetic maps is the job of the caller, which only has to place the unpacked
//! archive under [`maps::GeneticMap::cache_dir`].

pub mod genome;
pub mod maps;
pub mod models;
