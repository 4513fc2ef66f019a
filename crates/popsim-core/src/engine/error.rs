use super::config::ConfigError;
use crate::catalog::CatalogError;
use crate::core::genome::GenomeError;
use crate::core::maps::GeneticMapError;
use crate::core::models::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Genome(#[from] GenomeError),

    #[error(transparent)]
    GeneticMap(#[from] GeneticMapError),

    #[error("Demographic model error: {0}")]
    Model(#[from] ModelError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Model '{model}' cannot be run by the simulator: {reason}")]
    Unsupported { model: String, reason: String },

    #[error("Failed to start simulator '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Simulator exited with {status}: {stderr}")]
    SimulatorFailed { status: String, stderr: String },

    #[error("Simulator '{0}' finished without producing any output")]
    EmptyOutput(String),

    #[error("I/O error while streaming simulator output: {0}")]
    Io(#[from] std::io::Error),
}
