use std::path::PathBuf;
use stdpopsim::catalog::CatalogError;
use stdpopsim::core::maps::GeneticMapError;
use stdpopsim::engine::error::EngineError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] EngineError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    GeneticMap(#[from] GeneticMapError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Genetic map cache error: {0}")]
    Data(String),

    #[error("Failed to parse file '{path}': {source}", path = path.display())]
    FileParsing {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid argument: {0}")]
    Argument(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
