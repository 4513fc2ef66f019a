//! # Demographic Models
//!
//! A [`Model`] is a named demographic scenario: the populations alive at time
//! zero, their sizes and growth rates, the migration matrix between them, and the
//! events that change all of these as we move backwards in time.
//!
//! Models are plain data. Catalog entries are built by factory functions, and the
//! two generic scenarios are available as [`piecewise_constant_size`] and
//! [`isolation_with_migration`].
//!
//! Besides the parameter bundle handed to the simulator, a model can be compared
//! against another model to a numerical tolerance ([`Model::equals`]) and can
//! describe its own history epoch by epoch ([`Model::debug`]).

mod debugger;
mod equality;
mod events;
mod generic;
mod model;
mod population;

pub use debugger::{Epoch, PopulationState};
pub use equality::{DEFAULT_ATOL, DEFAULT_RTOL};
pub use events::DemographicEvent;
pub use generic::{isolation_with_migration, piecewise_constant_size};
pub use model::{Citation, Model, ModelParameters};
pub use population::{Population, PopulationConfiguration, Sample};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Models are not equal: {0}")]
    Unequal(String),

    #[error("Samples requested from non-sampling population {0}")]
    NonSamplingPopulation(usize),

    #[error("Sample counts given for {given} populations but the model has only {available}")]
    TooManySamplePopulations { given: usize, available: usize },

    #[error("Invalid model '{model}': {reason}")]
    Invalid { model: String, reason: String },

    #[error("Failed to serialize model parameters: {0}")]
    Serialize(#[from] toml::ser::Error),
}
