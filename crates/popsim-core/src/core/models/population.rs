use serde::Serialize;

/// Metadata about one population of a demographic model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Population {
    pub id: String,
    pub description: String,
    /// Generations before the present at which samples are drawn from this
    /// population. `None` means samples may not be drawn from it at all.
    pub sampling_time: Option<f64>,
}

impl Population {
    pub fn new(id: &str, description: &str) -> Self {
        Self {
            id: id.to_string(),
            description: description.to_string(),
            sampling_time: Some(0.0),
        }
    }

    /// A population that exists only in the past and cannot be sampled.
    pub fn ancestral(id: &str, description: &str) -> Self {
        Self {
            sampling_time: None,
            ..Self::new(id, description)
        }
    }

    pub fn allows_samples(&self) -> bool {
        self.sampling_time.is_some()
    }
}

/// Size and growth of a population at time zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct PopulationConfiguration {
    pub initial_size: f64,
    /// Exponential growth rate per generation, forwards in time.
    pub growth_rate: f64,
}

impl PopulationConfiguration {
    pub fn new(initial_size: f64) -> Self {
        Self {
            initial_size,
            growth_rate: 0.0,
        }
    }

    pub fn with_growth(initial_size: f64, growth_rate: f64) -> Self {
        Self {
            initial_size,
            growth_rate,
        }
    }
}

/// A single sampled haploid genome.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sample {
    pub population: usize,
    pub time: f64,
}
