use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid value for '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// Where the recombination map of the simulated contig comes from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MapSelection {
    /// A flat map at the chromosome's default recombination rate.
    #[default]
    Uniform,
    /// The genome's default genetic map.
    Default,
    /// A genetic map by id.
    Named(String),
}

impl MapSelection {
    /// `None` keeps the flat map; the literal `default` picks the genome's default map.
    pub fn from_arg(value: Option<&str>) -> Self {
        match value {
            None => Self::Uniform,
            Some("default") => Self::Default,
            Some(name) => Self::Named(name.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub species: String,
    /// `None` selects the species' constant-size model.
    pub model: Option<String>,
    /// `None` selects the species' first chromosome.
    pub chromosome: Option<String>,
    pub genetic_map: MapSelection,
    /// Fraction of the chromosome to simulate, in `(0, 1]`. Values above 1 are clamped.
    pub length_multiplier: f64,
    /// Haploid sample counts per population, in population order.
    pub samples: Vec<usize>,
    pub seed: Option<u64>,
    /// Ask the simulator for genealogies in addition to segregating sites.
    pub trees: bool,
}

#[derive(Default)]
pub struct SimulationConfigBuilder {
    species: Option<String>,
    model: Option<String>,
    chromosome: Option<String>,
    genetic_map: MapSelection,
    length_multiplier: Option<f64>,
    samples: Option<Vec<usize>>,
    seed: Option<u64>,
    trees: bool,
}

impl SimulationConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn species(mut self, species: impl Into<String>) -> Self {
        self.species = Some(species.into());
        self
    }
    pub fn model(mut self, model: Option<String>) -> Self {
        self.model = model;
        self
    }
    pub fn chromosome(mut self, chromosome: Option<String>) -> Self {
        self.chromosome = chromosome;
        self
    }
    pub fn genetic_map(mut self, selection: MapSelection) -> Self {
        self.genetic_map = selection;
        self
    }
    pub fn length_multiplier(mut self, multiplier: f64) -> Self {
        self.length_multiplier = Some(multiplier);
        self
    }
    pub fn samples(mut self, samples: Vec<usize>) -> Self {
        self.samples = Some(samples);
        self
    }
    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }
    pub fn trees(mut self, trees: bool) -> Self {
        self.trees = trees;
        self
    }

    pub fn build(self) -> Result<SimulationConfig, ConfigError> {
        let species = self
            .species
            .ok_or(ConfigError::MissingParameter("species"))?;
        let samples = self
            .samples
            .ok_or(ConfigError::MissingParameter("samples"))?;
        if samples.iter().sum::<usize>() < 2 {
            return Err(ConfigError::InvalidParameter {
                name: "samples",
                reason: "at least two samples are required".to_string(),
            });
        }

        let length_multiplier = self.length_multiplier.unwrap_or(1.0);
        if !length_multiplier.is_finite() || length_multiplier <= 0.0 {
            return Err(ConfigError::InvalidParameter {
                name: "length_multiplier",
                reason: format!("{} is not a positive number", length_multiplier),
            });
        }

        Ok(SimulationConfig {
            species,
            model: self.model,
            chromosome: self.chromosome,
            genetic_map: self.genetic_map,
            length_multiplier: length_multiplier.min(1.0),
            samples,
            seed: self.seed,
            trees: self.trees,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal() -> SimulationConfigBuilder {
        SimulationConfigBuilder::new()
            .species("homo_sapiens")
            .samples(vec![2])
    }

    #[test]
    fn builder_applies_defaults() {
        let config = minimal().build().unwrap();
        assert_eq!(config.species, "homo_sapiens");
        assert_eq!(config.length_multiplier, 1.0);
        assert_eq!(config.genetic_map, MapSelection::Uniform);
        assert!(config.model.is_none());
        assert!(config.chromosome.is_none());
        assert!(!config.trees);
    }

    #[test]
    fn builder_requires_species_and_samples() {
        let result = SimulationConfigBuilder::new().samples(vec![2]).build();
        assert_eq!(result, Err(ConfigError::MissingParameter("species")));
        let result = SimulationConfigBuilder::new().species("homo_sapiens").build();
        assert_eq!(result, Err(ConfigError::MissingParameter("samples")));
    }

    #[test]
    fn builder_rejects_bad_length_multiplier() {
        for value in [0.0, -0.5, f64::NAN, f64::INFINITY] {
            let result = minimal().length_multiplier(value).build();
            assert!(
                matches!(
                    result,
                    Err(ConfigError::InvalidParameter {
                        name: "length_multiplier",
                        ..
                    })
                ),
                "{} was accepted",
                value
            );
        }
        assert_eq!(minimal().length_multiplier(2.5).build().unwrap().length_multiplier, 1.0);
    }

    #[test]
    fn builder_rejects_fewer_than_two_samples() {
        let result = SimulationConfigBuilder::new()
            .species("homo_sapiens")
            .samples(vec![1, 0])
            .build();
        assert!(matches!(result, Err(ConfigError::InvalidParameter { name: "samples", .. })));
    }

    #[test]
    fn map_selection_from_arg() {
        assert_eq!(MapSelection::from_arg(None), MapSelection::Uniform);
        assert_eq!(MapSelection::from_arg(Some("default")), MapSelection::Default);
        assert_eq!(
            MapSelection::from_arg(Some("HapmapII_GRCh37")),
            MapSelection::Named("HapmapII_GRCh37".to_string())
        );
    }
}
