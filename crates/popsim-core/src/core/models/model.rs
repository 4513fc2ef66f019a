use super::{DemographicEvent, ModelError, Population, PopulationConfiguration, Sample};
use nalgebra::DMatrix;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Citation {
    pub author: String,
    pub year: u16,
    pub doi: String,
}

impl fmt::Display for Citation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.author, self.year, self.doi)
    }
}

/// A demographic scenario that can be handed to a coalescent simulator.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    /// Short, memorable identifier used on the command line.
    pub id: String,
    /// Informal name as it would be used in written text.
    pub name: String,
    pub description: String,
    pub populations: Vec<Population>,
    pub population_configurations: Vec<PopulationConfiguration>,
    /// Entry `(j, k)` is the fraction of population `j` made up of migrants from
    /// population `k` each generation, backwards in time.
    pub migration_matrix: DMatrix<f64>,
    pub demographic_events: Vec<DemographicEvent>,
    /// Years per generation, if the model was published with one.
    pub generation_time: Option<f64>,
    pub citations: Vec<Citation>,
}

/// The part of a [`Model`] consumed by the simulator.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ModelParameters {
    pub id: String,
    pub population_configurations: Vec<PopulationConfiguration>,
    pub migration_matrix: Vec<Vec<f64>>,
    pub demographic_events: Vec<DemographicEvent>,
}

impl Model {
    pub fn num_populations(&self) -> usize {
        self.populations.len()
    }

    pub fn num_sampling_populations(&self) -> usize {
        self.populations.iter().filter(|p| p.allows_samples()).count()
    }

    pub fn population_index(&self, id: &str) -> Option<usize> {
        self.populations.iter().position(|p| p.id == id)
    }

    /// Builds the sample list from per-population counts, in population order.
    ///
    /// `get_samples(&[2, 0, 3])` draws two samples from population 0 and three
    /// from population 2. Trailing populations may be omitted.
    pub fn get_samples(&self, counts: &[usize]) -> Result<Vec<Sample>, ModelError> {
        if counts.len() > self.num_populations() {
            return Err(ModelError::TooManySamplePopulations {
                given: counts.len(),
                available: self.num_populations(),
            });
        }
        let mut samples = Vec::with_capacity(counts.iter().sum());
        for (index, &n) in counts.iter().enumerate() {
            match self.populations[index].sampling_time {
                Some(time) => samples.extend(std::iter::repeat_n(
                    Sample {
                        population: index,
                        time,
                    },
                    n,
                )),
                None if n > 0 => return Err(ModelError::NonSamplingPopulation(index)),
                None => {}
            }
        }
        Ok(samples)
    }

    pub fn parameters(&self) -> ModelParameters {
        ModelParameters {
            id: self.id.clone(),
            population_configurations: self.population_configurations.clone(),
            migration_matrix: self
                .migration_matrix
                .row_iter()
                .map(|row| row.iter().copied().collect())
                .collect(),
            demographic_events: self.demographic_events.clone(),
        }
    }

    pub fn parameters_toml(&self) -> Result<String, ModelError> {
        Ok(toml::to_string_pretty(&self.parameters())?)
    }

    /// Checks the structural consistency of the model.
    pub fn validate(&self) -> Result<(), ModelError> {
        let n = self.num_populations();
        let invalid = |reason: String| ModelError::Invalid {
            model: self.id.clone(),
            reason,
        };

        if n == 0 {
            return Err(invalid("the model has no populations".to_string()));
        }
        if self.population_configurations.len() != n {
            return Err(invalid(format!(
                "{} populations but {} population configurations",
                n,
                self.population_configurations.len()
            )));
        }
        if self.migration_matrix.shape() != (n, n) {
            return Err(invalid(format!(
                "migration matrix is {:?}, expected ({}, {})",
                self.migration_matrix.shape(),
                n,
                n
            )));
        }
        for j in 0..n {
            for k in 0..n {
                let rate = self.migration_matrix[(j, k)];
                if j == k && rate != 0.0 {
                    return Err(invalid(format!(
                        "non-zero diagonal migration rate at ({j}, {k})"
                    )));
                }
                if !rate.is_finite() || rate < 0.0 {
                    return Err(invalid(format!(
                        "invalid migration rate {rate} at ({j}, {k})"
                    )));
                }
            }
        }
        for (index, config) in self.population_configurations.iter().enumerate() {
            if !config.initial_size.is_finite() || config.initial_size <= 0.0 {
                return Err(invalid(format!(
                    "population {} has invalid initial size {}",
                    index, config.initial_size
                )));
            }
            if !config.growth_rate.is_finite() {
                return Err(invalid(format!(
                    "population {} has invalid growth rate {}",
                    index, config.growth_rate
                )));
            }
        }

        let mut previous_time = 0.0;
        for event in &self.demographic_events {
            let time = event.time();
            if !time.is_finite() || time < 0.0 {
                return Err(invalid(format!("event at invalid time {}", time)));
            }
            if time < previous_time {
                return Err(invalid(
                    "demographic events must be sorted in time-ascending order".to_string(),
                ));
            }
            previous_time = time;
            self.validate_event(event).map_err(invalid)?;
        }
        Ok(())
    }

    fn validate_event(&self, event: &DemographicEvent) -> Result<(), String> {
        let n = self.num_populations();
        let check_population = |p: usize| {
            if p < n {
                Ok(())
            } else {
                Err(format!("event at time {} references population {}", event.time(), p))
            }
        };
        match event {
            DemographicEvent::PopulationParametersChange {
                initial_size,
                growth_rate,
                population,
                ..
            } => {
                if let Some(p) = population {
                    check_population(*p)?;
                }
                if let Some(size) = initial_size {
                    if !size.is_finite() || *size <= 0.0 {
                        return Err(format!("invalid size {} at time {}", size, event.time()));
                    }
                }
                if growth_rate.is_some_and(|g| !g.is_finite()) {
                    return Err(format!("invalid growth rate at time {}", event.time()));
                }
                if initial_size.is_none() && growth_rate.is_none() {
                    return Err(format!(
                        "population parameter change at time {} sets nothing",
                        event.time()
                    ));
                }
            }
            DemographicEvent::MassMigration {
                source,
                dest,
                proportion,
                ..
            } => {
                check_population(*source)?;
                check_population(*dest)?;
                if source == dest {
                    return Err(format!(
                        "mass migration at time {} has identical source and destination",
                        event.time()
                    ));
                }
                if !(0.0..=1.0).contains(proportion) {
                    return Err(format!(
                        "mass migration proportion {} outside [0, 1]",
                        proportion
                    ));
                }
            }
            DemographicEvent::MigrationRateChange {
                rate, matrix_index, ..
            } => {
                if !rate.is_finite() || *rate < 0.0 {
                    return Err(format!("invalid migration rate {} at time {}", rate, event.time()));
                }
                if let Some((j, k)) = matrix_index {
                    check_population(*j)?;
                    check_population(*k)?;
                    if j == k {
                        return Err(format!(
                            "migration rate change at time {} targets the diagonal",
                            event.time()
                        ));
                    }
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}: {}", self.id, self.name)?;
        writeln!(f, "  {}", self.description.trim())?;
        for (index, pop) in self.populations.iter().enumerate() {
            let sampling = match pop.sampling_time {
                Some(t) => format!("sampling at {} generations", t),
                None => "no sampling".to_string(),
            };
            writeln!(f, "  [{}] {}: {} ({})", index, pop.id, pop.description, sampling)?;
        }
        for citation in &self.citations {
            writeln!(f, "  Citation: {}", citation)?;
        }
        Ok(())
    }
}
