use serde::Serialize;
use std::fmt;

/// A change to the demography at a point in time, measured in generations
/// before the present.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum DemographicEvent {
    /// Sets the size and/or growth rate of one population, or of every
    /// population when `population` is `None`. Unset fields keep their value.
    #[serde(rename_all = "kebab-case")]
    PopulationParametersChange {
        time: f64,
        #[serde(skip_serializing_if = "Option::is_none")]
        initial_size: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        growth_rate: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        population: Option<usize>,
    },
    /// Moves each lineage in `source` to `dest` with probability `proportion`,
    /// backwards in time.
    MassMigration {
        time: f64,
        source: usize,
        dest: usize,
        proportion: f64,
    },
    /// Sets one entry of the migration matrix, or every off-diagonal entry when
    /// `matrix_index` is `None`.
    #[serde(rename_all = "kebab-case")]
    MigrationRateChange {
        time: f64,
        rate: f64,
        #[serde(skip_serializing_if = "Option::is_none")]
        matrix_index: Option<(usize, usize)>,
    },
}

impl DemographicEvent {
    pub fn size_change(time: f64, population: usize, initial_size: f64) -> Self {
        Self::PopulationParametersChange {
            time,
            initial_size: Some(initial_size),
            growth_rate: Some(0.0),
            population: Some(population),
        }
    }

    pub fn time(&self) -> f64 {
        match self {
            Self::PopulationParametersChange { time, .. }
            | Self::MassMigration { time, .. }
            | Self::MigrationRateChange { time, .. } => *time,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::PopulationParametersChange { .. } => "population_parameters_change",
            Self::MassMigration { .. } => "mass_migration",
            Self::MigrationRateChange { .. } => "migration_rate_change",
        }
    }
}

impl fmt::Display for DemographicEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PopulationParametersChange {
                initial_size,
                growth_rate,
                population,
                ..
            } => {
                let target = match population {
                    Some(p) => format!("population {}", p),
                    None => "all populations".to_string(),
                };
                write!(f, "Population parameter change for {}:", target)?;
                if let Some(size) = initial_size {
                    write!(f, " initial_size -> {:.6}", size)?;
                }
                if let Some(rate) = growth_rate {
                    write!(f, " growth_rate -> {}", rate)?;
                }
                Ok(())
            }
            Self::MassMigration {
                source,
                dest,
                proportion,
                ..
            } => write!(
                f,
                "Mass migration: Lineages moved with probability {} backwards in time with source {} & dest {} (equivalent to migration from {} to {} forwards in time)",
                proportion, source, dest, dest, source
            ),
            Self::MigrationRateChange {
                rate, matrix_index, ..
            } => match matrix_index {
                Some((i, j)) => write!(f, "Migration rate change for ({}, {}) to {}", i, j, rate),
                None => write!(f, "Migration rate change to {} everywhere", rate),
            },
        }
    }
}
