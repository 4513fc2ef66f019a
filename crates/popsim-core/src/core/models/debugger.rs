use super::{DemographicEvent, Model};
use itertools::Itertools;
use nalgebra::DMatrix;
use std::io::{self, Write};

/// Size and growth of one population over an epoch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopulationState {
    pub start_size: f64,
    pub end_size: f64,
    pub growth_rate: f64,
}

/// A time interval during which no demographic events occur.
#[derive(Debug, Clone, PartialEq)]
pub struct Epoch {
    pub start_time: f64,
    /// `f64::INFINITY` for the last epoch.
    pub end_time: f64,
    pub populations: Vec<PopulationState>,
    pub migration_matrix: DMatrix<f64>,
    /// Events that take effect at `start_time`.
    pub events: Vec<DemographicEvent>,
}

fn size_after(size: f64, growth_rate: f64, elapsed: f64) -> f64 {
    if growth_rate == 0.0 {
        size
    } else {
        size * (-growth_rate * elapsed).exp()
    }
}

struct EpochState {
    sizes: Vec<f64>,
    growth_rates: Vec<f64>,
    migration_matrix: DMatrix<f64>,
}

impl EpochState {
    fn apply(&mut self, event: &DemographicEvent) {
        match event {
            DemographicEvent::PopulationParametersChange {
                initial_size,
                growth_rate,
                population,
                ..
            } => {
                let targets: Vec<usize> = match population {
                    Some(p) => vec![*p],
                    None => (0..self.sizes.len()).collect(),
                };
                for p in targets {
                    if let Some(size) = initial_size {
                        self.sizes[p] = *size;
                    }
                    if let Some(rate) = growth_rate {
                        self.growth_rates[p] = *rate;
                    }
                }
            }
            DemographicEvent::MassMigration { .. } => {}
            DemographicEvent::MigrationRateChange {
                rate, matrix_index, ..
            } => match matrix_index {
                Some((j, k)) => self.migration_matrix[(*j, *k)] = *rate,
                None => {
                    let n = self.sizes.len();
                    for j in 0..n {
                        for k in 0..n {
                            if j != k {
                                self.migration_matrix[(j, k)] = *rate;
                            }
                        }
                    }
                }
            },
        }
    }

    fn advance(&mut self, elapsed: f64) {
        for (size, rate) in self.sizes.iter_mut().zip(&self.growth_rates) {
            *size = size_after(*size, *rate, elapsed);
        }
    }

    fn epoch(&self, start_time: f64, end_time: f64, events: Vec<DemographicEvent>) -> Epoch {
        let populations = self
            .sizes
            .iter()
            .zip(&self.growth_rates)
            .map(|(&start_size, &growth_rate)| PopulationState {
                start_size,
                end_size: size_after(start_size, growth_rate, end_time - start_time),
                growth_rate,
            })
            .collect();
        Epoch {
            start_time,
            end_time,
            populations,
            migration_matrix: self.migration_matrix.clone(),
            events,
        }
    }
}

impl Model {
    /// Splits the model's history into epochs separated by event times.
    ///
    /// Assumes the events are sorted by time, as [`Model::validate`] requires.
    pub fn epochs(&self) -> Vec<Epoch> {
        let mut state = EpochState {
            sizes: self
                .population_configurations
                .iter()
                .map(|c| c.initial_size)
                .collect(),
            growth_rates: self
                .population_configurations
                .iter()
                .map(|c| c.growth_rate)
                .collect(),
            migration_matrix: self.migration_matrix.clone(),
        };

        let mut epochs = Vec::new();
        let mut start_time = 0.0;
        let mut pending: Vec<DemographicEvent> = Vec::new();

        for (time, group) in &self
            .demographic_events
            .iter()
            .chunk_by(|event| event.time())
        {
            if time > start_time {
                epochs.push(state.epoch(start_time, time, std::mem::take(&mut pending)));
                state.advance(time - start_time);
                start_time = time;
            }
            for event in group {
                state.apply(event);
                pending.push(event.clone());
            }
        }
        epochs.push(state.epoch(start_time, f64::INFINITY, pending));
        epochs
    }

    /// Writes a human readable, epoch by epoch account of the model's history.
    pub fn debug(&self, out: &mut dyn Write) -> io::Result<()> {
        let epochs = self.epochs();
        let n = self.num_populations();
        for (index, epoch) in epochs.iter().enumerate() {
            if !epoch.events.is_empty() {
                writeln!(out, "Events @ generation {}", epoch.start_time)?;
                for event in &epoch.events {
                    writeln!(out, "   - {}", event)?;
                }
            }
            let banner = format!(
                "Epoch: {} -- {} generations",
                epoch.start_time, epoch.end_time
            );
            writeln!(out, "{}", "=".repeat(banner.len()))?;
            writeln!(out, "{}", banner)?;
            writeln!(out, "{}", "=".repeat(banner.len()))?;

            let header = (0..n).map(|k| format!("{:>10}", k)).join(" ");
            writeln!(
                out,
                "{:>6} {:>10} {:>10} {:>12} | {}",
                "", "start", "end", "growth_rate", header
            )?;
            for (j, pop) in epoch.populations.iter().enumerate() {
                let rates = (0..n)
                    .map(|k| format!("{:>10.3e}", epoch.migration_matrix[(j, k)]))
                    .join(" ");
                writeln!(
                    out,
                    "{:>6} {:>10.4e} {:>10.4e} {:>12.3e} | {}",
                    self.populations[j].id, pop.start_size, pop.end_size, pop.growth_rate, rates
                )?;
            }
            if index + 1 < epochs.len() {
                writeln!(out)?;
            }
        }
        Ok(())
    }
}
