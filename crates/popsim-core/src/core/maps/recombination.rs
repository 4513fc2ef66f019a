use super::GeneticMapError;
use serde::Serialize;
use std::path::Path;

/// HapMap rates are given in cM/Mb; this converts them to per-base, per-generation rates.
const CM_PER_MB_TO_RATE: f64 = 1e-8;

/// A piecewise-constant recombination rate along a sequence.
///
/// `positions` always starts at zero and its last entry is the sequence length.
/// `rates[i]` applies on `[positions[i], positions[i + 1])`, so the final rate is
/// always zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecombinationMap {
    positions: Vec<f64>,
    rates: Vec<f64>,
}

impl RecombinationMap {
    pub fn new(positions: Vec<f64>, rates: Vec<f64>) -> Result<Self, GeneticMapError> {
        if positions.len() < 2 {
            return Err(GeneticMapError::InvalidMap(
                "a recombination map needs at least two positions".to_string(),
            ));
        }
        if positions.len() != rates.len() {
            return Err(GeneticMapError::InvalidMap(format!(
                "{} positions but {} rates",
                positions.len(),
                rates.len()
            )));
        }
        if positions[0] != 0.0 {
            return Err(GeneticMapError::InvalidMap("the first position must be zero".to_string()));
        }
        if positions.windows(2).any(|w| w[1] <= w[0]) {
            return Err(GeneticMapError::InvalidMap(
                "positions must be strictly increasing".to_string(),
            ));
        }
        if rates.iter().any(|r| !r.is_finite() || *r < 0.0) {
            return Err(GeneticMapError::InvalidMap(
                "rates must be finite and non-negative".to_string(),
            ));
        }
        let mut rates = rates;
        if let Some(last) = rates.last_mut() {
            *last = 0.0;
        }
        Ok(Self { positions, rates })
    }

    pub fn uniform(length: f64, rate: f64) -> Self {
        Self {
            positions: vec![0.0, length],
            rates: vec![rate, 0.0],
        }
    }

    /// Reads a map in the HapMap text format.
    ///
    /// The file has a single header line followed by rows of
    /// `chromosome position rate(cM/Mb) map(cM)`. Columns are tab separated; rows
    /// that use plain whitespace instead are accepted as well.
    pub fn read_hapmap(path: &Path) -> Result<Self, GeneticMapError> {
        let display = path.to_string_lossy().to_string();
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|e| GeneticMapError::Csv {
                path: display.clone(),
                source: e,
            })?;

        let mut positions = Vec::new();
        let mut rates = Vec::new();
        for (index, record) in reader.records().enumerate() {
            let line = index + 2;
            let record = record.map_err(|e| GeneticMapError::Csv {
                path: display.clone(),
                source: e,
            })?;
            let fields: Vec<&str> = if record.len() == 1 {
                record[0].split_whitespace().collect()
            } else {
                record.iter().collect()
            };
            if fields.is_empty() {
                continue;
            }
            if fields.len() < 3 {
                return Err(GeneticMapError::Parse {
                    path: display,
                    line,
                    message: format!("expected at least 3 columns, found {}", fields.len()),
                });
            }
            let position = parse_field(fields[1], "position", &display, line)?;
            let rate = parse_field(fields[2], "rate", &display, line)?;
            positions.push(position);
            rates.push(rate * CM_PER_MB_TO_RATE);
        }

        if positions.is_empty() {
            return Err(GeneticMapError::Parse {
                path: display,
                line: 1,
                message: "map file contains no data rows".to_string(),
            });
        }
        if positions[0] != 0.0 {
            positions.insert(0, 0.0);
            rates.insert(0, 0.0);
        }

        Self::new(positions, rates).map_err(|e| GeneticMapError::Parse {
            path: display,
            line: 0,
            message: e.to_string(),
        })
    }

    pub fn positions(&self) -> &[f64] {
        &self.positions
    }

    pub fn rates(&self) -> &[f64] {
        &self.rates
    }

    pub fn sequence_length(&self) -> f64 {
        *self.positions.last().unwrap_or(&0.0)
    }

    /// Expected number of crossovers per generation over the whole sequence.
    pub fn total_mass(&self) -> f64 {
        self.positions
            .windows(2)
            .zip(&self.rates)
            .map(|(w, rate)| (w[1] - w[0]) * rate)
            .sum()
    }

    pub fn mean_rate(&self) -> f64 {
        let length = self.sequence_length();
        if length > 0.0 {
            self.total_mass() / length
        } else {
            0.0
        }
    }

    /// Restricts the map to `[0, length)`. Lengths beyond the end leave the map unchanged.
    pub fn truncated(&self, length: f64) -> Self {
        if length >= self.sequence_length() {
            return self.clone();
        }
        let mut positions: Vec<f64> = self
            .positions
            .iter()
            .copied()
            .take_while(|p| *p < length)
            .collect();
        let mut rates = self.rates[..positions.len()].to_vec();
        positions.push(length);
        rates.push(0.0);
        Self { positions, rates }
    }
}

fn parse_field(
    value: &str,
    column: &'static str,
    path: &str,
    line: usize,
) -> Result<f64, GeneticMapError> {
    value.parse::<f64>().map_err(|_| GeneticMapError::Parse {
        path: path.to_string(),
        line,
        message: format!("invalid {} value '{}'", column, value),
    })
}
