use super::{DemographicEvent, Model, ModelError, PopulationConfiguration};

/// Absolute tolerance used when comparing models.
pub const DEFAULT_ATOL: f64 = 1e-5;
/// Relative tolerance used when comparing models.
pub const DEFAULT_RTOL: f64 = 1e-8;

#[inline]
fn is_close(a: f64, b: f64, rtol: f64, atol: f64) -> bool {
    if a == b {
        return true;
    }
    (a - b).abs() <= atol + rtol * b.abs()
}

fn all_close<'a>(
    a: impl IntoIterator<Item = &'a f64>,
    b: impl IntoIterator<Item = &'a f64>,
    rtol: f64,
    atol: f64,
) -> bool {
    a.into_iter()
        .zip(b)
        .all(|(x, y)| is_close(*x, *y, rtol, atol))
}

impl Model {
    /// Returns true if this model matches `other` to the given tolerances.
    ///
    /// Tolerances follow the usual `|a - b| <= atol + rtol * |b|` rule.
    pub fn equals(&self, other: &Model, rtol: f64, atol: f64) -> bool {
        self.verify_equal(other, rtol, atol).is_ok()
    }

    /// Like [`Model::equals`], but reports the first difference found.
    pub fn verify_equal(&self, other: &Model, rtol: f64, atol: f64) -> Result<(), ModelError> {
        let (m1, m2) = (&self.migration_matrix, &other.migration_matrix);
        if m1.shape() != m2.shape() {
            return Err(ModelError::Unequal("Migration matrices different shapes".to_string()));
        }
        if !all_close(m1.iter(), m2.iter(), rtol, atol) {
            return Err(ModelError::Unequal("Migration matrices differ".to_string()));
        }
        verify_population_configurations_equal(
            &self.population_configurations,
            &other.population_configurations,
            rtol,
            atol,
        )?;
        verify_demographic_events_equal(
            &self.demographic_events,
            &other.demographic_events,
            rtol,
            atol,
        )
    }
}

pub fn verify_population_configurations_equal(
    configs1: &[PopulationConfiguration],
    configs2: &[PopulationConfiguration],
    rtol: f64,
    atol: f64,
) -> Result<(), ModelError> {
    if configs1.len() != configs2.len() {
        return Err(ModelError::Unequal("Different numbers of populations".to_string()));
    }
    let sizes_close = configs1
        .iter()
        .zip(configs2)
        .all(|(a, b)| is_close(a.initial_size, b.initial_size, rtol, atol));
    if !sizes_close {
        return Err(ModelError::Unequal("Initial sizes differ".to_string()));
    }
    let growth_close = configs1
        .iter()
        .zip(configs2)
        .all(|(a, b)| is_close(a.growth_rate, b.growth_rate, rtol, atol));
    if !growth_close {
        return Err(ModelError::Unequal("Growth rates differ".to_string()));
    }
    Ok(())
}

pub fn verify_demographic_events_equal(
    events1: &[DemographicEvent],
    events2: &[DemographicEvent],
    rtol: f64,
    atol: f64,
) -> Result<(), ModelError> {
    if events1.len() != events2.len() {
        return Err(ModelError::Unequal("Different numbers of demographic events".to_string()));
    }
    for (e1, e2) in events1.iter().zip(events2) {
        verify_event_equal(e1, e2, rtol, atol)?;
    }
    Ok(())
}

fn verify_event_equal(
    e1: &DemographicEvent,
    e2: &DemographicEvent,
    rtol: f64,
    atol: f64,
) -> Result<(), ModelError> {
    let float = |key: &str, a: f64, b: f64| {
        if is_close(a, b, rtol, atol) {
            Ok(())
        } else {
            Err(ModelError::Unequal(format!(
                "Event {} mismatch: {} != {}",
                key, a, b
            )))
        }
    };
    let optional_float = |key: &str, a: Option<f64>, b: Option<f64>| match (a, b) {
        (Some(a), Some(b)) => float(key, a, b),
        (None, None) => Ok(()),
        _ => Err(ModelError::Unequal(format!(
            "Event {} mismatch: {:?} != {:?}",
            key, a, b
        ))),
    };
    let exact = |key: &str, a: String, b: String| {
        if a == b {
            Ok(())
        } else {
            Err(ModelError::Unequal(format!(
                "Event {} mismatch: {} != {}",
                key, a, b
            )))
        }
    };

    float("time", e1.time(), e2.time())?;
    match (e1, e2) {
        (
            DemographicEvent::PopulationParametersChange {
                initial_size: s1,
                growth_rate: g1,
                population: p1,
                ..
            },
            DemographicEvent::PopulationParametersChange {
                initial_size: s2,
                growth_rate: g2,
                population: p2,
                ..
            },
        ) => {
            optional_float("initial_size", *s1, *s2)?;
            optional_float("growth_rate", *g1, *g2)?;
            exact("population", format!("{:?}", p1), format!("{:?}", p2))
        }
        (
            DemographicEvent::MassMigration {
                source: s1,
                dest: d1,
                proportion: f1,
                ..
            },
            DemographicEvent::MassMigration {
                source: s2,
                dest: d2,
                proportion: f2,
                ..
            },
        ) => {
            exact("source", s1.to_string(), s2.to_string())?;
            exact("dest", d1.to_string(), d2.to_string())?;
            float("proportion", *f1, *f2)
        }
        (
            DemographicEvent::MigrationRateChange {
                rate: r1,
                matrix_index: i1,
                ..
            },
            DemographicEvent::MigrationRateChange {
                rate: r2,
                matrix_index: i2,
                ..
            },
        ) => {
            float("rate", *r1, *r2)?;
            exact("matrix_index", format!("{:?}", i1), format!("{:?}", i2))
        }
        _ => Err(ModelError::Unequal(format!(
            "Different types of demographic events: {} != {}",
            e1.kind(),
            e2.kind()
        ))),
    }
}
