use super::{DemographicEvent, Model, Population, PopulationConfiguration};
use nalgebra::{DMatrix, dmatrix};

/// A single population whose size changes instantaneously at the given times.
///
/// `changes` holds `(time, size)` pairs in generations before the present.
///
/// ```ignore
/// let one_change = piecewise_constant_size(n0, &[(t1, n1)]);
/// let two_changes = piecewise_constant_size(n0, &[(t1, n1), (t2, n2)]);
/// ```
pub fn piecewise_constant_size(n0: f64, changes: &[(f64, f64)]) -> Model {
    Model {
        id: "constant".to_string(),
        name: "Piecewise constant size".to_string(),
        description: "Piecewise constant size population model over multiple epochs.".to_string(),
        populations: vec![Population::new("pop0", "Generic population")],
        population_configurations: vec![PopulationConfiguration::new(n0)],
        migration_matrix: DMatrix::zeros(1, 1),
        demographic_events: changes
            .iter()
            .map(|&(time, size)| DemographicEvent::size_change(time, 0, size))
            .collect(),
        generation_time: None,
        citations: Vec::new(),
    }
}

/// An ancestral population of size `na` splits into two populations of constant
/// sizes `n1` and `n2` at time `t`, with migration rates `m12` and `m21` between
/// them. The ancestral population is index 2 and cannot be sampled.
pub fn isolation_with_migration(na: f64, n1: f64, n2: f64, t: f64, m12: f64, m21: f64) -> Model {
    Model {
        id: "IM".to_string(),
        name: "Isolation with migration".to_string(),
        description: "A generic isolation with migration model where a single ancestral \
                      population of size NA splits into two populations of constant size N1 \
                      and N2 time T generations ago, with migration rates M12 and M21 between \
                      the split populations."
            .to_string(),
        populations: vec![
            Population::new("pop0", "Generic population"),
            Population::new("pop1", "Generic population"),
            Population::ancestral("popAnc", "Generic ancestral population"),
        ],
        population_configurations: vec![
            PopulationConfiguration::new(n1),
            PopulationConfiguration::new(n2),
            PopulationConfiguration::new(na),
        ],
        migration_matrix: dmatrix![
            0.0, m12, 0.0;
            m21, 0.0, 0.0;
            0.0, 0.0, 0.0
        ],
        demographic_events: vec![
            DemographicEvent::MassMigration {
                time: t,
                source: 0,
                dest: 2,
                proportion: 1.0,
            },
            DemographicEvent::MassMigration {
                time: t,
                source: 1,
                dest: 2,
                proportion: 1.0,
            },
        ],
        generation_time: None,
        citations: Vec::new(),
    }
}
