use super::Species;
use crate::core::genome::{Chromosome, Genome};
use crate::core::maps::GeneticMap;
use crate::core::models::{
    Citation, DemographicEvent, Model, Population, PopulationConfiguration,
};
use nalgebra::{DMatrix, dmatrix};

/// Ten generations per year.
const GENERATION_TIME: f64 = 0.1;
const MUTATION_RATE: f64 = 5.49e-9;

/// Chromosome lengths from the dm6 release; rates are the chromosome means of
/// the Comeron et al. 2012 map.
const CHROMOSOMES: &[(&str, u64, f64)] = &[
    ("chr2L", 23513712, 2.40462600791e-08),
    ("chr2R", 25286936, 2.23458641776e-08),
    ("chr3L", 28110227, 1.79660308862e-08),
    ("chr3R", 32079331, 1.71642045777e-08),
    ("chrX", 23542271, 2.89650687913e-08),
    ("chr4", 1348131, 0.0),
    ("chrY", 3667352, 0.0),
    ("chrM", 19524, 0.0),
];

const COMERON_2012_DM6: GeneticMap = GeneticMap {
    id: "Comeron2012_dm6",
    species: "drosophila_melanogaster",
    url: "http://sesame.uoregon.edu/~adkern/dmel_recombination_map/comeron2012_maps.tar.gz",
    file_pattern: "genetic_map_comeron2012_dm6_{name}.txt",
    description: "The Comeron et al. 2012 high resolution map lifted over to dm6",
};

pub(super) fn species() -> Species {
    let chromosomes = CHROMOSOMES
        .iter()
        .map(|&(name, length, rate)| Chromosome {
            name,
            length,
            default_recombination_rate: rate,
            default_mutation_rate: MUTATION_RATE,
        })
        .collect();

    Species {
        id: "drosophila_melanogaster",
        name: "Drosophila melanogaster",
        common_name: "Fruit fly",
        genome: Genome::new(
            "drosophila_melanogaster",
            chromosomes,
            Some(COMERON_2012_DM6.id),
            vec![COMERON_2012_DM6],
        ),
        generation_time: GENERATION_TIME,
        population_size: 1_720_600.0,
        models: vec![sheehan_song_three_epoch(), li_stephan_two_population()],
    }
}

fn sheehan_song_three_epoch() -> Model {
    let n_a = 652_700.0;
    let n_b = 145_300.0;
    let n_r = 544_200.0;
    // Epoch lengths are published in units of 4 * N_A generations.
    let t_1 = 0.0580 * 4.0 * n_a;
    let t_2 = (0.0580 + 0.2930) * 4.0 * n_a;

    Model {
        id: "sheehan_song_three_epoch".to_string(),
        name: "Three epoch African population".to_string(),
        description: "The three epoch (modern, bottleneck, ancestral) model estimated for a \
                      single African Drosophila melanogaster population from Sheehan and \
                      Song 2016."
            .to_string(),
        populations: vec![Population::new("AFR", "African D. melanogaster population")],
        population_configurations: vec![PopulationConfiguration::new(n_a)],
        migration_matrix: DMatrix::zeros(1, 1),
        demographic_events: vec![
            DemographicEvent::size_change(t_1, 0, n_b),
            DemographicEvent::size_change(t_2, 0, n_r),
        ],
        generation_time: Some(GENERATION_TIME),
        citations: vec![Citation {
            author: "Sheehan and Song".to_string(),
            year: 2016,
            doi: "https://doi.org/10.1371/journal.pcbi.1004845".to_string(),
        }],
    }
}

fn li_stephan_two_population() -> Model {
    // African parameters.
    let n_a0 = 8.603e6;
    let t_a0 = 600_000.0;
    let n_a1 = n_a0 / 5.0;
    // European parameters.
    let n_e0 = 1.075e6;
    let n_e1 = 2200.0;
    let t_ae = 158_000.0;
    let t_e1 = t_ae - 3400.0;

    Model {
        id: "li_stephan_two_population".to_string(),
        name: "Three epoch model for African and European populations".to_string(),
        description: "The three epoch (modern, bottleneck, ancestral) model estimated for two \
                      Drosophila melanogaster populations: African (ancestral) and European \
                      (derived) from Li and Stephan 2006."
            .to_string(),
        populations: vec![
            Population::new("AFR", "African D. melanogaster population"),
            Population::new("EUR", "European D. melanogaster population"),
        ],
        population_configurations: vec![
            PopulationConfiguration::new(n_a0),
            PopulationConfiguration::new(n_e0),
        ],
        migration_matrix: dmatrix![
            0.0, 0.0;
            0.0, 0.0
        ],
        demographic_events: vec![
            // European bottleneck.
            DemographicEvent::size_change(t_e1, 1, n_e1),
            // Split from Africa.
            DemographicEvent::MassMigration {
                time: t_ae,
                source: 1,
                dest: 0,
                proportion: 1.0,
            },
            // African bottleneck.
            DemographicEvent::size_change(t_a0, 0, n_a1),
        ],
        generation_time: Some(GENERATION_TIME),
        citations: vec![Citation {
            author: "Li and Stephan".to_string(),
            year: 2006,
            doi: "https://doi.org/10.1371/journal.pgen.0020166".to_string(),
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{DEFAULT_ATOL, DEFAULT_RTOL};

    #[test]
    fn basic_attributes() {
        let species = species();
        assert_eq!(species.genome.species, "drosophila_melanogaster");
        assert_eq!(species.genome.default_genetic_map, Some("Comeron2012_dm6"));
        assert_eq!(species.genome.num_chromosomes(), 8);
    }

    #[test]
    fn chromosome_lengths() {
        let genome = species().genome;
        let expected = [
            ("chr2L", 23513712),
            ("chr2R", 25286936),
            ("chr3L", 28110227),
            ("chr3R", 32079331),
            ("chrX", 23542271),
            ("chr4", 1348131),
            ("chrY", 3667352),
        ];
        for (name, length) in expected {
            assert_eq!(genome.chromosome(name).unwrap().length, length, "{}", name);
        }
    }

    #[test]
    fn three_epoch_model_has_one_population() {
        let model = sheehan_song_three_epoch();
        assert_eq!(model.num_populations(), 1);
        assert_eq!(model.epochs().len(), 3);
    }

    #[test]
    fn li_stephan_matches_independent_definition() {
        let model = li_stephan_two_population();
        let mut expected = model.clone();
        expected.population_configurations = vec![
            PopulationConfiguration::new(8_603_000.0),
            PopulationConfiguration::new(1_075_000.0),
        ];
        expected.demographic_events = vec![
            DemographicEvent::size_change(154_600.0, 1, 2200.0),
            DemographicEvent::MassMigration {
                time: 158_000.0,
                source: 1,
                dest: 0,
                proportion: 1.0,
            },
            DemographicEvent::size_change(600_000.0, 0, 1_720_600.0),
        ];
        assert!(model.equals(&expected, DEFAULT_RTOL, DEFAULT_ATOL));
    }
}
