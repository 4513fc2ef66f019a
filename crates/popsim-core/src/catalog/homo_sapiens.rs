use super::Species;
use crate::core::genome::{Chromosome, Genome};
use crate::core::maps::GeneticMap;
use crate::core::models::{Citation, DemographicEvent, Model, Population, PopulationConfiguration};
use nalgebra::dmatrix;

const GENERATION_TIME: f64 = 25.0;
const MUTATION_RATE: f64 = 1.29e-8;

/// Chromosome lengths from GRCh38.p12; rates are the chromosome means of the
/// HapMap II genetic map.
const CHROMOSOMES: &[(&str, u64, f64)] = &[
    ("chr1", 248956422, 1.1485597641285933e-08),
    ("chr2", 242193529, 1.1054289277533446e-08),
    ("chr3", 198295559, 1.1279585624662551e-08),
    ("chr4", 190214555, 1.1231162636001008e-08),
    ("chr5", 181538259, 1.1280936570022824e-08),
    ("chr6", 170805979, 1.1222852661225285e-08),
    ("chr7", 159345973, 1.1764614397655721e-08),
    ("chr8", 145138636, 1.1478465778920576e-08),
    ("chr9", 138394717, 1.1780701596308656e-08),
    ("chr10", 133797422, 1.3365134257075317e-08),
    ("chr11", 135086622, 1.1719334320833283e-08),
    ("chr12", 133275309, 1.305017186986983e-08),
    ("chr13", 114364328, 1.0914860554958317e-08),
    ("chr14", 107043718, 1.119730771394731e-08),
    ("chr15", 101991189, 1.3835785893339787e-08),
    ("chr16", 90338345, 1.4834607113882717e-08),
    ("chr17", 83257441, 1.582489036239487e-08),
    ("chr18", 80373285, 1.5075956950023575e-08),
    ("chr19", 58617616, 1.8220141872466202e-08),
    ("chr20", 64444167, 1.7178269031631664e-08),
    ("chr21", 46709983, 1.3045214034879191e-08),
    ("chr22", 50818468, 1.4445022767788226e-08),
    ("chrX", 156040895, 1.164662223273842e-08),
    ("chrY", 57227415, 0.0),
];

const HAPMAP_II_GRCH37: GeneticMap = GeneticMap {
    id: "HapmapII_GRCh37",
    species: "homo_sapiens",
    url: "http://ftp.ncbi.nlm.nih.gov/hapmap/recombination/2011-01_phaseII_B37/genetic_map_HapMapII_GRCh37.tar.gz",
    file_pattern: "genetic_map_GRCh37_{name}.txt",
    description: "The HapMap Phase II genetic map lifted over to GRCh37",
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
        id: "homo_sapiens",
        name: "Homo sapiens",
        common_name: "Human",
        genome: Genome::new(
            "homo_sapiens",
            chromosomes,
            Some(HAPMAP_II_GRCH37.id),
            vec![HAPMAP_II_GRCH37],
        ),
        generation_time: GENERATION_TIME,
        population_size: 10_000.0,
        models: vec![
            gutenkunst_three_pop_out_of_africa(),
            tennessen_two_pop_out_of_africa(),
            tennessen_european(),
        ],
    }
}

fn gutenkunst_three_pop_out_of_africa() -> Model {
    let n_a = 7300.0;
    let n_b = 2100.0;
    let n_af = 12300.0;
    let n_eu0 = 1000.0;
    let n_as0 = 510.0;
    let t_af = 220e3 / GENERATION_TIME;
    let t_b = 140e3 / GENERATION_TIME;
    let t_eu_as = 21.2e3 / GENERATION_TIME;
    // Present-day sizes follow from exponential growth since the EU/AS split.
    let r_eu: f64 = 0.004;
    let r_as: f64 = 0.0055;
    let n_eu = n_eu0 / (-r_eu * t_eu_as).exp();
    let n_as = n_as0 / (-r_as * t_eu_as).exp();
    let m_af_b = 25e-5;
    let m_af_eu = 3e-5;
    let m_af_as = 1.9e-5;
    let m_eu_as = 9.6e-5;

    Model {
        id: "gutenkunst_ooa_3".to_string(),
        name: "Three population out-of-Africa".to_string(),
        description: "The three population Out-of-Africa model from Gutenkunst et al. 2009. \
                      It describes the ancestral human population in Africa, the out of \
                      Africa event, and the subsequent European-Asian population split."
            .to_string(),
        populations: vec![
            Population::new("YRI", "1000 Genomes YRI (Yorubans)"),
            Population::new(
                "CEU",
                "1000 Genomes CEU (Utah Residents of Northern and Western European ancestry)",
            ),
            Population::new("CHB", "1000 Genomes CHB (Han Chinese in Beijing, China)"),
        ],
        population_configurations: vec![
            PopulationConfiguration::new(n_af),
            PopulationConfiguration::with_growth(n_eu, r_eu),
            PopulationConfiguration::with_growth(n_as, r_as),
        ],
        migration_matrix: dmatrix![
            0.0, m_af_eu, m_af_as;
            m_af_eu, 0.0, m_eu_as;
            m_af_as, m_eu_as, 0.0
        ],
        demographic_events: vec![
            // CEU and CHB merge into the B population.
            DemographicEvent::MassMigration {
                time: t_eu_as,
                source: 2,
                dest: 1,
                proportion: 1.0,
            },
            DemographicEvent::MigrationRateChange {
                time: t_eu_as,
                rate: 0.0,
                matrix_index: None,
            },
            DemographicEvent::MigrationRateChange {
                time: t_eu_as,
                rate: m_af_b,
                matrix_index: Some((0, 1)),
            },
            DemographicEvent::MigrationRateChange {
                time: t_eu_as,
                rate: m_af_b,
                matrix_index: Some((1, 0)),
            },
            DemographicEvent::size_change(t_eu_as, 1, n_b),
            // Population B merges into YRI.
            DemographicEvent::MassMigration {
                time: t_b,
                source: 1,
                dest: 0,
                proportion: 1.0,
            },
            DemographicEvent::MigrationRateChange {
                time: t_b,
                rate: 0.0,
                matrix_index: None,
            },
            // Size changes to N_A at T_AF.
            DemographicEvent::PopulationParametersChange {
                time: t_af,
                initial_size: Some(n_a),
                growth_rate: None,
                population: Some(0),
            },
        ],
        generation_time: Some(GENERATION_TIME),
        citations: vec![Citation {
            author: "Gutenkunst et al.".to_string(),
            year: 2009,
            doi: "https://doi.org/10.1371/journal.pgen.1000695".to_string(),
        }],
    }
}

const T_AF: f64 = 148e3 / GENERATION_TIME;
const T_OOA: f64 = 51e3 / GENERATION_TIME;
const T_EU0: f64 = 23e3 / GENERATION_TIME;
const T_EG: f64 = 5115.0 / GENERATION_TIME;
const N_A: f64 = 7310.0;
const N_AF: f64 = 14474.0;
const N_B: f64 = 1861.0;
const N_EU0: f64 = 1032.0;
const R_EU0: f64 = 0.00307;
const R_EU: f64 = 0.0195;

fn tennessen_citation() -> Citation {
    Citation {
        author: "Tennessen et al.".to_string(),
        year: 2012,
        doi: "https://doi.org/10.1126/science.1219240".to_string(),
    }
}

/// European sizes at the start of accelerated growth and at the present.
fn tennessen_european_sizes() -> (f64, f64) {
    let n_eu1 = N_EU0 / (-R_EU0 * (T_EU0 - T_EG)).exp();
    let n_eu = n_eu1 / (-R_EU * T_EG).exp();
    (n_eu1, n_eu)
}

fn tennessen_two_pop_out_of_africa() -> Model {
    let r_af: f64 = 0.0166;
    let n_af1 = N_AF / (-r_af * T_EG).exp();
    let (n_eu1, n_eu) = tennessen_european_sizes();
    let m_af_b = 15e-5;
    let m_af_eu = 2.5e-5;

    Model {
        id: "tennessen_two_pop_ooa".to_string(),
        name: "Two population out-of-Africa".to_string(),
        description: "The model is derived from the Tennessen et al. analysis of the jSFS \
                      from European Americans and African Americans. It describes the \
                      ancestral human population in Africa, the out of Africa event, and \
                      two distinct periods of subsequent European population growth over \
                      the past 23kya."
            .to_string(),
        populations: vec![
            Population::new("AFR", "African Americans"),
            Population::new("EUR", "European Americans"),
        ],
        population_configurations: vec![
            PopulationConfiguration::with_growth(n_af1, r_af),
            PopulationConfiguration::with_growth(n_eu, R_EU),
        ],
        migration_matrix: dmatrix![
            0.0, m_af_eu;
            m_af_eu, 0.0
        ],
        demographic_events: vec![
            DemographicEvent::PopulationParametersChange {
                time: T_EG,
                initial_size: Some(n_eu1),
                growth_rate: Some(R_EU0),
                population: Some(1),
            },
            DemographicEvent::size_change(T_EG, 0, N_AF),
            DemographicEvent::MigrationRateChange {
                time: T_EG,
                rate: m_af_eu,
                matrix_index: Some((0, 1)),
            },
            DemographicEvent::MigrationRateChange {
                time: T_EG,
                rate: m_af_eu,
                matrix_index: Some((1, 0)),
            },
            DemographicEvent::size_change(T_EU0, 1, N_B),
            DemographicEvent::MigrationRateChange {
                time: T_EU0,
                rate: m_af_b,
                matrix_index: Some((0, 1)),
            },
            DemographicEvent::MigrationRateChange {
                time: T_EU0,
                rate: m_af_b,
                matrix_index: Some((1, 0)),
            },
            DemographicEvent::MassMigration {
                time: T_OOA,
                source: 1,
                dest: 0,
                proportion: 1.0,
            },
            DemographicEvent::MigrationRateChange {
                time: T_OOA,
                rate: 0.0,
                matrix_index: None,
            },
            DemographicEvent::PopulationParametersChange {
                time: T_AF,
                initial_size: Some(N_A),
                growth_rate: None,
                population: Some(0),
            },
        ],
        generation_time: Some(GENERATION_TIME),
        citations: vec![tennessen_citation()],
    }
}

fn tennessen_european() -> Model {
    let (n_eu1, n_eu) = tennessen_european_sizes();

    Model {
        id: "tennessen_european".to_string(),
        name: "European population".to_string(),
        description: "The model is a simplification of the two population Tennessen et al. \
                      model with the African-American population removed so that we are \
                      modeling only the European-American population."
            .to_string(),
        populations: vec![Population::new("EUR", "European Americans")],
        population_configurations: vec![PopulationConfiguration::with_growth(n_eu, R_EU)],
        migration_matrix: dmatrix![0.0],
        demographic_events: vec![
            DemographicEvent::PopulationParametersChange {
                time: T_EG,
                initial_size: Some(n_eu1),
                growth_rate: Some(R_EU0),
                population: Some(0),
            },
            DemographicEvent::size_change(T_EU0, 0, N_B),
            DemographicEvent::PopulationParametersChange {
                time: T_OOA,
                initial_size: Some(N_AF),
                growth_rate: None,
                population: Some(0),
            },
            DemographicEvent::PopulationParametersChange {
                time: T_AF,
                initial_size: Some(N_A),
                growth_rate: None,
                population: Some(0),
            },
        ],
        generation_time: Some(GENERATION_TIME),
        citations: vec![tennessen_citation()],
    }
}
