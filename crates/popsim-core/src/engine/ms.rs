//! Translation of a demographic model into the command line of an ms-compatible
//! coalescent simulator (Hudson's `ms`, msprime's `mspms`).
//!
//! ms works in scaled units. With `N0` the initial size of population 0:
//!
//! | quantity              | model units                | ms units                 |
//! |-----------------------|----------------------------|--------------------------|
//! | time                  | generations `t`            | `t / 4N0`                |
//! | population size       | individuals `N`            | `N / N0`                 |
//! | growth rate           | per generation `g`         | `4 N0 g`                 |
//! | migration rate        | per generation `m`         | `4 N0 m`                 |
//! | mutation              | per base `mu` over `L` bp  | `theta = 4 N0 mu L`      |
//! | recombination         | per base `r` over `L` bp   | `rho = 4 N0 r (L - 1)`   |
//!
//! Populations are numbered from one on the ms command line.

use super::contig::Contig;
use super::error::EngineError;
use crate::core::models::{DemographicEvent, Model, Sample};
use tracing::trace;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MsOptions {
    /// Print the genealogy of each recombination segment (`-T`).
    pub trees: bool,
    pub seeds: Option<[u32; 3]>,
}

struct Scale {
    n0: f64,
}

impl Scale {
    fn time(&self, generations: f64) -> f64 {
        generations / (4.0 * self.n0)
    }

    fn rate(&self, per_generation: f64) -> f64 {
        4.0 * self.n0 * per_generation
    }

    fn size(&self, individuals: f64) -> f64 {
        individuals / self.n0
    }
}

#[derive(Default)]
struct Args(Vec<String>);

impl Args {
    fn flag(&mut self, flag: &str) -> &mut Self {
        self.0.push(flag.to_string());
        self
    }

    fn int(&mut self, value: usize) -> &mut Self {
        self.0.push(value.to_string());
        self
    }

    fn num(&mut self, value: f64) -> &mut Self {
        self.0.push(format!("{}", value));
        self
    }
}

/// Builds the argument list for a single replicate of `model` on `contig`.
///
/// Every sample must be taken at time zero; ms has no notion of ancient samples.
pub fn ms_arguments(
    model: &Model,
    contig: &Contig,
    samples: &[Sample],
    options: &MsOptions,
) -> Result<Vec<String>, EngineError> {
    let unsupported = |reason: String| EngineError::Unsupported {
        model: model.id.clone(),
        reason,
    };

    let n0 = model
        .population_configurations
        .first()
        .map(|c| c.initial_size)
        .ok_or_else(|| unsupported("the model has no populations".to_string()))?;
    let scale = Scale { n0 };
    let npop = model.num_populations();

    if samples.len() < 2 {
        return Err(unsupported(format!(
            "{} sample(s) given, at least two are needed",
            samples.len()
        )));
    }
    let mut counts = vec![0usize; npop];
    for sample in samples {
        if sample.time != 0.0 {
            return Err(unsupported(format!(
                "sample from population {} is taken at generation {}; \
                 only present-day samples are supported",
                sample.population, sample.time
            )));
        }
        match counts.get_mut(sample.population) {
            Some(count) => *count += 1,
            None => {
                return Err(unsupported(format!(
                    "sample references population {}",
                    sample.population
                )));
            }
        }
    }

    let mut args = Args::default();
    args.int(samples.len()).int(1);

    let length = contig.length as f64;
    args.flag("-t").num(scale.rate(contig.mutation_rate * length));
    let rho = scale.rate(contig.recombination_rate() * (length - 1.0));
    if rho > 0.0 {
        args.flag("-r").num(rho).int(contig.length as usize);
    }

    if npop > 1 {
        args.flag("-I").int(npop);
        for &count in &counts {
            args.int(count);
        }
    }
    for (index, config) in model.population_configurations.iter().enumerate() {
        if index > 0 && config.initial_size != n0 {
            args.flag("-n").int(index + 1).num(scale.size(config.initial_size));
        }
        if config.growth_rate != 0.0 {
            args.flag("-g").int(index + 1).num(scale.rate(config.growth_rate));
        }
    }
    for j in 0..npop {
        for k in 0..npop {
            let rate = model.migration_matrix[(j, k)];
            if j != k && rate > 0.0 {
                args.flag("-m").int(j + 1).int(k + 1).num(scale.rate(rate));
            }
        }
    }

    let mut history = History {
        scale: &scale,
        growth_rates: model
            .population_configurations
            .iter()
            .map(|c| c.growth_rate)
            .collect(),
        num_populations: npop,
    };
    for event in &model.demographic_events {
        history.push(event, &mut args);
    }

    if options.trees {
        args.flag("-T");
    }
    if let Some(seeds) = options.seeds {
        args.flag("-seeds");
        for seed in seeds {
            args.int(seed as usize);
        }
    }

    trace!(arguments = ?args.0, "Translated model '{}'", model.id);
    Ok(args.0)
}

/// State carried across demographic events.
///
/// ms resets a population's growth rate whenever its size is set, and adds a new
/// population for every partial mass migration, so both are tracked here.
struct History<'a> {
    scale: &'a Scale,
    growth_rates: Vec<f64>,
    num_populations: usize,
}

impl History<'_> {
    fn push(&mut self, event: &DemographicEvent, args: &mut Args) {
        let time = self.scale.time(event.time());
        match event {
            DemographicEvent::PopulationParametersChange {
                initial_size,
                growth_rate,
                population: Some(p),
                ..
            } => {
                let growth = growth_rate.unwrap_or(self.growth_rates[*p]);
                if let Some(size) = initial_size {
                    args.flag("-en").num(time).int(p + 1).num(self.scale.size(*size));
                    if growth != 0.0 {
                        args.flag("-eg").num(time).int(p + 1).num(self.scale.rate(growth));
                    }
                } else {
                    args.flag("-eg").num(time).int(p + 1).num(self.scale.rate(growth));
                }
                self.growth_rates[*p] = growth;
            }
            DemographicEvent::PopulationParametersChange {
                initial_size,
                growth_rate,
                population: None,
                ..
            } => {
                if let Some(size) = initial_size {
                    args.flag("-eN").num(time).num(self.scale.size(*size));
                    match growth_rate {
                        Some(g) if *g != 0.0 => {
                            args.flag("-eG").num(time).num(self.scale.rate(*g));
                        }
                        Some(_) => {}
                        None => {
                            for (p, g) in self.growth_rates.iter().enumerate() {
                                if *g != 0.0 {
                                    args.flag("-eg").num(time).int(p + 1).num(self.scale.rate(*g));
                                }
                            }
                        }
                    }
                } else if let Some(g) = growth_rate {
                    args.flag("-eG").num(time).num(self.scale.rate(*g));
                }
                if let Some(g) = growth_rate {
                    self.growth_rates.iter_mut().for_each(|rate| *rate = *g);
                }
            }
            DemographicEvent::MassMigration {
                source,
                dest,
                proportion,
                ..
            } => {
                if *proportion >= 1.0 {
                    args.flag("-ej").num(time).int(source + 1).int(dest + 1);
                } else if *proportion > 0.0 {
                    // Lineages that leave `source` are split into a fresh population
                    // and merged straight into `dest`.
                    self.num_populations += 1;
                    args.flag("-es").num(time).int(source + 1).num(1.0 - proportion);
                    args.flag("-ej")
                        .num(time)
                        .int(self.num_populations)
                        .int(dest + 1);
                }
            }
            DemographicEvent::MigrationRateChange {
                rate,
                matrix_index: Some((j, k)),
                ..
            } => {
                args.flag("-em")
                    .num(time)
                    .int(j + 1)
                    .int(k + 1)
                    .num(self.scale.rate(*rate));
            }
            DemographicEvent::MigrationRateChange {
                rate,
                matrix_index: None,
                ..
            } => {
                // `-eM x` spreads x evenly over the npop - 1 off-diagonal entries of a row.
                if self.num_populations > 1 {
                    let total = self.scale.rate(*rate) * (self.num_populations - 1) as f64;
                    args.flag("-eM").num(time).num(total);
                }
            }
        }
    }
}

/// Quotes the argument list for display, one shell word per argument.
pub fn command_line(program: &str, args: &[String]) -> String {
    std::iter::once(program)
        .chain(args.iter().map(String::as_str))
        .map(|word| {
            if word.is_empty() || word.contains(char::is_whitespace) {
                format!("'{}'", word)
            } else {
                word.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use crate::core::maps::RecombinationMap;
    use crate::core::models::{
        PopulationConfiguration, isolation_with_migration, piecewise_constant_size,
    };

    fn contig(length: u64, recombination_rate: f64, mutation_rate: f64) -> Contig {
        Contig {
            chromosome: "chr1".to_string(),
            length,
            recombination_map: RecombinationMap::uniform(length as f64, recombination_rate),
            mutation_rate,
        }
    }

    fn present(population: usize, n: usize) -> Vec<Sample> {
        vec![
            Sample {
                population,
                time: 0.0
            };
            n
        ]
    }

    /// All values following each occurrence of `flag`, up to the next flag.
    fn values<'a>(args: &'a [String], flag: &str) -> Vec<Vec<&'a str>> {
        args.iter()
            .enumerate()
            .filter(|(_, arg)| *arg == flag)
            .map(|(index, _)| {
                args[index + 1..]
                    .iter()
                    .take_while(|a| !a.starts_with('-'))
                    .map(String::as_str)
                    .collect()
            })
            .collect()
    }

    fn assert_num(value: &str, expected: f64) {
        let parsed: f64 = value.parse().unwrap();
        assert!(
            (parsed - expected).abs() <= 1e-9 * expected.abs().max(1.0),
            "{} != {}",
            parsed,
            expected
        );
    }

    #[test]
    fn constant_size_scales_theta_and_rho() {
        let model = piecewise_constant_size(10_000.0, &[]);
        let args = ms_arguments(
            &model,
            &contig(1001, 1e-8, 2e-8),
            &present(0, 4),
            &MsOptions::default(),
        )
        .unwrap();

        assert_eq!(&args[..2], &["4", "1"]);
        let theta = &values(&args, "-t")[0];
        assert_num(theta[0], 4.0 * 10_000.0 * 2e-8 * 1001.0);
        let rho = &values(&args, "-r")[0];
        assert_num(rho[0], 4.0 * 10_000.0 * 1e-8 * 1000.0);
        assert_eq!(rho[1], "1001");
        assert!(values(&args, "-I").is_empty());
        assert!(!args.contains(&"-T".to_string()));
    }

    #[test]
    fn zero_recombination_omits_rho() {
        let model = piecewise_constant_size(10_000.0, &[]);
        let args = ms_arguments(
            &model,
            &contig(1000, 0.0, 1e-8),
            &present(0, 2),
            &MsOptions::default(),
        )
        .unwrap();
        assert!(values(&args, "-r").is_empty());
    }

    #[test]
    fn size_changes_become_en_flags() {
        let model = piecewise_constant_size(10_000.0, &[(2_000.0, 5_000.0), (8_000.0, 20_000.0)]);
        let args = ms_arguments(
            &model,
            &contig(1000, 1e-8, 1e-8),
            &present(0, 2),
            &MsOptions::default(),
        )
        .unwrap();

        let changes = values(&args, "-en");
        assert_eq!(changes.len(), 2);
        assert_num(changes[0][0], 0.05);
        assert_eq!(changes[0][1], "1");
        assert_num(changes[0][2], 0.5);
        assert_num(changes[1][0], 0.2);
        assert_num(changes[1][2], 2.0);
        assert!(values(&args, "-eg").is_empty());
    }

    #[test]
    fn isolation_with_migration_sets_up_islands() {
        let model = isolation_with_migration(10_000.0, 5_000.0, 2_000.0, 1_000.0, 1e-4, 2e-4);
        let mut samples = present(0, 2);
        samples.extend(present(1, 3));
        let args = ms_arguments(
            &model,
            &contig(1000, 1e-8, 1e-8),
            &samples,
            &MsOptions::default(),
        )
        .unwrap();

        assert_eq!(values(&args, "-I")[0], vec!["3", "2", "3", "0"]);

        let sizes = values(&args, "-n");
        assert_eq!(sizes.len(), 2);
        assert_eq!(sizes[0][0], "2");
        assert_num(sizes[0][1], 0.4);
        assert_eq!(sizes[1][0], "3");
        assert_num(sizes[1][1], 2.0);

        let migration = values(&args, "-m");
        assert_eq!(migration.len(), 2);
        assert_eq!(&migration[0][..2], &["1", "2"]);
        assert_num(migration[0][2], 4.0 * 5_000.0 * 1e-4);
        assert_eq!(&migration[1][..2], &["2", "1"]);
        assert_num(migration[1][2], 4.0 * 5_000.0 * 2e-4);

        let joins = values(&args, "-ej");
        assert_eq!(joins.len(), 2);
        assert_num(joins[0][0], 1_000.0 / 20_000.0);
        assert_eq!(&joins[0][1..], &["1", "3"]);
        assert_eq!(&joins[1][1..], &["2", "3"]);
    }

    #[test]
    fn partial_mass_migration_splits_into_new_population() {
        let mut model = isolation_with_migration(10_000.0, 10_000.0, 10_000.0, 1_000.0, 0.0, 0.0);
        model.demographic_events.insert(
            0,
            DemographicEvent::MassMigration {
                time: 400.0,
                source: 1,
                dest: 0,
                proportion: 0.25,
            },
        );
        let args = ms_arguments(
            &model,
            &contig(1000, 1e-8, 1e-8),
            &present(1, 2),
            &MsOptions::default(),
        )
        .unwrap();

        let split = &values(&args, "-es")[0];
        assert_num(split[0], 0.01);
        assert_eq!(split[1], "2");
        assert_num(split[2], 0.75);
        let joins = values(&args, "-ej");
        assert_eq!(&joins[0][1..], &["4", "1"]);
    }

    #[test]
    fn size_change_keeps_growth_when_unset() {
        let mut model = piecewise_constant_size(10_000.0, &[]);
        model.population_configurations[0] = PopulationConfiguration::with_growth(10_000.0, 0.01);
        model
            .demographic_events
            .push(DemographicEvent::PopulationParametersChange {
                time: 100.0,
                initial_size: Some(5_000.0),
                growth_rate: None,
                population: Some(0),
            });
        model
            .demographic_events
            .push(DemographicEvent::size_change(200.0, 0, 1_000.0));
        let args = ms_arguments(
            &model,
            &contig(1000, 1e-8, 1e-8),
            &present(0, 2),
            &MsOptions::default(),
        )
        .unwrap();

        assert_num(values(&args, "-g")[0][1], 400.0);
        assert_eq!(values(&args, "-en").len(), 2);
        let regrowth = values(&args, "-eg");
        assert_eq!(regrowth.len(), 1, "{:?}", args);
        assert_num(regrowth[0][0], 100.0 / 40_000.0);
        assert_num(regrowth[0][2], 400.0);
    }

    #[test]
    fn global_migration_change_uses_em_capital() {
        let mut model = isolation_with_migration(10_000.0, 10_000.0, 10_000.0, 1_000.0, 1e-4, 1e-4);
        model.demographic_events.insert(
            0,
            DemographicEvent::MigrationRateChange {
                time: 500.0,
                rate: 0.0,
                matrix_index: None,
            },
        );
        model.demographic_events.insert(
            1,
            DemographicEvent::MigrationRateChange {
                time: 600.0,
                rate: 1e-5,
                matrix_index: Some((0, 1)),
            },
        );
        let args = ms_arguments(
            &model,
            &contig(1000, 1e-8, 1e-8),
            &present(0, 2),
            &MsOptions::default(),
        )
        .unwrap();

        let global = &values(&args, "-eM")[0];
        assert_num(global[0], 500.0 / 40_000.0);
        assert_num(global[1], 0.0);
        let single = &values(&args, "-em")[0];
        assert_eq!(&single[1..3], &["1", "2"]);
        assert_num(single[3], 0.4);
    }

    #[test]
    fn ancient_samples_are_unsupported() {
        let model = piecewise_constant_size(10_000.0, &[]);
        let samples = vec![
            Sample {
                population: 0,
                time: 0.0,
            },
            Sample {
                population: 0,
                time: 100.0,
            },
        ];
        let result = ms_arguments(
            &model,
            &contig(1000, 1e-8, 1e-8),
            &samples,
            &MsOptions::default(),
        );
        assert!(matches!(result, Err(EngineError::Unsupported { .. })));
    }

    #[test]
    fn trees_and_seeds_are_appended() {
        let model = piecewise_constant_size(10_000.0, &[]);
        let options = MsOptions {
            trees: true,
            seeds: Some([1, 2, 3]),
        };
        let args =
            ms_arguments(&model, &contig(1000, 1e-8, 1e-8), &present(0, 2), &options).unwrap();
        assert!(args.contains(&"-T".to_string()));
        assert_eq!(values(&args, "-seeds")[0], vec!["1", "2", "3"]);
    }

    #[test]
    fn every_catalog_model_translates() {
        for species in catalog::all_species() {
            let chromosome = &species.genome.chromosomes()[0];
            let contig = contig(10_000, chromosome.default_recombination_rate, 1e-8);
            for model in species.models() {
                let mut counts = vec![0; model.num_populations()];
                counts[0] = 2;
                let samples = model.get_samples(&counts).unwrap();
                let args = ms_arguments(model, &contig, &samples, &MsOptions::default());
                assert!(args.is_ok(), "{}/{}: {:?}", species.id, model.id, args);
            }
        }
    }

    #[test]
    fn command_line_quotes_words_with_spaces() {
        let args = vec!["2".to_string(), "1".to_string(), "a b".to_string()];
        assert_eq!(command_line("mspms", &args), "mspms 2 1 'a b'");
    }
}
