use crate::catalog;
use crate::core::models::{Model, Sample};
use crate::engine::config::{ConfigError, SimulationConfig};
use crate::engine::contig::Contig;
use crate::engine::error::EngineError;
use crate::engine::ms::{self, MsOptions};
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::simulator::Simulator;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io::Write;
use std::path::Path;
use tracing::{debug, info, instrument};

/// Largest seed handed to the simulator. ms reads seeds as C `int`s.
const MAX_SIMULATOR_SEED: u32 = i32::MAX as u32;

/// Everything needed to run one simulation, resolved from a [`SimulationConfig`].
#[derive(Debug, Clone)]
pub struct SimulationRequest {
    pub species: &'static str,
    pub model: Model,
    pub contig: Contig,
    pub samples: Vec<Sample>,
    /// Arguments for an ms-compatible simulator.
    pub arguments: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationSummary {
    pub bytes_written: u64,
    pub command_line: String,
}

/// Resolves the configuration against the catalog and builds the simulator arguments.
///
/// `map_root` is the cache directory genetic maps are read from; it is only
/// touched when the configuration asks for a genetic map.
#[instrument(skip_all, name = "prepare_simulation", fields(species = %config.species))]
pub fn prepare(
    config: &SimulationConfig,
    map_root: &Path,
) -> Result<SimulationRequest, EngineError> {
    let species = catalog::get_species(&config.species)?;
    let model = species.resolve_model(config.model.as_deref())?;
    model.validate()?;

    let chromosome = match config.chromosome.as_deref() {
        Some(name) => species.genome.chromosome(name)?,
        None => species
            .genome
            .chromosomes()
            .first()
            .ok_or(ConfigError::MissingParameter("chromosome"))?,
    };
    info!(
        "Simulating {} samples of {} under model '{}' on {} (scale {})",
        config.samples.iter().sum::<usize>(),
        species.name,
        model.id,
        chromosome.name,
        config.length_multiplier
    );

    let samples = model.get_samples(&config.samples)?;
    let contig = Contig::new(
        &species.genome,
        chromosome,
        &config.genetic_map,
        config.length_multiplier,
        map_root,
    )?;

    let options = MsOptions {
        trees: config.trees,
        seeds: Some(simulator_seeds(config.seed)),
    };
    let arguments = ms::ms_arguments(&model, &contig, &samples, &options)?;
    debug!("Simulator arguments: {:?}", arguments);

    Ok(SimulationRequest {
        species: species.id,
        model,
        contig,
        samples,
        arguments,
    })
}

/// Runs the prepared simulation, streaming the simulator's output into `out`.
#[instrument(skip_all, name = "simulation_workflow", fields(model = %request.model.id))]
pub fn run(
    request: &SimulationRequest,
    simulator: &dyn Simulator,
    reporter: &ProgressReporter,
    out: &mut dyn Write,
) -> Result<SimulationSummary, EngineError> {
    let command_line = simulator.command_line(&request.arguments);

    reporter.report(Progress::PhaseStart { name: "Simulating" });
    let bytes_written = simulator.run(&request.arguments, out, reporter)?;
    reporter.report(Progress::PhaseFinish);

    if bytes_written == 0 {
        return Err(EngineError::EmptyOutput(simulator.program().to_string()));
    }
    info!("Simulation complete, {} bytes written.", bytes_written);
    Ok(SimulationSummary {
        bytes_written,
        command_line,
    })
}

/// [`prepare`] followed by [`run`].
pub fn simulate(
    config: &SimulationConfig,
    map_root: &Path,
    simulator: &dyn Simulator,
    reporter: &ProgressReporter,
    out: &mut dyn Write,
) -> Result<SimulationSummary, EngineError> {
    let request = prepare(config, map_root)?;
    run(&request, simulator, reporter, out)
}

fn simulator_seeds(seed: Option<u64>) -> [u32; 3] {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    [(); 3].map(|_| rng.gen_range(1..=MAX_SIMULATOR_SEED))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogError;
    use crate::core::genome::GenomeError;
    use crate::core::models::ModelError;
    use crate::engine::config::SimulationConfigBuilder;
    use std::cell::RefCell;
    use tempfile::tempdir;

    struct FixedOutput {
        output: &'static [u8],
        seen: RefCell<Vec<String>>,
    }

    impl FixedOutput {
        fn new(output: &'static [u8]) -> Self {
            Self {
                output,
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl Simulator for FixedOutput {
        fn program(&self) -> &str {
            "fixed"
        }

        fn command_line(&self, args: &[String]) -> String {
            format!("fixed {}", args.join(" "))
        }

        fn run(
            &self,
            args: &[String],
            out: &mut dyn Write,
            _reporter: &ProgressReporter,
        ) -> Result<u64, EngineError> {
            *self.seen.borrow_mut() = args.to_vec();
            out.write_all(self.output)?;
            Ok(self.output.len() as u64)
        }
    }

    fn config(species: &str, samples: Vec<usize>) -> SimulationConfigBuilder {
        SimulationConfigBuilder::new()
            .species(species)
            .samples(samples)
            .length_multiplier(0.001)
    }

    #[test]
    fn prepare_defaults_to_first_chromosome_and_constant_model() {
        let dir = tempdir().unwrap();
        let config = config("homo_sapiens", vec![4]).build().unwrap();
        let request = prepare(&config, dir.path()).unwrap();
        assert_eq!(request.species, "homo_sapiens");
        assert_eq!(request.model.id, "constant");
        assert_eq!(request.contig.chromosome, "chr1");
        assert_eq!(request.samples.len(), 4);
        assert_eq!(request.arguments[0], "4");
        assert!(request.arguments.contains(&"-seeds".to_string()));
    }

    #[test]
    fn prepare_resolves_named_model_and_chromosome() {
        let dir = tempdir().unwrap();
        let config = config("DroMel", vec![2, 2])
            .model(Some("li_stephan_two_population".to_string()))
            .chromosome(Some("chr2L".to_string()))
            .build()
            .unwrap();
        let request = prepare(&config, dir.path()).unwrap();
        assert_eq!(request.species, "drosophila_melanogaster");
        assert_eq!(request.contig.chromosome, "chr2L");
        assert!(request.arguments.contains(&"-I".to_string()));
    }

    #[test]
    fn prepare_reports_lookup_errors() {
        let dir = tempdir().unwrap();

        let unknown_species = prepare(&config("unicorn", vec![2]).build().unwrap(), dir.path());
        assert!(matches!(
            unknown_species,
            Err(EngineError::Catalog(CatalogError::UnknownSpecies(_)))
        ));

        let unknown_chromosome = prepare(
            &config("homo_sapiens", vec![2])
                .chromosome(Some("chr99".to_string()))
                .build()
                .unwrap(),
            dir.path(),
        );
        assert!(matches!(
            unknown_chromosome,
            Err(EngineError::Genome(GenomeError::UnknownChromosome { .. }))
        ));

        let too_many_populations = prepare(
            &config("homo_sapiens", vec![2, 2]).build().unwrap(),
            dir.path(),
        );
        assert!(matches!(
            too_many_populations,
            Err(EngineError::Model(ModelError::TooManySamplePopulations { .. }))
        ));
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let dir = tempdir().unwrap();
        let seeded = config("homo_sapiens", vec![2]).seed(Some(42)).build().unwrap();
        let first = prepare(&seeded, dir.path()).unwrap();
        let second = prepare(&seeded, dir.path()).unwrap();
        assert_eq!(first.arguments, second.arguments);
    }

    #[test]
    fn run_forwards_output_and_summarizes() {
        let dir = tempdir().unwrap();
        let config = config("homo_sapiens", vec![2]).build().unwrap();
        let request = prepare(&config, dir.path()).unwrap();
        let simulator = FixedOutput::new(b"//\nsegsites: 0\n");
        let mut out = Vec::new();

        let summary = run(&request, &simulator, &ProgressReporter::new(), &mut out).unwrap();
        assert_eq!(out, b"//\nsegsites: 0\n");
        assert_eq!(summary.bytes_written, 15);
        assert!(summary.command_line.starts_with("fixed 2 1 -t"));
        assert_eq!(*simulator.seen.borrow(), request.arguments);
    }

    #[test]
    fn empty_output_is_an_error() {
        let dir = tempdir().unwrap();
        let config = config("homo_sapiens", vec![2]).build().unwrap();
        let request = prepare(&config, dir.path()).unwrap();
        let mut out = Vec::new();
        let result = run(&request, &FixedOutput::new(b""), &ProgressReporter::new(), &mut out);
        assert!(matches!(result, Err(EngineError::EmptyOutput(_))));
    }

    #[test]
    fn seeds_stay_in_simulator_range() {
        for seed in 0..50 {
            let seeds = simulator_seeds(Some(seed));
            assert!(seeds.iter().all(|s| (1..=MAX_SIMULATOR_SEED).contains(s)));
        }
    }
}
