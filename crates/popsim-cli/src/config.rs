mod defaults;

use crate::cli::SimulateArgs;
use crate::data::project_dirs;
use crate::error::{CliError, Result};
use defaults::DefaultsConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use stdpopsim::engine::config::{MapSelection, SimulationConfig, SimulationConfigBuilder};
use stdpopsim::engine::simulator::ExternalSimulator;
use tracing::debug;

const CONFIG_FILE: &str = "config.toml";

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialSimulatorConfig {
    program: Option<String>,
    extra_args: Option<Vec<String>>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialCacheConfig {
    dir: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialDefaultsConfig {
    length_multiplier: Option<f64>,
    model: Option<String>,
    genetic_map: Option<String>,
}

/// The optional configuration file, with every key optional.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialConfig {
    simulator: Option<PartialSimulatorConfig>,
    cache: Option<PartialCacheConfig>,
    defaults: Option<PartialDefaultsConfig>,
}

impl PartialConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Reads `explicit` if given, which must exist. Otherwise reads the user's
    /// config file if there is one.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        let default_path = project_dirs()?.config_dir().join(CONFIG_FILE);
        if default_path.is_file() {
            Self::from_file(&default_path)
        } else {
            debug!("No configuration file at {:?}, using defaults", default_path);
            Ok(Self::default())
        }
    }

    pub fn cache_dir(&self) -> Option<PathBuf> {
        self.cache.as_ref().and_then(|c| c.dir.clone())
    }

    pub fn simulator(&self, program: Option<&str>) -> ExternalSimulator {
        let file = self.simulator.as_ref();
        let program = program
            .map(str::to_string)
            .or_else(|| file.and_then(|s| s.program.clone()))
            .unwrap_or_else(|| DefaultsConfig::default().simulator_program);
        let extra_args = file
            .and_then(|s| s.extra_args.clone())
            .unwrap_or_default();
        ExternalSimulator::new(program).with_extra_args(extra_args)
    }

    /// Combines the command line with the file; command line values win.
    pub fn merge_with_cli(&self, args: &SimulateArgs) -> Result<SimulationConfig> {
        let defaults = DefaultsConfig::default();
        let file = self.defaults.as_ref();

        let species = args
            .species
            .clone()
            .ok_or_else(|| CliError::Argument("A species is required.".to_string()))?;
        let model = args
            .model
            .clone()
            .or_else(|| file.and_then(|d| d.model.clone()));
        let genetic_map = args
            .genetic_map
            .clone()
            .or_else(|| file.and_then(|d| d.genetic_map.clone()));
        let length_multiplier = args
            .length_multiplier
            .or_else(|| file.and_then(|d| d.length_multiplier))
            .unwrap_or(defaults.length_multiplier);

        SimulationConfigBuilder::new()
            .species(species)
            .model(model)
            .chromosome(args.chromosome.clone())
            .genetic_map(MapSelection::from_arg(genetic_map.as_deref()))
            .length_multiplier(length_multiplier)
            .samples(args.samples.clone())
            .seed(args.seed)
            .trees(args.trees)
            .build()
            .map_err(|e| CliError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;
    use std::fs;
    use tempfile::tempdir;

    fn simulate_args(args: &[&str]) -> SimulateArgs {
        let mut argv = vec!["stdpopsim"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap().simulate
    }

    #[test]
    fn empty_file_uses_builtin_defaults() {
        let config = PartialConfig::from_toml("").unwrap();
        let merged = config
            .merge_with_cli(&simulate_args(&["homo_sapiens", "10"]))
            .unwrap();
        assert_eq!(merged.length_multiplier, 1.0);
        assert_eq!(merged.genetic_map, MapSelection::Uniform);
        assert_eq!(config.simulator(None).program, "mspms");
        assert!(config.cache_dir().is_none());
    }

    #[test]
    fn file_values_fill_in_missing_arguments() {
        let config = PartialConfig::from_toml(
            r#"
            [simulator]
            program = "ms"
            extra-args = ["-p", "10"]

            [cache]
            dir = "/data/stdpopsim"

            [defaults]
            length-multiplier = 0.25
            model = "gutenkunst_ooa_3"
            genetic-map = "default"
            "#,
        )
        .unwrap();

        let merged = config
            .merge_with_cli(&simulate_args(&["homo_sapiens", "2", "2", "2"]))
            .unwrap();
        assert_eq!(merged.length_multiplier, 0.25);
        assert_eq!(merged.model.as_deref(), Some("gutenkunst_ooa_3"));
        assert_eq!(merged.genetic_map, MapSelection::Default);

        let simulator = config.simulator(None);
        assert_eq!(simulator.program, "ms");
        assert_eq!(simulator.extra_args, vec!["-p", "10"]);
        assert_eq!(config.cache_dir(), Some(PathBuf::from("/data/stdpopsim")));
    }

    #[test]
    fn cli_arguments_override_file() {
        let config = PartialConfig::from_toml(
            r#"
            [simulator]
            program = "ms"

            [defaults]
            length-multiplier = 0.25
            model = "gutenkunst_ooa_3"
            "#,
        )
        .unwrap();

        let merged = config
            .merge_with_cli(&simulate_args(&[
                "homo_sapiens",
                "-l",
                "0.5",
                "-m",
                "tennessen_european",
                "4",
            ]))
            .unwrap();
        assert_eq!(merged.length_multiplier, 0.5);
        assert_eq!(merged.model.as_deref(), Some("tennessen_european"));
        assert_eq!(config.simulator(Some("mspms")).program, "mspms");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(PartialConfig::from_toml("[simulator]\nprogramme = \"ms\"\n").is_err());
        assert!(PartialConfig::from_toml("[output]\nformat = \"vcf\"\n").is_err());
    }

    #[test]
    fn invalid_length_multiplier_is_a_config_error() {
        let config = PartialConfig::default();
        let result = config.merge_with_cli(&simulate_args(&["homo_sapiens", "-l", "0", "4"]));
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn from_file_reports_path_on_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[cache\n").unwrap();
        match PartialConfig::from_file(&path) {
            Err(CliError::FileParsing { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(PartialConfig::load(Some(&path)).is_err());
    }
}
