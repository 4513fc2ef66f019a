use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

const AFTER_HELP: &str = "\
Examples:
  stdpopsim homo_sapiens -c chr22 -l 0.1 10
  stdpopsim homo_sapiens -m gutenkunst_ooa_3 -c chr1 -g default -l 0.01 4 4 4
  stdpopsim list homo_sapiens
  stdpopsim maps download homo_sapiens HapmapII_GRCh37";

#[derive(Parser, Debug)]
#[command(
    author = "PopSim Consortium",
    version,
    about = "stdpopsim - Run standard population genetic simulations of published demographic models on real genomes.",
    help_template = HELP_TEMPLATE,
    after_help = AFTER_HELP,
)]
#[command(propagate_version = true, subcommand_negates_reqs = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub simulate: SimulateArgs,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Configuration file in TOML format. Defaults to config.toml in the
    /// user configuration directory, if present.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory genetic maps are downloaded to and read from
    #[arg(long, global = true, env = "STDPOPSIM_CACHE_DIR", value_name = "PATH")]
    pub cache_dir: Option<PathBuf>,

    /// Set the number of threads for parallel computation.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the species in the catalog, or the genome, genetic maps and models of one species.
    List(ListArgs),
    /// Print an epoch-by-epoch account of a demographic model.
    Debug(DebugArgs),
    /// Manage the local genetic map cache.
    Maps(MapsArgs),
}

/// Arguments for running a simulation, the default action.
#[derive(Args, Debug, Clone, Default)]
pub struct SimulateArgs {
    /// Species id or alias (e.g., 'homo_sapiens', 'HomSap').
    #[arg(required = true, value_name = "SPECIES")]
    pub species: Option<String>,

    /// Number of haploid samples from each population, in population order.
    #[arg(required = true, num_args = 1.., value_name = "SAMPLES")]
    pub samples: Vec<usize>,

    /// Demographic model id. Defaults to a constant size population.
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Chromosome to simulate. Defaults to the species' first chromosome.
    #[arg(short, long, value_name = "CHROM")]
    pub chromosome: Option<String>,

    /// Genetic map to take recombination rates from; 'default' picks the species'
    /// default map. Without it, a flat map at the chromosome's mean rate is used.
    #[arg(short = 'g', long, value_name = "MAP")]
    pub genetic_map: Option<String>,

    /// Simulate this fraction of the chromosome.
    #[arg(short = 'l', long, value_name = "SCALE")]
    pub length_multiplier: Option<f64>,

    /// Write the simulator output here instead of stdout.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// ms-compatible simulator program to run.
    #[arg(long, value_name = "PROGRAM")]
    pub simulator: Option<String>,

    /// Random seed, for reproducible runs.
    #[arg(short, long, value_name = "INT")]
    pub seed: Option<u64>,

    /// Also output the genealogies.
    #[arg(short = 'T', long)]
    pub trees: bool,

    /// Print the simulator command line instead of running it.
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Show details for this species.
    #[arg(value_name = "SPECIES")]
    pub species: Option<String>,
}

#[derive(Args, Debug)]
pub struct DebugArgs {
    #[arg(value_name = "SPECIES")]
    pub species: String,

    /// Model id. Defaults to the constant size model.
    #[arg(value_name = "MODEL")]
    pub model: Option<String>,
}

/// Arguments for the `maps` subcommand.
#[derive(Args, Debug)]
pub struct MapsArgs {
    #[command(subcommand)]
    pub command: MapsCommands,
}

/// Available commands for genetic map management.
#[derive(Subcommand, Debug)]
pub enum MapsCommands {
    /// Download and unpack a genetic map into the cache.
    Download {
        #[arg(value_name = "SPECIES")]
        species: String,
        #[arg(value_name = "MAP")]
        map: String,
        /// Force re-download and overwrite an existing copy.
        #[arg(long)]
        force: bool,
    },
    /// Show the absolute path to the genetic map cache.
    Path,
    /// Set a custom absolute path for the genetic map cache.
    SetPath {
        /// The new directory to store genetic maps in.
        #[arg(required = true)]
        path: PathBuf,
    },
    /// Reset the cache path to its default, OS-specific location.
    ResetPath,
}
