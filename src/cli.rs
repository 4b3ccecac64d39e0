use crate::measurement::Measurement;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(version, about = "Scaffolds performance-measurement experiments")]
pub struct Cli {
  #[command(subcommand)]
  pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
  /// Create (or regenerate) an experiment tree.
  Create(CreateArgs),

  /// List experiments under the experiments directory.
  List(ListArgs),
}

#[derive(Debug, Args)]
pub struct CreateArgs {
  /// Experiment name, used verbatim as the directory name.
  pub name: String,

  /// Measurement to enable. Repeat or comma-separate for several.
  #[arg(long = "measure", value_enum, value_delimiter = ',')]
  pub measurements: Vec<Measurement>,

  /// Enable every measurement.
  #[arg(long, conflicts_with = "measurements")]
  pub all_measurements: bool,

  /// Space-separated custom metric names.
  /// Example: "cache-misses branch-mispredicts"
  #[arg(long, default_value = "")]
  pub custom: String,

  /// Comma-separated configuration names.
  #[arg(long, default_value = "baseline")]
  pub configs: String,

  /// Directory new experiments are created under.
  #[arg(long, env = "ARCHIPLEX_EXPERIMENTS_DIR")]
  pub experiments_dir: Option<PathBuf>,

  /// Directory holding benchmark.c, Makefile and notebooks/.
  #[arg(long, env = "ARCHIPLEX_TEMPLATES_DIR")]
  pub templates_dir: Option<PathBuf>,

  /// JSON file overriding the default experiment settings.
  #[arg(long)]
  pub settings_file: Option<PathBuf>,

  /// Print a JSON report of the generated files to stdout.
  #[arg(long)]
  pub json: bool,
}

#[derive(Debug, Args)]
pub struct ListArgs {
  /// Directory experiments are created under.
  #[arg(long, env = "ARCHIPLEX_EXPERIMENTS_DIR")]
  pub experiments_dir: Option<PathBuf>,
}
