use crate::cli::CreateArgs;
use crate::error::ConfigError;
use crate::measurement::Measurement;
use crate::measurement::MeasurementSet;
use crate::paths::Layout;
use figment::Figment;
use figment::providers::Env;
use figment::providers::Format;
use figment::providers::Json;
use figment::providers::Serialized;
use serde::Deserialize;
use serde::Serialize;
use std::path::Path;
use std::path::PathBuf;

/// Configuration used when none is given.
pub const DEFAULT_CONFIGURATION: &str = "baseline";

/// Experiment metadata written to the `[Settings]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperimentSettings {
  pub version: String,
  pub loop_count: u64,
  pub iterations: u64,
}

impl Default for ExperimentSettings {
  fn default() -> Self {
    Self {
      version: "1.0.0".to_string(),
      loop_count: 100_000,
      iterations: 30,
    }
  }
}

impl ExperimentSettings {
  /// Layers the built-in defaults, an optional JSON file, then
  /// `ARCHIPLEX_VERSION`, `ARCHIPLEX_LOOP_COUNT` and `ARCHIPLEX_ITERATIONS`.
  pub fn load(settings_file: Option<&Path>) -> Result<Self, ConfigError> {
    let mut figment = Figment::from(Serialized::defaults(ExperimentSettings::default()));
    if let Some(path) = settings_file {
      figment = figment.merge(Json::file(path));
    }
    figment = figment.merge(
      Env::prefixed("ARCHIPLEX_").only(&["version", "loop_count", "iterations"]),
    );

    let settings: ExperimentSettings = figment.extract().map_err(Box::new)?;
    Ok(settings)
  }
}

/// Splits a comma-separated configuration list, falling back to `baseline`.
pub fn parse_configurations(raw: &str) -> Vec<String> {
  let configs: Vec<String> = raw
    .split(',')
    .map(str::trim)
    .filter(|c| !c.is_empty())
    .map(str::to_string)
    .collect();

  if configs.is_empty() {
    vec![DEFAULT_CONFIGURATION.to_string()]
  } else {
    configs
  }
}

/// Splits a space-separated custom metric list.
pub fn parse_custom_metrics(raw: &str) -> Vec<String> {
  raw.split_whitespace().map(str::to_string).collect()
}

/// Everything the generator needs to build one experiment.
#[derive(Debug, Clone)]
pub struct ExperimentRequest {
  pub name: String,
  pub measurements: MeasurementSet,
  pub configurations: Vec<String>,
  pub settings: ExperimentSettings,
  pub experiments_root: PathBuf,
  pub templates_dir: PathBuf,
}

impl ExperimentRequest {
  pub fn experiment_dir(&self) -> PathBuf {
    self.experiments_root.join(&self.name)
  }
}

impl TryFrom<CreateArgs> for ExperimentRequest {
  type Error = ConfigError;

  fn try_from(
    CreateArgs {
      name,
      measurements,
      all_measurements,
      custom,
      configs,
      experiments_dir,
      templates_dir,
      settings_file,
      json: _,
    }: CreateArgs,
  ) -> Result<Self, Self::Error> {
    let settings = ExperimentSettings::load(settings_file.as_deref())?;

    let mut measurement_set = MeasurementSet::new().with_custom(parse_custom_metrics(&custom));
    for measurement in Measurement::ALL {
      let enabled = all_measurements || measurements.contains(&measurement);
      measurement_set.set(measurement, enabled);
    }

    let layout = Layout::current();

    Ok(ExperimentRequest {
      name,
      measurements: measurement_set,
      configurations: parse_configurations(&configs),
      settings,
      experiments_root: experiments_dir.unwrap_or(layout.experiments_root),
      templates_dir: templates_dir.unwrap_or(layout.templates_dir),
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn configurations_are_trimmed_and_default_to_baseline() {
    assert_eq!(parse_configurations(" baseline , optimized,"), vec!["baseline", "optimized"]);
    assert_eq!(parse_configurations(""), vec!["baseline"]);
    assert_eq!(parse_configurations(" , "), vec!["baseline"]);
  }

  #[test]
  fn custom_metrics_split_on_whitespace() {
    assert_eq!(
      parse_custom_metrics("cache-misses  branch-mispredicts"),
      vec!["cache-misses", "branch-mispredicts"]
    );
    assert!(parse_custom_metrics("   ").is_empty());
  }
}
