use crate::config::ExperimentSettings;
use crate::error::ScaffoldError;
use crate::measurement::MeasurementSet;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

/// Location of the settings file inside an experiment.
pub const SETTINGS_FILE: &str = "config/config.ini";

/// Renders the INI text for `config/config.ini`.
///
/// Sections are always emitted as `[Settings]`, `[Measurements]`, then
/// `[Custom Metrics]` (only when custom metrics exist), so regenerating
/// with the same inputs yields identical bytes.
pub fn render_settings(
  settings: &ExperimentSettings,
  measurements: &MeasurementSet,
  configurations: &[String],
) -> String {
  let run_config = configurations.first().map(String::as_str).unwrap_or("");

  let mut out = String::new();
  section(&mut out, "Settings");
  entry(&mut out, "experiment_version", &settings.version);
  entry(&mut out, "experiment_loop_count", settings.loop_count);
  entry(&mut out, "experiment_iterations", settings.iterations);
  entry(&mut out, "experiment_configurations", configurations.join(","));
  entry(&mut out, "current_run_id", 0);
  entry(&mut out, "current_run_config", run_config);

  out.push('\n');
  section(&mut out, "Measurements");
  for (measurement, enabled) in measurements.iter() {
    entry(&mut out, measurement.key(), ini_bool(enabled));
  }

  if !measurements.custom().is_empty() {
    out.push('\n');
    section(&mut out, "Custom Metrics");
    for metric in measurements.custom() {
      entry(&mut out, metric, ini_bool(true));
    }
  }

  out
}

/// Writes `config/config.ini`, replacing any previous file.
pub fn write_settings(
  experiment_dir: &Path,
  settings: &ExperimentSettings,
  measurements: &MeasurementSet,
  configurations: &[String],
) -> Result<PathBuf, ScaffoldError> {
  let path = experiment_dir.join(SETTINGS_FILE);
  let contents = render_settings(settings, measurements, configurations);

  fs::write(&path, contents).map_err(|source| ScaffoldError::WriteSettings {
    path: path.clone(),
    source,
  })?;

  tracing::info!(path = %path.display(), "Settings file written");
  Ok(path)
}

fn section(out: &mut String, name: &str) {
  out.push_str(&format!("[{}]\n", name));
}

fn entry(out: &mut String, key: &str, value: impl std::fmt::Display) {
  out.push_str(&format!("{} = {}\n", key, value));
}

fn ini_bool(value: bool) -> &'static str {
  if value { "True" } else { "False" }
}
