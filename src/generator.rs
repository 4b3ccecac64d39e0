use crate::cancel::CancellationToken;
use crate::config::ExperimentRequest;
use crate::error::ScaffoldError;
use crate::measurement::MACRO_TABLE;
use crate::measurement::MACRO_TABLE_VERSION;
use crate::measurement::validate_macro_table;
use crate::paths::display_relative;
use crate::scaffold::create_experiment_dirs;
use crate::scripts::stale_scripts;
use crate::scripts::write_run_script;
use crate::settings_file::write_settings;
use crate::templates::materialize_templates;
use serde::Serialize;
use std::path::PathBuf;

/// What a generation run wrote, and which earlier scripts it left behind.
#[derive(Debug, Clone, Serialize)]
pub struct ExperimentReport {
  pub experiment_dir: PathBuf,
  pub settings_file: PathBuf,
  pub templates: Vec<PathBuf>,
  pub scripts: Vec<PathBuf>,
  pub stale_scripts: Vec<PathBuf>,
}

/// A generation step that has finished writing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
  Directories,
  Settings,
  Templates,
  Script(String),
}

/// Builds the experiment tree described by `request`.
///
/// Steps run in order: directories, settings file, templates, then one run
/// script per configuration. The first failure aborts the run and nothing
/// already written is rolled back. `cancel` is checked before every write.
pub fn create_experiment(
  request: &ExperimentRequest,
  cancel: &CancellationToken,
) -> Result<ExperimentReport, ScaffoldError> {
  create_experiment_with(request, cancel, |step| {
    tracing::debug!(?step, "Step complete");
  })
}

/// Like [`create_experiment`], calling `on_step` after each step completes.
pub fn create_experiment_with<F>(
  request: &ExperimentRequest,
  cancel: &CancellationToken,
  mut on_step: F,
) -> Result<ExperimentReport, ScaffoldError>
where
  F: FnMut(Step),
{
  let experiment_dir = request.experiment_dir();
  let span = tracing::info_span!(
    "create_experiment",
    name = %request.name,
    configs = %request.configurations.join(",")
  );
  let _enter = span.enter();

  validate_macro_table(MACRO_TABLE)?;
  tracing::debug!(version = MACRO_TABLE_VERSION, "Macro table validated");

  tracing::info!("--- Creating experiment at {} ---", display_relative(&experiment_dir));

  cancel.checkpoint("directories")?;
  create_experiment_dirs(&experiment_dir)?;
  on_step(Step::Directories);

  cancel.checkpoint("settings")?;
  let settings_file = write_settings(
    &experiment_dir,
    &request.settings,
    &request.measurements,
    &request.configurations,
  )?;
  on_step(Step::Settings);

  cancel.checkpoint("templates")?;
  let templates = materialize_templates(&request.templates_dir, &experiment_dir)?;
  on_step(Step::Templates);

  let mut scripts = Vec::with_capacity(request.configurations.len());
  for configuration in &request.configurations {
    cancel.checkpoint("scripts")?;
    scripts.push(write_run_script(
      &experiment_dir,
      configuration,
      &request.measurements,
      MACRO_TABLE,
    )?);
    on_step(Step::Script(configuration.clone()));
  }

  let stale = stale_scripts(&experiment_dir, &request.configurations);
  for script in &stale {
    tracing::warn!(
      path = %display_relative(script),
      "Run script for a configuration no longer requested was left in place"
    );
  }

  tracing::info!("--- Experiment setup complete ---");

  Ok(ExperimentReport {
    experiment_dir,
    settings_file,
    templates,
    scripts,
    stale_scripts: stale,
  })
}
