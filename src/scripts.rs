use crate::error::ScaffoldError;
use crate::measurement::Measurement;
use crate::measurement::MeasurementSet;
use crate::measurement::macro_for;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

/// Name of the run script generated for `configuration`.
pub fn script_name(configuration: &str) -> String {
  format!("run_{}.sh", configuration)
}

/// Macro selecting a configuration at compile time, e.g. `CONFIG_BASELINE`.
///
/// Characters that cannot appear in a C identifier become `_`.
pub fn selector_macro(configuration: &str) -> String {
  let name: String = configuration
    .chars()
    .map(|c| {
      if c.is_ascii_alphanumeric() {
        c.to_ascii_uppercase()
      } else {
        '_'
      }
    })
    .collect();
  format!("CONFIG_{}", name)
}

/// Assembles the `EXPCONFIG` value for one configuration.
///
/// The selector macro always comes first, followed by one macro per enabled
/// measurement in declaration order. Measurements missing from `table`
/// contribute nothing.
pub fn assemble_macros(
  configuration: &str,
  measurements: &MeasurementSet,
  table: &[(Measurement, &'static str)],
) -> String {
  let mut tokens = vec![format!("-D{}", selector_macro(configuration))];
  tokens.extend(
    measurements
      .enabled()
      .filter_map(|m| macro_for(table, m))
      .map(|token| format!("-D{}", token)),
  );
  tokens.join(" ")
}

/// Shell body of a run script.
///
/// The configuration only appears in its sanitized selector form, so a
/// name cannot smuggle extra lines into the script.
pub fn render_script(configuration: &str, macros: &str) -> String {
  let selector = selector_macro(configuration);
  format!(
    r#"#!/bin/sh
# Build and run the {selector} configuration.
set -e

cd "$(dirname "$0")/.."

make clean
make EXPCONFIG="{macros}"

./bin/./benchmark
"#
  )
}

/// Writes `scripts/run_<configuration>.sh` and marks it executable.
pub fn write_run_script(
  experiment_dir: &Path,
  configuration: &str,
  measurements: &MeasurementSet,
  table: &[(Measurement, &'static str)],
) -> Result<PathBuf, ScaffoldError> {
  let path = experiment_dir.join("scripts").join(script_name(configuration));
  let macros = assemble_macros(configuration, measurements, table);

  fs::write(&path, render_script(configuration, &macros)).map_err(|source| {
    ScaffoldError::WriteScript {
      path: path.clone(),
      source,
    }
  })?;
  make_executable(&path)?;

  tracing::info!(configuration, %macros, "Run script written");
  Ok(path)
}

/// Existing `run_*.sh` scripts in `scripts/` whose configuration is not in `configurations`.
///
/// These are left on disk; the caller only reports them.
pub fn stale_scripts(experiment_dir: &Path, configurations: &[String]) -> Vec<PathBuf> {
  let Ok(entries) = fs::read_dir(experiment_dir.join("scripts")) else {
    return Vec::new();
  };

  let mut stale: Vec<PathBuf> = entries
    .filter_map(|entry| entry.ok())
    .map(|entry| entry.path())
    .filter(|path| {
      path
        .file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.strip_prefix("run_"))
        .and_then(|name| name.strip_suffix(".sh"))
        .is_some_and(|config| !configurations.iter().any(|c| c == config))
    })
    .collect();
  stale.sort();
  stale
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<(), ScaffoldError> {
  use std::os::unix::fs::PermissionsExt;

  let perm_err = |source| ScaffoldError::SetPermissions {
    path: path.to_path_buf(),
    source,
  };
  let mut permissions = fs::metadata(path).map_err(perm_err)?.permissions();
  permissions.set_mode(permissions.mode() | 0o111);
  fs::set_permissions(path, permissions).map_err(perm_err)
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<(), ScaffoldError> {
  Ok(())
}
