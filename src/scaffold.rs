use crate::error::ScaffoldError;
use std::fs;
use std::path::Path;

/// Directories every experiment starts with, relative to its root.
pub const EXPERIMENT_SUBDIRS: [&str; 6] = [
  "config",
  "data/raw",
  "data/processed",
  "scripts",
  "analysis",
  "src",
];

/// Creates the fixed experiment subtree under `experiment_dir`.
///
/// Existing directories and their contents are left alone.
pub fn create_experiment_dirs(experiment_dir: &Path) -> Result<(), ScaffoldError> {
  for subdir in EXPERIMENT_SUBDIRS {
    let path = experiment_dir.join(subdir);
    fs::create_dir_all(&path).map_err(|source| ScaffoldError::CreateDir {
      path: path.clone(),
      source,
    })?;
    tracing::debug!(dir = %path.display(), "Directory ready");
  }
  Ok(())
}
