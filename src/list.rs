use crate::error::ConfigError;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Names of the experiment directories under `experiments_root`, sorted.
///
/// A root that does not exist yet has no experiments.
pub fn list_experiments(experiments_root: &Path) -> Result<Vec<String>, ConfigError> {
  let read_err = |source| ConfigError::ReadExperimentsDir {
    path: experiments_root.to_path_buf(),
    source,
  };

  let entries = match fs::read_dir(experiments_root) {
    Ok(entries) => entries,
    Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
    Err(e) => return Err(read_err(e)),
  };

  let mut names = Vec::new();
  for entry in entries {
    let entry = entry.map_err(read_err)?;
    if entry.file_type().map_err(read_err)?.is_dir() {
      names.push(entry.file_name().to_string_lossy().into_owned());
    }
  }
  names.sort();
  Ok(names)
}
