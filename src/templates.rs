use crate::error::ScaffoldError;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

/// Benchmark harness source, copied to `src/benchmark.c`.
pub const BENCHMARK_TEMPLATE: &str = "benchmark.c";

/// Build file, copied to the experiment root.
pub const MAKEFILE_TEMPLATE: &str = "Makefile";

/// Directory whose regular files are copied into `analysis/`.
pub const NOTEBOOKS_DIR: &str = "notebooks";

/// Copies the template set from `templates_dir` into `experiment_dir`.
///
/// A missing `benchmark.c` or `Makefile` is an installation defect and
/// fails the copy. The notebooks directory is optional. Destination
/// files are overwritten. Returns the destination paths in copy order.
pub fn materialize_templates(
  templates_dir: &Path,
  experiment_dir: &Path,
) -> Result<Vec<PathBuf>, ScaffoldError> {
  let mut copied = vec![
    copy_template(
      &templates_dir.join(BENCHMARK_TEMPLATE),
      &experiment_dir.join("src").join(BENCHMARK_TEMPLATE),
    )?,
    copy_template(
      &templates_dir.join(MAKEFILE_TEMPLATE),
      &experiment_dir.join(MAKEFILE_TEMPLATE),
    )?,
  ];

  let notebooks = templates_dir.join(NOTEBOOKS_DIR);
  if notebooks.is_dir() {
    let analysis = experiment_dir.join("analysis");
    for notebook in notebook_files(&notebooks)? {
      let Some(file_name) = notebook.file_name() else {
        continue;
      };
      copied.push(copy_template(&notebook, &analysis.join(file_name))?);
    }
  } else {
    tracing::debug!(dir = %notebooks.display(), "No notebook templates found");
  }

  tracing::info!(count = copied.len(), "Templates copied");
  Ok(copied)
}

/// Regular files directly under `dir`, sorted by name.
fn notebook_files(dir: &Path) -> Result<Vec<PathBuf>, ScaffoldError> {
  let read_err = |source| ScaffoldError::ReadTemplateDir {
    path: dir.to_path_buf(),
    source,
  };

  let mut files = Vec::new();
  for entry in fs::read_dir(dir).map_err(read_err)? {
    let entry = entry.map_err(read_err)?;
    if entry.file_type().map_err(read_err)?.is_file() {
      files.push(entry.path());
    }
  }
  files.sort();
  Ok(files)
}

fn copy_template(from: &Path, to: &Path) -> Result<PathBuf, ScaffoldError> {
  fs::copy(from, to).map_err(|source| ScaffoldError::CopyTemplate {
    from: from.to_path_buf(),
    to: to.to_path_buf(),
    source,
  })?;
  tracing::debug!(from = %from.display(), to = %to.display(), "Template copied");
  Ok(to.to_path_buf())
}
