use archiplex::cancel::CancellationToken;
use archiplex::config::ExperimentRequest;
use archiplex::config::ExperimentSettings;
use archiplex::error::ScaffoldError;
use archiplex::generator::Step;
use archiplex::generator::create_experiment;
use archiplex::generator::create_experiment_with;
use archiplex::measurement::Measurement;
use archiplex::measurement::MeasurementSet;
use archiplex::scaffold::EXPERIMENT_SUBDIRS;
use fs_extra::dir::CopyOptions;
use fs_extra::dir::copy;
use std::collections::BTreeSet;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::path::PathBuf;
use tempfile::TempDir;
use tempfile::tempdir;

/// Copies ./tests/fixtures/templates into a scratch dir and builds a request against it.
fn setup(configs: &[&str], measurements: MeasurementSet) -> (TempDir, ExperimentRequest) {
  let temp = tempdir().unwrap();
  copy("tests/fixtures/templates", temp.path(), &CopyOptions::new()).unwrap();

  let request = ExperimentRequest {
    name: "cache-study".to_string(),
    measurements,
    configurations: configs.iter().map(|c| c.to_string()).collect(),
    settings: ExperimentSettings::default(),
    experiments_root: temp.path().join("experiments"),
    templates_dir: temp.path().join("templates"),
  };
  (temp, request)
}

/// Key/value pairs of one `[section]` of an INI file, in file order.
fn section(text: &str, name: &str) -> Vec<(String, String)> {
  let header = format!("[{}]", name);
  text
    .lines()
    .skip_while(|line| *line != header)
    .skip(1)
    .take_while(|line| !line.starts_with('['))
    .filter_map(|line| line.split_once(" = "))
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

fn value<'a>(entries: &'a [(String, String)], key: &str) -> &'a str {
  entries
    .iter()
    .find(|(k, _)| k == key)
    .map(|(_, v)| v.as_str())
    .unwrap()
}

fn dir_set(root: &Path) -> BTreeSet<PathBuf> {
  let mut out = BTreeSet::new();
  let mut stack = vec![root.to_path_buf()];
  while let Some(dir) = stack.pop() {
    for entry in fs::read_dir(&dir).unwrap() {
      let path = entry.unwrap().path();
      if path.is_dir() {
        out.insert(path.strip_prefix(root).unwrap().to_path_buf());
        stack.push(path);
      }
    }
  }
  out
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
  use std::os::unix::fs::PermissionsExt;
  fs::metadata(path).unwrap().permissions().mode() & 0o111 == 0o111
}

#[test]
fn creates_fixed_subtree_and_regenerates_cleanly() {
  let (_temp, request) = setup(&["baseline"], MeasurementSet::new());
  let cancel = CancellationToken::new();

  let report = create_experiment(&request, &cancel).unwrap();
  let experiment = request.experiment_dir();
  assert_eq!(report.experiment_dir, experiment);

  for subdir in EXPERIMENT_SUBDIRS {
    assert!(experiment.join(subdir).is_dir(), "missing {}", subdir);
  }
  let first = dir_set(&experiment);

  create_experiment(&request, &cancel).unwrap();
  assert_eq!(dir_set(&experiment), first);
}

#[test]
fn existing_content_survives_regeneration() {
  let (_temp, request) = setup(&["baseline"], MeasurementSet::new());
  let cancel = CancellationToken::new();
  create_experiment(&request, &cancel).unwrap();

  let raw = request.experiment_dir().join("data/raw/run1.csv");
  fs::write(&raw, "id,latency\n1,42\n").unwrap();

  create_experiment(&request, &cancel).unwrap();
  assert_eq!(fs::read_to_string(raw).unwrap(), "id,latency\n1,42\n");
}

#[test]
fn measurements_section_has_exactly_the_fixed_keys() {
  let measurements = MeasurementSet::new()
    .with(Measurement::OverallThroughput, true)
    .with(Measurement::Power, true);
  let (_temp, request) = setup(&["baseline"], measurements);

  let report = create_experiment(&request, &CancellationToken::new()).unwrap();
  let text = fs::read_to_string(&report.settings_file).unwrap();

  assert_eq!(
    section(&text, "Measurements"),
    vec![
      ("Overall_Throughput".to_string(), "True".to_string()),
      ("Overall_Latency".to_string(), "False".to_string()),
      ("Per_function_Latencies".to_string(), "False".to_string()),
      ("Power".to_string(), "True".to_string()),
      ("Perf_Statistics".to_string(), "False".to_string()),
    ]
  );
  assert!(!text.contains("[Custom Metrics]"));
}

#[test]
fn settings_section_records_configurations() {
  let (_temp, request) = setup(&["baseline", "optimized"], MeasurementSet::new());

  let report = create_experiment(&request, &CancellationToken::new()).unwrap();
  assert_eq!(
    report.settings_file,
    request.experiment_dir().join("config/config.ini")
  );
  let text = fs::read_to_string(&report.settings_file).unwrap();

  let settings = section(&text, "Settings");
  let get = |key| value(&settings, key);
  assert_eq!(get("experiment_version"), "1.0.0");
  assert_eq!(get("experiment_loop_count"), "100000");
  assert_eq!(get("experiment_iterations"), "30");
  assert_eq!(get("experiment_configurations"), "baseline,optimized");
  assert_eq!(get("current_run_id"), "0");
  assert_eq!(get("current_run_config"), "baseline");
}

#[test]
fn custom_metrics_are_all_enabled() {
  let measurements = MeasurementSet::new().with_custom(["cache-misses", "branch-mispredicts"]);
  let (_temp, request) = setup(&["baseline"], measurements);

  let report = create_experiment(&request, &CancellationToken::new()).unwrap();
  let text = fs::read_to_string(&report.settings_file).unwrap();

  assert_eq!(
    section(&text, "Custom Metrics"),
    vec![
      ("cache-misses".to_string(), "True".to_string()),
      ("branch-mispredicts".to_string(), "True".to_string()),
    ]
  );
}

#[test]
fn one_script_per_configuration_with_own_selector() {
  let measurements = MeasurementSet::new().with(Measurement::OverallThroughput, true);
  let (_temp, request) = setup(&["baseline", "optimized"], measurements);

  let report = create_experiment(&request, &CancellationToken::new()).unwrap();
  let scripts_dir = request.experiment_dir().join("scripts");

  let mut names: Vec<String> = fs::read_dir(&scripts_dir)
    .unwrap()
    .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
    .collect();
  names.sort();
  assert_eq!(names, vec!["run_baseline.sh", "run_optimized.sh"]);
  assert_eq!(report.scripts.len(), 2);

  let baseline = fs::read_to_string(scripts_dir.join("run_baseline.sh")).unwrap();
  let optimized = fs::read_to_string(scripts_dir.join("run_optimized.sh")).unwrap();

  assert!(baseline.contains(r#"EXPCONFIG="-DCONFIG_BASELINE -DCONFIG_MEASURE_THROUGHPUT""#));
  assert!(optimized.contains(r#"EXPCONFIG="-DCONFIG_OPTIMIZED -DCONFIG_MEASURE_THROUGHPUT""#));
  assert!(!baseline.contains("-DCONFIG_OPTIMIZED"));
  assert!(!optimized.contains("-DCONFIG_BASELINE"));

  #[cfg(unix)]
  {
    assert!(is_executable(&scripts_dir.join("run_baseline.sh")));
    assert!(is_executable(&scripts_dir.join("run_optimized.sh")));
  }
}

#[test]
fn templates_are_copied_verbatim() {
  let (temp, request) = setup(&["baseline"], MeasurementSet::new());

  let report = create_experiment(&request, &CancellationToken::new()).unwrap();
  let experiment = request.experiment_dir();
  let templates = temp.path().join("templates");

  for (from, to) in [
    ("benchmark.c", "src/benchmark.c"),
    ("Makefile", "Makefile"),
    ("notebooks/analysis.ipynb", "analysis/analysis.ipynb"),
    ("notebooks/helpers.py", "analysis/helpers.py"),
  ] {
    assert_eq!(
      fs::read(templates.join(from)).unwrap(),
      fs::read(experiment.join(to)).unwrap(),
      "{} differs",
      to
    );
  }
  assert_eq!(report.templates.len(), 4);
}

#[test]
fn dropped_configuration_leaves_its_script_behind() {
  let (_temp, request) = setup(&["baseline", "optimized"], MeasurementSet::new());
  let cancel = CancellationToken::new();
  create_experiment(&request, &cancel).unwrap();

  let reduced = ExperimentRequest {
    configurations: vec!["baseline".to_string()],
    ..request.clone()
  };
  let report = create_experiment(&reduced, &cancel).unwrap();

  let stale = request.experiment_dir().join("scripts/run_optimized.sh");
  assert!(stale.exists());
  assert_eq!(report.stale_scripts, vec![stale]);
}

#[test]
fn missing_benchmark_template_aborts_before_scripts() {
  let (temp, request) = setup(&["baseline", "optimized"], MeasurementSet::new());
  fs::remove_file(temp.path().join("templates/benchmark.c")).unwrap();

  let err = create_experiment(&request, &CancellationToken::new()).unwrap_err();
  match err {
    ScaffoldError::CopyTemplate { from, source, .. } => {
      assert!(from.ends_with("benchmark.c"));
      assert_eq!(source.kind(), ErrorKind::NotFound);
    }
    other => panic!("unexpected error: {:?}", other),
  }

  let scripts = request.experiment_dir().join("scripts");
  assert_eq!(fs::read_dir(scripts).unwrap().count(), 0);
}

#[test]
fn cancelled_run_writes_nothing() {
  let (_temp, request) = setup(&["baseline"], MeasurementSet::new());
  let cancel = CancellationToken::new();
  cancel.cancel();

  let err = create_experiment(&request, &cancel).unwrap_err();
  assert!(err.is_cancelled());
  assert!(!request.experiment_dir().exists());
}

#[test]
fn cancel_after_settings_keeps_earlier_files_and_writes_no_more() {
  let (_temp, request) = setup(&["baseline", "optimized"], MeasurementSet::new());
  let cancel = CancellationToken::new();

  let err = create_experiment_with(&request, &cancel, |step| {
    if step == Step::Settings {
      cancel.cancel();
    }
  })
  .unwrap_err();
  assert!(err.is_cancelled());

  let experiment = request.experiment_dir();
  assert!(experiment.join("config/config.ini").is_file());
  assert!(!experiment.join("src/benchmark.c").exists());
  assert!(!experiment.join("Makefile").exists());
  assert_eq!(fs::read_dir(experiment.join("scripts")).unwrap().count(), 0);
}

#[test]
fn cancel_between_scripts_stops_at_the_next_one() {
  let (_temp, request) = setup(&["baseline", "optimized", "tuned"], MeasurementSet::new());
  let cancel = CancellationToken::new();
  let mut seen = Vec::new();

  let err = create_experiment_with(&request, &cancel, |step| {
    if step == Step::Script("baseline".to_string()) {
      cancel.cancel();
    }
    seen.push(step);
  })
  .unwrap_err();
  assert!(err.is_cancelled());

  assert_eq!(
    seen,
    vec![
      Step::Directories,
      Step::Settings,
      Step::Templates,
      Step::Script("baseline".to_string()),
    ]
  );
  let scripts = request.experiment_dir().join("scripts");
  assert!(scripts.join("run_baseline.sh").is_file());
  assert_eq!(fs::read_dir(scripts).unwrap().count(), 1);
}

#[test]
fn shipped_templates_include_analysis_helpers() {
  let (_temp, mut request) = setup(&["baseline"], MeasurementSet::new());
  request.templates_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("templates");

  create_experiment(&request, &CancellationToken::new()).unwrap();

  let analysis = request.experiment_dir().join("analysis");
  assert!(analysis.join("analysis.ipynb").is_file());
  assert!(analysis.join("utils.py").is_file());
  assert!(request.experiment_dir().join("src/benchmark.c").is_file());
}
