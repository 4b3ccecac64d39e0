use crate::error::ScaffoldError;
use clap::ValueEnum;
use std::collections::BTreeMap;

/// The fixed set of measurements an experiment can be built with.
///
/// Declaration order is the order keys appear in `config.ini`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, ValueEnum)]
pub enum Measurement {
  OverallThroughput,
  OverallLatency,
  PerFunctionLatencies,
  Power,
  PerfStatistics,
}

impl Measurement {
  pub const ALL: [Measurement; 5] = [
    Measurement::OverallThroughput,
    Measurement::OverallLatency,
    Measurement::PerFunctionLatencies,
    Measurement::Power,
    Measurement::PerfStatistics,
  ];

  /// Key used for this measurement in the `[Measurements]` section.
  pub fn key(&self) -> &'static str {
    match self {
      Measurement::OverallThroughput => "Overall_Throughput",
      Measurement::OverallLatency => "Overall_Latency",
      Measurement::PerFunctionLatencies => "Per_function_Latencies",
      Measurement::Power => "Power",
      Measurement::PerfStatistics => "Perf_Statistics",
    }
  }
}

/// Bump whenever an entry of [`MACRO_TABLE`] changes meaning.
pub const MACRO_TABLE_VERSION: u32 = 1;

/// Build macro compiled in when a measurement is enabled.
pub const MACRO_TABLE: &[(Measurement, &str)] = &[
  (Measurement::OverallThroughput, "CONFIG_MEASURE_THROUGHPUT"),
  (Measurement::OverallLatency, "CONFIG_MEASURE_LATENCY"),
  (Measurement::PerFunctionLatencies, "CONFIG_MEASURE_FUNCTION_LATENCIES"),
  (Measurement::Power, "CONFIG_MEASURE_POWER"),
  (Measurement::PerfStatistics, "CONFIG_MEASURE_PERF_STATS"),
];

/// Checks that every measurement has a macro in `table`.
pub fn validate_macro_table(table: &[(Measurement, &str)]) -> Result<(), ScaffoldError> {
  let missing: Vec<&'static str> = Measurement::ALL
    .iter()
    .filter(|m| !table.iter().any(|(entry, _)| entry == *m))
    .map(Measurement::key)
    .collect();

  if missing.is_empty() {
    Ok(())
  } else {
    Err(ScaffoldError::MacroTableIncomplete {
      version: MACRO_TABLE_VERSION,
      missing,
    })
  }
}

/// Looks up the macro token for a measurement, if the table maps it.
pub fn macro_for(
  table: &[(Measurement, &'static str)],
  measurement: Measurement,
) -> Option<&'static str> {
  table
    .iter()
    .find(|(entry, _)| *entry == measurement)
    .map(|(_, token)| *token)
}

/// Enabled/disabled state for every [`Measurement`], plus free-form custom metrics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MeasurementSet {
  flags: BTreeMap<Measurement, bool>,
  custom: Vec<String>,
}

impl MeasurementSet {
  /// A set with every measurement disabled and no custom metrics.
  pub fn new() -> Self {
    Self {
      flags: Measurement::ALL.iter().map(|m| (*m, false)).collect(),
      custom: Vec::new(),
    }
  }

  pub fn with(mut self, measurement: Measurement, enabled: bool) -> Self {
    self.set(measurement, enabled);
    self
  }

  pub fn set(&mut self, measurement: Measurement, enabled: bool) {
    self.flags.insert(measurement, enabled);
  }

  pub fn is_enabled(&self, measurement: Measurement) -> bool {
    self.flags.get(&measurement).copied().unwrap_or(false)
  }

  /// Every measurement with its flag, in declaration order.
  pub fn iter(&self) -> impl Iterator<Item = (Measurement, bool)> + '_ {
    Measurement::ALL
      .into_iter()
      .map(move |m| (m, self.is_enabled(m)))
  }

  pub fn enabled(&self) -> impl Iterator<Item = Measurement> + '_ {
    self.iter().filter(|(_, on)| *on).map(|(m, _)| m)
  }

  /// Appends custom metrics, skipping blanks and names already present.
  ///
  /// First-seen order is kept; each name becomes one `[Custom Metrics]` key.
  pub fn with_custom<I, S>(mut self, metrics: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    for metric in metrics.into_iter().map(Into::into) {
      if !metric.trim().is_empty() && !self.custom.contains(&metric) {
        self.custom.push(metric);
      }
    }
    self
  }

  pub fn custom(&self) -> &[String] {
    &self.custom
  }
}
