// Copyright 2025 Chisomo Makombo Sakala
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! # Archiplex
//!
//! `archiplex` scaffolds the directory tree of a performance-measurement
//! experiment. Given an experiment name, the measurements to collect and the
//! build configurations to support, it writes a settings file, copies the
//! benchmark templates and emits one build-and-run script per configuration.
//!
//! This crate contains the library logic for the `archiplex` CLI. The
//! generation steps are plain functions and can be called independently.
//!
//! ## Core Modules
//!
//! * [`generator`]: The `create_experiment` entry point, which sequences the
//!   steps below and checks for cancellation between them.
//! * [`scaffold`]: Creates the fixed `config/`, `data/`, `scripts/`,
//!   `analysis/` and `src/` subtree.
//! * [`settings_file`]: Renders and writes `config/config.ini`.
//! * [`templates`]: Copies `benchmark.c`, the `Makefile` and notebooks.
//! * [`scripts`]: Assembles `EXPCONFIG` macros and writes `scripts/run_<config>.sh`.
//! * [`measurement`]: The measurement enumeration and its versioned macro table.
//! * [`config`]: Turns `CreateArgs` into an `ExperimentRequest`, loading
//!   settings defaults with `figment`.
//! * [`paths`]: Resolves the experiments root and template location.
//! * [`cancel`]: The cooperative `CancellationToken`.
//! * [`list`]: Lists existing experiments.
//! * [`cli`]: Defines the `clap`-based command-line interface.
//! * [`error`]: Defines the custom error types for the library.
//! * [`logging`]: Provides the `setup_tracing` utility.

pub mod cancel;
pub mod cli;
pub mod config;
pub mod error;
pub mod generator;
pub mod list;
pub mod logging;
pub mod measurement;
pub mod paths;
pub mod scaffold;
pub mod scripts;
pub mod settings_file;
pub mod templates;
