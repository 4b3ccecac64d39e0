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
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while generating an experiment tree (src/generator.rs and its steps).
#[derive(Error, Debug)]
pub enum ScaffoldError {
  #[error("Experiment creation cancelled")]
  Cancelled,

  #[error("Measurement macro table v{version} has no entry for: {missing:?}")]
  MacroTableIncomplete {
    version: u32,
    missing: Vec<&'static str>,
  },

  #[error("Failed to create directory: {path}")]
  CreateDir {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Failed to write settings file: {path}")]
  WriteSettings {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Failed to copy template {from} to {to}")]
  CopyTemplate {
    from: PathBuf,
    to: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Failed to read template directory: {path}")]
  ReadTemplateDir {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Failed to write run script: {path}")]
  WriteScript {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Failed to mark run script executable: {path}")]
  SetPermissions {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

/// Errors related to resolving the request and settings (src/config.rs).
#[derive(Error, Debug)]
pub enum ConfigError {
  #[error("Failed to load experiment settings: {0}")]
  Settings(#[from] Box<figment::Error>),

  #[error("Failed to read experiments directory: {path}")]
  ReadExperimentsDir {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

impl ScaffoldError {
  /// True when the run stopped because the operator asked it to.
  pub fn is_cancelled(&self) -> bool {
    matches!(self, ScaffoldError::Cancelled)
  }
}
