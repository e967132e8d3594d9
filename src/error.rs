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

/// Top-level error enum for the elfreport library.
#[derive(Error, Debug)]
pub enum ElfreportError {
  #[error("Parameter schema error")]
  Schema(#[from] SchemaError),

  #[error("Command line error")]
  Cli(#[from] CliError),

  #[error("Driver file error")]
  Driver(#[from] DriverError),

  #[error("Settings resolution failed")]
  Resolve(#[from] ResolveError),

  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),
}

/// Errors in the parameter schema itself (src/schema.rs). These indicate
/// programming mistakes, not bad user input, and surface at startup.
#[derive(Error, Debug)]
pub enum SchemaError {
  #[error("Duplicate parameter name in schema: {0}")]
  DuplicateParameter(&'static str),

  #[error("Unknown parameter: {0}")]
  UnknownParameter(String),

  #[error("Parameter '{name}' expects a numeric value, got '{value}'")]
  TypeMismatch { name: String, value: String },
}

/// Errors from the schema-derived command-line parser (src/cli.rs).
#[derive(Error, Debug)]
pub enum CliError {
  #[error(transparent)]
  Parse(#[from] clap::Error),

  #[error("Invalid numeric value '{value}' for --{name}")]
  InvalidNumber { name: String, value: String },
}

/// Errors from driver-file loading (src/driver.rs).
#[derive(Error, Debug)]
pub enum DriverError {
  #[error("Failed to read driver file: {path}")]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Failed to parse driver file YAML")]
  Parse(#[from] serde_yaml::Error),

  #[error("Driver file root must be a key/value mapping")]
  NotAMapping,

  #[error("binary_pairs must be a sequence")]
  BinaryPairsNotASequence,

  #[error("No {field} defined for binary pair {pair}")]
  MissingField { field: &'static str, pair: usize },

  #[error(transparent)]
  Schema(#[from] SchemaError),
}

/// Errors from settings resolution and post-merge validation
/// (src/settings.rs, src/utility.rs, src/validate.rs).
#[derive(Error, Debug)]
pub enum ResolveError {
  #[error("Binary filename redundantly defined (given both positionally and by name)")]
  RedundantBinaryDefinition,

  #[error("Please specify either none or two binaries, got {0}")]
  InvalidBinaryArgumentCount(usize),

  #[error("Binary '{0}' is not a file or cannot be found")]
  BinaryNotFound(String),

  #[error("Unable to read info file '{path}'")]
  InfoFileNotFound {
    path: String,
    #[source]
    source: std::io::Error,
  },

  #[error("Unable to find the {0} utility")]
  UtilityNotFound(&'static str),
}
