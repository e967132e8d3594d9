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

//! # Elfreport
//!
//! `elfreport` is the settings resolution front-end of a binary-comparison
//! report generator. It merges built-in defaults, an optional YAML driver
//! file and command-line flags into one validated settings instance,
//! resolves the external binutils executables the comparison depends on,
//! and can serialize the whole parameter set back out as a reusable
//! driver-file template.
//!
//! This crate contains the main library logic for the `elfreport` CLI, but
//! its core modules (`schema`, `settings`, `driver`) could be used
//! independently.
//!
//! ## Core Modules
//!
//! * [`schema`]: The static, grouped registry of parameter descriptors
//!   (name, description, default, flag/value nature, CLI eligibility).
//! * [`cli`]: Derives the `clap`-based command-line surface from the
//!   schema, including the positional-binaries shorthand.
//! * [`driver`]: Loads a YAML driver file, applies schema-matching keys
//!   and expands `binary_pairs` into batch comparison jobs.
//! * [`settings`]: The typed settings record and the three-source merge
//!   (default < driver file < command line).
//! * [`utility`]: Locates the required binutils executables through a
//!   three-tier fallback search.
//! * [`validate`]: Post-merge validation, info-file loading and alias
//!   defaulting.
//! * [`template`]: Serializes the schema/settings pair to a reloadable
//!   driver-file template.
//! * [`error`]: Defines the custom error types for the library.
//! * [`logging`]: Provides the `setup_tracing` utility.

pub mod cli;
pub mod driver;
pub mod error;
pub mod logging;
pub mod schema;
pub mod settings;
pub mod template;
pub mod utility;
pub mod validate;
pub mod value;
