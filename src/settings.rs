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
use crate::cli::CommandLine;
use crate::driver;
use crate::driver::BinaryPair;
use crate::error::ElfreportError;
use crate::error::ResolveError;
use crate::error::SchemaError;
use crate::schema::Schema;
use crate::value::ParamValue;
use std::path::Path;

/// Fully typed settings record, one field per schema parameter plus the
/// derived fields computed after the merge.
///
/// An instance is seeded entirely from schema defaults, then mutated
/// through the resolution pipeline (driver file, command line, utility
/// discovery, post-merge validation) and held read-only afterwards.
#[derive(Debug, Default)]
pub struct Settings {
  pub old_binary_filename: Option<String>,
  pub new_binary_filename: Option<String>,
  pub language: Option<String>,
  pub source_prefix: Option<String>,
  pub old_source_prefix: Option<String>,
  pub new_source_prefix: Option<String>,

  pub project_title: Option<String>,
  pub old_alias: Option<String>,
  pub new_alias: Option<String>,
  pub old_info_file: Option<String>,
  pub new_info_file: Option<String>,
  pub build_info: String,
  pub similarity_threshold: f64,
  pub skip_symbol_similarities: bool,
  pub consider_equal_sized_identical: bool,
  pub skip_details: bool,
  pub html_template_dir: Option<String>,

  pub bin_dir: Option<String>,
  pub bin_prefix: String,
  pub objdump_command: Option<String>,
  pub nm_command: Option<String>,
  pub readelf_command: Option<String>,
  pub size_command: Option<String>,

  pub old_mangling_file: Option<String>,
  pub new_mangling_file: Option<String>,

  pub html_file: Option<String>,
  pub html_dir: Option<String>,
  pub pdf_file: Option<String>,
  pub yaml_file: Option<String>,
  pub json_file: Option<String>,
  pub txt_file: Option<String>,
  pub xml_file: Option<String>,
  pub dump_document_structure: bool,
  pub mass_report: bool,

  pub symbol_selection_regex: Option<String>,
  pub symbol_selection_regex_old: Option<String>,
  pub symbol_selection_regex_new: Option<String>,
  pub symbol_exclusion_regex: Option<String>,
  pub symbol_exclusion_regex_old: Option<String>,
  pub symbol_exclusion_regex_new: Option<String>,

  /// Raw plugin directive strings, passed through untouched to the
  /// plugin subsystem.
  pub load_plugin: Vec<String>,
  pub load_default_plugin: Vec<String>,
  pub list_default_plugins: bool,

  pub driver_file: Option<String>,
  pub driver_template_file: Option<String>,

  pub debug: bool,

  /// Contents of `old_info_file`/`new_info_file`, empty when unset.
  pub old_binary_info: String,
  pub new_binary_info: String,

  /// Batch comparison jobs expanded from the driver file, in document
  /// order. A non-empty list signals that a mass report is intended.
  pub mass_report_members: Vec<BinaryPair>,
}

impl Settings {
  /// Seeds a settings instance with every schema default.
  pub fn from_defaults(schema: &Schema) -> Result<Self, SchemaError> {
    let mut settings = Settings::default();
    for parameter in schema.iter() {
      settings.set(parameter.name, parameter.default.clone())?;
    }
    Ok(settings)
  }

  /// Runs the three-source merge: schema defaults, then driver-file
  /// overrides (the driver file itself is named on the command line),
  /// then command-line values.
  pub fn resolve(schema: &Schema, cmdline: &CommandLine) -> Result<Self, ElfreportError> {
    let mut settings = Settings::from_defaults(schema)?;

    if let Some(ParamValue::Str(path)) = cmdline.values.get("driver_file") {
      settings.driver_file = Some(path.clone());
      driver::apply_driver_file(&mut settings, schema, Path::new(path))?;
    }

    settings.apply_command_line(schema, cmdline)?;

    Ok(settings)
  }

  /// Layers parsed command-line values on top of the current state.
  ///
  /// A command-line value is only applied when it differs from the
  /// parameter's schema default. A value explicitly passed but equal to
  /// the default is indistinguishable from an absent flag and never
  /// overrides a driver-file value. Longstanding behavior, kept as is.
  fn apply_command_line(
    &mut self,
    schema: &Schema,
    cmdline: &CommandLine,
  ) -> Result<(), ElfreportError> {
    for parameter in schema.iter() {
      if parameter.no_cmd_line {
        continue;
      }
      if let Some(value) = cmdline.values.get(parameter.name) {
        if *value != parameter.default {
          self.set(parameter.name, value.clone()).map_err(ElfreportError::from)?;
        }
      }
    }

    match cmdline.binaries.len() {
      0 => {}
      2 => {
        if self.old_binary_filename.is_some() {
          return Err(ResolveError::RedundantBinaryDefinition.into());
        }
        self.old_binary_filename = Some(cmdline.binaries[0].clone());

        if self.new_binary_filename.is_some() {
          return Err(ResolveError::RedundantBinaryDefinition.into());
        }
        self.new_binary_filename = Some(cmdline.binaries[1].clone());
      }
      count => return Err(ResolveError::InvalidBinaryArgumentCount(count).into()),
    }

    Ok(())
  }

  /// True when at least one comparison binary is configured; downstream
  /// uses this to decide between single and mass-report mode.
  pub fn is_binary_defined(&self) -> bool {
    self.old_binary_filename.is_some() || self.new_binary_filename.is_some()
  }

  /// Typed setter dispatch keyed by parameter name. This is the only
  /// place where the name-keyed world of the schema, the driver file and
  /// the command line meets the typed record.
  pub fn set(&mut self, name: &str, value: ParamValue) -> Result<(), SchemaError> {
    match name {
      "old_binary_filename" => self.old_binary_filename = value.into_string(),
      "new_binary_filename" => self.new_binary_filename = value.into_string(),
      "language" => self.language = value.into_string(),
      "source_prefix" => self.source_prefix = value.into_string(),
      "old_source_prefix" => self.old_source_prefix = value.into_string(),
      "new_source_prefix" => self.new_source_prefix = value.into_string(),
      "project_title" => self.project_title = value.into_string(),
      "old_alias" => self.old_alias = value.into_string(),
      "new_alias" => self.new_alias = value.into_string(),
      "old_info_file" => self.old_info_file = value.into_string(),
      "new_info_file" => self.new_info_file = value.into_string(),
      "build_info" => self.build_info = value.into_string().unwrap_or_default(),
      "similarity_threshold" => self.similarity_threshold = number(name, value)?,
      "skip_symbol_similarities" => self.skip_symbol_similarities = value.truthy(),
      "consider_equal_sized_identical" => self.consider_equal_sized_identical = value.truthy(),
      "skip_details" => self.skip_details = value.truthy(),
      "html_template_dir" => self.html_template_dir = value.into_string(),
      "bin_dir" => self.bin_dir = value.into_string(),
      "bin_prefix" => self.bin_prefix = value.into_string().unwrap_or_default(),
      "objdump_command" => self.objdump_command = value.into_string(),
      "nm_command" => self.nm_command = value.into_string(),
      "readelf_command" => self.readelf_command = value.into_string(),
      "size_command" => self.size_command = value.into_string(),
      "old_mangling_file" => self.old_mangling_file = value.into_string(),
      "new_mangling_file" => self.new_mangling_file = value.into_string(),
      "html_file" => self.html_file = value.into_string(),
      "html_dir" => self.html_dir = value.into_string(),
      "pdf_file" => self.pdf_file = value.into_string(),
      "yaml_file" => self.yaml_file = value.into_string(),
      "json_file" => self.json_file = value.into_string(),
      "txt_file" => self.txt_file = value.into_string(),
      "xml_file" => self.xml_file = value.into_string(),
      "dump_document_structure" => self.dump_document_structure = value.truthy(),
      "mass_report" => self.mass_report = value.truthy(),
      "symbol_selection_regex" => self.symbol_selection_regex = value.into_string(),
      "symbol_selection_regex_old" => self.symbol_selection_regex_old = value.into_string(),
      "symbol_selection_regex_new" => self.symbol_selection_regex_new = value.into_string(),
      "symbol_exclusion_regex" => self.symbol_exclusion_regex = value.into_string(),
      "symbol_exclusion_regex_old" => self.symbol_exclusion_regex_old = value.into_string(),
      "symbol_exclusion_regex_new" => self.symbol_exclusion_regex_new = value.into_string(),
      "load_plugin" => self.load_plugin = value.into_list(),
      "load_default_plugin" => self.load_default_plugin = value.into_list(),
      "list_default_plugins" => self.list_default_plugins = value.truthy(),
      "driver_file" => self.driver_file = value.into_string(),
      "driver_template_file" => self.driver_template_file = value.into_string(),
      "debug" => self.debug = value.truthy(),
      _ => return Err(SchemaError::UnknownParameter(name.to_string())),
    }
    Ok(())
  }

  /// Typed getter dispatch, the counterpart of [`Settings::set`].
  pub fn get(&self, name: &str) -> Result<ParamValue, SchemaError> {
    let value = match name {
      "old_binary_filename" => opt_str(&self.old_binary_filename),
      "new_binary_filename" => opt_str(&self.new_binary_filename),
      "language" => opt_str(&self.language),
      "source_prefix" => opt_str(&self.source_prefix),
      "old_source_prefix" => opt_str(&self.old_source_prefix),
      "new_source_prefix" => opt_str(&self.new_source_prefix),
      "project_title" => opt_str(&self.project_title),
      "old_alias" => opt_str(&self.old_alias),
      "new_alias" => opt_str(&self.new_alias),
      "old_info_file" => opt_str(&self.old_info_file),
      "new_info_file" => opt_str(&self.new_info_file),
      "build_info" => ParamValue::Str(self.build_info.clone()),
      "similarity_threshold" => ParamValue::Number(self.similarity_threshold),
      "skip_symbol_similarities" => ParamValue::Bool(self.skip_symbol_similarities),
      "consider_equal_sized_identical" => ParamValue::Bool(self.consider_equal_sized_identical),
      "skip_details" => ParamValue::Bool(self.skip_details),
      "html_template_dir" => opt_str(&self.html_template_dir),
      "bin_dir" => opt_str(&self.bin_dir),
      "bin_prefix" => ParamValue::Str(self.bin_prefix.clone()),
      "objdump_command" => opt_str(&self.objdump_command),
      "nm_command" => opt_str(&self.nm_command),
      "readelf_command" => opt_str(&self.readelf_command),
      "size_command" => opt_str(&self.size_command),
      "old_mangling_file" => opt_str(&self.old_mangling_file),
      "new_mangling_file" => opt_str(&self.new_mangling_file),
      "html_file" => opt_str(&self.html_file),
      "html_dir" => opt_str(&self.html_dir),
      "pdf_file" => opt_str(&self.pdf_file),
      "yaml_file" => opt_str(&self.yaml_file),
      "json_file" => opt_str(&self.json_file),
      "txt_file" => opt_str(&self.txt_file),
      "xml_file" => opt_str(&self.xml_file),
      "dump_document_structure" => ParamValue::Bool(self.dump_document_structure),
      "mass_report" => ParamValue::Bool(self.mass_report),
      "symbol_selection_regex" => opt_str(&self.symbol_selection_regex),
      "symbol_selection_regex_old" => opt_str(&self.symbol_selection_regex_old),
      "symbol_selection_regex_new" => opt_str(&self.symbol_selection_regex_new),
      "symbol_exclusion_regex" => opt_str(&self.symbol_exclusion_regex),
      "symbol_exclusion_regex_old" => opt_str(&self.symbol_exclusion_regex_old),
      "symbol_exclusion_regex_new" => opt_str(&self.symbol_exclusion_regex_new),
      "load_plugin" => ParamValue::List(self.load_plugin.clone()),
      "load_default_plugin" => ParamValue::List(self.load_default_plugin.clone()),
      "list_default_plugins" => ParamValue::Bool(self.list_default_plugins),
      "driver_file" => opt_str(&self.driver_file),
      "driver_template_file" => opt_str(&self.driver_template_file),
      "debug" => ParamValue::Bool(self.debug),
      _ => return Err(SchemaError::UnknownParameter(name.to_string())),
    };
    Ok(value)
  }
}

fn opt_str(field: &Option<String>) -> ParamValue {
  match field {
    Some(s) => ParamValue::Str(s.clone()),
    None => ParamValue::None,
  }
}

fn number(name: &str, value: ParamValue) -> Result<f64, SchemaError> {
  value.to_f64().ok_or_else(|| SchemaError::TypeMismatch {
    name: name.to_string(),
    value: value.to_string(),
  })
}

#[cfg(test)]
mod tests {
  use super::Settings;
  use crate::cli::CommandLine;
  use crate::error::ElfreportError;
  use crate::error::ResolveError;
  use crate::schema::Schema;
  use crate::value::ParamValue;
  use std::io::Write;
  use tempfile::NamedTempFile;

  fn parse(args: &[&str]) -> CommandLine {
    let schema = Schema::build().unwrap();
    let argv = std::iter::once("elfreport".to_string()).chain(args.iter().map(|s| s.to_string()));
    CommandLine::parse_from(&schema, argv).unwrap()
  }

  fn resolve(args: &[&str]) -> Result<Settings, ElfreportError> {
    let schema = Schema::build().unwrap();
    Settings::resolve(&schema, &parse(args))
  }

  #[test]
  fn untouched_parameters_keep_their_defaults() {
    let settings = resolve(&[]).unwrap();
    assert_eq!(settings.language.as_deref(), Some("c++"));
    assert_eq!(settings.similarity_threshold, 0.5);
    assert_eq!(settings.build_info, "");
    assert!(!settings.mass_report);
    assert!(settings.old_binary_filename.is_none());
    assert!(settings.mass_report_members.is_empty());
  }

  #[test]
  fn named_binaries_resolve() {
    let settings =
      resolve(&["--old_binary_filename", "a.elf", "--new_binary_filename", "b.elf"]).unwrap();
    assert_eq!(settings.old_binary_filename.as_deref(), Some("a.elf"));
    assert_eq!(settings.new_binary_filename.as_deref(), Some("b.elf"));
  }

  #[test]
  fn positional_binaries_resolve_in_order() {
    let settings = resolve(&["a.elf", "b.elf"]).unwrap();
    assert_eq!(settings.old_binary_filename.as_deref(), Some("a.elf"));
    assert_eq!(settings.new_binary_filename.as_deref(), Some("b.elf"));
  }

  #[test]
  fn named_and_positional_binaries_clash() {
    let result = resolve(&["--old_binary_filename", "a.elf", "x.elf", "y.elf"]);
    assert!(matches!(
      result,
      Err(ElfreportError::Resolve(ResolveError::RedundantBinaryDefinition))
    ));
  }

  #[test]
  fn odd_positional_counts_are_rejected() {
    for args in [&["only.elf"][..], &["a.elf", "b.elf", "c.elf"][..]] {
      let result = resolve(args);
      assert!(matches!(
        result,
        Err(ElfreportError::Resolve(ResolveError::InvalidBinaryArgumentCount(_)))
      ));
    }
  }

  #[test]
  fn cli_beats_driver_file_when_it_differs_from_the_default() {
    let mut driver = NamedTempFile::new().unwrap();
    writeln!(driver, "project_title: \"from driver\"").unwrap();
    writeln!(driver, "similarity_threshold: 0.8").unwrap();
    let path = driver.path().to_str().unwrap().to_string();

    let settings = resolve(&[
      "--driver_file",
      &path,
      "--similarity_threshold",
      "0.9",
    ])
    .unwrap();
    assert_eq!(settings.project_title.as_deref(), Some("from driver"));
    assert_eq!(settings.similarity_threshold, 0.9);
  }

  #[test]
  fn cli_value_equal_to_default_never_overrides_the_driver_file() {
    let mut driver = NamedTempFile::new().unwrap();
    writeln!(driver, "similarity_threshold: 0.8").unwrap();
    let path = driver.path().to_str().unwrap().to_string();

    // 0.5 is the schema default, so it is indistinguishable from an
    // absent flag and the driver-file value stands.
    let settings = resolve(&[
      "--driver_file",
      &path,
      "--similarity_threshold",
      "0.5",
    ])
    .unwrap();
    assert_eq!(settings.similarity_threshold, 0.8);
  }

  #[test]
  fn driver_file_binaries_count_as_already_defined() {
    let mut driver = NamedTempFile::new().unwrap();
    writeln!(driver, "old_binary_filename: \"from_driver.elf\"").unwrap();
    let path = driver.path().to_str().unwrap().to_string();

    let result = resolve(&["--driver_file", &path, "a.elf", "b.elf"]);
    assert!(matches!(
      result,
      Err(ElfreportError::Resolve(ResolveError::RedundantBinaryDefinition))
    ));
  }

  #[test]
  fn plugin_directives_accumulate_untouched() {
    let settings = resolve(&[
      "--load_plugin",
      "some/module;Class;k=v",
      "--load_plugin",
      "other;Class2",
    ])
    .unwrap();
    assert_eq!(
      settings.load_plugin,
      vec!["some/module;Class;k=v".to_string(), "other;Class2".to_string()]
    );
  }

  #[test]
  fn dispatch_round_trips_every_schema_parameter() {
    let schema = Schema::build().unwrap();
    let settings = Settings::from_defaults(&schema).unwrap();
    for parameter in schema.iter() {
      let value = settings.get(parameter.name).unwrap();
      // Repeatable parameters store an unset default as the empty list.
      let matches_default =
        value == parameter.default || (value.is_unset() && parameter.default.is_unset());
      assert!(matches_default, "default mismatch for {}", parameter.name);
    }
  }

  #[test]
  fn unknown_parameter_set_is_rejected() {
    let schema = Schema::build().unwrap();
    let mut settings = Settings::from_defaults(&schema).unwrap();
    assert!(settings.set("no_such", ParamValue::Bool(true)).is_err());
  }
}
