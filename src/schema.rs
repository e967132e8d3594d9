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
use crate::error::SchemaError;
use crate::value::ParamValue;
use std::collections::HashSet;

/// Immutable descriptor of one configurable setting.
#[derive(Debug, Clone)]
pub struct Parameter {
  /// Unique key, used as settings field name and driver-file key.
  pub name: &'static str,
  pub description: &'static str,
  pub default: ParamValue,
  /// Alternate flag name used on the command line instead of `name`.
  pub alias: Option<&'static str>,
  /// Old flag name still accepted on the command line, writing to the
  /// same settings key.
  pub deprecated_alias: Option<&'static str>,
  /// Excluded from the command-line surface; settable only via driver
  /// file or code.
  pub no_cmd_line: bool,
  /// Boolean presence switch rather than a value-taking option.
  pub is_flag: bool,
  /// Repeatable option accumulating into a list.
  pub repeatable: bool,
}

impl Parameter {
  pub fn new(name: &'static str, description: &'static str) -> Self {
    Parameter {
      name,
      description,
      default: ParamValue::None,
      alias: None,
      deprecated_alias: None,
      no_cmd_line: false,
      is_flag: false,
      repeatable: false,
    }
  }

  pub fn default_str(mut self, value: &str) -> Self {
    self.default = ParamValue::Str(value.to_string());
    self
  }

  pub fn default_number(mut self, value: f64) -> Self {
    self.default = ParamValue::Number(value);
    self
  }

  pub fn flag(mut self) -> Self {
    self.is_flag = true;
    self.default = ParamValue::Bool(false);
    self
  }

  pub fn alias(mut self, alias: &'static str) -> Self {
    self.alias = Some(alias);
    self
  }

  pub fn deprecated_alias(mut self, alias: &'static str) -> Self {
    self.deprecated_alias = Some(alias);
    self
  }

  pub fn no_cmd_line(mut self) -> Self {
    self.no_cmd_line = true;
    self
  }

  pub fn repeatable(mut self) -> Self {
    self.repeatable = true;
    self
  }
}

/// Presentation-only grouping of parameters. Grouping affects help output
/// and template ordering, never resolution.
#[derive(Debug)]
pub struct ParameterGroup {
  pub name: &'static str,
  pub parameters: Vec<Parameter>,
}

/// Ordered, immutable registry of all parameters.
#[derive(Debug)]
pub struct Schema {
  groups: Vec<ParameterGroup>,
}

impl Schema {
  /// Builds the full parameter registry. Fails if two descriptors share a
  /// name, which is a programming mistake caught at startup.
  pub fn build() -> Result<Self, SchemaError> {
    Self::from_groups(default_groups())
  }

  pub fn from_groups(groups: Vec<ParameterGroup>) -> Result<Self, SchemaError> {
    let mut seen: HashSet<&'static str> = HashSet::new();
    for group in &groups {
      for parameter in &group.parameters {
        if !seen.insert(parameter.name) {
          return Err(SchemaError::DuplicateParameter(parameter.name));
        }
      }
    }
    Ok(Schema { groups })
  }

  pub fn groups(&self) -> impl Iterator<Item = &ParameterGroup> {
    self.groups.iter()
  }

  /// Flat iteration over all parameters in group order.
  pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
    self.groups.iter().flat_map(|group| group.parameters.iter())
  }

  pub fn lookup(&self, name: &str) -> Result<&Parameter, SchemaError> {
    self
      .iter()
      .find(|parameter| parameter.name == name)
      .ok_or_else(|| SchemaError::UnknownParameter(name.to_string()))
  }

  pub fn contains(&self, name: &str) -> bool {
    self.iter().any(|parameter| parameter.name == name)
  }
}

fn default_groups() -> Vec<ParameterGroup> {
  vec![
    ParameterGroup {
      name: "Binaries",
      parameters: vec![
        Parameter::new("old_binary_filename", "The old version of the elf binary."),
        Parameter::new("new_binary_filename", "The new version of the elf binary."),
        Parameter::new(
          "language",
          "A hint about the language that the elf was compiled from (choices: c++).",
        )
        .default_str("c++"),
        Parameter::new(
          "source_prefix",
          "A path prefix to remove from old and new source files (overridden by [old|new]_source_prefix)",
        ),
        Parameter::new("old_source_prefix", "A path prefix to remove from old source files"),
        Parameter::new("new_source_prefix", "A path prefix to remove from new source files"),
      ],
    },
    ParameterGroup {
      name: "Report Content",
      parameters: vec![
        Parameter::new("project_title", "A project title to use for all reports."),
        Parameter::new(
          "old_alias",
          "An alias string that is supposed to be used to reference the old binary version.",
        ),
        Parameter::new(
          "new_alias",
          "An alias string that is supposed to be used to reference the new binary version.",
        ),
        Parameter::new(
          "old_info_file",
          "A text file that contains information about the old binary version.",
        ),
        Parameter::new(
          "new_info_file",
          "A text file that contains information about the new binary version.",
        ),
        Parameter::new(
          "build_info",
          "A string that contains build information that is to be added to the report.",
        )
        .default_str(""),
        Parameter::new(
          "similarity_threshold",
          "A threshold value between 0 and 1 above which two compared symbols are considered being similar",
        )
        .default_number(0.5),
        Parameter::new(
          "skip_symbol_similarities",
          "If this flag is provided, symbol similarities (which are quite expensive to determine) are skipped",
        )
        .flag(),
        Parameter::new(
          "consider_equal_sized_identical",
          "If this flag is defined, symbols of equal size are considered as identical (and thus ignored in most cases).",
        )
        .flag(),
        Parameter::new(
          "skip_details",
          "If this flag is defined, report details are displayed",
        )
        .flag(),
        Parameter::new(
          "html_template_dir",
          "A directory that contains template html files. Defaults to elfreport's own html directory.",
        )
        .no_cmd_line(),
      ],
    },
    ParameterGroup {
      name: "Binutils",
      parameters: vec![
        Parameter::new("bin_dir", "A place where the binutils live."),
        Parameter::new("bin_prefix", "A prefix that is added to binutils executables.")
          .default_str(""),
        Parameter::new("objdump_command", "Full path to the objdump utility."),
        Parameter::new("nm_command", "Full path to the nm utility."),
        Parameter::new("readelf_command", "Full path to the readelf utility."),
        Parameter::new("size_command", "Full path to the size utility."),
      ],
    },
    ParameterGroup {
      name: "Mangling",
      parameters: vec![
        Parameter::new("old_mangling_file", "Full path to a mangling file for old elf."),
        Parameter::new("new_mangling_file", "Full path to a mangling file for new elf."),
      ],
    },
    ParameterGroup {
      name: "Output",
      parameters: vec![
        Parameter::new("html_file", "The filename of the generated single page HTML report."),
        Parameter::new("html_dir", "The directory of the generated multi page HTML report."),
        Parameter::new("pdf_file", "The filename of the generated PDF report."),
        Parameter::new("yaml_file", "The filename of the generated YAML report."),
        Parameter::new("json_file", "The filename of the generated JSON report."),
        Parameter::new("txt_file", "The filename of the generated text based report."),
        Parameter::new("xml_file", "The filename of the generated XML report."),
        Parameter::new(
          "dump_document_structure",
          "If this flag is provided, the report document structure is written to stdout",
        )
        .flag(),
        Parameter::new(
          "mass_report",
          "Forces a mass report being generated. Otherwise the decision whether to generate a mass report is based on the binary_pairs found in the driver file.",
        )
        .flag(),
      ],
    },
    ParameterGroup {
      name: "Symbol Selection",
      parameters: vec![
        Parameter::new(
          "symbol_selection_regex",
          "A regex that is applied to select symbols to be considered for both, the old and the new elf file",
        ),
        Parameter::new(
          "symbol_selection_regex_old",
          "A regex that is applied to select symbols to be considered for the old elf file",
        ),
        Parameter::new(
          "symbol_selection_regex_new",
          "A regex that is applied to select symbols to be considered for the new elf file",
        ),
        Parameter::new(
          "symbol_exclusion_regex",
          "A regex that is applied to select symbols to be excluded for both, the old and the new elf file",
        ),
        Parameter::new(
          "symbol_exclusion_regex_old",
          "A regex that is applied to select symbols to be excluded for the old elf file",
        ),
        Parameter::new(
          "symbol_exclusion_regex_new",
          "A regex that is applied to select symbols to be excluded for the new elf file",
        ),
      ],
    },
    ParameterGroup {
      name: "Plugins",
      parameters: vec![
        Parameter::new(
          "load_plugin",
          "Loads and parametrizes a plugin. Example: --load_plugin \"some/path/to/module;PluginClass;foo1=bar2;foo2=bar2\"",
        )
        .repeatable(),
        Parameter::new(
          "load_default_plugin",
          "Loads and parametrizes a default plugin. Example --load_default_plugin \"html_export;single_page=False;template_dir=some_directory\"",
        )
        .repeatable(),
        Parameter::new("list_default_plugins", "Writes a list of default plugins to stdout").flag(),
      ],
    },
    ParameterGroup {
      name: "Driver Files",
      parameters: vec![
        Parameter::new(
          "driver_file",
          "A yaml file that contains settings and driver information.",
        ),
        Parameter::new(
          "driver_template_file",
          "A yaml file that is generated at the end of the run. It contains default parameters if no report was generated or, otherwise, the parameters that were read.",
        ),
      ],
    },
    ParameterGroup {
      name: "General",
      parameters: vec![
        Parameter::new(
          "debug",
          "If enabled, elfreport runs in debugging mode and outputs extended information if something goes wrong.",
        )
        .flag(),
      ],
    },
  ]
}
