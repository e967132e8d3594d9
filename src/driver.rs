use crate::error::DriverError;
use crate::schema::Schema;
use crate::settings::Settings;
use crate::value::ParamValue;
use serde::Deserialize;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// One batch comparison job expanded from a driver-file `binary_pairs`
/// entry. A non-empty collection of these drives a mass report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BinaryPair {
  pub short_name: String,
  pub old_binary: String,
  pub new_binary: String,
}

/// Reads a YAML driver file and applies it to the settings instance.
///
/// Every top-level key matching a schema parameter overwrites the
/// corresponding settings value unconditionally; the caller is
/// responsible for layering command-line values on top afterwards. A
/// `binary_pairs` sequence is expanded into [`BinaryPair`] jobs, each
/// validated in document order (pair indices are 1-based in error
/// messages).
pub fn apply_driver_file(
  settings: &mut Settings,
  schema: &Schema,
  path: &Path,
) -> Result<(), DriverError> {
  let content = fs::read_to_string(path).map_err(|source| DriverError::Read {
    path: path.to_path_buf(),
    source,
  })?;

  let document: serde_yaml::Value = serde_yaml::from_str(&content)?;
  if !document.is_mapping() {
    return Err(DriverError::NotAMapping);
  }

  for parameter in schema.iter() {
    if let Some(value) = document.get(parameter.name) {
      settings.set(parameter.name, param_value_from_yaml(value))?;
    }
  }

  if let Some(pairs) = document.get("binary_pairs") {
    let sequence = pairs.as_sequence().ok_or(DriverError::BinaryPairsNotASequence)?;

    for (index, entry) in sequence.iter().enumerate() {
      let pair = index + 1;

      let short_name = required_field(entry, "short_name", pair)?;
      let old_binary = required_field(entry, "old_binary", pair)?;
      let new_binary = required_field(entry, "new_binary", pair)?;

      settings.mass_report_members.push(BinaryPair {
        short_name,
        old_binary,
        new_binary,
      });
    }
  }

  Ok(())
}

fn required_field(
  entry: &serde_yaml::Value,
  field: &'static str,
  pair: usize,
) -> Result<String, DriverError> {
  entry
    .get(field)
    .and_then(serde_yaml::Value::as_str)
    .map(str::to_string)
    .filter(|value| !value.is_empty())
    .ok_or(DriverError::MissingField { field, pair })
}

fn param_value_from_yaml(value: &serde_yaml::Value) -> ParamValue {
  match value {
    serde_yaml::Value::Null => ParamValue::None,
    serde_yaml::Value::Bool(b) => ParamValue::Bool(*b),
    serde_yaml::Value::Number(n) => ParamValue::Number(n.as_f64().unwrap_or_default()),
    serde_yaml::Value::String(s) => ParamValue::Str(s.clone()),
    serde_yaml::Value::Sequence(items) => {
      ParamValue::List(items.iter().map(scalar_to_string).collect())
    }
    // Nested mappings have no scalar parameter counterpart.
    _ => ParamValue::None,
  }
}

fn scalar_to_string(value: &serde_yaml::Value) -> String {
  match value {
    serde_yaml::Value::String(s) => s.clone(),
    serde_yaml::Value::Bool(b) => b.to_string(),
    serde_yaml::Value::Number(n) => n.to_string(),
    _ => String::new(),
  }
}

#[cfg(test)]
mod tests {
  use super::apply_driver_file;
  use crate::error::DriverError;
  use crate::schema::Schema;
  use crate::settings::Settings;
  use std::io::Write;
  use tempfile::NamedTempFile;

  fn load(yaml: &str) -> Result<Settings, DriverError> {
    let schema = Schema::build().unwrap();
    let mut settings = Settings::from_defaults(&schema).unwrap();
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(yaml.as_bytes()).unwrap();
    apply_driver_file(&mut settings, &schema, file.path())?;
    Ok(settings)
  }

  #[test]
  fn known_keys_override_defaults() {
    let settings = load(
      "project_title: \"Firmware v2\"\nsimilarity_threshold: 0.8\nskip_details: true\n",
    )
    .unwrap();
    assert_eq!(settings.project_title.as_deref(), Some("Firmware v2"));
    assert_eq!(settings.similarity_threshold, 0.8);
    assert!(settings.skip_details);
    // Untouched keys keep their defaults.
    assert_eq!(settings.language.as_deref(), Some("c++"));
  }

  #[test]
  fn unknown_keys_are_ignored() {
    let settings = load("no_such_parameter: 42\n").unwrap();
    assert_eq!(settings.similarity_threshold, 0.5);
  }

  #[test]
  fn binary_pairs_expand_in_document_order() {
    let settings = load(
      "binary_pairs:\n\
       - short_name: \"p1\"\n\
       \x20 old_binary: \"a1.elf\"\n\
       \x20 new_binary: \"b1.elf\"\n\
       - short_name: \"p2\"\n\
       \x20 old_binary: \"a2.elf\"\n\
       \x20 new_binary: \"b2.elf\"\n",
    )
    .unwrap();
    assert_eq!(settings.mass_report_members.len(), 2);
    assert_eq!(settings.mass_report_members[0].short_name, "p1");
    assert_eq!(settings.mass_report_members[1].new_binary, "b2.elf");
  }

  #[test]
  fn missing_pair_field_reports_one_based_index() {
    let result = load(
      "binary_pairs:\n\
       - short_name: \"p1\"\n\
       \x20 old_binary: \"a1.elf\"\n",
    );
    match result {
      Err(DriverError::MissingField { field, pair }) => {
        assert_eq!(field, "new_binary");
        assert_eq!(pair, 1);
      }
      other => panic!("expected missing field error, got {other:?}"),
    }
  }

  #[test]
  fn second_pair_index_is_reported() {
    let result = load(
      "binary_pairs:\n\
       - short_name: \"p1\"\n\
       \x20 old_binary: \"a1.elf\"\n\
       \x20 new_binary: \"b1.elf\"\n\
       - old_binary: \"a2.elf\"\n\
       \x20 new_binary: \"b2.elf\"\n",
    );
    match result {
      Err(DriverError::MissingField { field, pair }) => {
        assert_eq!(field, "short_name");
        assert_eq!(pair, 2);
      }
      other => panic!("expected missing field error, got {other:?}"),
    }
  }

  #[test]
  fn malformed_yaml_is_a_parse_error() {
    let result = load("language: \"unterminated\nbad: [");
    assert!(matches!(result, Err(DriverError::Parse(_))));
  }

  #[test]
  fn missing_file_is_a_read_error() {
    let schema = Schema::build().unwrap();
    let mut settings = Settings::from_defaults(&schema).unwrap();
    let result = apply_driver_file(
      &mut settings,
      &schema,
      std::path::Path::new("/no/such/driver.yml"),
    );
    assert!(matches!(result, Err(DriverError::Read { .. })));
  }

  #[test]
  fn scalar_root_is_rejected() {
    let result = load("just a string\n");
    assert!(matches!(result, Err(DriverError::NotAMapping)));
  }
}
