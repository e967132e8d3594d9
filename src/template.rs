use crate::error::ElfreportError;
use crate::schema::Schema;
use crate::settings::Settings;
use crate::value::ParamValue;
use chrono::Local;
use std::fs::File;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;

/// Writes a driver-file-shaped template listing every schema parameter.
///
/// Each parameter is emitted as its description comment followed by a
/// `name: value` line, in schema order, preceded by a generation header.
/// With `output_actual_values` the live settings value is written
/// (falling back to the schema default when it is unset), otherwise the
/// default is written unconditionally. The output is valid YAML and can
/// be fed back in as a driver file.
pub fn write_parameter_template_file(
  path: &Path,
  schema: &Schema,
  settings: &Settings,
  output_actual_values: bool,
) -> Result<(), ElfreportError> {
  let file = File::create(path)?;
  let mut writer = BufWriter::new(file);

  writeln!(writer, "# This is an auto generated elfreport driver file")?;
  writeln!(
    writer,
    "# Generated by elfreport {}",
    Local::now().format("%Y-%m-%d %H:%M:%S")
  )?;
  writeln!(writer)?;

  for parameter in schema.iter() {
    let value = if output_actual_values {
      let live = settings.get(parameter.name)?;
      if live.is_unset() { parameter.default.clone() } else { live }
    } else {
      parameter.default.clone()
    };

    writeln!(writer, "# {}", parameter.description)?;
    writeln!(writer, "#")?;
    writeln!(writer, "{}: {}", parameter.name, yaml_scalar(&value))?;
    writeln!(writer)?;
  }

  writer.flush()?;
  Ok(())
}

/// Renders a value so that reloading the template through the driver
/// file loader yields the value back: strings quoted, booleans and
/// numbers bare, unset parameters as YAML null.
fn yaml_scalar(value: &ParamValue) -> String {
  match value {
    ParamValue::None => "null".to_string(),
    ParamValue::Bool(b) => b.to_string(),
    ParamValue::Number(n) => n.to_string(),
    ParamValue::Str(s) => quote(s),
    ParamValue::List(items) => {
      if items.is_empty() {
        "null".to_string()
      } else {
        let quoted: Vec<String> = items.iter().map(|item| quote(item)).collect();
        format!("[{}]", quoted.join(", "))
      }
    }
  }
}

fn quote(value: &str) -> String {
  format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}
