use crate::error::CliError;
use crate::schema::Parameter;
use crate::schema::Schema;
use crate::value::ParamValue;
use clap::Arg;
use clap::ArgAction;
use clap::Command;
use clap::error::ErrorKind;
use std::collections::HashMap;

/// Raw command-line parse result: one value per parameter that was
/// actually given (flags always report their boolean), plus the trailing
/// positional binaries. No merging or validation happens here.
#[derive(Debug, Default)]
pub struct CommandLine {
  pub values: HashMap<String, ParamValue>,
  pub binaries: Vec<String>,
}

impl CommandLine {
  /// Parses the process arguments. Help and version requests print and
  /// exit here, like a derive-based clap parser would.
  pub fn parse(schema: &Schema) -> Result<Self, CliError> {
    match Self::parse_from(schema, std::env::args()) {
      Err(CliError::Parse(err))
        if err.kind() == ErrorKind::DisplayHelp || err.kind() == ErrorKind::DisplayVersion =>
      {
        err.exit()
      }
      other => other,
    }
  }

  /// Parses an explicit argument vector (first element is the program
  /// name). Only arguments before a literal `--` token are considered;
  /// everything after it is reserved for pass-through to downstream
  /// tools.
  pub fn parse_from<I>(schema: &Schema, argv: I) -> Result<Self, CliError>
  where
    I: IntoIterator<Item = String>,
  {
    let mut args = argv.into_iter();
    let mut actual: Vec<String> = Vec::new();
    if let Some(program) = args.next() {
      actual.push(program);
    }
    for arg in args {
      if arg == "--" {
        break;
      }
      actual.push(arg);
    }

    let matches = build_command(schema).try_get_matches_from(actual)?;

    let mut values = HashMap::new();
    for parameter in schema.iter() {
      if parameter.no_cmd_line {
        continue;
      }
      if parameter.is_flag {
        values.insert(
          parameter.name.to_string(),
          ParamValue::Bool(matches.get_flag(parameter.name)),
        );
      } else if parameter.repeatable {
        if let Some(items) = matches.get_many::<String>(parameter.name) {
          values.insert(
            parameter.name.to_string(),
            ParamValue::List(items.cloned().collect()),
          );
        }
      } else if let Some(raw) = matches.get_one::<String>(parameter.name) {
        values.insert(parameter.name.to_string(), typed_value(parameter, raw)?);
      }
    }

    let binaries = matches
      .get_many::<String>("binaries")
      .map(|items| items.cloned().collect())
      .unwrap_or_default();

    Ok(CommandLine { values, binaries })
  }
}

/// Derives the clap surface from the schema: one long option per
/// non-excluded parameter (named after the alias when one exists, with
/// any deprecated alias accepted as a hidden synonym), grouped into help
/// headings, plus the trailing positional binaries.
fn build_command(schema: &Schema) -> Command {
  let mut command = Command::new("elfreport")
    .version(env!("CARGO_PKG_VERSION"))
    .about("Compares elf binaries and lists differences in symbol sizes, the disassemblies, etc.");

  for group in schema.groups() {
    for parameter in &group.parameters {
      if parameter.no_cmd_line {
        continue;
      }

      let long = parameter.alias.unwrap_or(parameter.name);
      let help = match parameter.deprecated_alias {
        Some(deprecated) => {
          format!("{} (deprecated alias: --{deprecated})", parameter.description)
        }
        None => parameter.description.to_string(),
      };
      let mut arg = Arg::new(parameter.name)
        .long(long)
        .help(help)
        .help_heading(group.name);

      arg = if parameter.is_flag {
        arg.action(ArgAction::SetTrue)
      } else if parameter.repeatable {
        arg.action(ArgAction::Append).value_name("VALUE")
      } else {
        arg.action(ArgAction::Set).value_name("VALUE")
      };

      if let Some(deprecated) = parameter.deprecated_alias {
        arg = arg.alias(deprecated);
      }

      command = command.arg(arg);
    }
  }

  // The positional count is validated by the resolver so that the 0-or-2
  // rule reports through the settings error taxonomy.
  command.arg(
    Arg::new("binaries")
      .num_args(0..)
      .value_name("BINARY")
      .help("The binaries to be compared (this is an alternative to --old_binary_filename and --new_binary_filename)"),
  )
}

fn typed_value(parameter: &Parameter, raw: &str) -> Result<ParamValue, CliError> {
  match parameter.default {
    ParamValue::Number(_) => raw
      .parse::<f64>()
      .map(ParamValue::Number)
      .map_err(|_| CliError::InvalidNumber {
        name: parameter.name.to_string(),
        value: raw.to_string(),
      }),
    _ => Ok(ParamValue::Str(raw.to_string())),
  }
}
