use crate::error::ResolveError;
use crate::settings::Settings;
use crate::utility;
use std::fs;
use std::path::Path;

/// Post-merge validation and derived-value computation.
///
/// Checks that configured binaries exist, resolves the external
/// utilities, slurps the info files into the settings instance and fills
/// in fallback aliases. After this returns the settings are final.
pub fn validate_and_finish(settings: &mut Settings) -> Result<(), ResolveError> {
  validate_binaries(settings)?;

  utility::resolve_utilities(settings)?;

  tracing::info!(
    objdump = settings.objdump_command.as_deref(),
    nm = settings.nm_command.as_deref(),
    readelf = settings.readelf_command.as_deref(),
    size = settings.size_command.as_deref(),
    "Resolved binutils"
  );

  load_info_files(settings)?;
  apply_alias_defaults(settings);

  Ok(())
}

fn validate_binaries(settings: &Settings) -> Result<(), ResolveError> {
  for filename in [&settings.old_binary_filename, &settings.new_binary_filename] {
    if let Some(path) = filename {
      if !Path::new(path).is_file() {
        return Err(ResolveError::BinaryNotFound(path.clone()));
      }
    }
  }
  Ok(())
}

fn load_info_files(settings: &mut Settings) -> Result<(), ResolveError> {
  settings.old_binary_info = read_info_file(settings.old_info_file.as_deref())?;
  settings.new_binary_info = read_info_file(settings.new_info_file.as_deref())?;
  Ok(())
}

fn read_info_file(path: Option<&str>) -> Result<String, ResolveError> {
  match path {
    Some(path) => fs::read_to_string(path).map_err(|source| ResolveError::InfoFileNotFound {
      path: path.to_string(),
      source,
    }),
    None => Ok(String::new()),
  }
}

/// Unset aliases default to the resolved binary filenames. Either may
/// stay unset for a mass-report-only run with no top-level binaries.
fn apply_alias_defaults(settings: &mut Settings) {
  if settings.old_alias.is_none() {
    settings.old_alias = settings.old_binary_filename.clone();
  }
  if settings.new_alias.is_none() {
    settings.new_alias = settings.new_binary_filename.clone();
  }
}
