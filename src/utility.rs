use crate::error::ResolveError;
use crate::settings::Settings;
use std::env;
use std::path::Path;
use std::path::PathBuf;

/// The external binutils executables a report run depends on.
const UTILITIES: [&str; 4] = ["objdump", "nm", "readelf", "size"];

/// Resolves the command path of every required utility, writing the
/// result back into the corresponding `*_command` settings field.
///
/// Per utility, three tiers are tried in order: an explicitly configured
/// command path (downgraded to a warning when it is not an executable
/// file), the configured `bin_dir`, and finally the process search path.
pub fn resolve_utilities(settings: &mut Settings) -> Result<(), ResolveError> {
  let bin_dir = settings.bin_dir.clone();
  let bin_prefix = settings.bin_prefix.clone();

  for name in UTILITIES {
    let command = match name {
      "objdump" => &mut settings.objdump_command,
      "nm" => &mut settings.nm_command,
      "readelf" => &mut settings.readelf_command,
      _ => &mut settings.size_command,
    };
    resolve_utility(name, bin_dir.as_deref(), &bin_prefix, command)?;
  }

  Ok(())
}

fn resolve_utility(
  name: &'static str,
  bin_dir: Option<&str>,
  bin_prefix: &str,
  command: &mut Option<String>,
) -> Result<(), ResolveError> {
  if let Some(existing) = command.as_deref() {
    if is_executable_file(Path::new(existing)) {
      return Ok(());
    }
    tracing::warn!("Unable to find predefined {name}_command = {existing}");
  }

  for extension in exe_extensions() {
    let basename = format!("{bin_prefix}{name}{extension}");
    if let Some(dir) = bin_dir {
      let candidate = Path::new(dir).join(&basename);
      if is_executable_file(&candidate) {
        *command = Some(candidate.to_string_lossy().into_owned());
        return Ok(());
      }
    }
  }

  for extension in exe_extensions() {
    let basename = format!("{bin_prefix}{name}{extension}");
    if let Some(found) = search_path(&basename) {
      *command = Some(found.to_string_lossy().into_owned());
      return Ok(());
    }
  }

  Err(ResolveError::UtilityNotFound(name))
}

/// Candidate executable extensions, native extension first per platform.
/// The ordering is deliberate and load-bearing.
fn exe_extensions() -> [&'static str; 2] {
  if cfg!(windows) { [".exe", ""] } else { ["", ".exe"] }
}

fn search_path(basename: &str) -> Option<PathBuf> {
  let path_var = env::var_os("PATH")?;
  for dir in env::split_paths(&path_var) {
    let candidate = dir.join(basename);
    if is_executable_file(&candidate) {
      return Some(candidate);
    }
  }
  None
}

fn is_executable_file(path: &Path) -> bool {
  if !path.is_file() {
    return false;
  }
  #[cfg(unix)]
  {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
      .map(|metadata| metadata.permissions().mode() & 0o111 != 0)
      .unwrap_or(false)
  }
  #[cfg(not(unix))]
  {
    true
  }
}

#[cfg(test)]
mod tests {
  use super::resolve_utilities;
  use crate::error::ResolveError;
  use crate::schema::Schema;
  use crate::settings::Settings;
  use std::path::Path;

  #[cfg(unix)]
  fn fake_executable(dir: &Path, name: &str) -> std::path::PathBuf {
    use std::os::unix::fs::PermissionsExt;
    let path = dir.join(name);
    std::fs::write(&path, "#!/bin/sh\nexit 0\n").unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
  }

  #[cfg(unix)]
  fn settings_with_bin_dir(dir: &Path) -> Settings {
    let schema = Schema::build().unwrap();
    let mut settings = Settings::from_defaults(&schema).unwrap();
    settings.bin_dir = Some(dir.to_string_lossy().into_owned());
    settings
  }

  #[cfg(unix)]
  #[test]
  fn bin_dir_hit_wins_without_consulting_the_search_path() {
    let temp = tempfile::tempdir().unwrap();
    for name in ["objdump", "nm", "readelf", "size"] {
      fake_executable(temp.path(), name);
    }

    let mut settings = settings_with_bin_dir(temp.path());
    resolve_utilities(&mut settings).unwrap();

    let expected = temp.path().join("objdump");
    assert_eq!(
      settings.objdump_command.as_deref(),
      Some(expected.to_str().unwrap())
    );
    assert!(settings.size_command.is_some());
  }

  #[cfg(unix)]
  #[test]
  fn bare_name_is_preferred_over_exe_on_unix() {
    let temp = tempfile::tempdir().unwrap();
    for name in ["objdump", "objdump.exe", "nm", "readelf", "size"] {
      fake_executable(temp.path(), name);
    }

    let mut settings = settings_with_bin_dir(temp.path());
    resolve_utilities(&mut settings).unwrap();

    assert_eq!(
      settings.objdump_command.as_deref(),
      Some(temp.path().join("objdump").to_str().unwrap())
    );
  }

  #[cfg(unix)]
  #[test]
  fn exe_fallback_applies_when_the_bare_name_is_absent() {
    let temp = tempfile::tempdir().unwrap();
    fake_executable(temp.path(), "objdump.exe");
    for name in ["nm", "readelf", "size"] {
      fake_executable(temp.path(), name);
    }

    let mut settings = settings_with_bin_dir(temp.path());
    resolve_utilities(&mut settings).unwrap();

    assert_eq!(
      settings.objdump_command.as_deref(),
      Some(temp.path().join("objdump.exe").to_str().unwrap())
    );
  }

  #[cfg(unix)]
  #[test]
  fn bin_prefix_is_honored() {
    let temp = tempfile::tempdir().unwrap();
    for name in ["arm-objdump", "arm-nm", "arm-readelf", "arm-size"] {
      fake_executable(temp.path(), name);
    }

    let mut settings = settings_with_bin_dir(temp.path());
    settings.bin_prefix = "arm-".to_string();
    resolve_utilities(&mut settings).unwrap();

    assert_eq!(
      settings.nm_command.as_deref(),
      Some(temp.path().join("arm-nm").to_str().unwrap())
    );
  }

  #[cfg(unix)]
  #[test]
  fn invalid_explicit_override_degrades_to_the_bin_dir_search() {
    let temp = tempfile::tempdir().unwrap();
    for name in ["objdump", "nm", "readelf", "size"] {
      fake_executable(temp.path(), name);
    }
    // A regular file without the executable bit fails the override check.
    let bogus = temp.path().join("not_executable");
    std::fs::write(&bogus, "data").unwrap();

    let mut settings = settings_with_bin_dir(temp.path());
    settings.objdump_command = Some(bogus.to_string_lossy().into_owned());
    resolve_utilities(&mut settings).unwrap();

    assert_eq!(
      settings.objdump_command.as_deref(),
      Some(temp.path().join("objdump").to_str().unwrap())
    );
  }

  #[test]
  fn exhausted_tiers_fail_fatally() {
    let temp = tempfile::tempdir().unwrap();
    let schema = Schema::build().unwrap();
    let mut settings = Settings::from_defaults(&schema).unwrap();
    settings.bin_dir = Some(temp.path().to_string_lossy().into_owned());
    settings.bin_prefix = "surely-no-such-prefix-".to_string();

    let result = resolve_utilities(&mut settings);
    assert!(matches!(result, Err(ResolveError::UtilityNotFound("objdump"))));
  }

  #[cfg(unix)]
  #[test]
  fn valid_explicit_override_is_kept_verbatim() {
    let temp = tempfile::tempdir().unwrap();
    let explicit = fake_executable(temp.path(), "my-objdump");
    for name in ["nm", "readelf", "size"] {
      fake_executable(temp.path(), name);
    }

    let mut settings = settings_with_bin_dir(temp.path());
    settings.objdump_command = Some(explicit.to_string_lossy().into_owned());
    resolve_utilities(&mut settings).unwrap();

    assert_eq!(
      settings.objdump_command.as_deref(),
      Some(explicit.to_str().unwrap())
    );
  }
}
