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
use anyhow::Result;
use elfreport::cli::CommandLine;
use elfreport::logging::setup_tracing;
use elfreport::schema::Schema;
use elfreport::settings::Settings;
use elfreport::template::write_parameter_template_file;
use elfreport::validate::validate_and_finish;
use std::path::Path;

fn main() -> Result<()> {
  setup_tracing()?;

  let main_span = tracing::info_span!("settings");
  let _enter = main_span.enter();

  let schema = Schema::build()?;
  let cmdline = CommandLine::parse(&schema)?;

  let mut settings = Settings::resolve(&schema, &cmdline)?;
  validate_and_finish(&mut settings)?;

  if settings.is_binary_defined() {
    tracing::info!(
      old = settings.old_binary_filename.as_deref(),
      new = settings.new_binary_filename.as_deref(),
      "Comparing binaries"
    );
  }
  for member in &settings.mass_report_members {
    tracing::info!(
      short_name = %member.short_name,
      old = %member.old_binary,
      new = %member.new_binary,
      "Mass report member"
    );
  }

  if let Some(template_path) = settings.driver_template_file.clone() {
    write_parameter_template_file(Path::new(&template_path), &schema, &settings, true)?;
    tracing::info!("Driver template written to {template_path}");
  }

  Ok(())
}
