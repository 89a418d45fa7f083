use std::path::{Path, PathBuf};

use crate::checks::{ActiveRuleSet, CheckRegistry, CheckSelection, Importance, configure_checks};
use crate::core::config::InspectorConfig;
use crate::core::error::{ExitCode, InspectorResult};
use crate::engine::{Message, MessageField, inspect_all_with, organize, session_paths};
use crate::model::{JsonSessionReader, SessionReader};
use crate::report::{format_organized_results, print_to_console, save_json, save_report};
use crate::ui::progress::SessionProgress;

/// Options of an inspection run, as given on the command line
#[derive(Debug, Clone, Default)]
pub struct InspectOptions {
  pub path: PathBuf,
  pub select: Vec<String>,
  pub ignore: Vec<String>,
  pub threshold: Option<String>,
  pub config_path: Option<PathBuf>,
  pub n_jobs: i32,
  pub levels: Vec<String>,
  pub reverse: Option<Vec<bool>>,
  pub report_file_path: Option<PathBuf>,
  pub json_file_path: Option<PathBuf>,
  pub overwrite: bool,
  pub no_color: bool,
}

/// Override file: the explicit path, else one found next to the inspected path
fn load_config(options: &InspectOptions) -> InspectorResult<Option<InspectorConfig>> {
  if let Some(path) = &options.config_path {
    return Ok(Some(InspectorConfig::load(path)?));
  }

  let dir = if options.path.is_dir() {
    options.path.as_path()
  } else {
    options
      .path
      .parent()
      .filter(|parent| !parent.as_os_str().is_empty())
      .unwrap_or(Path::new("."))
  };
  InspectorConfig::find_config_path(dir)
    .map(|path| InspectorConfig::load(&path))
    .transpose()
}

/// Resolve the active checks for this run
pub fn active_checks(options: &InspectOptions) -> InspectorResult<ActiveRuleSet> {
  let registry = CheckRegistry::with_builtin_checks()?;

  let mut selection = CheckSelection::new().select(options.select.clone()).ignore(options.ignore.clone());
  if let Some(threshold) = &options.threshold {
    selection = selection.threshold(Importance::parse_threshold(threshold)?);
  }
  if let Some(config) = load_config(options)? {
    selection = selection.with_overrides(config.overrides()?);
  }

  configure_checks(registry.list_all(), &selection)
}

/// Importance and severity read best with the worst first
fn default_reverse(levels: &[String]) -> Vec<bool> {
  levels
    .iter()
    .map(|level| {
      matches!(
        level.parse::<MessageField>(),
        Ok(MessageField::Importance | MessageField::Severity)
      )
    })
    .collect()
}

/// Run the inspect command
pub fn run_inspect(options: InspectOptions) -> InspectorResult<()> {
  let rules = active_checks(&options)?;
  let reader = JsonSessionReader;

  let files = session_paths(&options.path, &reader)?.len();
  let progress = (files > 1).then(|| SessionProgress::new(files, format!("Inspecting {} files", files)));
  if files == 0 {
    println!("No {} files found in {}", reader.extension(), options.path.display());
  }

  let messages = inspect_all_with(&options.path, &reader, &rules, options.n_jobs, |_| {
    if let Some(progress) = &progress {
      progress.inc();
    }
  })?;

  report(&options, &messages)?;

  let failing = messages
    .iter()
    .any(|m| matches!(m.importance(), Importance::Critical | Importance::Error));
  if failing {
    std::process::exit(ExitCode::Issues.as_i32());
  }
  Ok(())
}

fn report(options: &InspectOptions, messages: &[Message]) -> InspectorResult<()> {
  if let Some(path) = &options.json_file_path {
    save_json(path, messages, options.overwrite)?;
    println!("Wrote {} messages to {}", messages.len(), path.display());
  }

  let reverse = options.reverse.clone().unwrap_or_else(|| default_reverse(&options.levels));
  let organized = organize(messages, &options.levels, Some(reverse.as_slice()))?;
  let lines = format_organized_results(&organized);

  if let Some(path) = &options.report_file_path {
    save_report(path, &lines, options.overwrite)?;
  }
  print_to_console(&lines, options.no_color);
  Ok(())
}
