//! Integration tests for importance override files

use crate::helpers::{SessionDir, clean_session, nwb_inspector_output, run_nwb_inspector};
use anyhow::Result;
use nwb_inspector::checks::{CheckRegistry, CheckSelection, Importance, configure_checks};
use nwb_inspector::core::config::InspectorConfig;
use serde_json::json;

/// A session whose only issue is its missing keywords
fn quiet_session(dir: &SessionDir) -> Result<()> {
  let mut session = clean_session();
  session["keywords"] = json!([]);
  dir.write_session("quiet", &session)?;
  Ok(())
}

#[test]
fn test_config_path_relabels_check() -> Result<()> {
  let dir = SessionDir::new()?;
  quiet_session(&dir)?;
  dir.write_file("overrides.toml", "CRITICAL = [\"check_keywords\"]\n")?;

  let output = nwb_inspector_output(&dir.path, &["quiet.nwb.json", "--no-color", "-c", "overrides.toml"])?;
  assert_eq!(output.status.code(), Some(3));
  let text = String::from_utf8_lossy(&output.stdout);
  assert!(text.contains("1.1  CRITICAL"));
  assert!(text.contains("check_keywords: Metadata /general/keywords is missing."));

  Ok(())
}

#[test]
fn test_config_path_skips_check() -> Result<()> {
  let dir = SessionDir::new()?;
  quiet_session(&dir)?;
  dir.write_file("overrides.toml", "SKIP = [\"check_keywords\"]\n")?;

  let output = run_nwb_inspector(&dir.path, &["quiet.nwb.json", "-c", "overrides.toml"])?;
  assert!(String::from_utf8_lossy(&output.stdout).contains("Found 0 issues"));

  Ok(())
}

#[test]
fn test_discovered_config_is_used() -> Result<()> {
  let dir = SessionDir::new()?;
  quiet_session(&dir)?;
  dir.write_file("nwbinspector.toml", "SKIP = [\"check_keywords\"]\n")?;

  let output = run_nwb_inspector(&dir.path, &["quiet.nwb.json"])?;
  assert!(String::from_utf8_lossy(&output.stdout).contains("Found 0 issues"));

  let output = run_nwb_inspector(&dir.path, &["--list-checks"])?;
  let text = String::from_utf8_lossy(&output.stdout);
  assert!(text.contains("17 active checks"));
  assert!(!text.contains("check_keywords"));

  Ok(())
}

#[test]
fn test_unknown_override_key_is_rejected() -> Result<()> {
  let dir = SessionDir::new()?;
  quiet_session(&dir)?;
  dir.write_file("overrides.toml", "FATAL = [\"check_keywords\"]\n")?;

  let output = nwb_inspector_output(&dir.path, &["quiet.nwb.json", "-c", "overrides.toml"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(String::from_utf8_lossy(&output.stderr).contains("Unknown override target 'FATAL'"));

  Ok(())
}

#[test]
fn test_missing_config_path_is_rejected() -> Result<()> {
  let dir = SessionDir::new()?;
  quiet_session(&dir)?;

  let output = nwb_inspector_output(&dir.path, &["quiet.nwb.json", "-c", "missing.toml"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(String::from_utf8_lossy(&output.stderr).contains("Check configuration not found"));

  Ok(())
}

#[test]
fn test_overrides_then_threshold() -> Result<()> {
  let config = InspectorConfig::parse(
    "BEST_PRACTICE_SUGGESTION = [\"check_data_orientation\"]\nCRITICAL = [\"check_keywords\"]\n",
  )?;
  let registry = CheckRegistry::with_builtin_checks()?;
  let selection = CheckSelection::new()
    .with_overrides(config.overrides()?)
    .threshold(Importance::BestPracticeViolation);
  let rules = configure_checks(registry.list_all(), &selection)?;

  let names: Vec<_> = rules.iter().map(|r| r.name()).collect();
  assert!(!names.contains(&"check_data_orientation"));
  assert!(names.contains(&"check_keywords"));
  assert!(rules.iter().all(|r| r.importance() >= Importance::BestPracticeViolation));

  let catalog: Vec<_> = registry.list_all().iter().map(|r| r.name()).collect();
  let positions: Vec<_> = names
    .iter()
    .filter_map(|name| catalog.iter().position(|c| c == name))
    .collect();
  assert_eq!(positions.len(), names.len());
  assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));

  Ok(())
}
