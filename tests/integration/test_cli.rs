//! Integration tests for the nwb-inspector command line

use crate::helpers::{SessionDir, clean_session, nwb_inspector_output, run_nwb_inspector, time_series_session};
use anyhow::Result;
use serde_json::{Value, json};

fn stdout(output: &std::process::Output) -> String {
  String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &std::process::Output) -> String {
  String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_clean_session_exits_zero() -> Result<()> {
  let dir = SessionDir::new()?;
  dir.write_session("clean", &clean_session())?;

  let output = run_nwb_inspector(&dir.path, &["clean.nwb.json"])?;
  let text = stdout(&output);
  assert!(text.contains("NWBInspector Report Summary"));
  assert!(text.contains("Found 0 issues over 0 files:"));

  Ok(())
}

#[test]
fn test_critical_issues_exit_three() -> Result<()> {
  let dir = SessionDir::new()?;
  dir.write_session("testing", &time_series_session())?;

  let output = nwb_inspector_output(&dir.path, &["testing.nwb.json", "--no-color"])?;
  assert_eq!(output.status.code(), Some(3), "stderr: {}", stderr(&output));

  let text = stdout(&output);
  assert!(text.contains("Found 5 issues over 1 file:"));
  assert!(text.contains("1.  testing.nwb.json"));
  assert!(text.contains("check_data_orientation: Data may be in the wrong orientation."));
  assert!(text.contains("TimeSeries 'test_time_series_4' located in '/acquisition/test_time_series_4'"));

  let critical = text.find("1.1  CRITICAL").expect("critical heading");
  let violation = text.find("1.2  BEST_PRACTICE_VIOLATION").expect("violation heading");
  assert!(critical < violation);

  Ok(())
}

#[test]
fn test_threshold_below_critical_exits_zero() -> Result<()> {
  let dir = SessionDir::new()?;
  let mut session = clean_session();
  session["keywords"] = json!([]);
  dir.write_session("quiet", &session)?;

  let output = run_nwb_inspector(&dir.path, &["quiet.nwb.json", "--no-color"])?;
  let text = stdout(&output);
  assert!(text.contains("Found 1 issue over 1 file:"));
  assert!(text.contains("check_keywords"));

  let output = run_nwb_inspector(&dir.path, &["quiet.nwb.json", "-t", "BEST_PRACTICE_VIOLATION"])?;
  assert!(stdout(&output).contains("Found 0 issues"));

  Ok(())
}

#[test]
fn test_folder_json_output_in_file_order() -> Result<()> {
  let dir = SessionDir::new()?;
  let mut session = clean_session();
  session["keywords"] = json!([]);
  dir.write_session("b", &session)?;
  dir.write_session("a", &session)?;
  dir.write_file("notes.txt", "not a session")?;

  let json_path = dir.path.join("out.json");
  let json_arg = json_path.to_string_lossy().into_owned();
  let output = run_nwb_inspector(&dir.path, &[".", "-n", "2", "-j", &json_arg])?;
  assert!(stdout(&output).contains("Found 2 issues over 2 files:"));

  let report: Value = serde_json::from_str(&dir.read_file("out.json")?)?;
  assert_eq!(report["version"], env!("CARGO_PKG_VERSION"));
  let files: Vec<_> = report["messages"]
    .as_array()
    .expect("messages array")
    .iter()
    .map(|m| m["file"].as_str().unwrap_or_default().to_string())
    .collect();
  assert_eq!(files, vec!["a.nwb.json", "b.nwb.json"]);

  Ok(())
}

#[test]
fn test_unreadable_session_reports_error() -> Result<()> {
  let dir = SessionDir::new()?;
  dir.write_file("broken.nwb.json", "{ this is not json")?;

  let output = nwb_inspector_output(&dir.path, &["broken.nwb.json", "--no-color"])?;
  assert_eq!(output.status.code(), Some(3));
  let text = stdout(&output);
  assert!(text.contains("ERROR"));
  assert!(text.contains("read_session"));

  Ok(())
}

#[test]
fn test_report_file_respects_overwrite() -> Result<()> {
  let dir = SessionDir::new()?;
  dir.write_session("clean", &clean_session())?;
  dir.write_file("report.txt", "old report")?;

  let output = nwb_inspector_output(&dir.path, &["clean.nwb.json", "--report-file-path", "report.txt"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("already exists"));
  assert_eq!(dir.read_file("report.txt")?, "old report");

  run_nwb_inspector(&dir.path, &["clean.nwb.json", "--report-file-path", "report.txt", "-o"])?;
  assert!(dir.read_file("report.txt")?.contains("NWBInspector Report Summary"));

  Ok(())
}

#[test]
fn test_list_checks_with_threshold() -> Result<()> {
  let dir = SessionDir::new()?;

  let output = run_nwb_inspector(&dir.path, &["--list-checks", "-t", "CRITICAL"])?;
  let text = stdout(&output);
  assert!(text.contains("check_data_orientation"));
  assert!(text.contains("check_timestamps_match_first_dimension"));
  assert!(!text.contains("check_keywords"));

  let output = run_nwb_inspector(&dir.path, &["--list-checks"])?;
  assert!(stdout(&output).contains("18 active checks"));

  Ok(())
}

#[test]
fn test_select_and_ignore_conflict() -> Result<()> {
  let dir = SessionDir::new()?;
  dir.write_session("clean", &clean_session())?;

  let output = nwb_inspector_output(
    &dir.path,
    &["clean.nwb.json", "-s", "check_keywords", "-i", "check_data_orientation"],
  )?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("cannot both be used"));

  Ok(())
}

#[test]
fn test_empty_select_is_not_supplied() -> Result<()> {
  let dir = SessionDir::new()?;

  let output = run_nwb_inspector(&dir.path, &["--list-checks", "-s", ""])?;
  assert!(stdout(&output).contains("18 active checks"));

  let output = run_nwb_inspector(&dir.path, &["--list-checks", "-s", "", "-i", "check_keywords"])?;
  let text = stdout(&output);
  assert!(text.contains("17 active checks"));
  assert!(!text.contains("check_keywords"));

  Ok(())
}

#[test]
fn test_invalid_threshold() -> Result<()> {
  let dir = SessionDir::new()?;
  dir.write_session("clean", &clean_session())?;

  let output = nwb_inspector_output(&dir.path, &["clean.nwb.json", "-t", "ERROR"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("not a valid importance level"));

  Ok(())
}

#[test]
fn test_message_is_not_a_level() -> Result<()> {
  let dir = SessionDir::new()?;
  dir.write_session("clean", &clean_session())?;

  let output = nwb_inspector_output(&dir.path, &["clean.nwb.json", "--levels", "message"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("Illegal grouping key"));

  Ok(())
}

#[test]
fn test_custom_levels_and_reverse() -> Result<()> {
  let dir = SessionDir::new()?;
  dir.write_session("testing", &time_series_session())?;

  let output = nwb_inspector_output(
    &dir.path,
    &[
      "testing.nwb.json",
      "--no-color",
      "--levels",
      "importance,check_name",
      "--reverse",
      "false,false",
    ],
  )?;
  assert_eq!(output.status.code(), Some(3));
  let text = stdout(&output);
  let violation = text.find("1.  BEST_PRACTICE_VIOLATION").expect("violation heading");
  let critical = text.find("2.  CRITICAL").expect("critical heading");
  assert!(violation < critical);
  assert!(text.contains("1.1  check_dataset_compression"));

  let output = nwb_inspector_output(&dir.path, &["testing.nwb.json", "--reverse", "true"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("must match the number of levels"));

  Ok(())
}

#[test]
fn test_no_color_has_no_escape_codes() -> Result<()> {
  let dir = SessionDir::new()?;
  dir.write_session("testing", &time_series_session())?;

  let colored = nwb_inspector_output(&dir.path, &["testing.nwb.json"])?;
  assert!(stdout(&colored).contains('\u{1b}'));

  let plain = nwb_inspector_output(&dir.path, &["testing.nwb.json", "--no-color"])?;
  assert!(!stdout(&plain).contains('\u{1b}'));

  Ok(())
}
