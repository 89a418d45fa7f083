//! Test helpers for integration tests

use anyhow::{Context, Result};
use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// A scratch folder of session documents
pub struct SessionDir {
  _root: TempDir,
  pub path: PathBuf,
}

impl SessionDir {
  pub fn new() -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().to_path_buf();
    Ok(Self { _root: root, path })
  }

  /// Write `document` as `<name>.nwb.json` and return its path
  pub fn write_session(&self, name: &str, document: &Value) -> Result<PathBuf> {
    let path = self.path.join(format!("{}.nwb.json", name));
    std::fs::write(&path, serde_json::to_string_pretty(document)?)?;
    Ok(path)
  }

  /// Write an arbitrary file
  pub fn write_file(&self, name: &str, content: &str) -> Result<PathBuf> {
    let path = self.path.join(name);
    std::fs::write(&path, content)?;
    Ok(path)
  }

  pub fn read_file(&self, name: &str) -> Result<String> {
    Ok(std::fs::read_to_string(self.path.join(name))?)
  }
}

/// A session that passes every built-in check
pub fn clean_session() -> Value {
  json!({
    "identifier": "4b7f0c1e",
    "session_description": "Mouse exploring an open field",
    "session_start_time": "2021-06-01T09:30:00+02:00",
    "experimenter": ["Doe, Jane"],
    "experiment_description": "Open field exploration",
    "institution": "Some University",
    "keywords": ["open field", "hippocampus"],
    "subject": {
      "subject_id": "m1",
      "age": "P90D",
      "sex": "F",
      "species": "Mus musculus"
    }
  })
}

/// [`clean_session`] with the four series of the classic time series fixture:
///
/// - `test_time_series_1`: 3 MB of uncompressed data
/// - `test_time_series_2`: regular timestamps
/// - `test_time_series_3`: nothing wrong
/// - `test_time_series_4`: regular timestamps, flipped orientation, timestamps too long
pub fn time_series_session() -> Value {
  let mut session = clean_session();
  session["acquisition"] = json!([
    { "name": "test_time_series_1", "unit": "", "data_shape": [375000], "rate": 1.0 },
    {
      "name": "test_time_series_2",
      "unit": "",
      "data_shape": [5, 4],
      "timestamps": [0.5, 2.5, 4.5, 6.5, 8.5]
    },
    { "name": "test_time_series_3", "unit": "", "data_shape": [5, 3], "rate": 1.0 },
    {
      "name": "test_time_series_4",
      "unit": "",
      "data_shape": [2, 3],
      "timestamps": [1.0, 2.0, 3.0]
    }
  ]);
  session
}

/// Run the nwb-inspector binary, failing on a non-zero exit
pub fn run_nwb_inspector(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = nwb_inspector_output(cwd, args)?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    anyhow::bail!(
      "nwb-inspector command failed: nwb-inspector {}\nstdout: {}\nstderr: {}",
      args.join(" "),
      stdout,
      stderr
    );
  }

  Ok(output)
}

/// Run the nwb-inspector binary and return its output whatever the exit code
pub fn nwb_inspector_output(cwd: &Path, args: &[&str]) -> Result<Output> {
  let bin = env!("CARGO_BIN_EXE_nwb-inspector");

  Command::new(bin)
    .current_dir(cwd)
    .args(args)
    .env_remove("NWBINSPECTOR_LOG")
    .output()
    .context("Failed to run nwb-inspector")
}
