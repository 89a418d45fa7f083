use crate::checks::{ImportanceOverrides, OverrideTarget};
use crate::core::error::{ConfigError, InspectorError, InspectorResult, ResultExt};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Importance overrides loaded from TOML
///
/// Searched in order: nwbinspector.toml, .nwbinspector.toml, .config/nwbinspector.toml
///
/// ```toml
/// CRITICAL = ["check_subject_exists"]
/// BEST_PRACTICE_SUGGESTION = ["check_data_orientation"]
/// SKIP = ["check_keywords"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InspectorConfig {
  entries: BTreeMap<String, Vec<String>>,
}

impl InspectorConfig {
  /// Find an override file in `dir`
  pub fn find_config_path(dir: &Path) -> Option<PathBuf> {
    let candidates = vec![
      dir.join("nwbinspector.toml"),
      dir.join(".nwbinspector.toml"),
      dir.join(".config").join("nwbinspector.toml"),
    ];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load an override file; every key must be an importance level or SKIP
  pub fn load(path: &Path) -> InspectorResult<Self> {
    if !path.exists() {
      return Err(InspectorError::Config(ConfigError::NotFound {
        path: path.to_path_buf(),
      }));
    }

    let content =
      fs::read_to_string(path).with_context(|| format!("Failed to read config from {}", path.display()))?;
    let config = Self::parse(&content).with_context(|| format!("Failed to parse config from {}", path.display()))?;

    tracing::debug!(path = %path.display(), targets = config.entries.len(), "loaded check configuration");
    Ok(config)
  }

  /// Parse override TOML text
  pub fn parse(content: &str) -> InspectorResult<Self> {
    let config: InspectorConfig = toml_edit::de::from_str(content)?;
    config.overrides()?;
    Ok(config)
  }

  /// Whether an override file exists in `dir`
  pub fn exists(dir: &Path) -> bool {
    Self::find_config_path(dir).is_some()
  }

  /// Typed override table
  pub fn overrides(&self) -> Result<ImportanceOverrides, ConfigError> {
    let mut overrides = ImportanceOverrides::new();
    for (key, names) in &self.entries {
      let target: OverrideTarget = key.parse()?;
      overrides.entry(target).or_default().extend(names.iter().cloned());
    }
    Ok(overrides)
  }
}
