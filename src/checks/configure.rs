//! Check selection and importance overrides
//!
//! Turns the full catalog into the active, ordered list of checks for one run.
//! The output is always an order-preserving subsequence of the input; checks are
//! relabelled with their effective importance, never reordered.

use super::trait_def::{CheckDescriptor, Importance};
use crate::core::error::{ConfigError, InspectorResult};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

/// Checks that will run, with their effective importance
pub type ActiveRuleSet = Vec<CheckDescriptor>;

/// Key of an importance override table
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OverrideTarget {
  /// Reassign to an ordinary importance level
  Importance(Importance),
  /// Drop the check entirely, regardless of threshold
  Skip,
}

impl FromStr for OverrideTarget {
  type Err = ConfigError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    if s == "SKIP" {
      return Ok(OverrideTarget::Skip);
    }
    match s.parse::<Importance>() {
      Ok(importance) if importance.is_ordinary() => Ok(OverrideTarget::Importance(importance)),
      _ => Err(ConfigError::UnknownOverrideTarget { key: s.to_string() }),
    }
  }
}

impl fmt::Display for OverrideTarget {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      OverrideTarget::Importance(importance) => write!(f, "{}", importance),
      OverrideTarget::Skip => write!(f, "SKIP"),
    }
  }
}

/// Override target -> check names
pub type ImportanceOverrides = BTreeMap<OverrideTarget, Vec<String>>;

fn non_blank<I, S>(names: I) -> Vec<String>
where
  I: IntoIterator<Item = S>,
  S: Into<String>,
{
  names
    .into_iter()
    .map(Into::into)
    .filter(|name: &String| !name.trim().is_empty())
    .collect()
}

/// A select/ignore list counts only if it names at least one check
fn supplied(list: &Option<Vec<String>>) -> Option<&[String]> {
  list
    .as_deref()
    .filter(|names| names.iter().any(|name| !name.trim().is_empty()))
}

/// Options deciding which checks run and at what importance
#[derive(Debug, Clone, Default)]
pub struct CheckSelection {
  pub overrides: ImportanceOverrides,
  pub select: Option<Vec<String>>,
  pub ignore: Option<Vec<String>>,
  pub importance_threshold: Option<Importance>,
}

impl CheckSelection {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_overrides(mut self, overrides: ImportanceOverrides) -> Self {
    self.overrides = overrides;
    self
  }

  pub fn select<I, S>(mut self, names: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.select = Some(non_blank(names));
    self
  }

  pub fn ignore<I, S>(mut self, names: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.ignore = Some(non_blank(names));
    self
  }

  pub fn threshold(mut self, importance: Importance) -> Self {
    self.importance_threshold = Some(importance);
    self
  }

  /// Reject contradictory options before anything runs
  pub fn validate(&self) -> Result<(), ConfigError> {
    if supplied(&self.select).is_some() && supplied(&self.ignore).is_some() {
      return Err(ConfigError::SelectAndIgnore);
    }

    if let Some(threshold) = self.importance_threshold
      && !threshold.is_ordinary()
    {
      return Err(ConfigError::InvalidThreshold {
        value: threshold.to_string(),
      });
    }

    for target in self.overrides.keys() {
      if let OverrideTarget::Importance(importance) = target
        && !importance.is_ordinary()
      {
        return Err(ConfigError::UnknownOverrideTarget {
          key: importance.to_string(),
        });
      }
    }

    Ok(())
  }

  /// Effective override per check name. A check listed under SKIP is skipped even
  /// if it also appears under an importance; otherwise the highest level wins.
  fn resolve_overrides(&self) -> HashMap<&str, OverrideTarget> {
    let mut resolved = HashMap::new();
    for (target, names) in &self.overrides {
      for name in names {
        resolved.insert(name.as_str(), *target);
      }
    }
    resolved
  }
}

/// Filter and relabel `checks` according to `selection`
///
/// Steps, in order: importance overrides (and SKIP), select or ignore, threshold.
/// Unknown check names in overrides, select or ignore are ignored.
pub fn configure_checks(checks: &[CheckDescriptor], selection: &CheckSelection) -> InspectorResult<ActiveRuleSet> {
  selection.validate()?;

  let overrides = selection.resolve_overrides();
  let select = supplied(&selection.select);
  let ignore = supplied(&selection.ignore);
  let listed = |names: &[String], check: &CheckDescriptor| names.iter().any(|n| n == check.name());

  let active: ActiveRuleSet = checks
    .iter()
    .filter_map(|check| match overrides.get(check.name()) {
      Some(OverrideTarget::Skip) => None,
      Some(OverrideTarget::Importance(importance)) => Some(check.with_importance(*importance)),
      None => Some(check.clone()),
    })
    .filter(|check| select.is_none_or(|names| listed(names, check)))
    .filter(|check| ignore.is_none_or(|names| !listed(names, check)))
    .filter(|check| {
      selection
        .importance_threshold
        .is_none_or(|threshold| check.importance().rank() >= threshold.rank())
    })
    .collect();

  tracing::debug!(
    available = checks.len(),
    active = active.len(),
    "configured checks"
  );
  Ok(active)
}
