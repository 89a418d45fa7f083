//! Check abstraction for best-practice inspection
//!
//! A check is a plain function over one typed session object:
//!
//! ```rust,ignore
//! use nwb_inspector::checks::{CheckDescriptor, Finding, Importance};
//! use nwb_inspector::model::{Subject, neurodata::SUBJECT};
//!
//! fn check_subject_id_exists(subject: &Subject) -> Option<Finding> {
//!   subject.subject_id.is_none().then(|| Finding::new("subject_id is missing."))
//! }
//!
//! let descriptor = CheckDescriptor::new(
//!   "check_subject_id_exists",
//!   &SUBJECT,
//!   Importance::BestPracticeSuggestion,
//!   check_subject_id_exists,
//! );
//! ```
//!
//! A check may return nothing, a single finding, a list of findings, or a `Result`
//! of any of those. [`IntoFindings`] folds all of them into one shape at the call
//! boundary so nothing downstream cares about arity.

use crate::core::error::ConfigError;
use crate::model::{NwbObject, TypeSpec};
use serde::{Deserialize, Serialize};
use std::any::TypeId;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Importance of a check, ascending
///
/// `ExternalValidation` and `Error` are reserved for the engine: they are never
/// valid thresholds or override targets and are always reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Importance {
  /// Improvable data representation
  BestPracticeSuggestion,
  /// Very suboptimal data representation
  BestPracticeViolation,
  /// Potentially incorrect data
  Critical,
  /// Schema or format violation reported by the reader
  ExternalValidation,
  /// A check failed to run
  Error,
}

impl Importance {
  /// The levels a check may be assigned (and a threshold may name)
  pub const ORDINARY: [Importance; 3] = [
    Importance::BestPracticeSuggestion,
    Importance::BestPracticeViolation,
    Importance::Critical,
  ];

  /// Sort rank
  pub fn rank(self) -> u8 {
    self as u8
  }

  pub fn is_ordinary(self) -> bool {
    Self::ORDINARY.contains(&self)
  }

  pub fn as_str(self) -> &'static str {
    match self {
      Importance::BestPracticeSuggestion => "BEST_PRACTICE_SUGGESTION",
      Importance::BestPracticeViolation => "BEST_PRACTICE_VIOLATION",
      Importance::Critical => "CRITICAL",
      Importance::ExternalValidation => "EXTERNAL_VALIDATION",
      Importance::Error => "ERROR",
    }
  }

  /// Parse a threshold name; only the ordinary levels are accepted
  pub fn parse_threshold(value: &str) -> Result<Self, ConfigError> {
    match value.parse::<Importance>() {
      Ok(importance) if importance.is_ordinary() => Ok(importance),
      _ => Err(ConfigError::InvalidThreshold {
        value: value.to_string(),
      }),
    }
  }
}

impl FromStr for Importance {
  type Err = ConfigError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "BEST_PRACTICE_SUGGESTION" => Ok(Importance::BestPracticeSuggestion),
      "BEST_PRACTICE_VIOLATION" => Ok(Importance::BestPracticeViolation),
      "CRITICAL" | "CRITICAL_IMPORTANCE" => Ok(Importance::Critical),
      "EXTERNAL_VALIDATION" | "PYNWB_VALIDATION" => Ok(Importance::ExternalValidation),
      "ERROR" => Ok(Importance::Error),
      other => Err(ConfigError::UnknownImportance {
        value: other.to_string(),
      }),
    }
  }
}

impl fmt::Display for Importance {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Optional impact grade a check may attach to a finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
  Low,
  High,
}

impl fmt::Display for Severity {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Severity::Low => write!(f, "LOW"),
      Severity::High => write!(f, "HIGH"),
    }
  }
}

/// What a check reports; the engine adds provenance to make a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
  pub message: String,
  pub severity: Option<Severity>,
  /// Overrides the subject object's location
  pub location: Option<String>,
}

impl Finding {
  pub fn new(message: impl Into<String>) -> Self {
    Self {
      message: message.into(),
      severity: None,
      location: None,
    }
  }

  pub fn with_severity(mut self, severity: Severity) -> Self {
    self.severity = Some(severity);
    self
  }

  pub fn with_location(mut self, location: impl Into<String>) -> Self {
    self.location = Some(location.into());
    self
  }
}

/// Normalizes a check's return value
///
/// `Err` carries the captured failure description.
pub trait IntoFindings {
  fn into_findings(self) -> Result<Vec<Finding>, String>;
}

impl IntoFindings for () {
  fn into_findings(self) -> Result<Vec<Finding>, String> {
    Ok(Vec::new())
  }
}

impl IntoFindings for Finding {
  fn into_findings(self) -> Result<Vec<Finding>, String> {
    Ok(vec![self])
  }
}

impl IntoFindings for Option<Finding> {
  fn into_findings(self) -> Result<Vec<Finding>, String> {
    Ok(self.into_iter().collect())
  }
}

impl IntoFindings for Vec<Finding> {
  fn into_findings(self) -> Result<Vec<Finding>, String> {
    Ok(self)
  }
}

impl<T, E> IntoFindings for Result<T, E>
where
  T: IntoFindings,
  E: fmt::Display,
{
  fn into_findings(self) -> Result<Vec<Finding>, String> {
    match self {
      Ok(output) => output.into_findings(),
      Err(err) => Err(format!("{:#}", err)),
    }
  }
}

type ErasedCheck = dyn Fn(&dyn NwbObject) -> Result<Vec<Finding>, String> + Send + Sync;

/// A registered check: name, target type, default importance and the function
///
/// Cloning is cheap; the function is shared.
#[derive(Clone)]
pub struct CheckDescriptor {
  name: String,
  description: String,
  target: &'static TypeSpec,
  importance: Importance,
  identity: TypeId,
  run: Arc<ErasedCheck>,
}

impl CheckDescriptor {
  /// Wrap a typed check function
  ///
  /// `T` is the concrete object struct the function reads; `target` is the
  /// neurodata type (or ancestor type) it applies to. Pass the function item
  /// itself: its type is the check's identity, so a coerced `fn` pointer makes
  /// every check of the same signature look alike.
  pub fn new<T, O, F>(name: impl Into<String>, target: &'static TypeSpec, importance: Importance, check: F) -> Self
  where
    T: NwbObject,
    O: IntoFindings + 'static,
    F: Fn(&T) -> O + Copy + Send + Sync + 'static,
  {
    let identity = TypeId::of::<F>();
    let run = move |object: &dyn NwbObject| match object.downcast_ref::<T>() {
      Some(subject) => check(subject).into_findings(),
      None => Err(format!(
        "check expects {} but was dispatched a {} object",
        std::any::type_name::<T>(),
        object.type_spec()
      )),
    };

    Self {
      name: name.into(),
      description: String::new(),
      target,
      importance,
      identity,
      run: Arc::new(run),
    }
  }

  /// Attach a one-line description (shown by `--list-checks`)
  pub fn with_description(mut self, description: impl Into<String>) -> Self {
    self.description = description.into();
    self
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn description(&self) -> &str {
    &self.description
  }

  pub fn target(&self) -> &'static TypeSpec {
    self.target
  }

  pub fn importance(&self) -> Importance {
    self.importance
  }

  /// Copy of this descriptor with a different effective importance
  pub fn with_importance(&self, importance: Importance) -> Self {
    Self {
      importance,
      ..self.clone()
    }
  }

  /// Whether both descriptors wrap the same function
  pub fn same_function(&self, other: &CheckDescriptor) -> bool {
    self.identity == other.identity
  }

  /// Whether this check applies to `object`
  pub fn applies_to(&self, object: &dyn NwbObject) -> bool {
    object.type_spec().refines(self.target)
  }

  /// Call the check. Panics propagate; see `engine::invoke_check` for the safe boundary.
  pub(crate) fn call(&self, object: &dyn NwbObject) -> Result<Vec<Finding>, String> {
    (self.run)(object)
  }
}

impl fmt::Debug for CheckDescriptor {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("CheckDescriptor")
      .field("name", &self.name)
      .field("target", &self.target.name())
      .field("importance", &self.importance)
      .finish_non_exhaustive()
  }
}
