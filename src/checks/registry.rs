//! Check registry
//!
//! An explicit, constructible catalog of checks. Built-in checks and plugins add
//! themselves through [`CheckRegistry::register`]; once populated, the registry is
//! only read (configuration and inspection never mutate it) and can be shared
//! across worker threads.

use super::trait_def::CheckDescriptor;
use crate::core::error::{InspectorResult, RegistryError};
use std::collections::HashMap;

/// Name-keyed catalog of checks, in registration order
#[derive(Debug, Default, Clone)]
pub struct CheckRegistry {
  checks: Vec<CheckDescriptor>,
  index: HashMap<String, usize>,
}

impl CheckRegistry {
  /// Create an empty registry
  pub fn new() -> Self {
    Self::default()
  }

  /// Add a check
  ///
  /// Registering the same function under the same name again is a no-op, so
  /// plugin modules may be loaded twice. A different function under an existing
  /// name is rejected.
  pub fn register(&mut self, check: CheckDescriptor) -> InspectorResult<()> {
    if let Some(&existing) = self.index.get(check.name()) {
      if self.checks[existing].same_function(&check) {
        return Ok(());
      }
      return Err(
        RegistryError::DuplicateName {
          name: check.name().to_string(),
        }
        .into(),
      );
    }

    tracing::trace!(check = check.name(), target = check.target().name(), "registered check");
    self.index.insert(check.name().to_string(), self.checks.len());
    self.checks.push(check);
    Ok(())
  }

  /// All checks in registration order
  pub fn list_all(&self) -> &[CheckDescriptor] {
    &self.checks
  }

  /// Look up a check by name
  pub fn get(&self, name: &str) -> Option<&CheckDescriptor> {
    self.index.get(name).map(|&i| &self.checks[i])
  }

  /// Registered check names in registration order
  pub fn names(&self) -> impl Iterator<Item = &str> {
    self.checks.iter().map(|c| c.name())
  }

  pub fn len(&self) -> usize {
    self.checks.len()
  }

  pub fn is_empty(&self) -> bool {
    self.checks.is_empty()
  }
}
