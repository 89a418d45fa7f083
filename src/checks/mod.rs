//! Best-practice checks and the machinery to select them
//!
//! Every check is a plain function over one session object type, registered in a
//! [`CheckRegistry`] with a name, target type and default importance. A run
//! narrows the registry to an [`ActiveRuleSet`] with [`configure_checks`].
//!
//! # Built-in Checks
//!
//! - **nwbfile_metadata**: session timing, experimenters, institution, keywords,
//!   publications, subject fields and processing module names
//! - **time_series**: timestamp regularity, data orientation, timestamp length and
//!   dataset compression
//!
//! # Example
//!
//! ```rust,ignore
//! use nwb_inspector::checks::{CheckRegistry, CheckSelection, Importance, configure_checks};
//!
//! let registry = CheckRegistry::with_builtin_checks()?;
//! let selection = CheckSelection::new().threshold(Importance::BestPracticeViolation);
//! let active = configure_checks(registry.list_all(), &selection)?;
//! ```

mod configure;
mod nwbfile_metadata;
mod registry;
mod time_series;
mod trait_def;

pub use configure::{ActiveRuleSet, CheckSelection, ImportanceOverrides, OverrideTarget, configure_checks};
pub use registry::CheckRegistry;
pub use trait_def::{CheckDescriptor, Finding, Importance, IntoFindings, Severity};

use crate::core::error::InspectorResult;

impl CheckRegistry {
  /// Registry holding every built-in check
  pub fn with_builtin_checks() -> InspectorResult<Self> {
    let mut registry = CheckRegistry::new();
    nwbfile_metadata::register(&mut registry)?;
    time_series::register(&mut registry)?;
    Ok(registry)
  }
}
