//! In-memory session object graph
//!
//! The inspector never parses files itself. A [`SessionReader`] builds an
//! [`NwbFile`] and the engine walks it through the [`NwbObject`] trait.
//!
//! Every object carries a static [`TypeSpec`]: its nominal neurodata type plus the
//! chain of types it refines. A check targeting `TimeSeries` therefore also runs on
//! an `ElectricalSeries`, but not the other way around.

mod reader;
mod types;

pub use reader::{JsonSessionReader, SessionReader, ValidationIssue};
pub use types::{NwbFile, ProcessingModule, Subject, TimeSeries};

use std::any::Any;
use std::fmt;

/// Nominal neurodata type with its parent in the type hierarchy
#[derive(Debug)]
pub struct TypeSpec {
  name: &'static str,
  parent: Option<&'static TypeSpec>,
}

impl TypeSpec {
  /// Declare a type (usable in `static` items)
  pub const fn new(name: &'static str, parent: Option<&'static TypeSpec>) -> Self {
    Self { name, parent }
  }

  /// Type name as written in the file
  pub fn name(&self) -> &'static str {
    self.name
  }

  /// Direct parent type, if any
  pub fn parent(&self) -> Option<&'static TypeSpec> {
    self.parent
  }

  /// Whether this type equals `target` or refines it (transitively)
  pub fn refines(&self, target: &TypeSpec) -> bool {
    let mut current = Some(self);
    while let Some(ty) = current {
      if ty.name == target.name {
        return true;
      }
      current = ty.parent;
    }
    false
  }
}

impl PartialEq for TypeSpec {
  fn eq(&self, other: &Self) -> bool {
    self.name == other.name
  }
}

impl Eq for TypeSpec {}

impl fmt::Display for TypeSpec {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name)
  }
}

/// Built-in neurodata type hierarchy
pub mod neurodata {
  use super::TypeSpec;

  pub static NWB_CONTAINER: TypeSpec = TypeSpec::new("NWBContainer", None);
  pub static NWB_FILE: TypeSpec = TypeSpec::new("NWBFile", Some(&NWB_CONTAINER));
  pub static SUBJECT: TypeSpec = TypeSpec::new("Subject", Some(&NWB_CONTAINER));
  pub static PROCESSING_MODULE: TypeSpec = TypeSpec::new("ProcessingModule", Some(&NWB_CONTAINER));
  pub static NWB_DATA_INTERFACE: TypeSpec = TypeSpec::new("NWBDataInterface", Some(&NWB_CONTAINER));
  pub static TIME_SERIES: TypeSpec = TypeSpec::new("TimeSeries", Some(&NWB_DATA_INTERFACE));
  pub static ELECTRICAL_SERIES: TypeSpec = TypeSpec::new("ElectricalSeries", Some(&TIME_SERIES));
  pub static SPATIAL_SERIES: TypeSpec = TypeSpec::new("SpatialSeries", Some(&TIME_SERIES));
  pub static ROI_RESPONSE_SERIES: TypeSpec = TypeSpec::new("RoiResponseSeries", Some(&TIME_SERIES));

  /// Time series subtypes a reader may declare through `neurodata_type`
  pub static TIME_SERIES_TYPES: [&TypeSpec; 4] =
    [&TIME_SERIES, &ELECTRICAL_SERIES, &SPATIAL_SERIES, &ROI_RESPONSE_SERIES];

  /// Look up a time series type by name
  pub fn time_series_type(name: &str) -> Option<&'static TypeSpec> {
    TIME_SERIES_TYPES.iter().copied().find(|ty| ty.name() == name)
  }
}

/// A typed object inside a session file
///
/// Checks only read through this trait; mutating objects from a check is not
/// supported.
pub trait NwbObject: Any + Send + Sync {
  /// Runtime neurodata type
  fn type_spec(&self) -> &'static TypeSpec;

  /// Object name (e.g. "root" for the file itself)
  fn name(&self) -> &str;

  /// Path of this object inside the file hierarchy
  fn location(&self) -> Option<&str> {
    None
  }

  /// Upcast for typed check dispatch
  fn as_any(&self) -> &dyn Any;
}

impl<'a> dyn NwbObject + 'a {
  /// Downcast to a concrete object type
  pub fn downcast_ref<T: NwbObject>(&self) -> Option<&T> {
    self.as_any().downcast_ref::<T>()
  }
}
