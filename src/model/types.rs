//! Concrete session objects
//!
//! Attribute names follow the NWB schema. Objects are built by a reader (or by
//! tests) and are read-only once inspection starts.

use super::neurodata::{NWB_FILE, PROCESSING_MODULE, SUBJECT, TIME_SERIES};
use super::{NwbObject, TypeSpec};
use chrono::{DateTime, FixedOffset};
use std::any::Any;

/// Root of a session file
#[derive(Debug, Clone)]
pub struct NwbFile {
  pub identifier: String,
  pub session_description: String,
  pub session_start_time: Option<DateTime<FixedOffset>>,
  pub experimenter: Vec<String>,
  pub experiment_description: Option<String>,
  pub institution: Option<String>,
  pub keywords: Vec<String>,
  pub related_publications: Vec<String>,
  pub subject: Option<Subject>,
  acquisition: Vec<TimeSeries>,
  processing: Vec<ProcessingModule>,
}

impl NwbFile {
  /// Minimal session: the three fields the schema requires
  pub fn new(
    identifier: impl Into<String>,
    session_description: impl Into<String>,
    session_start_time: Option<DateTime<FixedOffset>>,
  ) -> Self {
    Self {
      identifier: identifier.into(),
      session_description: session_description.into(),
      session_start_time,
      experimenter: Vec::new(),
      experiment_description: None,
      institution: None,
      keywords: Vec::new(),
      related_publications: Vec::new(),
      subject: None,
      acquisition: Vec::new(),
      processing: Vec::new(),
    }
  }

  /// Add a raw acquired series under `/acquisition`
  pub fn add_acquisition(&mut self, mut series: TimeSeries) {
    series.location = format!("/acquisition/{}", series.name);
    self.acquisition.push(series);
  }

  /// Add a processing module under `/processing`
  pub fn add_processing_module(&mut self, module: ProcessingModule) {
    self.processing.push(module);
  }

  pub fn acquisition(&self) -> &[TimeSeries] {
    &self.acquisition
  }

  pub fn processing(&self) -> &[ProcessingModule] {
    &self.processing
  }

  /// Every typed object in the file, in a fixed traversal order:
  /// the file itself, subject, acquisition, then each module followed by its series.
  pub fn objects(&self) -> Vec<&dyn NwbObject> {
    let mut objects: Vec<&dyn NwbObject> = vec![self];
    if let Some(subject) = &self.subject {
      objects.push(subject);
    }
    objects.extend(self.acquisition.iter().map(|ts| ts as &dyn NwbObject));
    for module in &self.processing {
      objects.push(module);
      objects.extend(module.data_interfaces.iter().map(|ts| ts as &dyn NwbObject));
    }
    objects
  }
}

impl NwbObject for NwbFile {
  fn type_spec(&self) -> &'static TypeSpec {
    &NWB_FILE
  }

  fn name(&self) -> &str {
    "root"
  }

  fn location(&self) -> Option<&str> {
    Some("/")
  }

  fn as_any(&self) -> &dyn Any {
    self
  }
}

/// Experimental subject metadata (`/general/subject`)
#[derive(Debug, Clone, Default)]
pub struct Subject {
  pub subject_id: Option<String>,
  pub age: Option<String>,
  pub date_of_birth: Option<DateTime<FixedOffset>>,
  pub sex: Option<String>,
  pub species: Option<String>,
  pub description: Option<String>,
}

impl NwbObject for Subject {
  fn type_spec(&self) -> &'static TypeSpec {
    &SUBJECT
  }

  fn name(&self) -> &str {
    "subject"
  }

  fn location(&self) -> Option<&str> {
    Some("/general/subject")
  }

  fn as_any(&self) -> &dyn Any {
    self
  }
}

/// Group of processed data interfaces (`/processing/<name>`)
#[derive(Debug, Clone)]
pub struct ProcessingModule {
  pub name: String,
  pub description: String,
  location: String,
  data_interfaces: Vec<TimeSeries>,
}

impl ProcessingModule {
  pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
    let name = name.into();
    Self {
      location: format!("/processing/{}", name),
      name,
      description: description.into(),
      data_interfaces: Vec::new(),
    }
  }

  /// Add a series to this module
  pub fn add(&mut self, mut series: TimeSeries) {
    series.location = format!("{}/{}", self.location, series.name);
    self.data_interfaces.push(series);
  }

  pub fn data_interfaces(&self) -> &[TimeSeries] {
    &self.data_interfaces
  }
}

impl NwbObject for ProcessingModule {
  fn type_spec(&self) -> &'static TypeSpec {
    &PROCESSING_MODULE
  }

  fn name(&self) -> &str {
    &self.name
  }

  fn location(&self) -> Option<&str> {
    Some(&self.location)
  }

  fn as_any(&self) -> &dyn Any {
    self
  }
}

/// A time series or one of its subtypes
///
/// Only dataset *metadata* is held: shape, element size and compression. The
/// timestamps are kept because checks compare them.
#[derive(Debug, Clone)]
pub struct TimeSeries {
  pub name: String,
  pub unit: Option<String>,
  pub data_shape: Vec<usize>,
  pub item_size: usize,
  pub compressed: bool,
  pub timestamps: Option<Vec<f64>>,
  pub rate: Option<f64>,
  pub starting_time: Option<f64>,
  type_spec: &'static TypeSpec,
  location: String,
}

impl TimeSeries {
  /// Uncompressed `f64` series with the given data shape
  pub fn new(name: impl Into<String>, data_shape: Vec<usize>) -> Self {
    let name = name.into();
    Self {
      location: format!("/{}", name),
      name,
      unit: Some(String::new()),
      data_shape,
      item_size: std::mem::size_of::<f64>(),
      compressed: false,
      timestamps: None,
      rate: None,
      starting_time: None,
      type_spec: &TIME_SERIES,
    }
  }

  /// Declare a refined neurodata type (e.g. `ElectricalSeries`)
  pub fn with_type(mut self, type_spec: &'static TypeSpec) -> Self {
    self.type_spec = type_spec;
    self
  }

  pub fn with_timestamps(mut self, timestamps: Vec<f64>) -> Self {
    self.timestamps = Some(timestamps);
    self
  }

  pub fn with_rate(mut self, rate: f64) -> Self {
    self.rate = Some(rate);
    self
  }

  pub fn with_compression(mut self, compressed: bool) -> Self {
    self.compressed = compressed;
    self
  }

  /// Total bytes of the data array, saturating at `usize::MAX`
  pub fn data_nbytes(&self) -> usize {
    if self.data_shape.contains(&0) {
      return 0;
    }
    self
      .data_shape
      .iter()
      .try_fold(self.item_size, |total, &dim| total.checked_mul(dim))
      .unwrap_or(usize::MAX)
  }
}

impl NwbObject for TimeSeries {
  fn type_spec(&self) -> &'static TypeSpec {
    self.type_spec
  }

  fn name(&self) -> &str {
    &self.name
  }

  fn location(&self) -> Option<&str> {
    Some(&self.location)
  }

  fn as_any(&self) -> &dyn Any {
    self
  }
}
