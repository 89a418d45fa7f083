//! Session readers
//!
//! A reader owns both halves of file access: schema validation and building the
//! object graph. The inspector only consumes the [`SessionReader`] trait, so other
//! storage backends plug in without touching the engine.
//!
//! [`JsonSessionReader`] reads `*.nwb.json` session documents:
//!
//! ```json
//! {
//!   "identifier": "a8f3",
//!   "session_description": "Mouse exploring an open field",
//!   "session_start_time": "2021-06-01T09:30:00+02:00",
//!   "experimenter": ["Doe, Jane"],
//!   "subject": { "subject_id": "m1", "species": "Mus musculus", "sex": "F", "age": "P90D" },
//!   "acquisition": [
//!     { "name": "raw", "neurodata_type": "ElectricalSeries", "unit": "volts", "data_shape": [30000, 32], "rate": 30000.0 }
//!   ],
//!   "processing": [
//!     { "name": "behavior", "description": "", "data_interfaces": [] }
//!   ]
//! }
//! ```

use super::neurodata::{TIME_SERIES, time_series_type};
use super::types::{NwbFile, ProcessingModule, Subject, TimeSeries};
use crate::core::error::{InspectorResult, ResultExt};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One schema/format violation reported by a reader
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
  /// Validator identifier (e.g. "MissingRequiredField")
  pub name: String,
  /// Human-readable reason
  pub reason: String,
  /// Path of the offending object inside the file
  pub location: Option<String>,
}

impl ValidationIssue {
  fn new(name: &str, reason: impl Into<String>, location: impl Into<String>) -> Self {
    Self {
      name: name.to_string(),
      reason: reason.into(),
      location: Some(location.into()),
    }
  }
}

/// Validates and reads session files into an object graph
pub trait SessionReader: Send + Sync {
  /// File suffix this reader accepts when scanning a directory
  fn extension(&self) -> &str;

  /// Schema violations in the file. Unreadable files report nothing here;
  /// [`SessionReader::read`] surfaces that failure instead.
  fn validate(&self, path: &Path) -> Vec<ValidationIssue>;

  /// Build the object graph
  fn read(&self, path: &Path) -> InspectorResult<NwbFile>;
}

/// Reader for JSON session documents
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSessionReader;

impl JsonSessionReader {
  fn load(path: &Path) -> InspectorResult<SessionDocument> {
    let content = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let document: SessionDocument =
      serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(document)
  }
}

impl SessionReader for JsonSessionReader {
  fn extension(&self) -> &str {
    ".nwb.json"
  }

  fn validate(&self, path: &Path) -> Vec<ValidationIssue> {
    match Self::load(path) {
      Ok(document) => document.validate(),
      Err(_) => Vec::new(),
    }
  }

  fn read(&self, path: &Path) -> InspectorResult<NwbFile> {
    Ok(Self::load(path)?.into_nwbfile())
  }
}

#[derive(Debug, Default, Deserialize)]
struct SessionDocument {
  identifier: Option<String>,
  session_description: Option<String>,
  session_start_time: Option<String>,
  #[serde(default)]
  experimenter: Vec<String>,
  experiment_description: Option<String>,
  institution: Option<String>,
  #[serde(default)]
  keywords: Vec<String>,
  #[serde(default)]
  related_publications: Vec<String>,
  subject: Option<SubjectDocument>,
  #[serde(default)]
  acquisition: Vec<SeriesDocument>,
  #[serde(default)]
  processing: Vec<ModuleDocument>,
}

#[derive(Debug, Default, Deserialize)]
struct SubjectDocument {
  subject_id: Option<String>,
  age: Option<String>,
  date_of_birth: Option<String>,
  sex: Option<String>,
  species: Option<String>,
  description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ModuleDocument {
  name: String,
  #[serde(default)]
  description: String,
  #[serde(default)]
  data_interfaces: Vec<SeriesDocument>,
}

#[derive(Debug, Deserialize)]
struct SeriesDocument {
  name: String,
  neurodata_type: Option<String>,
  unit: Option<String>,
  #[serde(default)]
  data_shape: Vec<usize>,
  #[serde(default = "default_item_size")]
  item_size: usize,
  #[serde(default)]
  compressed: bool,
  timestamps: Option<Vec<f64>>,
  rate: Option<f64>,
  starting_time: Option<f64>,
}

fn default_item_size() -> usize {
  std::mem::size_of::<f64>()
}

fn parse_datetime(value: &str) -> Option<DateTime<FixedOffset>> {
  DateTime::parse_from_rfc3339(value).ok()
}

impl SessionDocument {
  fn validate(&self) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    for (field, value) in [
      ("identifier", &self.identifier),
      ("session_description", &self.session_description),
      ("session_start_time", &self.session_start_time),
    ] {
      if value.is_none() {
        issues.push(ValidationIssue::new(
          "MissingRequiredField",
          format!("NWBFile/{} is a required field", field),
          "/",
        ));
      }
    }

    if let Some(start) = &self.session_start_time
      && parse_datetime(start).is_none()
    {
      issues.push(ValidationIssue::new(
        "InvalidTimestamp",
        format!("session_start_time '{}' is not an ISO 8601 timestamp", start),
        "/",
      ));
    }

    if let Some(dob) = self.subject.as_ref().and_then(|s| s.date_of_birth.as_ref())
      && parse_datetime(dob).is_none()
    {
      issues.push(ValidationIssue::new(
        "InvalidTimestamp",
        format!("date_of_birth '{}' is not an ISO 8601 timestamp", dob),
        "/general/subject",
      ));
    }

    let acquisition = self.acquisition.iter().map(|s| (format!("/acquisition/{}", s.name), s));
    let processed = self.processing.iter().flat_map(|m| {
      m.data_interfaces
        .iter()
        .map(move |s| (format!("/processing/{}/{}", m.name, s.name), s))
    });
    for (location, series) in acquisition.chain(processed) {
      issues.extend(series.validate(&location));
    }

    issues
  }

  fn into_nwbfile(self) -> NwbFile {
    let mut nwbfile = NwbFile::new(
      self.identifier.unwrap_or_default(),
      self.session_description.unwrap_or_default(),
      self.session_start_time.as_deref().and_then(parse_datetime),
    );
    nwbfile.experimenter = self.experimenter;
    nwbfile.experiment_description = self.experiment_description;
    nwbfile.institution = self.institution;
    nwbfile.keywords = self.keywords;
    nwbfile.related_publications = self.related_publications;
    nwbfile.subject = self.subject.map(|s| Subject {
      subject_id: s.subject_id,
      age: s.age,
      date_of_birth: s.date_of_birth.as_deref().and_then(parse_datetime),
      sex: s.sex,
      species: s.species,
      description: s.description,
    });

    for series in self.acquisition {
      nwbfile.add_acquisition(series.into_time_series());
    }
    for module in self.processing {
      let mut processing_module = ProcessingModule::new(module.name, module.description);
      for series in module.data_interfaces {
        processing_module.add(series.into_time_series());
      }
      nwbfile.add_processing_module(processing_module);
    }

    nwbfile
  }
}

impl SeriesDocument {
  fn validate(&self, location: &str) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    if self.unit.is_none() {
      issues.push(ValidationIssue::new(
        "MissingRequiredField",
        format!("{}/data/unit is a required attribute", self.name),
        location,
      ));
    }
    if let Some(ty) = &self.neurodata_type
      && time_series_type(ty).is_none()
    {
      issues.push(ValidationIssue::new(
        "UnknownNeurodataType",
        format!("'{}' is not a known TimeSeries type; reading it as TimeSeries", ty),
        location,
      ));
    }
    issues
  }

  fn into_time_series(self) -> TimeSeries {
    let type_spec = self
      .neurodata_type
      .as_deref()
      .and_then(time_series_type)
      .unwrap_or(&TIME_SERIES);

    let mut series = TimeSeries::new(self.name, self.data_shape).with_type(type_spec);
    series.unit = self.unit;
    series.item_size = self.item_size;
    series.compressed = self.compressed;
    series.timestamps = self.timestamps;
    series.rate = self.rate;
    series.starting_time = self.starting_time;
    series
  }
}
