//! Inspection messages and their grouping keys

use crate::checks::{Importance, Severity};
use crate::core::error::OrganizeError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// One reported issue: what a check found, plus where it was found
///
/// Built by the engine; fields are read through accessors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
  message: String,
  importance: Importance,
  severity: Option<Severity>,
  check_name: String,
  object_type: String,
  object_name: String,
  location: Option<String>,
  file: Option<String>,
}

impl Message {
  pub fn new(message: impl Into<String>, importance: Importance, check_name: impl Into<String>) -> Self {
    Self {
      message: message.into(),
      importance,
      severity: None,
      check_name: check_name.into(),
      object_type: String::new(),
      object_name: String::new(),
      location: None,
      file: None,
    }
  }

  pub fn with_severity(mut self, severity: Option<Severity>) -> Self {
    self.severity = severity;
    self
  }

  pub fn with_object(mut self, object_type: impl Into<String>, object_name: impl Into<String>) -> Self {
    self.object_type = object_type.into();
    self.object_name = object_name.into();
    self
  }

  pub fn with_location(mut self, location: Option<impl Into<String>>) -> Self {
    self.location = location.map(Into::into);
    self
  }

  pub fn with_file(mut self, file: Option<impl Into<String>>) -> Self {
    self.file = file.map(Into::into);
    self
  }

  pub fn message(&self) -> &str {
    &self.message
  }

  pub fn importance(&self) -> Importance {
    self.importance
  }

  pub fn severity(&self) -> Option<Severity> {
    self.severity
  }

  pub fn check_name(&self) -> &str {
    &self.check_name
  }

  pub fn object_type(&self) -> &str {
    &self.object_type
  }

  pub fn object_name(&self) -> &str {
    &self.object_name
  }

  pub fn location(&self) -> Option<&str> {
    self.location.as_deref()
  }

  pub fn file(&self) -> Option<&str> {
    self.file.as_deref()
  }

  /// Value of `field` as a grouping key
  pub fn key(&self, field: MessageField) -> GroupKey {
    match field {
      MessageField::Importance => GroupKey::Importance(self.importance),
      MessageField::Severity => GroupKey::Severity(self.severity),
      MessageField::CheckName => GroupKey::text(Some(&self.check_name)),
      MessageField::ObjectType => GroupKey::text(Some(&self.object_type)),
      MessageField::ObjectName => GroupKey::text(Some(&self.object_name)),
      MessageField::Location => GroupKey::text(self.location()),
      MessageField::File => GroupKey::text(self.file()),
    }
  }
}

/// Message attributes usable as grouping levels (everything but the text)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageField {
  Importance,
  Severity,
  CheckName,
  ObjectType,
  ObjectName,
  Location,
  File,
}

impl MessageField {
  pub const ALL: [MessageField; 7] = [
    MessageField::Importance,
    MessageField::Severity,
    MessageField::CheckName,
    MessageField::ObjectType,
    MessageField::ObjectName,
    MessageField::Location,
    MessageField::File,
  ];

  pub fn as_str(self) -> &'static str {
    match self {
      MessageField::Importance => "importance",
      MessageField::Severity => "severity",
      MessageField::CheckName => "check_name",
      MessageField::ObjectType => "object_type",
      MessageField::ObjectName => "object_name",
      MessageField::Location => "location",
      MessageField::File => "file",
    }
  }
}

impl FromStr for MessageField {
  type Err = OrganizeError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    if s == "message" {
      return Err(OrganizeError::IllegalLevel { name: s.to_string() });
    }
    if s == "check_function_name" {
      return Ok(MessageField::CheckName);
    }
    MessageField::ALL
      .into_iter()
      .find(|field| field.as_str() == s)
      .ok_or_else(|| OrganizeError::UnknownLevel { name: s.to_string() })
  }
}

impl fmt::Display for MessageField {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// A message's value at one grouping level
///
/// Importance and severity order by rank; text orders lexically. Absent values
/// come first.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GroupKey {
  Importance(Importance),
  Severity(Option<Severity>),
  Text(Option<String>),
}

impl GroupKey {
  pub fn text(value: Option<&str>) -> Self {
    GroupKey::Text(value.map(String::from))
  }
}

impl fmt::Display for GroupKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GroupKey::Importance(importance) => write!(f, "{}", importance),
      GroupKey::Severity(Some(severity)) => write!(f, "{}", severity),
      GroupKey::Text(Some(text)) => f.write_str(text),
      GroupKey::Severity(None) | GroupKey::Text(None) => f.write_str("unspecified"),
    }
  }
}
