//! Rule dispatch over session objects
//!
//! Dispatch is rule-major: every active check visits every object it applies to,
//! in traversal order, before the next check starts. A failing check (one that
//! returns `Err` or panics) becomes a single `ERROR` message for that object and
//! inspection continues.

use super::message::Message;
use crate::checks::{CheckDescriptor, Finding, Importance};
use crate::core::error::{InspectorError, InspectorResult, ResultExt};
use crate::model::{NwbObject, SessionReader};
use rayon::prelude::*;
use std::any::Any;
use std::cell::Cell;
use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

/// Check name of the message emitted when a whole session cannot be read
pub const READ_SESSION: &str = "read_session";

/// Lazy stream of messages from [`inspect`]
pub struct Inspection<'a> {
  objects: &'a [&'a dyn NwbObject],
  rules: &'a [CheckDescriptor],
  file: Option<&'a str>,
  rule: usize,
  object: usize,
  pending: std::vec::IntoIter<Message>,
}

impl Iterator for Inspection<'_> {
  type Item = Message;

  fn next(&mut self) -> Option<Message> {
    loop {
      if let Some(message) = self.pending.next() {
        return Some(message);
      }

      let rules = self.rules;
      let rule = rules.get(self.rule)?;
      let Some(&object) = self.objects.get(self.object) else {
        self.rule += 1;
        self.object = 0;
        continue;
      };
      self.object += 1;

      if rule.applies_to(object) {
        self.pending = run_check(rule, object, self.file).into_iter();
      }
    }
  }
}

/// Run `rules` over `objects`
///
/// Nothing runs until the iterator is pulled. `file` is copied onto every message.
pub fn inspect<'a>(
  objects: &'a [&'a dyn NwbObject],
  rules: &'a [CheckDescriptor],
  file: Option<&'a str>,
) -> Inspection<'a> {
  Inspection {
    objects,
    rules,
    file,
    rule: 0,
    object: 0,
    pending: Vec::new().into_iter(),
  }
}

/// Run one check on one object, turning every outcome into messages
pub fn run_check(rule: &CheckDescriptor, object: &dyn NwbObject, file: Option<&str>) -> Vec<Message> {
  tracing::trace!(check = rule.name(), object = object.name(), "dispatching check");

  match invoke_check(rule, object) {
    Ok(findings) => findings
      .into_iter()
      .map(|finding| finding_message(rule, object, file, finding))
      .collect(),
    Err(failure) => {
      tracing::warn!(check = rule.name(), object = object.name(), %failure, "check failed");
      vec![
        Message::new(
          format!("Check '{}' failed: {}", rule.name(), failure),
          Importance::Error,
          rule.name(),
        )
        .with_object(object.type_spec().name(), object.name())
        .with_location(object.location())
        .with_file(file),
      ]
    }
  }
}

thread_local! {
  static IN_CHECK: Cell<bool> = const { Cell::new(false) };
}

/// Clears the in-check flag even when the check unwinds
struct CheckScope;

impl CheckScope {
  fn enter() -> Self {
    IN_CHECK.with(|flag| flag.set(true));
    CheckScope
  }
}

impl Drop for CheckScope {
  fn drop(&mut self) {
    IN_CHECK.with(|flag| flag.set(false));
  }
}

/// Route panics raised inside checks to `tracing` at debug level
///
/// Those panics are already reported as `ERROR` messages. Panics anywhere else
/// still reach the previously installed hook.
pub fn install_panic_hook() {
  let previous = panic::take_hook();
  panic::set_hook(Box::new(move |info| {
    if IN_CHECK.with(Cell::get) {
      tracing::debug!(%info, "check panicked");
    } else {
      previous(info);
    }
  }));
}

/// Call a check with panics contained
pub fn invoke_check(rule: &CheckDescriptor, object: &dyn NwbObject) -> Result<Vec<Finding>, String> {
  panic::catch_unwind(AssertUnwindSafe(|| {
    let _scope = CheckScope::enter();
    rule.call(object)
  }))
  .unwrap_or_else(|payload| Err(panic_message(payload)))
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
  if let Some(text) = payload.downcast_ref::<&str>() {
    format!("panicked: {}", text)
  } else if let Some(text) = payload.downcast_ref::<String>() {
    format!("panicked: {}", text)
  } else {
    "panicked".to_string()
  }
}

fn finding_message(rule: &CheckDescriptor, object: &dyn NwbObject, file: Option<&str>, finding: Finding) -> Message {
  let location = finding.location.or_else(|| object.location().map(String::from));
  Message::new(finding.message, rule.importance(), rule.name())
    .with_severity(finding.severity)
    .with_object(object.type_spec().name(), object.name())
    .with_location(location)
    .with_file(file)
}

/// Validate, read and inspect one session file
///
/// Reader validation issues become `EXTERNAL_VALIDATION` messages. If the file
/// cannot be read at all, the result is one `ERROR` message and no check runs.
pub fn inspect_session(reader: &dyn SessionReader, path: &Path, rules: &[CheckDescriptor]) -> Vec<Message> {
  let file = path.file_name().map(|name| name.to_string_lossy().into_owned());
  let file = file.as_deref();

  let mut messages: Vec<Message> = reader
    .validate(path)
    .into_iter()
    .map(|issue| {
      Message::new(issue.reason, Importance::ExternalValidation, issue.name)
        .with_location(issue.location)
        .with_file(file)
    })
    .collect();

  let nwbfile = match reader.read(path) {
    Ok(nwbfile) => nwbfile,
    Err(err) => {
      tracing::warn!(path = %path.display(), error = %err, "failed to read session");
      messages.push(
        Message::new(err.to_string(), Importance::Error, READ_SESSION)
          .with_object("NWBFile", "root")
          .with_location(Some("/"))
          .with_file(file),
      );
      return messages;
    }
  };

  let objects = nwbfile.objects();
  messages.extend(inspect(&objects, rules, file));
  tracing::debug!(path = %path.display(), messages = messages.len(), "inspected session");
  messages
}

/// Session files at `path`: the file itself, or the reader's files directly inside
/// a directory, sorted by name
pub fn session_paths(path: &Path, reader: &dyn SessionReader) -> InspectorResult<Vec<PathBuf>> {
  if path.is_file() {
    return Ok(vec![path.to_path_buf()]);
  }
  if !path.is_dir() {
    return Err(InspectorError::with_help(
      format!("'{}' is not a session file or a directory", path.display()),
      format!("Pass a {} file or a folder containing them.", reader.extension()),
    ));
  }

  let mut paths = Vec::new();
  for entry in fs::read_dir(path).with_context(|| format!("Failed to list {}", path.display()))? {
    let entry_path = entry?.path();
    let matches = entry_path
      .file_name()
      .is_some_and(|name| name.to_string_lossy().ends_with(reader.extension()));
    if matches && entry_path.is_file() {
      paths.push(entry_path);
    }
  }
  paths.sort();
  Ok(paths)
}

/// Inspect every session at `path` on a pool of `n_jobs` workers
///
/// `n_jobs <= 0` uses rayon's default. Messages are returned in file order.
pub fn inspect_all(
  path: &Path,
  reader: &dyn SessionReader,
  rules: &[CheckDescriptor],
  n_jobs: i32,
) -> InspectorResult<Vec<Message>> {
  inspect_all_with(path, reader, rules, n_jobs, |_| {})
}

/// [`inspect_all`], calling `on_file_done` from the worker after each file
pub fn inspect_all_with<F>(
  path: &Path,
  reader: &dyn SessionReader,
  rules: &[CheckDescriptor],
  n_jobs: i32,
  on_file_done: F,
) -> InspectorResult<Vec<Message>>
where
  F: Fn(&Path) + Send + Sync,
{
  let paths = session_paths(path, reader)?;
  tracing::debug!(files = paths.len(), n_jobs, "inspecting sessions");

  let pool = rayon::ThreadPoolBuilder::new()
    .num_threads(n_jobs.max(0) as usize)
    .build()?;

  let per_file: Vec<Vec<Message>> = pool.install(|| {
    paths
      .par_iter()
      .map(|session| {
        let messages = inspect_session(reader, session, rules);
        on_file_done(session);
        messages
      })
      .collect()
  });

  Ok(per_file.into_iter().flatten().collect())
}
