//! Text and JSON reports
//!
//! The text report is a header with counts followed by one numbered section per
//! group (`1.`, `1.1`, ...). Messages in a leaf are listed as
//!
//! ```text
//! 1.1.0  TimeSeries 'raw' located in '/acquisition/raw'
//!        check_data_orientation: Data may be in the wrong orientation. ...
//! ```

use crate::checks::Importance;
use crate::core::error::{InspectorError, InspectorResult, ResultExt};
use crate::engine::{Message, OrganizedMessages};
use anstyle::{AnsiColor, Color, Style};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

const BANNER: &str = "*************************************************";

/// Render an organized tree as report lines
pub fn format_organized_results(organized: &OrganizedMessages) -> Vec<String> {
  let messages = organized.messages();
  let mut lines = header(&messages);
  format_tree(organized, "", 0, &mut lines);
  lines
}

fn header(messages: &[&Message]) -> Vec<String> {
  let files: BTreeSet<_> = messages.iter().filter_map(|m| m.file()).collect();
  let mut counts: BTreeMap<Importance, usize> = BTreeMap::new();
  for message in messages {
    *counts.entry(message.importance()).or_default() += 1;
  }

  let mut lines = vec![
    BANNER.to_string(),
    "NWBInspector Report Summary".to_string(),
    String::new(),
    format!("nwb-inspector version: {}", env!("CARGO_PKG_VERSION")),
    String::new(),
    format!(
      "Found {} issue{} over {} file{}:",
      messages.len(),
      if messages.len() == 1 { "" } else { "s" },
      files.len(),
      if files.len() == 1 { "" } else { "s" }
    ),
  ];
  for (importance, count) in counts.iter().rev() {
    lines.push(format!("{:>6} - {}", count, importance));
  }
  lines.push(BANNER.to_string());
  lines.push(String::new());
  lines
}

fn format_tree(tree: &OrganizedMessages, prefix: &str, depth: usize, lines: &mut Vec<String>) {
  match tree {
    OrganizedMessages::Group(groups) => {
      for (i, (key, sub)) in groups.iter().enumerate() {
        let number = if prefix.is_empty() {
          format!("{}", i + 1)
        } else {
          format!("{}.{}", prefix, i + 1)
        };
        let heading = if depth == 0 {
          format!("{}.  {}", number, key)
        } else {
          format!("{}  {}", number, key)
        };
        let underline = match depth {
          0 => Some("="),
          1 => Some("-"),
          _ => None,
        };
        lines.push(heading.clone());
        if let Some(mark) = underline {
          lines.push(mark.repeat(heading.chars().count()));
        }
        lines.push(String::new());
        format_tree(sub, &number, depth + 1, lines);
      }
    }
    OrganizedMessages::Leaf(messages) => {
      for (i, message) in messages.iter().enumerate() {
        let index = format!("{}.{}", prefix, i);
        lines.push(format!(
          "{}  {} '{}' located in '{}'",
          index,
          message.object_type(),
          message.object_name(),
          message.location().unwrap_or("")
        ));
        lines.push(format!("{}{}: {}", " ".repeat(8), message.check_name(), message.message()));
        lines.push(String::new());
      }
    }
  }
}

fn importance_style(importance: Importance) -> Style {
  let color = match importance {
    Importance::Critical | Importance::Error => AnsiColor::Red,
    Importance::BestPracticeViolation | Importance::ExternalValidation => AnsiColor::Yellow,
    Importance::BestPracticeSuggestion => AnsiColor::Cyan,
  };
  Style::new().bold().fg_color(Some(Color::Ansi(color)))
}

/// Style for a heading line naming an importance level
fn line_style(line: &str) -> Option<Style> {
  let (number, text) = line.split_once("  ")?;
  if !number.starts_with(|c: char| c.is_ascii_digit()) {
    return None;
  }
  text.trim().parse::<Importance>().ok().map(importance_style)
}

/// Print report lines to stdout, coloring importance headings
pub fn print_to_console(lines: &[String], no_color: bool) {
  for line in lines {
    match line_style(line).filter(|_| !no_color) {
      Some(style) => println!("{}{}{}", style.render(), line, style.render_reset()),
      None => println!("{}", line),
    }
  }
}

/// Write report lines to `path`
pub fn save_report(path: &Path, lines: &[String], overwrite: bool) -> InspectorResult<()> {
  refuse_existing(path, overwrite)?;
  let mut content = lines.join("\n");
  content.push('\n');
  fs::write(path, content).with_context(|| format!("Failed to write report to {}", path.display()))?;
  Ok(())
}

#[derive(Serialize)]
struct JsonReport<'a> {
  version: &'static str,
  messages: &'a [Message],
}

/// Write every message as JSON to `path`
pub fn save_json(path: &Path, messages: &[Message], overwrite: bool) -> InspectorResult<()> {
  refuse_existing(path, overwrite)?;
  let report = JsonReport {
    version: env!("CARGO_PKG_VERSION"),
    messages,
  };
  let content = serde_json::to_string_pretty(&report)?;
  fs::write(path, content).with_context(|| format!("Failed to write JSON report to {}", path.display()))?;
  Ok(())
}

fn refuse_existing(path: &Path, overwrite: bool) -> InspectorResult<()> {
  if path.exists() && !overwrite {
    return Err(InspectorError::with_help(
      format!("The file {} already exists", path.display()),
      "Pass --overwrite to replace it, or choose a different path.",
    ));
  }
  Ok(())
}
