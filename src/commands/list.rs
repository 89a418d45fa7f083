use crate::checks::ActiveRuleSet;
use crate::commands::inspect::{InspectOptions, active_checks};
use crate::core::error::InspectorResult;

fn format_checks(rules: &ActiveRuleSet) -> Vec<String> {
  let width = rules.iter().map(|r| r.name().len()).max().unwrap_or(0);
  rules
    .iter()
    .map(|rule| {
      format!(
        "{:<width$}  {:<24}  {:<16}  {}",
        rule.name(),
        rule.importance().to_string(),
        rule.target().name(),
        rule.description(),
        width = width
      )
    })
    .collect()
}

/// Print the checks a run with these options would execute
pub fn run_list_checks(options: &InspectOptions) -> InspectorResult<()> {
  let rules = active_checks(options)?;
  println!("{} active checks:\n", rules.len());
  for line in format_checks(&rules) {
    println!("  {}", line);
  }
  Ok(())
}
