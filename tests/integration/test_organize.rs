//! Integration tests for grouping messages into report trees

use anyhow::Result;
use nwb_inspector::checks::{Importance, Severity};
use nwb_inspector::core::error::{InspectorError, OrganizeError};
use nwb_inspector::engine::{GroupKey, Message, OrganizedMessages, organize};

fn messages() -> Vec<Message> {
  vec![
    Message::new("test1", Importance::BestPracticeSuggestion, "fun1")
      .with_object("ElectricalSeries", "ts1")
      .with_location(Some("/acquisition/"))
      .with_file(Some("file1.nwb")),
    Message::new("test2", Importance::Critical, "fun2")
      .with_object("DynamicTable", "tab")
      .with_location(Some("/acquisition/"))
      .with_file(Some("file1.nwb")),
    Message::new("test3", Importance::BestPracticeSuggestion, "fun3")
      .with_severity(Some(Severity::High))
      .with_object("NWBFile", "root")
      .with_location(Some("/"))
      .with_file(Some("file2.nwb")),
    Message::new("test4", Importance::Critical, "fun2")
      .with_object("ElectricalSeries", "ts1")
      .with_location(Some("/processing/ecephys/LFP/"))
      .with_file(Some("file3.nwb")),
  ]
}

fn texts(tree: &OrganizedMessages) -> Vec<String> {
  tree.messages().iter().map(|m| m.message().to_string()).collect()
}

fn file(name: &str) -> GroupKey {
  GroupKey::text(Some(name))
}

#[test]
fn test_message_is_not_a_level() -> Result<()> {
  let messages = messages();
  let err = organize(&messages, &["message"], None).unwrap_err();
  assert!(matches!(
    err,
    InspectorError::Organize(OrganizeError::IllegalLevel { ref name }) if name == "message"
  ));
  assert!(err.to_string().contains("not including the text message"));
  Ok(())
}

#[test]
fn test_file_by_importance() -> Result<()> {
  let messages = messages();
  let organized = organize(&messages, &["file", "importance"], None)?;

  let files: Vec<_> = organized.keys().cloned().collect();
  assert_eq!(files, vec![file("file1.nwb"), file("file2.nwb"), file("file3.nwb")]);

  let file1 = organized.get(&file("file1.nwb")).expect("file1 group");
  let importances: Vec<_> = file1.keys().cloned().collect();
  assert_eq!(
    importances,
    vec![
      GroupKey::Importance(Importance::BestPracticeSuggestion),
      GroupKey::Importance(Importance::Critical)
    ]
  );
  let critical = file1.get(&GroupKey::Importance(Importance::Critical)).expect("critical group");
  assert_eq!(texts(critical), vec!["test2"]);

  let file2 = organized.get(&file("file2.nwb")).expect("file2 group");
  assert_eq!(texts(file2), vec!["test3"]);
  assert_eq!(organized.message_count(), 4);
  Ok(())
}

#[test]
fn test_importance_by_file_descending() -> Result<()> {
  let messages = messages();
  let organized = organize(&messages, &["importance", "file"], Some(&[true, false][..]))?;

  let importances: Vec<_> = organized.keys().map(|k| k.to_string()).collect();
  assert_eq!(importances, vec!["CRITICAL", "BEST_PRACTICE_SUGGESTION"]);

  let critical = organized.get(&GroupKey::Importance(Importance::Critical)).expect("critical group");
  let files: Vec<_> = critical.keys().map(|k| k.to_string()).collect();
  assert_eq!(files, vec!["file1.nwb", "file3.nwb"]);
  assert_eq!(texts(critical), vec!["test2", "test4"]);
  Ok(())
}

#[test]
fn test_importance_ascending_files_descending() -> Result<()> {
  let messages = messages();
  let organized = organize(&messages, &["importance", "file"], Some(&[false, true][..]))?;

  let importances: Vec<_> = organized.keys().map(|k| k.to_string()).collect();
  assert_eq!(importances, vec!["BEST_PRACTICE_SUGGESTION", "CRITICAL"]);

  let suggestion = organized
    .get(&GroupKey::Importance(Importance::BestPracticeSuggestion))
    .expect("suggestion group");
  let files: Vec<_> = suggestion.keys().map(|k| k.to_string()).collect();
  assert_eq!(files, vec!["file2.nwb", "file1.nwb"]);

  let critical = organized.get(&GroupKey::Importance(Importance::Critical)).expect("critical group");
  let files: Vec<_> = critical.keys().map(|k| k.to_string()).collect();
  assert_eq!(files, vec!["file3.nwb", "file1.nwb"]);
  assert_eq!(texts(critical), vec!["test4", "test2"]);
  Ok(())
}

#[test]
fn test_check_function_name_alias() -> Result<()> {
  let messages = messages();
  let by_alias = organize(&messages, &["check_function_name"], None)?;
  let by_name = organize(&messages, &["check_name"], None)?;
  assert_eq!(by_alias, by_name);

  let fun2 = by_name.get(&GroupKey::text(Some("fun2"))).expect("fun2 group");
  assert_eq!(texts(fun2), vec!["test2", "test4"]);
  Ok(())
}

#[test]
fn test_three_levels_leaf_order() -> Result<()> {
  let messages = messages();
  let organized = organize(&messages, &["object_name", "object_type", "location"], None)?;

  let ts1 = organized.get(&GroupKey::text(Some("ts1"))).expect("ts1 group");
  let electrical = ts1.get(&GroupKey::text(Some("ElectricalSeries"))).expect("type group");
  let locations: Vec<_> = electrical.keys().map(|k| k.to_string()).collect();
  assert_eq!(locations, vec!["/acquisition/", "/processing/ecephys/LFP/"]);
  assert_eq!(texts(electrical), vec!["test1", "test4"]);
  Ok(())
}

#[test]
fn test_every_message_lands_in_one_leaf() -> Result<()> {
  let messages = messages();
  for levels in [
    vec!["severity"],
    vec!["file", "severity"],
    vec!["location", "check_name", "importance"],
  ] {
    let organized = organize(&messages, &levels, None)?;
    let mut seen = texts(&organized);
    seen.sort();
    assert_eq!(seen, vec!["test1", "test2", "test3", "test4"]);
  }
  Ok(())
}

#[test]
fn test_organized_tree_serializes() -> Result<()> {
  let messages = messages();
  let organized = organize(&messages, &["file", "importance"], None)?;
  let json = serde_json::to_value(&organized)?;
  assert_eq!(json["file1.nwb"]["CRITICAL"][0]["message"], "test2");
  assert_eq!(json["file3.nwb"]["CRITICAL"][0]["location"], "/processing/ecephys/LFP/");
  Ok(())
}
