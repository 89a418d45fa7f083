//! Nested grouping of messages for reports

use super::message::{GroupKey, Message, MessageField};
use crate::core::error::{InspectorResult, OrganizeError};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;

/// Messages grouped level by level
///
/// Each `Group` holds its keys in sorted order; each `Leaf` keeps messages in
/// input order.
#[derive(Debug, Clone, PartialEq)]
pub enum OrganizedMessages<'m> {
  Group(Vec<(GroupKey, OrganizedMessages<'m>)>),
  Leaf(Vec<&'m Message>),
}

impl<'m> OrganizedMessages<'m> {
  /// Keys of this group, in order (empty for a leaf)
  pub fn keys(&self) -> impl Iterator<Item = &GroupKey> {
    let groups = match self {
      OrganizedMessages::Group(groups) => groups.as_slice(),
      OrganizedMessages::Leaf(_) => &[],
    };
    groups.iter().map(|(key, _)| key)
  }

  /// Sub-tree under `key`
  pub fn get(&self, key: &GroupKey) -> Option<&OrganizedMessages<'m>> {
    match self {
      OrganizedMessages::Group(groups) => groups.iter().find(|(k, _)| k == key).map(|(_, sub)| sub),
      OrganizedMessages::Leaf(_) => None,
    }
  }

  /// Number of groups, or messages for a leaf
  pub fn len(&self) -> usize {
    match self {
      OrganizedMessages::Group(groups) => groups.len(),
      OrganizedMessages::Leaf(messages) => messages.len(),
    }
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Total messages in this tree
  pub fn message_count(&self) -> usize {
    match self {
      OrganizedMessages::Group(groups) => groups.iter().map(|(_, sub)| sub.message_count()).sum(),
      OrganizedMessages::Leaf(messages) => messages.len(),
    }
  }

  /// All messages, depth first
  pub fn messages(&self) -> Vec<&'m Message> {
    match self {
      OrganizedMessages::Group(groups) => groups.iter().flat_map(|(_, sub)| sub.messages()).collect(),
      OrganizedMessages::Leaf(messages) => messages.clone(),
    }
  }
}

impl Serialize for OrganizedMessages<'_> {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    match self {
      OrganizedMessages::Group(groups) => {
        let mut map = serializer.serialize_map(Some(groups.len()))?;
        for (key, sub) in groups {
          map.serialize_entry(&key.to_string(), sub)?;
        }
        map.end()
      }
      OrganizedMessages::Leaf(messages) => serializer.collect_seq(messages),
    }
  }
}

/// Group `messages` by each of `levels` in turn
///
/// `levels` name message attributes (see [`MessageField`]). `reverse` flips the key
/// order per level; `None` keeps every level ascending.
pub fn organize<'m, S: AsRef<str>>(
  messages: &'m [Message],
  levels: &[S],
  reverse: Option<&[bool]>,
) -> InspectorResult<OrganizedMessages<'m>> {
  if levels.is_empty() {
    return Err(OrganizeError::EmptyLevels.into());
  }

  let fields = levels
    .iter()
    .map(|level| level.as_ref().parse::<MessageField>())
    .collect::<Result<Vec<_>, _>>()?;

  let reverse = match reverse {
    Some(flags) if flags.len() != fields.len() => {
      return Err(
        OrganizeError::ReverseLength {
          levels: fields.len(),
          reverse: flags.len(),
        }
        .into(),
      );
    }
    Some(flags) => flags.to_vec(),
    None => vec![false; fields.len()],
  };

  Ok(partition(messages.iter().collect(), &fields, &reverse))
}

fn partition<'m>(messages: Vec<&'m Message>, fields: &[MessageField], reverse: &[bool]) -> OrganizedMessages<'m> {
  let (Some(&field), Some(&descending)) = (fields.first(), reverse.first()) else {
    return OrganizedMessages::Leaf(messages);
  };

  let mut buckets: BTreeMap<GroupKey, Vec<&'m Message>> = BTreeMap::new();
  for message in messages {
    buckets.entry(message.key(field)).or_default().push(message);
  }

  let mut groups: Vec<_> = buckets
    .into_iter()
    .map(|(key, bucket)| (key, partition(bucket, &fields[1..], &reverse[1..])))
    .collect();
  if descending {
    groups.reverse();
  }
  OrganizedMessages::Group(groups)
}
