//! Node — one record instance in the tree.
//!
//! A node holds only its identity, its format name, a field-value map, and
//! the ordered uids of its children. Children are weak references resolved
//! through the owning [`crate::document::Document`]'s node table, never
//! embedded substructures.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── NodeId ──────────────────────────────────────────────────────────────────

/// Stable node identity. Stored as an opaque string; newly created nodes get
/// a simple-format (no hyphens) v4 UUID, matching the uids found in existing
/// documents.
#[derive(
  Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
  pub fn new(id: impl Into<String>) -> Self {
    Self(id.into())
  }

  pub fn random() -> Self {
    Self(Uuid::new_v4().simple().to_string())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for NodeId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<&str> for NodeId {
  fn from(id: &str) -> Self {
    Self(id.to_string())
  }
}

// ─── Node ────────────────────────────────────────────────────────────────────

/// One record in the document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
  pub uid:      NodeId,
  /// Name of the owning [`crate::format::FormatSchema`].
  pub format:   String,
  /// Stored field values. Keys are a subset of the format's field names;
  /// a missing key renders as an empty value.
  pub data:     BTreeMap<String, String>,
  /// Ordered child uids, resolved through the document's node table.
  pub children: Vec<NodeId>,
}

impl Node {
  /// A new empty node with a freshly generated uid.
  pub fn new(format: impl Into<String>) -> Self {
    Self {
      uid:      NodeId::random(),
      format:   format.into(),
      data:     BTreeMap::new(),
      children: Vec::new(),
    }
  }

  /// The stored text for `field`, or `""` when absent.
  pub fn field_text(&self, field: &str) -> &str {
    self.data.get(field).map(String::as_str).unwrap_or("")
  }

  pub fn set_field(
    &mut self,
    field: impl Into<String>,
    value: impl Into<String>,
  ) {
    self.data.insert(field.into(), value.into());
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn generated_uids_are_simple_format() {
    let node = Node::new("PERSON");
    assert_eq!(node.uid.as_str().len(), 32);
    assert!(node.uid.as_str().chars().all(|c| c.is_ascii_hexdigit()));
  }

  #[test]
  fn missing_field_reads_as_empty() {
    let mut node = Node::new("PERSON");
    assert_eq!(node.field_text("FirstName"), "");
    node.set_field("FirstName", "John");
    assert_eq!(node.field_text("FirstName"), "John");
  }
}
