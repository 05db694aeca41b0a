//! Document — the loaded forest plus its format schemas.
//!
//! Nodes live in a single uid-keyed table; every structural traversal
//! (children, top-level roots, computed parents) resolves uids through that
//! table rather than holding owning pointers, so a node reachable from
//! several places is stored exactly once.

use std::collections::BTreeMap;

use crate::{
  Error, Result,
  format::FormatSchema,
  node::{Node, NodeId},
};

// ─── Properties ──────────────────────────────────────────────────────────────

/// Free-form document metadata. `tlversion` is the writing tool's format
/// version string; anything else found in the file is preserved untouched
/// for round-tripping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties {
  pub tlversion: String,
  pub extra:     BTreeMap<String, serde_json::Value>,
}

// ─── Document ────────────────────────────────────────────────────────────────

/// An immutable-after-load outline document: format schemas, the node table,
/// and the ordered forest roots.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
  formats:   BTreeMap<String, FormatSchema>,
  nodes:     BTreeMap<NodeId, Node>,
  top_nodes: Vec<NodeId>,
  pub properties: Properties,
}

impl Document {
  pub fn new() -> Self {
    Self::default()
  }

  // ── Formats ─────────────────────────────────────────────────────────────

  /// Register a format schema. Format names are globally unique.
  pub fn add_format(&mut self, format: FormatSchema) -> Result<()> {
    if self.formats.contains_key(&format.name) {
      return Err(Error::DuplicateFormat(format.name));
    }
    self.formats.insert(format.name.clone(), format);
    Ok(())
  }

  pub fn format(&self, name: &str) -> Option<&FormatSchema> {
    self.formats.get(name)
  }

  /// All format schemas, in name order.
  pub fn formats(&self) -> impl Iterator<Item = &FormatSchema> {
    self.formats.values()
  }

  /// The schema a node is tagged with.
  pub fn format_of(&self, node: &Node) -> Option<&FormatSchema> {
    self.formats.get(&node.format)
  }

  // ── Nodes ───────────────────────────────────────────────────────────────

  /// Insert a node into the table. Uids are globally unique.
  pub fn add_node(&mut self, node: Node) -> Result<()> {
    if self.nodes.contains_key(&node.uid) {
      return Err(Error::DuplicateNode(node.uid));
    }
    self.nodes.insert(node.uid.clone(), node);
    Ok(())
  }

  pub fn node(&self, uid: &NodeId) -> Option<&Node> {
    self.nodes.get(uid)
  }

  /// All nodes, in uid order.
  pub fn nodes(&self) -> impl Iterator<Item = &Node> {
    self.nodes.values()
  }

  pub fn node_count(&self) -> usize {
    self.nodes.len()
  }

  /// A node's children in declared order. Uids that no longer resolve are
  /// skipped; a validated document has none.
  pub fn children_of<'a>(&'a self, node: &'a Node) -> Vec<&'a Node> {
    node
      .children
      .iter()
      .filter_map(|uid| self.nodes.get(uid))
      .collect()
  }

  /// Uids of every node holding `uid` in its child list. Empty for roots.
  pub fn parents_of(&self, uid: &NodeId) -> Vec<&NodeId> {
    self
      .nodes
      .values()
      .filter(|n| n.children.contains(uid))
      .map(|n| &n.uid)
      .collect()
  }

  /// The node's resolved title, or `None` when its format is unknown.
  pub fn node_title(&self, uid: &NodeId) -> Option<String> {
    let node = self.node(uid)?;
    Some(self.format_of(node)?.format_title(node))
  }

  // ── Roots ───────────────────────────────────────────────────────────────

  pub fn top_nodes(&self) -> &[NodeId] {
    &self.top_nodes
  }

  /// Append an existing node to the forest's root list.
  pub fn add_top_node(&mut self, uid: NodeId) -> Result<()> {
    if !self.nodes.contains_key(&uid) {
      return Err(Error::NodeNotFound(uid));
    }
    self.top_nodes.push(uid);
    Ok(())
  }

  // ── Construction ────────────────────────────────────────────────────────

  /// Create an empty node of `format_name`, seeded from the format's field
  /// `init` defaults, attached under `parent` or as a new root.
  pub fn new_node(
    &mut self,
    format_name: &str,
    parent: Option<&NodeId>,
  ) -> Result<NodeId> {
    let format = self
      .formats
      .get(format_name)
      .ok_or_else(|| Error::UnknownFormat(format_name.to_string()))?;

    let mut node = Node::new(format_name);
    node.data = format.default_data();
    let uid = node.uid.clone();

    match parent {
      Some(parent_uid) => {
        if !self.nodes.contains_key(parent_uid) {
          return Err(Error::NodeNotFound(parent_uid.clone()));
        }
        self.nodes.insert(uid.clone(), node);
        self
          .nodes
          .get_mut(parent_uid)
          .expect("parent presence just checked")
          .children
          .push(uid.clone());
      }
      None => {
        self.nodes.insert(uid.clone(), node);
        self.top_nodes.push(uid.clone());
      }
    }
    Ok(uid)
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
