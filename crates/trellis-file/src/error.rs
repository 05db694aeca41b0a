//! Error types for the trellis-file codec.
//!
//! Every variant other than `ChildTypeViolation`, `SharedChild`, and
//! `DuplicateTopNode` is fatal in both lenient and strict loads; those three
//! are raised only under [`crate::LoadOptions::strict`].

use thiserror::Error;
use trellis_core::node::NodeId;

#[derive(Debug, Error)]
pub enum Error {
  #[error("malformed document: {0}")]
  Parse(#[from] serde_json::Error),

  #[error("duplicate format name: {0}")]
  DuplicateFormat(String),

  #[error("duplicate field {field} in format {format}")]
  DuplicateField { format: String, field: String },

  #[error("duplicate node uid: {0}")]
  DuplicateNode(NodeId),

  #[error("node {uid} references unknown format {format}")]
  UnknownFormat { uid: NodeId, format: String },

  #[error("node {parent} references missing child {child}")]
  DanglingChild { parent: NodeId, child: NodeId },

  #[error("top node list references missing node {0}")]
  DanglingTopNode(NodeId),

  #[error("children graph contains a cycle through {0}")]
  Cycle(NodeId),

  #[error(
    "child {child} of {parent} has format {found}, expected {expected}"
  )]
  ChildTypeViolation {
    parent:   NodeId,
    child:    NodeId,
    expected: String,
    found:    String,
  },

  #[error("node {0} appears under more than one parent")]
  SharedChild(NodeId),

  #[error("duplicate top node: {0}")]
  DuplicateTopNode(NodeId),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
