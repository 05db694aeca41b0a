//! Error types for `trellis-core`.

use thiserror::Error;

use crate::node::NodeId;

#[derive(Debug, Error)]
pub enum Error {
  #[error("duplicate format name: {0}")]
  DuplicateFormat(String),

  #[error("duplicate field {field} in format {format}")]
  DuplicateField { format: String, field: String },

  #[error("duplicate node uid: {0}")]
  DuplicateNode(NodeId),

  #[error("unknown format name: {0}")]
  UnknownFormat(String),

  #[error("node not found: {0}")]
  NodeNotFound(NodeId),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
