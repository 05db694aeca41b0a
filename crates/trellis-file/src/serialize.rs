//! Serializer: [`Document`] → JSON text.
//!
//! Emits the same three-key shape the loader reads. Formats and nodes are
//! written in model (name / uid) order and default-valued option keys are
//! omitted, so loading the output again yields a structurally identical
//! document.

use std::io;

use trellis_core::document::Document;

use crate::{
  error::Result,
  raw::{FileDocument, FileFormat, FileNode, FileProperties},
};

fn to_file(document: &Document) -> FileDocument {
  FileDocument {
    formats:    document.formats().map(FileFormat::from_schema).collect(),
    nodes:      document.nodes().map(FileNode::from_node).collect(),
    properties: FileProperties {
      tlversion: document.properties.tlversion.clone(),
      topnodes:  document.top_nodes().to_vec(),
      extra:     document.properties.extra.clone(),
    },
  }
}

pub(crate) fn to_string(document: &Document) -> Result<String> {
  Ok(serde_json::to_string_pretty(&to_file(document))?)
}

pub(crate) fn to_writer<W: io::Write>(
  document: &Document,
  writer: W,
) -> Result<()> {
  Ok(serde_json::to_writer_pretty(writer, &to_file(document))?)
}
