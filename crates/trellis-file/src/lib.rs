//! JSON codec for Trellis outline documents.
//!
//! Converts between the serialized three-key document form (`formats`,
//! `nodes`, `properties`) and [`trellis_core`] model types. Pure and
//! synchronous; loading validates the whole structure before any document is
//! returned, and saving produces a file that loads back structurally
//! identical.
//!
//! # Quick start
//!
//! ```
//! let input = r#"{
//!   "formats": [{"formatname": "NOTE",
//!                "fields": [{"fieldname": "Name"}],
//!                "titleline": "{*Name*}"}],
//!   "nodes": [{"format": "NOTE", "uid": "a1", "data": {"Name": "hello"}}],
//!   "properties": {"tlversion": "0.1", "topnodes": ["a1"]}
//! }"#;
//!
//! let doc = trellis_file::load_str(input).unwrap();
//! let root = &doc.top_nodes()[0];
//! assert_eq!(doc.node_title(root).as_deref(), Some("hello"));
//! ```

use std::io;

use trellis_core::document::Document;

pub mod error;
mod parse;
mod raw;
mod serialize;

#[cfg(test)]
mod tests;

pub use error::{Error, Result};

// ─── Load options ────────────────────────────────────────────────────────────

/// Validation policy for a load.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadOptions {
  /// Treat `childtype` containment violations and ownership anomalies
  /// (a node under two parents, duplicate top-node entries) as fatal.
  /// Off by default; lenient loads log them at warn level instead.
  pub strict: bool,
}

// ─── Public API ──────────────────────────────────────────────────────────────

/// Load a document with default (lenient) validation.
pub fn load_str(input: &str) -> Result<Document> {
  parse::load_str(input, LoadOptions::default())
}

/// Load a document with an explicit validation policy.
pub fn load_str_with(input: &str, options: LoadOptions) -> Result<Document> {
  parse::load_str(input, options)
}

/// Load a document from a reader with default (lenient) validation.
pub fn load_reader<R: io::Read>(reader: R) -> Result<Document> {
  parse::load_reader(reader, LoadOptions::default())
}

/// Load a document from a reader with an explicit validation policy.
pub fn load_reader_with<R: io::Read>(
  reader: R,
  options: LoadOptions,
) -> Result<Document> {
  parse::load_reader(reader, options)
}

/// Serialize a document as pretty-printed JSON.
pub fn save_string(document: &Document) -> Result<String> {
  serialize::to_string(document)
}

/// Serialize a document to a writer.
pub fn save_writer<W: io::Write>(
  document: &Document,
  writer: W,
) -> Result<()> {
  serialize::to_writer(document, writer)
}
