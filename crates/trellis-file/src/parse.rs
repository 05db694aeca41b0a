//! Loader: JSON bytes → validated [`Document`].
//!
//! Pipeline:
//!   raw &str / reader
//!     └─ serde_json            → raw::FileDocument
//!          └─ build()          → Document (schema + uid uniqueness)
//!               └─ validate()  → reference, cycle, ownership, containment
//!
//! Every fatal error aborts the load; no partial document escapes.

use std::collections::{HashMap, HashSet};
use std::io;

use trellis_core::{
  document::Document, format::FormatSchema, node::NodeId, template::Template,
};

use crate::{
  LoadOptions,
  error::{Error, Result},
  raw::FileDocument,
};

pub(crate) fn load_str(input: &str, options: LoadOptions) -> Result<Document> {
  let file: FileDocument = serde_json::from_str(input)?;
  build(file, options)
}

pub(crate) fn load_reader<R: io::Read>(
  reader: R,
  options: LoadOptions,
) -> Result<Document> {
  let file: FileDocument = serde_json::from_reader(reader)?;
  build(file, options)
}

// ─── Model construction ──────────────────────────────────────────────────────

fn build(file: FileDocument, options: LoadOptions) -> Result<Document> {
  let mut document = Document::new();

  for raw_format in file.formats {
    let name = raw_format.formatname.clone();
    let mut format = FormatSchema::new(&name);
    format.title_line = Template::parse(&raw_format.titleline);
    format.output_lines = raw_format
      .outputlines
      .iter()
      .map(|line| Template::parse(line))
      .collect();
    format.child_type = raw_format.childtype;
    format.space_between = raw_format.spacebetween.unwrap_or(true);
    format.icon = raw_format.icon;

    for raw_field in raw_format.fields {
      let field_name = raw_field.fieldname.clone();
      format.add_field(raw_field.into_schema()).map_err(|_| {
        Error::DuplicateField {
          format: name.clone(),
          field:  field_name,
        }
      })?;
    }
    document
      .add_format(format)
      .map_err(|_| Error::DuplicateFormat(name))?;
  }

  for raw_node in file.nodes {
    let uid = raw_node.uid.clone();
    document
      .add_node(raw_node.into_node())
      .map_err(|_| Error::DuplicateNode(uid))?;
  }

  document.properties.tlversion = file.properties.tlversion;
  document.properties.extra = file.properties.extra;
  for uid in file.properties.topnodes {
    document
      .add_top_node(uid.clone())
      .map_err(|_| Error::DanglingTopNode(uid))?;
  }

  validate(&document, options)?;
  Ok(document)
}

// ─── Structural validation ───────────────────────────────────────────────────

fn validate(document: &Document, options: LoadOptions) -> Result<()> {
  check_references(document)?;
  check_acyclic(document)?;
  if options.strict {
    check_ownership(document)?;
  }
  check_containment(document, options)?;
  Ok(())
}

/// Every node format and every child uid must resolve.
fn check_references(document: &Document) -> Result<()> {
  for node in document.nodes() {
    if document.format_of(node).is_none() {
      return Err(Error::UnknownFormat {
        uid:    node.uid.clone(),
        format: node.format.clone(),
      });
    }
    for child in &node.children {
      if document.node(child).is_none() {
        return Err(Error::DanglingChild {
          parent: node.uid.clone(),
          child:  child.clone(),
        });
      }
    }
  }
  Ok(())
}

/// Depth-first traversal with a visited set over every node, so cycles are
/// caught even in parts of the graph not reachable from the top nodes.
fn check_acyclic(document: &Document) -> Result<()> {
  #[derive(Clone, Copy, PartialEq)]
  enum State {
    InProgress,
    Done,
  }

  let mut states: HashMap<&NodeId, State> = HashMap::new();

  for start in document.nodes().map(|n| &n.uid) {
    if states.contains_key(start) {
      continue;
    }
    states.insert(start, State::InProgress);
    let mut stack: Vec<(&NodeId, usize)> = vec![(start, 0)];

    while let Some(frame) = stack.last_mut() {
      let (uid, next_child) = (frame.0, frame.1);
      let node = document.node(uid).expect("child refs already validated");

      if let Some(child) = node.children.get(next_child) {
        frame.1 += 1;
        match states.get(child) {
          Some(State::InProgress) => return Err(Error::Cycle(child.clone())),
          Some(State::Done) => {}
          None => {
            states.insert(child, State::InProgress);
            stack.push((child, 0));
          }
        }
      } else {
        states.insert(uid, State::Done);
        stack.pop();
      }
    }
  }
  Ok(())
}

/// Strict mode: every node has at most one structural owner — one parent's
/// child list, or one slot in the top-node list.
fn check_ownership(document: &Document) -> Result<()> {
  let mut child_refs: HashMap<&NodeId, usize> = HashMap::new();
  for node in document.nodes() {
    for child in &node.children {
      *child_refs.entry(child).or_default() += 1;
    }
  }
  for (uid, count) in &child_refs {
    if *count > 1 {
      return Err(Error::SharedChild((*uid).clone()));
    }
  }

  let mut seen_tops: HashSet<&NodeId> = HashSet::new();
  for uid in document.top_nodes() {
    if !seen_tops.insert(uid) {
      return Err(Error::DuplicateTopNode(uid.clone()));
    }
    if child_refs.contains_key(uid) {
      return Err(Error::SharedChild(uid.clone()));
    }
  }
  Ok(())
}

/// The `childtype` containment constraint. Advisory on lenient loads — real
/// documents violate it — so a mismatch only warns unless strict.
fn check_containment(document: &Document, options: LoadOptions) -> Result<()> {
  for node in document.nodes() {
    let format = document
      .format_of(node)
      .expect("format refs already validated");
    let Some(expected) = &format.child_type else {
      continue;
    };
    for child_uid in &node.children {
      let child = document
        .node(child_uid)
        .expect("child refs already validated");
      if &child.format != expected {
        if options.strict {
          return Err(Error::ChildTypeViolation {
            parent:   node.uid.clone(),
            child:    child_uid.clone(),
            expected: expected.clone(),
            found:    child.format.clone(),
          });
        }
        tracing::warn!(
          parent = %node.uid,
          child = %child_uid,
          expected = %expected,
          found = %child.format,
          "childtype containment violation"
        );
      }
    }
  }
  Ok(())
}
