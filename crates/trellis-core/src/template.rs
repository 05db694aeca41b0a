//! Display templates — literal text with embedded field placeholders.
//!
//! Placeholder syntax is the field name wrapped in `{*` … `*}`. There is no
//! escape mechanism; text that does not scan as a placeholder (including
//! names with characters outside `[A-Za-z0-9_.-]`) stays literal. A template
//! is parsed once when its format schema is built, then resolved per node.

use std::sync::LazyLock;

use regex::Regex;

use crate::{format::FormatSchema, node::Node};

static FIELD_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"\{\*([A-Za-z0-9_.\-]+)\*\}").unwrap());

// ─── Segments ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
  Literal(String),
  Field(String),
}

/// A parsed template line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Template {
  segments: Vec<Segment>,
}

/// A resolved line plus how many field placeholders rendered non-empty and
/// empty. The counts drive blank-line suppression in
/// [`FormatSchema::format_output`](crate::format::FormatSchema::format_output).
pub struct ResolvedLine {
  pub text:         String,
  pub full_fields:  usize,
  pub empty_fields: usize,
}

impl Template {
  /// Parse a raw format line into literal and field segments.
  ///
  /// Runs of whitespace in the source are collapsed to single spaces, so a
  /// reassembled line is normalised rather than byte-identical.
  pub fn parse(text: &str) -> Self {
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut segments = Vec::new();
    let mut last = 0;

    for caps in FIELD_RE.captures_iter(&text) {
      let whole = caps.get(0).expect("capture 0 always present");
      if whole.start() > last {
        segments.push(Segment::Literal(text[last..whole.start()].to_string()));
      }
      segments.push(Segment::Field(caps[1].to_string()));
      last = whole.end();
    }
    if last < text.len() {
      segments.push(Segment::Literal(text[last..].to_string()));
    }

    Self { segments }
  }

  pub fn segments(&self) -> &[Segment] {
    &self.segments
  }

  pub fn is_empty(&self) -> bool {
    self.segments.is_empty()
  }

  /// The template's source text, with placeholders re-embedded.
  pub fn source(&self) -> String {
    let mut out = String::new();
    for segment in &self.segments {
      match segment {
        Segment::Literal(text) => out.push_str(text),
        Segment::Field(name) => {
          out.push_str("{*");
          out.push_str(name);
          out.push_str("*}");
        }
      }
    }
    out
  }

  /// Resolve against one node's data. A placeholder naming a field the
  /// format does not declare is copied back as literal text.
  pub fn resolve(&self, format: &FormatSchema, node: &Node) -> String {
    self.resolve_counted(format, node).text
  }

  pub(crate) fn resolve_counted(
    &self,
    format: &FormatSchema,
    node: &Node,
  ) -> ResolvedLine {
    let mut text = String::new();
    let mut full_fields = 0;
    let mut empty_fields = 0;

    for segment in &self.segments {
      match segment {
        Segment::Literal(literal) => text.push_str(literal),
        Segment::Field(name) => match format.field(name) {
          Some(field) => {
            let rendered = field.render(node.field_text(name));
            if rendered.is_empty() {
              empty_fields += 1;
            } else {
              full_fields += 1;
            }
            text.push_str(&rendered);
          }
          None => {
            text.push_str("{*");
            text.push_str(name);
            text.push_str("*}");
          }
        },
      }
    }

    ResolvedLine {
      text,
      full_fields,
      empty_fields,
    }
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
