//! Format schemas — named record types: fields plus display templates.
//!
//! A format owns an ordered field list, one title template, and ordered
//! output (body) templates. Formats are defined once at document load and
//! immutable thereafter; the mutating builders here exist for programmatic
//! document construction.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use regex::Regex;

use crate::{
  Error, Result,
  field::FieldSchema,
  node::Node,
  template::{Segment, Template},
};

/// Field name given to formats created with
/// [`FormatSchema::new_with_default_field`].
const DEFAULT_FIELD_NAME: &str = "Name";

// ─── RenderOptions ───────────────────────────────────────────────────────────

/// Options for [`FormatSchema::format_output`].
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
  /// Keep body lines whose field placeholders all rendered empty. On by
  /// default; turning it off suppresses lines that carry no data (a line
  /// with no placeholders at all is always kept).
  pub keep_blanks: bool,
}

impl Default for RenderOptions {
  fn default() -> Self {
    Self { keep_blanks: true }
  }
}

// ─── FormatSchema ────────────────────────────────────────────────────────────

/// A named record type: its fields and how to render a node of that type.
#[derive(Debug, Clone, PartialEq)]
pub struct FormatSchema {
  pub name:          String,
  fields:            Vec<FieldSchema>,
  pub title_line:    Template,
  pub output_lines:  Vec<Template>,
  /// Declared format name for this format's children. Advisory: the sample
  /// documents in the wild violate it, so only strict validation treats a
  /// mismatch as fatal.
  pub child_type:    Option<String>,
  /// UI hint: whether exported output leaves a blank line between nodes.
  pub space_between: bool,
  /// UI hint: icon name shown beside nodes of this format.
  pub icon:          Option<String>,
}

impl FormatSchema {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name:          name.into(),
      fields:        Vec::new(),
      title_line:    Template::default(),
      output_lines:  Vec::new(),
      child_type:    None,
      space_between: true,
      icon:          None,
    }
  }

  /// A format with a single `Name` text field used for both title and
  /// output — the shape given to freshly created types.
  pub fn new_with_default_field(name: impl Into<String>) -> Self {
    let mut format = Self::new(name);
    format
      .add_field(FieldSchema::text(DEFAULT_FIELD_NAME))
      .expect("first field cannot collide");
    let line = format!("{{*{DEFAULT_FIELD_NAME}*}}");
    format.set_title_line(&line);
    format.set_output_lines(&[line.as_str()]);
    format
  }

  // ── Fields ──────────────────────────────────────────────────────────────

  /// Append a field. Field names are unique within a format.
  pub fn add_field(&mut self, field: FieldSchema) -> Result<()> {
    if self.field(&field.name).is_some() {
      return Err(Error::DuplicateField {
        format: self.name.clone(),
        field:  field.name,
      });
    }
    self.fields.push(field);
    Ok(())
  }

  pub fn field(&self, name: &str) -> Option<&FieldSchema> {
    self.fields.iter().find(|f| f.name == name)
  }

  /// Fields in declaration (display) order.
  pub fn fields(&self) -> &[FieldSchema] {
    &self.fields
  }

  pub fn field_names(&self) -> impl Iterator<Item = &str> {
    self.fields.iter().map(|f| f.name.as_str())
  }

  // ── Templates ───────────────────────────────────────────────────────────

  pub fn set_title_line(&mut self, text: &str) {
    self.title_line = Template::parse(text);
  }

  /// Replace the output templates. Lines that parse to nothing are dropped.
  pub fn set_output_lines(&mut self, lines: &[&str]) {
    self.output_lines = lines
      .iter()
      .map(|line| Template::parse(line))
      .filter(|t| !t.is_empty())
      .collect();
  }

  pub fn add_output_line(&mut self, line: &str) {
    let template = Template::parse(line);
    if !template.is_empty() {
      self.output_lines.push(template);
    }
  }

  // ── Rendering ───────────────────────────────────────────────────────────

  /// The node's resolved title: the title template resolved once, trimmed,
  /// truncated at the first newline carried in by field data.
  pub fn format_title(&self, node: &Node) -> String {
    let resolved = self.title_line.resolve(self, node);
    resolved.trim().lines().next().unwrap_or("").to_string()
  }

  /// The node's resolved body lines, in declared order.
  pub fn format_output(
    &self,
    node: &Node,
    options: RenderOptions,
  ) -> Vec<String> {
    let mut lines = Vec::with_capacity(self.output_lines.len());
    for template in &self.output_lines {
      let line = template.resolve_counted(self, node);
      if options.keep_blanks || line.full_fields > 0 || line.empty_fields == 0
      {
        lines.push(line.text);
      }
    }
    lines
  }

  // ── Node construction ───────────────────────────────────────────────────

  /// Initial data for a new node of this format, from fields' `init`
  /// defaults.
  pub fn default_data(&self) -> BTreeMap<String, String> {
    self
      .fields
      .iter()
      .filter(|f| !f.init_default.is_empty())
      .map(|f| (f.name.clone(), f.init_default.clone()))
      .collect()
  }

  // ── Title extraction ────────────────────────────────────────────────────

  /// Write an edited title string back into `data` by matching it against
  /// the title template. Returns false (and leaves `data` untouched) when
  /// the title does not fit the template or a captured value is invalid for
  /// its field.
  ///
  /// When the template's literal separators are only whitespace and the
  /// strict match fails, the whole title is assigned to the first field and
  /// the remaining fields are cleared.
  pub fn extract_title_data(
    &self,
    title: &str,
    data: &mut BTreeMap<String, String>,
  ) -> bool {
    let mut fields: Vec<&FieldSchema> = Vec::new();
    let mut pattern = String::from("^");
    let mut separator_text = String::new();

    for segment in self.title_line.segments() {
      match segment {
        Segment::Field(name) => match self.field(name) {
          Some(field) => {
            fields.push(field);
            pattern.push_str("(.*)");
          }
          None => {
            let literal = format!("{{*{name}*}}");
            pattern.push_str(&regex::escape(&literal));
            separator_text.push_str(&literal);
          }
        },
        Segment::Literal(text) => {
          pattern.push_str(&regex::escape(text));
          separator_text.push_str(text);
        }
      }
    }
    if fields.is_empty() {
      return false;
    }

    let Ok(re) = Regex::new(&pattern) else {
      return false;
    };
    if let Some(caps) = re.captures(title) {
      let mut values = Vec::with_capacity(fields.len());
      for (i, field) in fields.iter().enumerate() {
        let captured = caps.get(i + 1).map(|m| m.as_str()).unwrap_or("");
        match field.stored_text_from_title(captured) {
          Some(value) => values.push(value),
          None => return false,
        }
      }
      for (field, value) in fields.iter().zip(values) {
        data.insert(field.name.clone(), value);
      }
      return true;
    }

    // Fall back only when the separators carry no visible text.
    if separator_text.trim().is_empty() {
      if let Some(value) = fields[0].stored_text_from_title(title) {
        data.insert(fields[0].name.clone(), value);
        for field in &fields[1..] {
          data.insert(field.name.clone(), String::new());
        }
        return true;
      }
    }
    false
  }

  // ── Sorting ─────────────────────────────────────────────────────────────

  /// Fields that participate in sorting, in ascending `sortkeynum` order.
  pub fn sort_fields(&self) -> Vec<&FieldSchema> {
    let mut keyed: Vec<&FieldSchema> =
      self.fields.iter().filter(|f| f.sort_key_num > 0).collect();
    keyed.sort_by_key(|f| f.sort_key_num);
    keyed
  }

  /// Total order over nodes of this format, by each sort-key field's
  /// natural ordering. All keys equal yields `Equal`; pair with a stable
  /// sort so input order breaks ties.
  pub fn compare_nodes(&self, a: &Node, b: &Node) -> Ordering {
    for field in self.sort_fields() {
      let va = field.sort_value(a.field_text(&field.name));
      let vb = field.sort_value(b.field_text(&field.name));
      let mut ordering = va.compare(&vb);
      if !field.sort_forward {
        ordering = ordering.reverse();
      }
      if ordering != Ordering::Equal {
        return ordering;
      }
    }
    Ordering::Equal
  }

  /// Stable in-place sort of same-format nodes.
  pub fn sort_nodes(&self, nodes: &mut [&Node]) {
    nodes.sort_by(|a, b| self.compare_nodes(a, b));
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
