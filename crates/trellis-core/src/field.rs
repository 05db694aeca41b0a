//! Field schemas — the typed, named attributes of a format.
//!
//! A field schema describes how one attribute of a node is stored, rendered,
//! and compared. Stored values are always strings; the field type decides how
//! a value is interpreted at render and sort time, never at store time.

use std::fmt::Write as _;

use chrono::{NaiveDate, format::Item, format::StrftimeItems};
use serde::{Deserialize, Serialize};

use crate::sort::SortValue;

/// Rendered in place of a stored value that fails its field's constraint
/// (e.g. a Choice value outside the permitted list).
pub const ERROR_TEXT: &str = "#####";

const ISO_DATE: &str = "%Y-%m-%d";

// ─── FieldType ───────────────────────────────────────────────────────────────

/// How a field's stored string is interpreted.
///
/// Any type name not recognised here is carried as [`FieldType::Other`] and
/// behaves exactly like `Text` — documents from newer tools load rather than
/// failing closed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldType {
  Text,
  Date,
  Number,
  Boolean,
  Choice,
  Other(String),
}

impl FieldType {
  /// Map a `fieldtype` string from a document file.
  pub fn from_name(name: &str) -> Self {
    match name {
      "Text" => Self::Text,
      "Date" => Self::Date,
      "Number" => Self::Number,
      "Boolean" => Self::Boolean,
      "Choice" => Self::Choice,
      other => Self::Other(other.to_string()),
    }
  }

  /// The `fieldtype` string written back to a document file.
  pub fn name(&self) -> &str {
    match self {
      Self::Text => "Text",
      Self::Date => "Date",
      Self::Number => "Number",
      Self::Boolean => "Boolean",
      Self::Choice => "Choice",
      Self::Other(name) => name,
    }
  }
}

// ─── FieldSchema ─────────────────────────────────────────────────────────────

/// One named, typed attribute of a format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSchema {
  pub name:         String,
  pub field_type:   FieldType,
  /// Type-specific display pattern: a strftime pattern for `Date`, a
  /// `#.##`-style pattern for `Number`, a `/`-separated value list for
  /// `Choice` and `Boolean`.
  pub format:       Option<String>,
  /// Wrapped around the rendered value only when it is non-empty.
  pub prefix:       String,
  pub suffix:       String,
  /// Initial stored value for newly created nodes.
  pub init_default: String,
  /// Secondary sort precedence across this format's fields; 0 means the
  /// field is not a sort key. Values need not be contiguous.
  pub sort_key_num: u32,
  /// When false, this sort key orders descending.
  pub sort_forward: bool,
}

impl FieldSchema {
  pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
    Self {
      name: name.into(),
      field_type,
      format: None,
      prefix: String::new(),
      suffix: String::new(),
      init_default: String::new(),
      sort_key_num: 0,
      sort_forward: true,
    }
  }

  /// Shorthand for a plain text field.
  pub fn text(name: impl Into<String>) -> Self {
    Self::new(name, FieldType::Text)
  }

  pub fn with_format(mut self, format: impl Into<String>) -> Self {
    self.format = Some(format.into());
    self
  }

  pub fn with_sort_key(mut self, num: u32) -> Self {
    self.sort_key_num = num;
    self
  }

  // ── Rendering ───────────────────────────────────────────────────────────

  /// Render a stored value for display.
  ///
  /// An empty stored value renders empty, without prefix or suffix. A value
  /// that fails to parse under its type renders as the raw stored text (a
  /// recoverable condition, logged at warn level), except `Choice`, which
  /// renders [`ERROR_TEXT`] for values outside the permitted list.
  pub fn render(&self, stored: &str) -> String {
    if stored.is_empty() {
      return String::new();
    }
    let value = self.format_value(stored);
    format!("{}{}{}", self.prefix, value, self.suffix)
  }

  fn format_value(&self, stored: &str) -> String {
    match &self.field_type {
      FieldType::Text | FieldType::Other(_) => stored.to_string(),
      FieldType::Date => self.format_date(stored),
      FieldType::Number => self.format_number(stored),
      FieldType::Boolean => self.format_boolean(stored),
      FieldType::Choice => self.format_choice(stored),
    }
  }

  fn format_date(&self, stored: &str) -> String {
    let Ok(date) = NaiveDate::parse_from_str(stored.trim(), ISO_DATE) else {
      tracing::warn!(
        field = %self.name,
        value = %stored,
        "date value is not an ISO calendar date; using raw text"
      );
      return stored.to_string();
    };
    let Some(pattern) = &self.format else {
      return stored.to_string();
    };

    let items: Vec<Item> = StrftimeItems::new(pattern).collect();
    let mut out = String::new();
    if items.iter().any(|item| matches!(item, Item::Error))
      || write!(out, "{}", date.format_with_items(items.iter())).is_err()
    {
      tracing::warn!(
        field = %self.name,
        pattern = %pattern,
        "invalid date display pattern; using raw text"
      );
      return stored.to_string();
    }
    out
  }

  fn format_number(&self, stored: &str) -> String {
    let Ok(value) = stored.trim().parse::<f64>() else {
      tracing::warn!(
        field = %self.name,
        value = %stored,
        "number value does not parse; using raw text"
      );
      return stored.to_string();
    };
    match self.format.as_deref().and_then(number_precision) {
      Some(precision) => format!("{value:.precision$}"),
      None => format!("{value}"),
    }
  }

  fn format_boolean(&self, stored: &str) -> String {
    let Some(value) = parse_boolean(stored) else {
      tracing::warn!(
        field = %self.name,
        value = %stored,
        "boolean value does not parse; using raw text"
      );
      return stored.to_string();
    };
    let choices = self
      .format
      .as_deref()
      .map(split_choices)
      .filter(|c| c.len() >= 2);
    match choices {
      Some(c) if value => c[0].clone(),
      Some(c) => c[1].clone(),
      None if value => "yes".to_string(),
      None => "no".to_string(),
    }
  }

  fn format_choice(&self, stored: &str) -> String {
    let choices = self.format.as_deref().map(split_choices).unwrap_or_default();
    if choices.iter().any(|c| c == stored) {
      stored.to_string()
    } else {
      ERROR_TEXT.to_string()
    }
  }

  // ── Sorting ─────────────────────────────────────────────────────────────

  /// The comparison value for a stored string under this field's type.
  /// Values that fail to parse compare as case-folded text.
  pub fn sort_value(&self, stored: &str) -> SortValue {
    match &self.field_type {
      FieldType::Date => NaiveDate::parse_from_str(stored.trim(), ISO_DATE)
        .map(SortValue::Date)
        .unwrap_or_else(|_| SortValue::text(stored)),
      FieldType::Number => stored
        .trim()
        .parse::<f64>()
        .map(SortValue::Number)
        .unwrap_or_else(|_| SortValue::text(stored)),
      FieldType::Boolean => parse_boolean(stored)
        .map(SortValue::Bool)
        .unwrap_or_else(|| SortValue::text(stored)),
      _ => SortValue::text(stored),
    }
  }

  // ── Title extraction ────────────────────────────────────────────────────

  /// Convert text captured from an edited title back into a stored value.
  ///
  /// Returns `None` when the text cannot represent a value of this field's
  /// type; the caller rejects the whole title edit in that case.
  pub fn stored_text_from_title(&self, text: &str) -> Option<String> {
    match &self.field_type {
      FieldType::Text | FieldType::Other(_) => Some(text.to_string()),
      FieldType::Date => {
        if text.is_empty() {
          return Some(String::new());
        }
        if NaiveDate::parse_from_str(text.trim(), ISO_DATE).is_ok() {
          return Some(text.trim().to_string());
        }
        // Titles show the display form; convert it back to ISO.
        let pattern = self.format.as_deref()?;
        NaiveDate::parse_from_str(text.trim(), pattern)
          .ok()
          .map(|date| date.format(ISO_DATE).to_string())
      }
      FieldType::Number => {
        (text.is_empty() || text.trim().parse::<f64>().is_ok())
          .then(|| text.to_string())
      }
      FieldType::Boolean => (text.is_empty() || parse_boolean(text).is_some())
        .then(|| text.to_string()),
      FieldType::Choice => {
        let choices =
          self.format.as_deref().map(split_choices).unwrap_or_default();
        (text.is_empty() || choices.iter().any(|c| c == text))
          .then(|| text.to_string())
      }
    }
  }
}

// ─── Value helpers ───────────────────────────────────────────────────────────

fn parse_boolean(stored: &str) -> Option<bool> {
  match stored.trim().to_ascii_lowercase().as_str() {
    "true" | "yes" | "1" => Some(true),
    "false" | "no" | "0" => Some(false),
    _ => None,
  }
}

/// Split a `/`-separated choice list. A doubled `//` is a literal slash, not
/// a separator. Duplicates and empty entries are dropped.
pub(crate) fn split_choices(format: &str) -> Vec<String> {
  let protected = format.replace("//", "\0");
  let mut choices = Vec::new();
  for part in protected.split('/') {
    let part = part.trim().replace('\0', "/");
    if !part.is_empty() && !choices.contains(&part) {
      choices.push(part);
    }
  }
  choices
}

/// Fractional-digit count of a `#.##`-style number pattern.
fn number_precision(pattern: &str) -> Option<usize> {
  let (_, frac) = pattern.rsplit_once('.')?;
  Some(frac.chars().filter(|c| matches!(c, '#' | '0')).count())
}

// ─── Tests ───────────────────────────────────────────────────────────────────
