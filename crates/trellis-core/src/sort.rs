//! Sort values — typed comparison keys derived from stored field text.
//!
//! Each field with a `sortkeynum` contributes one [`SortValue`] per node.
//! Values of the same kind compare naturally; mixed kinds (e.g. a parseable
//! date against an unparseable one demoted to text) compare by a fixed kind
//! rank so ordering stays total.

use std::cmp::Ordering;

use chrono::NaiveDate;

/// A single comparison key. Text is case-folded at construction.
#[derive(Debug, Clone)]
pub enum SortValue {
  Date(NaiveDate),
  Number(f64),
  Bool(bool),
  Text(String),
}

impl SortValue {
  /// A case-folded text key.
  pub fn text(stored: &str) -> Self {
    Self::Text(stored.to_lowercase())
  }

  fn kind_rank(&self) -> u8 {
    match self {
      Self::Date(_) => 0,
      Self::Number(_) => 1,
      Self::Bool(_) => 2,
      Self::Text(_) => 3,
    }
  }

  pub fn compare(&self, other: &Self) -> Ordering {
    match (self, other) {
      (Self::Date(a), Self::Date(b)) => a.cmp(b),
      (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
      (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
      (Self::Text(a), Self::Text(b)) => a.cmp(b),
      _ => self.kind_rank().cmp(&other.kind_rank()),
    }
  }
}
