//! Serde-facing shapes of the on-disk document.
//!
//! These mirror the file's JSON exactly; validation and conversion into the
//! in-memory model live in `parse`. On the way back out, optional keys at
//! their default values are omitted so a load→save pass is stable.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use trellis_core::{
  field::{FieldSchema, FieldType},
  format::FormatSchema,
  node::{Node, NodeId},
};

fn default_fieldtype() -> String {
  "Text".to_string()
}

// ─── Document shape ──────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct FileDocument {
  #[serde(default)]
  pub formats:    Vec<FileFormat>,
  #[serde(default)]
  pub nodes:      Vec<FileNode>,
  #[serde(default)]
  pub properties: FileProperties,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct FileProperties {
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub tlversion: String,
  #[serde(default)]
  pub topnodes:  Vec<NodeId>,
  /// Anything else under `properties`, preserved verbatim.
  #[serde(flatten)]
  pub extra:     BTreeMap<String, serde_json::Value>,
}

// ─── Format shape ────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct FileFormat {
  pub formatname:   String,
  #[serde(default)]
  pub fields:       Vec<FileField>,
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub titleline:    String,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub outputlines:  Vec<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub childtype:    Option<String>,
  /// Written only when false (the default is true).
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub spacebetween: Option<bool>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub icon:         Option<String>,
}

impl FileFormat {
  pub(crate) fn from_schema(schema: &FormatSchema) -> Self {
    Self {
      formatname:   schema.name.clone(),
      fields:       schema.fields().iter().map(FileField::from_schema).collect(),
      titleline:    schema.title_line.source(),
      outputlines:  schema.output_lines.iter().map(|t| t.source()).collect(),
      childtype:    schema.child_type.clone(),
      spacebetween: (!schema.space_between).then_some(false),
      icon:         schema.icon.clone(),
    }
  }
}

// ─── Field shape ─────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct FileField {
  pub fieldname:  String,
  #[serde(default = "default_fieldtype")]
  pub fieldtype:  String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub format:     Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub prefix:     Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub suffix:     Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub init:       Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub sortkeynum: Option<u32>,
  /// Written only when false (the default is true).
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub sortkeyfwd: Option<bool>,
}

impl FileField {
  pub(crate) fn into_schema(self) -> FieldSchema {
    let mut field =
      FieldSchema::new(self.fieldname, FieldType::from_name(&self.fieldtype));
    field.format = self.format.filter(|f| !f.is_empty());
    field.prefix = self.prefix.unwrap_or_default();
    field.suffix = self.suffix.unwrap_or_default();
    field.init_default = self.init.unwrap_or_default();
    field.sort_key_num = self.sortkeynum.unwrap_or(0);
    field.sort_forward = self.sortkeyfwd.unwrap_or(true);
    field
  }

  pub(crate) fn from_schema(field: &FieldSchema) -> Self {
    Self {
      fieldname:  field.name.clone(),
      fieldtype:  field.field_type.name().to_string(),
      format:     field.format.clone().filter(|f| !f.is_empty()),
      prefix:     (!field.prefix.is_empty()).then(|| field.prefix.clone()),
      suffix:     (!field.suffix.is_empty()).then(|| field.suffix.clone()),
      init:       (!field.init_default.is_empty())
        .then(|| field.init_default.clone()),
      sortkeynum: (field.sort_key_num > 0).then_some(field.sort_key_num),
      sortkeyfwd: (!field.sort_forward).then_some(false),
    }
  }
}

// ─── Node shape ──────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct FileNode {
  pub format:   String,
  pub uid:      NodeId,
  #[serde(default)]
  pub data:     BTreeMap<String, String>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub children: Vec<NodeId>,
}

impl FileNode {
  pub(crate) fn into_node(self) -> Node {
    Node {
      uid:      self.uid,
      format:   self.format,
      data:     self.data,
      children: self.children,
    }
  }

  pub(crate) fn from_node(node: &Node) -> Self {
    Self {
      format:   node.format.clone(),
      uid:      node.uid.clone(),
      data:     node.data.clone(),
      children: node.children.clone(),
    }
  }
}
