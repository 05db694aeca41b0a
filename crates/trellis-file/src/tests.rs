//! Codec tests against the sample contact-list document.

use trellis_core::{
  field::FieldType,
  format::RenderOptions,
  node::NodeId,
};

use crate::{Error, LoadOptions, load_str, load_str_with, save_string};

/// A small contact list: one Main category over Friends/Family categories,
/// each holding a person. CATEGORY declares `childtype: PERSON` yet its
/// top-level children are categories — the containment violation shipped in
/// real sample data, which lenient loads must tolerate.
const CONTACTS: &str = r#"{
  "formats": [
    {
      "formatname": "CATEGORY",
      "fields": [{"fieldname": "Type", "fieldtype": "Text"}],
      "titleline": "{*Type*}",
      "outputlines": ["{*Type*}"],
      "childtype": "PERSON"
    },
    {
      "formatname": "PERSON",
      "fields": [
        {"fieldname": "FirstName", "fieldtype": "Text", "sortkeynum": 2},
        {"fieldname": "LastName", "fieldtype": "Text", "sortkeynum": 1},
        {"fieldname": "Birthday", "fieldtype": "Date", "format": "%B %-d, %Y"},
        {"fieldname": "Phone", "fieldtype": "Text"},
        {"fieldname": "Email", "fieldtype": "Text"}
      ],
      "titleline": "{*FirstName*} {*LastName*}",
      "outputlines": [
        "{*FirstName*} {*LastName*}",
        "DoB: {*Birthday*}",
        "Phone: {*Phone*}",
        "Email: {*Email*}"
      ]
    }
  ],
  "nodes": [
    {
      "format": "CATEGORY",
      "uid": "f402b5ac959111e7a8357054d2175f18",
      "data": {"Type": "Main"},
      "children": [
        "f402b8cc959111e7a8357054d2175f18",
        "f402bb24959111e7a8357054d2175f18"
      ]
    },
    {
      "format": "CATEGORY",
      "uid": "f402b8cc959111e7a8357054d2175f18",
      "data": {"Type": "Friends"},
      "children": ["f402be26959111e7a8357054d2175f18"]
    },
    {
      "format": "CATEGORY",
      "uid": "f402bb24959111e7a8357054d2175f18",
      "data": {"Type": "Family"},
      "children": ["f402c448959111e7a8357054d2175f18"]
    },
    {
      "format": "PERSON",
      "uid": "f402be26959111e7a8357054d2175f18",
      "data": {"FirstName": "John", "LastName": "Doe", "Phone": "555-0143"}
    },
    {
      "format": "PERSON",
      "uid": "f402c448959111e7a8357054d2175f18",
      "data": {
        "FirstName": "Mary",
        "LastName": "Smith",
        "Birthday": "1955-02-08",
        "Email": "mary@example.com"
      }
    }
  ],
  "properties": {
    "tlversion": "2.0.2",
    "topnodes": ["f402b5ac959111e7a8357054d2175f18"]
  }
}"#;

const ROOT: &str = "f402b5ac959111e7a8357054d2175f18";
const JOHN: &str = "f402be26959111e7a8357054d2175f18";
const MARY: &str = "f402c448959111e7a8357054d2175f18";

// ─── Loading the sample ──────────────────────────────────────────────────────

#[test]
fn sample_loads_leniently() {
  let doc = load_str(CONTACTS).unwrap();

  assert_eq!(doc.formats().count(), 2);
  assert_eq!(doc.node_count(), 5);
  assert_eq!(doc.top_nodes(), &[NodeId::new(ROOT)]);

  let root = doc.node(&NodeId::new(ROOT)).unwrap();
  assert_eq!(root.format, "CATEGORY");
  assert_eq!(root.field_text("Type"), "Main");

  // Both children are categories despite CATEGORY's childtype = PERSON.
  let children = doc.children_of(root);
  let titles: Vec<String> = children
    .iter()
    .map(|c| doc.node_title(&c.uid).unwrap())
    .collect();
  assert_eq!(titles, vec!["Friends".to_string(), "Family".to_string()]);
  assert!(children.iter().all(|c| c.format == "CATEGORY"));
}

#[test]
fn strict_load_rejects_the_containment_violation() {
  let err = load_str_with(CONTACTS, LoadOptions { strict: true }).unwrap_err();
  assert!(matches!(err, Error::ChildTypeViolation { .. }));
}

// ─── Rendering scenarios ─────────────────────────────────────────────────────

#[test]
fn john_doe_titles_and_keeps_his_blank_birthday_line() {
  let doc = load_str(CONTACTS).unwrap();
  let john = doc.node(&NodeId::new(JOHN)).unwrap();
  let format = doc.format_of(john).unwrap();

  assert_eq!(format.format_title(john), "John Doe");

  let lines = format.format_output(john, RenderOptions::default());
  assert_eq!(
    lines,
    vec![
      "John Doe".to_string(),
      "DoB: ".to_string(),
      "Phone: 555-0143".to_string(),
      "Email: ".to_string(),
    ]
  );

  // Suppressing blank lines drops exactly the data-free ones.
  let lines = format.format_output(john, RenderOptions { keep_blanks: false });
  assert_eq!(
    lines,
    vec!["John Doe".to_string(), "Phone: 555-0143".to_string()]
  );
}

#[test]
fn mary_smith_renders_her_birthday_through_the_date_pattern() {
  let doc = load_str(CONTACTS).unwrap();
  let mary = doc.node(&NodeId::new(MARY)).unwrap();
  let format = doc.format_of(mary).unwrap();

  let lines = format.format_output(mary, RenderOptions::default());
  assert_eq!(lines[1], "DoB: February 8, 1955");
}

#[test]
fn rendering_is_deterministic() {
  let doc = load_str(CONTACTS).unwrap();
  let mary = doc.node(&NodeId::new(MARY)).unwrap();
  let format = doc.format_of(mary).unwrap();

  let first = format.format_output(mary, RenderOptions::default());
  let second = format.format_output(mary, RenderOptions::default());
  assert_eq!(first, second);
}

// ─── Round trip ──────────────────────────────────────────────────────────────

#[test]
fn save_then_load_is_structurally_identical() {
  let doc = load_str(CONTACTS).unwrap();
  let saved = save_string(&doc).unwrap();
  let reloaded = load_str(&saved).unwrap();
  assert_eq!(doc, reloaded);
}

#[test]
fn save_omits_keys_at_their_defaults() {
  let doc = load_str(CONTACTS).unwrap();
  let saved: serde_json::Value =
    serde_json::from_str(&save_string(&doc).unwrap()).unwrap();

  let formats = saved["formats"].as_array().unwrap();
  let category = &formats[0];
  let person = &formats[1];
  assert_eq!(category["childtype"], "PERSON");
  assert!(person.get("childtype").is_none());
  assert!(person.get("spacebetween").is_none());

  let first_name = &person["fields"][0];
  assert_eq!(first_name["sortkeynum"], 2);
  assert!(first_name.get("sortkeyfwd").is_none());
  assert!(first_name.get("prefix").is_none());
}

#[test]
fn unknown_properties_survive_a_round_trip() {
  let mut doc = load_str(CONTACTS).unwrap();
  doc
    .properties
    .extra
    .insert("zoom".to_string(), serde_json::json!(125));

  let reloaded = load_str(&save_string(&doc).unwrap()).unwrap();
  assert_eq!(reloaded.properties.extra["zoom"], serde_json::json!(125));
  assert_eq!(reloaded.properties.tlversion, "2.0.2");
}

#[test]
fn unknown_fieldtype_loads_open_and_round_trips() {
  let input = r#"{
    "formats": [{"formatname": "NOTE",
                 "fields": [{"fieldname": "Blob", "fieldtype": "Hologram"}],
                 "titleline": "{*Blob*}"}],
    "nodes": [{"format": "NOTE", "uid": "a1", "data": {"Blob": "x"}}],
    "properties": {"topnodes": ["a1"]}
  }"#;
  let doc = load_str(input).unwrap();
  let field = doc.format("NOTE").unwrap().field("Blob").unwrap();
  assert_eq!(field.field_type, FieldType::Other("Hologram".to_string()));
  assert_eq!(doc.node_title(&NodeId::new("a1")).as_deref(), Some("x"));

  let saved = save_string(&doc).unwrap();
  assert!(saved.contains("\"Hologram\""));
}

// ─── Structural errors ───────────────────────────────────────────────────────

fn minimal_doc(nodes: &str, topnodes: &str) -> String {
  format!(
    r#"{{
      "formats": [{{"formatname": "NOTE",
                    "fields": [{{"fieldname": "Name"}}],
                    "titleline": "{{*Name*}}"}}],
      "nodes": [{nodes}],
      "properties": {{"topnodes": [{topnodes}]}}
    }}"#
  )
}

#[test]
fn malformed_json_is_a_parse_error() {
  assert!(matches!(load_str("{not json").unwrap_err(), Error::Parse(_)));
}

#[test]
fn duplicate_format_name_is_fatal() {
  let input = r#"{
    "formats": [{"formatname": "NOTE"}, {"formatname": "NOTE"}],
    "nodes": [],
    "properties": {"topnodes": []}
  }"#;
  assert!(matches!(
    load_str(input).unwrap_err(),
    Error::DuplicateFormat(name) if name == "NOTE"
  ));
}

#[test]
fn duplicate_field_name_is_fatal() {
  let input = r#"{
    "formats": [{"formatname": "NOTE",
                 "fields": [{"fieldname": "Name"}, {"fieldname": "Name"}]}],
    "nodes": [],
    "properties": {"topnodes": []}
  }"#;
  assert!(matches!(
    load_str(input).unwrap_err(),
    Error::DuplicateField { format, field } if format == "NOTE" && field == "Name"
  ));
}

#[test]
fn duplicate_node_uid_is_fatal() {
  let nodes = r#"{"format": "NOTE", "uid": "a1"},
                 {"format": "NOTE", "uid": "a1"}"#;
  let err = load_str(&minimal_doc(nodes, r#""a1""#)).unwrap_err();
  assert!(matches!(err, Error::DuplicateNode(_)));
}

#[test]
fn unknown_format_reference_is_fatal() {
  let nodes = r#"{"format": "GHOST", "uid": "a1"}"#;
  let err = load_str(&minimal_doc(nodes, r#""a1""#)).unwrap_err();
  assert!(
    matches!(err, Error::UnknownFormat { format, .. } if format == "GHOST")
  );
}

#[test]
fn dangling_child_reference_is_fatal() {
  let nodes = r#"{"format": "NOTE", "uid": "a1", "children": ["gone"]}"#;
  let err = load_str(&minimal_doc(nodes, r#""a1""#)).unwrap_err();
  assert!(
    matches!(err, Error::DanglingChild { child, .. } if child.as_str() == "gone")
  );
}

#[test]
fn dangling_top_node_is_fatal() {
  let nodes = r#"{"format": "NOTE", "uid": "a1"}"#;
  let err = load_str(&minimal_doc(nodes, r#""a1", "gone""#)).unwrap_err();
  assert!(
    matches!(err, Error::DanglingTopNode(uid) if uid.as_str() == "gone")
  );
}

#[test]
fn child_cycle_is_fatal_even_off_the_root_list() {
  // a1 and a2 reference each other; the top-node list is empty, so only a
  // whole-table traversal can see the cycle.
  let nodes = r#"{"format": "NOTE", "uid": "a1", "children": ["a2"]},
                 {"format": "NOTE", "uid": "a2", "children": ["a1"]}"#;
  let err = load_str(&minimal_doc(nodes, "")).unwrap_err();
  assert!(matches!(err, Error::Cycle(_)));
}

#[test]
fn self_reference_is_a_cycle() {
  let nodes = r#"{"format": "NOTE", "uid": "a1", "children": ["a1"]}"#;
  let err = load_str(&minimal_doc(nodes, r#""a1""#)).unwrap_err();
  assert!(matches!(err, Error::Cycle(uid) if uid.as_str() == "a1"));
}

#[test]
fn strict_load_rejects_shared_children() {
  let nodes = r#"{"format": "NOTE", "uid": "p1", "children": ["c"]},
                 {"format": "NOTE", "uid": "p2", "children": ["c"]},
                 {"format": "NOTE", "uid": "c"}"#;
  let input = minimal_doc(nodes, r#""p1", "p2""#);

  // Lenient load accepts the diamond; strict calls it out.
  assert!(load_str(&input).is_ok());
  let err =
    load_str_with(&input, LoadOptions { strict: true }).unwrap_err();
  assert!(matches!(err, Error::SharedChild(uid) if uid.as_str() == "c"));
}

#[test]
fn strict_load_rejects_duplicate_top_nodes() {
  let nodes = r#"{"format": "NOTE", "uid": "a1"}"#;
  let input = minimal_doc(nodes, r#""a1", "a1""#);

  assert!(load_str(&input).is_ok());
  let err =
    load_str_with(&input, LoadOptions { strict: true }).unwrap_err();
  assert!(matches!(err, Error::DuplicateTopNode(_)));
}
