//! Tests for field paths as they appear in violations.

use turnstile::{FieldPath, Section};

#[test]
fn test_section_rooted_paths() {
    let path = FieldPath::section(Section::Body)
        .push_field("skills")
        .push_index(2);

    assert_eq!(path.to_string(), "body.skills[2]");
    assert_eq!(path.len(), 3);
    assert!(!path.is_root());
}

#[test]
fn test_push_does_not_mutate() {
    let base = FieldPath::section(Section::Params);
    let child = base.push_field("id");

    assert_eq!(base.to_string(), "params");
    assert_eq!(child.to_string(), "params.id");
    assert_ne!(base, child);
}

#[test]
fn test_paths_without_section() {
    let path = FieldPath::from_field("items").push_index(0).push_field("sku");
    assert_eq!(path.to_string(), "items[0].sku");
    assert!(FieldPath::root().is_empty());
}

#[test]
fn test_path_serializes_as_string() {
    let path = FieldPath::section(Section::Query).push_field("page");
    assert_eq!(
        serde_json::to_value(&path).unwrap(),
        serde_json::json!("query.page")
    );
}
