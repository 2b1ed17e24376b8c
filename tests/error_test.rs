//! Tests for violation construction, accumulation and display.

use stillwater::prelude::*;
use turnstile::{FieldPath, Section, Violation, ViolationKind, Violations};

fn body(field: &str) -> FieldPath {
    FieldPath::section(Section::Body).push_field(field)
}

#[test]
fn test_constructor_kinds_and_codes() {
    let missing = Violation::missing_field(body("email"), "email");
    assert_eq!(missing.kind, ViolationKind::MissingField);
    assert_eq!(missing.code, "required");
    assert_eq!(missing.message, "required field 'email' is missing");

    let unknown = Violation::unknown_field(body("isAdmin"), "isAdmin");
    assert_eq!(unknown.code, "unknown_field");

    let section = Violation::missing_section(FieldPath::section(Section::Params));
    assert_eq!(section.code, "missing_section");

    let mismatch = Violation::type_mismatch(body("age"), "number", "string");
    assert_eq!(mismatch.code, "invalid_type");
    assert_eq!(mismatch.message, "expected number, got string");
}

#[test]
fn test_nesting_keeps_path_and_code() {
    let parent = body("location");
    let child = Violation::constraint(parent.push_field("city"), "too short").with_code("min_length");

    let nested = child.clone().nested_under(&parent);
    assert_eq!(nested.path, child.path);
    assert_eq!(nested.code, "min_length");
    assert_eq!(nested.kind.as_str(), "NestedValidationFailure");
    assert_eq!(nested.root_kind(), &ViolationKind::ConstraintViolation);

    let twice = nested.nested_under(&FieldPath::section(Section::Body));
    assert_eq!(twice.root_kind(), &ViolationKind::ConstraintViolation);
    assert_eq!(twice.to_record().constraint_kind, "NestedValidationFailure");
}

#[test]
fn test_violations_combine_in_order() {
    let a = Violations::single(Violation::missing_field(body("a"), "a"));
    let b = Violations::single(Violation::missing_field(body("b"), "b"));
    let c = Violations::single(Violation::missing_field(body("c"), "c"));

    let all = a.combine(b).combine(c);
    let paths: Vec<_> = all.iter().map(|v| v.path.to_string()).collect();
    assert_eq!(paths, vec!["body.a", "body.b", "body.c"]);
}

#[test]
fn test_from_vec_requires_entries() {
    assert!(Violations::from_vec(Vec::new()).is_none());

    let violations = Violations::from_vec(vec![
        Violation::missing_field(body("a"), "a"),
        Violation::constraint(body("b"), "bad").with_code("pattern"),
    ])
    .unwrap();
    assert_eq!(violations.len(), 2);
    assert_eq!(violations.with_code("pattern").len(), 1);
    assert_eq!(violations.of_kind(&ViolationKind::MissingField).len(), 1);
}

#[test]
fn test_display_lists_every_violation() {
    let violations = Violations::from_vec(vec![
        Violation::type_mismatch(body("age"), "number", "string")
            .with_expected("number")
            .with_got("string"),
        Violation::missing_section(FieldPath::root()),
    ])
    .unwrap();

    let text = violations.to_string();
    assert!(text.starts_with("request rejected with 2 violation(s):"));
    assert!(text.contains("1. body.age: expected number, got string"));
    assert!(text.contains("2. (request):"));
}

#[test]
fn test_records_are_camel_case() {
    let violation = Violation::constraint(body("bio"), "too long").with_code("max_length");
    let json = serde_json::to_value(&violation).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "path": "body.bio",
            "message": "too long",
            "constraintKind": "ConstraintViolation",
            "code": "max_length"
        })
    );
}
