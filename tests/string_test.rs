//! Integration tests for string field rules.

use serde_json::json;
use turnstile::{FieldPath, Pattern, Rule, Section, ValueRule, ViolationKind};

/// Helper to extract the success value from a Validation
fn unwrap_success<T, E: std::fmt::Debug>(v: stillwater::Validation<T, E>) -> T {
    v.into_result().unwrap()
}

/// Helper to extract the error value from a Validation
fn unwrap_failure<T, E>(v: stillwater::Validation<T, E>) -> E
where
    T: std::fmt::Debug,
{
    v.into_result().unwrap_err()
}

fn path() -> FieldPath {
    FieldPath::section(Section::Body).push_field("fullname")
}

#[test]
fn test_min_len_boundary() {
    let rule = Rule::string().min_len(2);

    assert_eq!(unwrap_success(rule.validate(&json!("Al"), &path())), json!("Al"));

    let errors = unwrap_failure(rule.validate(&json!("A"), &path()));
    assert_eq!(errors.first().code, "min_length");
    assert_eq!(errors.first().message, "length must be at least 2, got 1");
}

#[test]
fn test_length_counts_characters_not_bytes() {
    let rule = Rule::string().max_len(4);
    assert!(rule.validate(&json!("Zoë!"), &path()).is_success());
    assert!(rule.validate(&json!("Zoë!!"), &path()).is_failure());
}

#[test]
fn test_trim_applies_before_constraints() {
    let rule = Rule::string().trim().min_len(2);

    assert_eq!(
        unwrap_success(rule.validate(&json!("  Al \n"), &path())),
        json!("Al")
    );
    let errors = unwrap_failure(rule.validate(&json!("   A   "), &path()));
    assert_eq!(errors.first().got.as_deref(), Some("1 characters"));
}

#[test]
fn test_first_failing_constraint_wins() {
    let rule = Rule::string()
        .min_len(24)
        .pattern(Pattern::object_id());

    let errors = unwrap_failure(rule.validate(&json!("xyz"), &path()));
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.first().code, "min_length");

    let errors = unwrap_failure(rule.validate(&json!("z".repeat(24)), &path()));
    assert_eq!(errors.first().code, "pattern");
}

#[test]
fn test_custom_messages() {
    let rule = Rule::string()
        .error("name must be text")
        .min_len(2)
        .error("name is too short");

    let errors = unwrap_failure(rule.validate(&json!(7), &path()));
    assert_eq!(errors.first().kind, ViolationKind::TypeMismatch);
    assert_eq!(errors.first().message, "name must be text");

    let errors = unwrap_failure(rule.validate(&json!("A"), &path()));
    assert_eq!(errors.first().message, "name is too short");
}

#[test]
fn test_email_rule_trims_and_checks() {
    let rule = Rule::email();

    assert_eq!(
        unwrap_success(rule.validate(&json!(" a@b.com "), &path())),
        json!("a@b.com")
    );
    let errors = unwrap_failure(rule.validate(&json!("bad"), &path()));
    assert_eq!(errors.first().code, "email");
    assert_eq!(errors.first().kind, ViolationKind::ConstraintViolation);
}

#[test]
fn test_object_id_rule() {
    let rule = Rule::object_id();
    assert!(rule
        .validate(&json!("64b7f0c2a1e4d93f2c8b4567"), &path())
        .is_success());

    let errors = unwrap_failure(rule.validate(&json!("not-a-hex-id"), &path()));
    assert_eq!(errors.first().message, "must be a 24-character hexadecimal id");
}
