//! Tests for section-level validation semantics.

use serde_json::json;
use stillwater::Validation;
use turnstile::{
    validate, Request, RequestSchema, Rule, SectionRule, UnknownKeys, ViolationKind,
};

fn unwrap_failure<T: std::fmt::Debug, E>(v: Validation<T, E>) -> E {
    match v {
        Validation::Success(t) => panic!("expected failure, got success: {:?}", t),
        Validation::Failure(e) => e,
    }
}

fn profile_schema(policy: UnknownKeys) -> RequestSchema {
    RequestSchema::new().body(SectionRule::required(
        Rule::object()
            .field("name", Rule::string().trim().min_len(1))
            .optional("age", Rule::integer().min(0.0))
            .unknown_keys(policy),
    ))
}

#[test]
fn test_sections_reported_in_fixed_order() {
    let schema = RequestSchema::new()
        .body(SectionRule::required(Rule::object()))
        .query(SectionRule::required(Rule::object()))
        .params(SectionRule::required(Rule::object()));

    let errors = unwrap_failure(validate(&schema, &Request::new()));
    let paths: Vec<_> = errors.iter().map(|e| e.path.to_string()).collect();
    assert_eq!(paths, vec!["params", "query", "body"]);
    assert!(errors.iter().all(|e| e.kind == ViolationKind::MissingSection));
}

#[test]
fn test_null_section_counts_as_absent() {
    let request: Request = serde_json::from_value(json!({"body": null})).unwrap();
    let errors = unwrap_failure(validate(&profile_schema(UnknownKeys::Strip), &request));
    assert_eq!(errors.first().kind, ViolationKind::MissingSection);
}

#[test]
fn test_optional_section_with_required_fields_absent() {
    let schema = RequestSchema::new().query(SectionRule::optional(
        Rule::object().field("token", Rule::string()),
    ));
    assert!(validate(&schema, &Request::new()).is_success());

    let errors = unwrap_failure(validate(&schema, &Request::new().with_query(json!({}))));
    assert_eq!(errors.first().path.to_string(), "query.token");
}

#[test]
fn test_undeclared_sections_are_ignored() {
    let request = Request::new()
        .with_body(json!({"name": "Ada"}))
        .with_query(json!({"debug": "1"}));
    let normalized = validate(&profile_schema(UnknownKeys::Strict), &request)
        .into_result()
        .unwrap();
    assert!(normalized.query.is_none());
}

#[test]
fn test_unknown_key_policies() {
    let request = Request::new().with_body(json!({"name": "Ada", "nickname": "Countess"}));

    let stripped = validate(&profile_schema(UnknownKeys::Strip), &request)
        .into_result()
        .unwrap();
    assert_eq!(stripped.body.unwrap().len(), 1);

    let kept = validate(&profile_schema(UnknownKeys::Passthrough), &request)
        .into_result()
        .unwrap();
    assert_eq!(kept.body.unwrap()["nickname"], json!("Countess"));

    let errors = unwrap_failure(validate(&profile_schema(UnknownKeys::Strict), &request));
    assert_eq!(errors.first().kind, ViolationKind::UnknownField);
    assert_eq!(errors.first().path.to_string(), "body.nickname");
}

#[test]
fn test_one_violation_per_field_across_many_fields() {
    let schema = RequestSchema::new().body(SectionRule::required(
        Rule::object()
            .field("code", Rule::string().min_len(5).max_len(3).error("contradiction"))
            .field("count", Rule::integer().min(10.0).max(5.0)),
    ));
    // Not registered, so the contradictory bounds are never checked here;
    // the first failing constraint per field is all that is reported.
    let request = Request::new().with_body(json!({"code": "abcd", "count": 7}));
    let errors = unwrap_failure(validate(&schema, &request));

    assert_eq!(errors.len(), 2);
    assert_eq!(errors.at("body.code").unwrap().code, "min_length");
    assert_eq!(errors.at("body.count").unwrap().code, "minimum");
}

#[test]
fn test_type_mismatch_before_constraints() {
    let request = Request::new().with_body(json!({"name": 42}));
    let errors = unwrap_failure(validate(&profile_schema(UnknownKeys::Strip), &request));

    let violation = errors.first();
    assert_eq!(violation.kind, ViolationKind::TypeMismatch);
    assert_eq!(violation.message, "expected string, got number");
    assert_eq!(violation.code, "invalid_type");
}

#[test]
fn test_null_optional_field_is_skipped() {
    let request = Request::new().with_body(json!({"name": "Ada", "age": null}));
    let normalized = validate(&profile_schema(UnknownKeys::Strip), &request)
        .into_result()
        .unwrap();
    assert!(!normalized.body.unwrap().contains_key("age"));
}

#[test]
fn test_normalized_output_keeps_declaration_order() {
    let schema = RequestSchema::new().body(SectionRule::required(
        Rule::object()
            .field("b", Rule::string())
            .field("a", Rule::string()),
    ));
    let request = Request::new().with_body(json!({"a": "1", "b": "2"}));
    let normalized = validate(&schema, &request).into_result().unwrap();

    let keys: Vec<_> = normalized.body.unwrap().keys().cloned().collect();
    assert_eq!(keys, vec!["b", "a"]);
}
