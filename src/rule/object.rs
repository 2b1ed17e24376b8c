//! Object field rules and the field table shared with request sections.
//!
//! [`ObjectRule`] maps field names to [`FieldRule`]s in declaration order and
//! decides what happens to keys it does not declare.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use stillwater::Validation;

use crate::error::{SchemaDefinitionError, Violation, Violations};
use crate::path::FieldPath;
use crate::ValidationResult;

use super::traits::ValueRule;
use super::{value_type_name, FieldKind, FieldRule};

/// How to handle keys an object or section does not declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownKeys {
    /// Reject each undeclared key with an `UnknownField` violation.
    Strict,
    /// Drop undeclared keys from the normalized output.
    #[default]
    Strip,
    /// Copy undeclared keys into the normalized output unchanged.
    Passthrough,
}

/// A rule for JSON objects: declared fields plus an unknown-key policy.
///
/// Every declared field is checked, so violations from different fields
/// accumulate; each field contributes at most one violation of its own.
///
/// # Example
///
/// ```rust
/// use turnstile::{FieldPath, Rule, Section, ValueRule};
/// use serde_json::json;
///
/// let location = Rule::object()
///     .field("city", Rule::string().min_len(1))
///     .optional("country", Rule::string().min_len(2))
///     .strict();
///
/// let path = FieldPath::section(Section::Body).push_field("location");
/// assert!(location.validate(&json!({"city": "Pune"}), &path).is_success());
///
/// let errors = location
///     .validate(&json!({"city": "Pune", "zip": "411001"}), &path)
///     .into_result()
///     .unwrap_err();
/// assert_eq!(errors.first().path.to_string(), "body.location.zip");
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ObjectRule {
    #[serde(default)]
    pub fields: IndexMap<String, FieldRule>,
    #[serde(default)]
    pub unknown_keys: UnknownKeys,
}

impl ObjectRule {
    pub fn new() -> Self {
        Self {
            fields: IndexMap::new(),
            unknown_keys: UnknownKeys::Strip,
        }
    }

    /// Adds a required field.
    pub fn field(mut self, name: impl Into<String>, rule: impl Into<FieldKind>) -> Self {
        self.fields.insert(name.into(), FieldRule::required(rule));
        self
    }

    /// Adds an optional field; absent (or `null`) values are skipped.
    pub fn optional(mut self, name: impl Into<String>, rule: impl Into<FieldKind>) -> Self {
        self.fields.insert(name.into(), FieldRule::optional(rule));
        self
    }

    /// Adds an optional field that is filled with `default` when absent.
    pub fn default(
        mut self,
        name: impl Into<String>,
        rule: impl Into<FieldKind>,
        default: Value,
    ) -> Self {
        self.fields
            .insert(name.into(), FieldRule::optional(rule).with_default(default));
        self
    }

    /// Adds a prebuilt field rule.
    pub fn rule(mut self, name: impl Into<String>, rule: FieldRule) -> Self {
        self.fields.insert(name.into(), rule);
        self
    }

    pub fn unknown_keys(mut self, policy: UnknownKeys) -> Self {
        self.unknown_keys = policy;
        self
    }

    /// Rejects undeclared keys.
    pub fn strict(self) -> Self {
        self.unknown_keys(UnknownKeys::Strict)
    }

    /// Keeps undeclared keys in the output.
    pub fn passthrough(self) -> Self {
        self.unknown_keys(UnknownKeys::Passthrough)
    }

    pub fn is_strict(&self) -> bool {
        self.unknown_keys == UnknownKeys::Strict
    }

    /// Validates the entries of `obj` against the declared fields.
    ///
    /// Violations are reported at `path.<field>` exactly as the field rules
    /// produce them; wrapping them as nested failures is up to the caller.
    /// Declared-field violations come first, in declaration order, then
    /// unknown keys in input order.
    pub fn validate_map(
        &self,
        obj: &Map<String, Value>,
        path: &FieldPath,
    ) -> ValidationResult<Map<String, Value>> {
        let mut violations = Vec::new();
        let mut validated = Map::new();

        for (name, field) in &self.fields {
            let field_path = path.push_field(name);

            match obj.get(name) {
                Some(Value::Null) | None if field.required => {
                    violations.push(Violation::missing_field(field_path, name));
                }
                Some(Value::Null) | None => {
                    if let Some(default) = &field.default {
                        validated.insert(name.clone(), default.clone());
                    }
                }
                Some(value) => match field.kind.validate(value, &field_path) {
                    Validation::Success(v) => {
                        validated.insert(name.clone(), v);
                    }
                    Validation::Failure(e) => violations.extend(e),
                },
            }
        }

        for (key, value) in obj {
            if self.fields.contains_key(key) {
                continue;
            }
            match self.unknown_keys {
                UnknownKeys::Strict => {
                    violations.push(Violation::unknown_field(path.push_field(key), key));
                }
                UnknownKeys::Strip => {}
                UnknownKeys::Passthrough => {
                    validated.insert(key.clone(), value.clone());
                }
            }
        }

        match Violations::from_vec(violations) {
            Some(violations) => Validation::Failure(violations),
            None => Validation::Success(validated),
        }
    }

    /// Checks every declared field rule.
    pub fn check_fields(&self, path: &FieldPath) -> Result<(), SchemaDefinitionError> {
        for (name, field) in &self.fields {
            if name.is_empty() {
                return Err(SchemaDefinitionError::EmptyFieldName {
                    path: path.to_string(),
                });
            }
            field.check_definition(&path.push_field(name))?;
        }
        Ok(())
    }
}

impl ValueRule for ObjectRule {
    fn validate(&self, value: &Value, path: &FieldPath) -> ValidationResult<Value> {
        let obj = match value.as_object() {
            Some(o) => o,
            None => {
                return Validation::Failure(Violations::single(Violation::type_mismatch(
                    path.clone(),
                    "object",
                    value_type_name(value),
                )))
            }
        };

        match self.validate_map(obj, path) {
            Validation::Success(map) => Validation::Success(Value::Object(map)),
            Validation::Failure(e) => Validation::Failure(e.nested_under(path)),
        }
    }

    fn check_definition(&self, path: &FieldPath) -> Result<(), SchemaDefinitionError> {
        self.check_fields(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ViolationKind;
    use crate::request::Section;
    use crate::rule::Rule;
    use serde_json::json;

    fn body() -> FieldPath {
        FieldPath::section(Section::Body)
    }

    fn unwrap_failure<T: std::fmt::Debug, E>(v: Validation<T, E>) -> E {
        v.into_result().unwrap_err()
    }

    fn map(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_missing_required_and_null() {
        let rule = ObjectRule::new()
            .field("email", Rule::email())
            .field("password", Rule::string());

        let errors = unwrap_failure(rule.validate_map(&map(json!({"password": null})), &body()));
        let paths: Vec<_> = errors.iter().map(|e| e.path.to_string()).collect();
        assert_eq!(paths, vec!["body.email", "body.password"]);
        assert!(errors.iter().all(|e| e.kind == ViolationKind::MissingField));
    }

    #[test]
    fn test_optional_absent_or_null_is_skipped() {
        let rule = ObjectRule::new().optional("bio", Rule::string().max_len(5));

        let ok = rule.validate_map(&map(json!({})), &body()).into_result().unwrap();
        assert!(ok.is_empty());

        let ok = rule
            .validate_map(&map(json!({"bio": null})), &body())
            .into_result()
            .unwrap();
        assert!(!ok.contains_key("bio"));
    }

    #[test]
    fn test_default_inserted_when_absent() {
        let rule = ObjectRule::new().default("page", Rule::integer().coerce(), json!(1));

        let ok = rule.validate_map(&map(json!({})), &body()).into_result().unwrap();
        assert_eq!(ok.get("page"), Some(&json!(1)));

        let ok = rule
            .validate_map(&map(json!({"page": "4"})), &body())
            .into_result()
            .unwrap();
        assert_eq!(ok.get("page"), Some(&json!(4)));
    }

    #[test]
    fn test_unknown_key_policies() {
        let input = map(json!({"name": "Al", "isAdmin": true}));
        let base = ObjectRule::new().field("name", Rule::string());

        let stripped = base.clone().validate_map(&input, &body()).into_result().unwrap();
        assert!(!stripped.contains_key("isAdmin"));

        let kept = base
            .clone()
            .passthrough()
            .validate_map(&input, &body())
            .into_result()
            .unwrap();
        assert_eq!(kept.get("isAdmin"), Some(&json!(true)));

        let errors = unwrap_failure(base.strict().validate_map(&input, &body()));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.first().kind, ViolationKind::UnknownField);
        assert_eq!(errors.first().path.to_string(), "body.isAdmin");
    }

    #[test]
    fn test_unknown_keys_reported_after_fields() {
        let rule = ObjectRule::new().field("name", Rule::string()).strict();
        let errors = unwrap_failure(rule.validate_map(&map(json!({"zzz": 1, "aaa": 2})), &body()));
        let paths: Vec<_> = errors.iter().map(|e| e.path.to_string()).collect();
        assert_eq!(paths, vec!["body.name", "body.zzz", "body.aaa"]);
    }

    #[test]
    fn test_nested_object_wraps_children() {
        let rule = ObjectRule::new().optional(
            "location",
            Rule::object()
                .field("city", Rule::string().min_len(1))
                .strict(),
        );

        let errors = unwrap_failure(rule.validate_map(
            &map(json!({"location": {"city": "", "zip": "1"}})),
            &body(),
        ));
        assert_eq!(errors.len(), 2);
        assert!(errors
            .iter()
            .all(|e| e.kind.as_str() == "NestedValidationFailure"));
        assert_eq!(errors.first().path.to_string(), "body.location.city");
        assert_eq!(errors.first().code, "min_length");
        assert_eq!(
            errors.iter().nth(1).unwrap().root_kind(),
            &ViolationKind::UnknownField
        );
    }

    #[test]
    fn test_nested_object_type_mismatch_is_on_field() {
        let rule = ObjectRule::new().field("location", Rule::object());
        let errors = unwrap_failure(rule.validate_map(&map(json!({"location": "Pune"})), &body()));
        assert_eq!(errors.first().kind, ViolationKind::TypeMismatch);
        assert_eq!(errors.first().path.to_string(), "body.location");
    }

    #[test]
    fn test_field_order_preserved() {
        let rule = ObjectRule::new()
            .field("z", Rule::string())
            .field("a", Rule::string())
            .field("m", Rule::string());

        let errors = unwrap_failure(rule.validate_map(&Map::new(), &FieldPath::root()));
        let paths: Vec<_> = errors.iter().map(|e| e.path.to_string()).collect();
        assert_eq!(paths, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_empty_field_name_rejected() {
        let rule = ObjectRule::new().field("", Rule::string());
        assert_eq!(
            rule.check_fields(&body()),
            Err(SchemaDefinitionError::EmptyFieldName {
                path: "body".to_string()
            })
        );
    }
}
