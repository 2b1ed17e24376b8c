//! Field rules.
//!
//! A [`FieldRule`] is a plain data record: a [`FieldKind`] (string, number,
//! enum, array or object, each with its constraint list), a required flag and
//! an optional default. Rules serialize to and from JSON, compare with `==`,
//! and carry no behavior that is not derivable from their data.
//!
//! [`Rule`] offers short constructors so schemas read naturally in code:
//!
//! ```rust
//! use turnstile::Rule;
//!
//! let profile = Rule::object()
//!     .optional("fullname", Rule::string().trim().min_len(2).max_len(50))
//!     .optional("bio", Rule::string().max_len(500))
//!     .optional("skills", Rule::array(Rule::string().trim().min_len(1)).max_items(50))
//!     .strict();
//! ```

mod array;
mod enumeration;
mod numeric;
mod object;
mod string;
mod traits;

pub use array::{ArrayConstraint, ArrayRule};
pub use enumeration::EnumRule;
pub use numeric::{NumberConstraint, NumberRule};
pub use object::{ObjectRule, UnknownKeys};
pub use string::{StringConstraint, StringRule};
pub use traits::ValueRule;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use stillwater::Validation;

use crate::error::SchemaDefinitionError;
use crate::path::FieldPath;
use crate::pattern::Pattern;
use crate::ValidationResult;

/// The type of a field together with its type-specific constraints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldKind {
    String(StringRule),
    Number(NumberRule),
    Enum(EnumRule),
    Array(ArrayRule),
    Object(ObjectRule),
}

impl FieldKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldKind::String(_) => "string",
            FieldKind::Number(_) => "number",
            FieldKind::Enum(_) => "enum",
            FieldKind::Array(_) => "array",
            FieldKind::Object(_) => "object",
        }
    }
}

impl ValueRule for FieldKind {
    fn validate(&self, value: &Value, path: &FieldPath) -> ValidationResult<Value> {
        match self {
            FieldKind::String(rule) => rule.validate(value, path),
            FieldKind::Number(rule) => rule.validate(value, path),
            FieldKind::Enum(rule) => rule.validate(value, path),
            FieldKind::Array(rule) => rule.validate(value, path),
            FieldKind::Object(rule) => rule.validate(value, path),
        }
    }

    fn check_definition(&self, path: &FieldPath) -> Result<(), SchemaDefinitionError> {
        match self {
            FieldKind::String(rule) => rule.check_definition(path),
            FieldKind::Number(rule) => rule.check_definition(path),
            FieldKind::Enum(rule) => rule.check_definition(path),
            FieldKind::Array(rule) => rule.check_definition(path),
            FieldKind::Object(rule) => rule.check_definition(path),
        }
    }
}

impl From<StringRule> for FieldKind {
    fn from(rule: StringRule) -> Self {
        FieldKind::String(rule)
    }
}

impl From<NumberRule> for FieldKind {
    fn from(rule: NumberRule) -> Self {
        FieldKind::Number(rule)
    }
}

impl From<EnumRule> for FieldKind {
    fn from(rule: EnumRule) -> Self {
        FieldKind::Enum(rule)
    }
}

impl From<ArrayRule> for FieldKind {
    fn from(rule: ArrayRule) -> Self {
        FieldKind::Array(rule)
    }
}

impl From<ObjectRule> for FieldKind {
    fn from(rule: ObjectRule) -> Self {
        FieldKind::Object(rule)
    }
}

fn required_by_default() -> bool {
    true
}

/// A field's full rule: kind and constraints, requiredness, default.
///
/// Serialized form, as used in schema definition files:
///
/// ```json
/// { "type": "string", "trim": true, "checks": [{ "check": "minLength", "min": 2 }] }
/// { "type": "enum", "values": ["candidate", "recruiter"], "required": false }
/// ```
///
/// Unknown keys are rejected at every level, so a misspelled constraint
/// fails to load instead of being ignored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldRule {
    #[serde(flatten)]
    pub kind: FieldKind,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl<'de> Deserialize<'de> for FieldRule {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut map = Map::<String, Value>::deserialize(deserializer)?;
        let required = take_flag(&mut map, "required", required_by_default())?;
        let default = map.remove("default").filter(|value| !value.is_null());
        let kind = FieldKind::deserialize(Value::Object(map)).map_err(de::Error::custom)?;

        Ok(Self {
            kind,
            required,
            default,
        })
    }
}

/// Removes a boolean flag from a definition object, falling back when absent.
pub(crate) fn take_flag<E: de::Error>(
    map: &mut Map<String, Value>,
    key: &str,
    fallback: bool,
) -> Result<bool, E> {
    match map.remove(key) {
        None => Ok(fallback),
        Some(Value::Bool(flag)) => Ok(flag),
        Some(other) => Err(E::custom(format!(
            "`{key}` must be a boolean, got {}",
            value_type_name(&other)
        ))),
    }
}

impl FieldRule {
    pub fn required(kind: impl Into<FieldKind>) -> Self {
        Self {
            kind: kind.into(),
            required: true,
            default: None,
        }
    }

    pub fn optional(kind: impl Into<FieldKind>) -> Self {
        Self {
            kind: kind.into(),
            required: false,
            default: None,
        }
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Checks the rule; a default must itself pass the rule unchanged, so
    /// that re-validating normalized output is a no-op.
    pub fn check_definition(&self, path: &FieldPath) -> Result<(), SchemaDefinitionError> {
        self.kind.check_definition(path)?;

        let Some(default) = &self.default else {
            return Ok(());
        };
        if self.required {
            return Err(SchemaDefinitionError::RequiredWithDefault {
                path: path.to_string(),
            });
        }
        match self.kind.validate(default, path) {
            Validation::Success(normalized) if &normalized == default => Ok(()),
            Validation::Success(normalized) => Err(SchemaDefinitionError::InvalidDefault {
                path: path.to_string(),
                reason: format!("normalizes to {}", normalized),
            }),
            Validation::Failure(e) => Err(SchemaDefinitionError::InvalidDefault {
                path: path.to_string(),
                reason: e.first().message.clone(),
            }),
        }
    }
}

/// Entry point for building field rules.
pub struct Rule;

impl Rule {
    pub fn string() -> StringRule {
        StringRule::new()
    }

    /// A trimmed string that must be an email address.
    pub fn email() -> StringRule {
        StringRule::new().trim().email()
    }

    /// A 24-character hexadecimal document identifier.
    pub fn object_id() -> StringRule {
        StringRule::new()
            .pattern(Pattern::object_id())
            .error("must be a 24-character hexadecimal id")
    }

    /// A trimmed phone number in international digit form.
    pub fn phone_number() -> StringRule {
        StringRule::new()
            .trim()
            .pattern(Pattern::phone_number())
            .error("must be 7 to 15 digits, optionally starting with +")
    }

    pub fn number() -> NumberRule {
        NumberRule::new()
    }

    pub fn integer() -> NumberRule {
        NumberRule::new().integer()
    }

    pub fn enumeration<I, S>(values: I) -> EnumRule
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        EnumRule::new(values)
    }

    pub fn array(items: impl Into<FieldKind>) -> ArrayRule {
        ArrayRule::new(items)
    }

    pub fn object() -> ObjectRule {
        ObjectRule::new()
    }
}

/// Returns the JSON type name for a value.
pub(crate) fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Section;
    use serde_json::json;

    fn path() -> FieldPath {
        FieldPath::section(Section::Query).push_field("limit")
    }

    #[test]
    fn test_field_rule_serde_shape() {
        let rule = FieldRule::optional(Rule::enumeration(["candidate", "recruiter"]));
        let json = serde_json::to_value(&rule).unwrap();
        assert_eq!(
            json,
            json!({"type": "enum", "values": ["candidate", "recruiter"], "required": false})
        );

        let back: FieldRule = serde_json::from_value(json).unwrap();
        assert_eq!(back, rule);
    }

    #[test]
    fn test_required_defaults_to_true_when_deserializing() {
        let rule: FieldRule =
            serde_json::from_value(json!({"type": "string", "checks": [{"check": "email"}]}))
                .unwrap();
        assert!(rule.required);
        assert_eq!(rule.kind, FieldKind::String(StringRule::new().email()));
    }

    #[test]
    fn test_nested_definition_from_json() {
        let rule: FieldRule = serde_json::from_value(json!({
            "type": "array",
            "items": {"type": "object", "fields": {"title": {"type": "string"}}, "unknownKeys": "strict"},
            "checks": [{"check": "maxItems", "max": 10}]
        }))
        .unwrap();

        let expected = FieldRule::required(
            Rule::array(Rule::object().field("title", Rule::string()).strict()).max_items(10),
        );
        assert_eq!(rule, expected);
    }

    #[test]
    fn test_unknown_keys_fail_deserialization() {
        let misspelled = [
            json!({"type": "string", "minLength": 5}),
            json!({"type": "string", "checks": [{"check": "minLength", "minimum": 5}]}),
            json!({"type": "number", "coerse": true}),
            json!({"type": "enum", "values": ["a"], "mesage": "pick one"}),
            json!({"type": "array", "items": {"type": "string"}, "maxItems": 3}),
            json!({"type": "object", "unknown_keys": "strict"}),
            json!({"type": "string", "required": "yes"}),
        ];
        for definition in misspelled {
            let result: Result<FieldRule, _> = serde_json::from_value(definition.clone());
            assert!(result.is_err(), "accepted {definition}");
        }

        let err = serde_json::from_value::<FieldRule>(json!({"type": "string", "minLength": 5}))
            .unwrap_err();
        assert!(err.to_string().contains("minLength"));
    }

    #[test]
    fn test_null_default_is_absent() {
        let rule: FieldRule = serde_json::from_value(json!({
            "type": "string",
            "required": false,
            "default": null
        }))
        .unwrap();
        assert_eq!(rule, FieldRule::optional(Rule::string()));
    }

    #[test]
    fn test_invalid_pattern_fails_deserialization() {
        let result: Result<FieldRule, _> = serde_json::from_value(json!({
            "type": "string",
            "checks": [{"check": "pattern", "pattern": "(unclosed"}]
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_default_must_satisfy_rule() {
        let good = FieldRule::optional(Rule::integer().range(1.0, 100.0)).with_default(json!(10));
        assert!(good.check_definition(&path()).is_ok());

        let bad = FieldRule::optional(Rule::integer().range(1.0, 100.0)).with_default(json!(0));
        assert!(matches!(
            bad.check_definition(&path()),
            Err(SchemaDefinitionError::InvalidDefault { .. })
        ));

        let not_normal = FieldRule::optional(Rule::string().trim()).with_default(json!(" x "));
        assert!(not_normal.check_definition(&path()).is_err());

        let required = FieldRule::required(Rule::integer()).with_default(json!(1));
        assert!(matches!(
            required.check_definition(&path()),
            Err(SchemaDefinitionError::RequiredWithDefault { .. })
        ));
    }
}
