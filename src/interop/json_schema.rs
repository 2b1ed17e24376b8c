//! JSON Schema export.
//!
//! Converts request schemas into JSON Schema draft 2020-12 so they can feed
//! API documentation and client-side tooling.

use serde_json::{json, Map, Value};

use crate::rule::{
    ArrayConstraint, ArrayRule, EnumRule, FieldKind, FieldRule, NumberConstraint, NumberRule,
    ObjectRule, StringConstraint, StringRule, UnknownKeys,
};
use crate::schema::{RequestSchema, SectionRule};

/// Trait for converting schema types to JSON Schema format.
pub trait ToJsonSchema {
    /// Returns a JSON Schema draft 2020-12 fragment describing `self`.
    fn to_json_schema(&self) -> Value;
}

/// Emits whole numbers without a fractional part, so `minimum: 1.0`
/// exports as `1`.
fn number_json(value: f64) -> Value {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        json!(value as i64)
    } else {
        json!(value)
    }
}

impl ToJsonSchema for StringRule {
    fn to_json_schema(&self) -> Value {
        let mut schema = json!({ "type": "string" });
        for check in &self.checks {
            match check {
                StringConstraint::MinLength { min, .. } => schema["minLength"] = json!(min),
                StringConstraint::MaxLength { max, .. } => schema["maxLength"] = json!(max),
                StringConstraint::Pattern { pattern, .. } => {
                    schema["pattern"] = json!(pattern.as_str())
                }
                StringConstraint::Email { .. } => schema["format"] = json!("email"),
            }
        }
        schema
    }
}

impl ToJsonSchema for NumberRule {
    fn to_json_schema(&self) -> Value {
        let integer = self
            .checks
            .iter()
            .any(|c| matches!(c, NumberConstraint::Integer { .. }));
        let type_name = if integer { "integer" } else { "number" };

        // Coercing rules also accept numeric strings.
        let mut schema = if self.coerce {
            json!({ "type": [type_name, "string"] })
        } else {
            json!({ "type": type_name })
        };
        for check in &self.checks {
            match check {
                NumberConstraint::Integer { .. } => {}
                NumberConstraint::Minimum { value, .. } => schema["minimum"] = number_json(*value),
                NumberConstraint::Maximum { value, .. } => schema["maximum"] = number_json(*value),
            }
        }
        schema
    }
}

impl ToJsonSchema for EnumRule {
    fn to_json_schema(&self) -> Value {
        json!({
            "type": "string",
            "enum": self.values,
        })
    }
}

impl ToJsonSchema for ArrayRule {
    fn to_json_schema(&self) -> Value {
        let mut schema = json!({
            "type": "array",
            "items": self.items.to_json_schema(),
        });
        for check in &self.checks {
            match check {
                ArrayConstraint::MinItems { min, .. } => schema["minItems"] = json!(min),
                ArrayConstraint::MaxItems { max, .. } => schema["maxItems"] = json!(max),
            }
        }
        schema
    }
}

impl ToJsonSchema for ObjectRule {
    fn to_json_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for (name, field) in &self.fields {
            properties.insert(name.clone(), field.to_json_schema());
            if field.required {
                required.push(name.clone());
            }
        }

        let mut schema = json!({
            "type": "object",
            "properties": properties,
        });
        if !required.is_empty() {
            schema["required"] = json!(required);
        }
        if self.unknown_keys == UnknownKeys::Strict {
            schema["additionalProperties"] = json!(false);
        }
        schema
    }
}

impl ToJsonSchema for FieldKind {
    fn to_json_schema(&self) -> Value {
        match self {
            FieldKind::String(rule) => rule.to_json_schema(),
            FieldKind::Number(rule) => rule.to_json_schema(),
            FieldKind::Enum(rule) => rule.to_json_schema(),
            FieldKind::Array(rule) => rule.to_json_schema(),
            FieldKind::Object(rule) => rule.to_json_schema(),
        }
    }
}

impl ToJsonSchema for FieldRule {
    fn to_json_schema(&self) -> Value {
        let mut schema = self.kind.to_json_schema();
        if let Some(default) = &self.default {
            schema["default"] = default.clone();
        }
        schema
    }
}

impl ToJsonSchema for SectionRule {
    fn to_json_schema(&self) -> Value {
        self.rules.to_json_schema()
    }
}

impl ToJsonSchema for RequestSchema {
    fn to_json_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for (section, rule) in self.sections() {
            properties.insert(section.as_str().to_string(), rule.to_json_schema());
            if rule.required {
                required.push(section.as_str());
            }
        }

        let mut schema = json!({
            "type": "object",
            "properties": properties,
        });
        if !required.is_empty() {
            schema["required"] = json!(required);
        }
        schema
    }
}
