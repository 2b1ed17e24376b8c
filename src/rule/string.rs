//! String field rules.
//!
//! This module provides [`StringRule`] for string fields with length,
//! pattern and email-format constraints, plus optional trimming.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use stillwater::Validation;

use crate::error::{SchemaDefinitionError, Violation, Violations};
use crate::path::FieldPath;
use crate::pattern::{is_email, Pattern};
use crate::ValidationResult;

use super::traits::ValueRule;
use super::value_type_name;

/// A constraint applied to string values, checked in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "check", rename_all = "camelCase", deny_unknown_fields)]
pub enum StringConstraint {
    MinLength {
        min: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    MaxLength {
        max: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    Pattern {
        pattern: Pattern,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    Email {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
}

impl StringConstraint {
    fn message_mut(&mut self) -> &mut Option<String> {
        match self {
            StringConstraint::MinLength { message, .. }
            | StringConstraint::MaxLength { message, .. }
            | StringConstraint::Pattern { message, .. }
            | StringConstraint::Email { message } => message,
        }
    }
}

/// A rule for string fields.
///
/// The type check runs first, then trimming (if enabled), then each
/// constraint in the order it was declared. Only the first failing
/// constraint is reported.
///
/// # Example
///
/// ```rust
/// use turnstile::{FieldPath, Rule, Section, ValueRule};
/// use serde_json::json;
///
/// let rule = Rule::string().trim().min_len(2).max_len(50);
/// let path = FieldPath::section(Section::Body).push_field("fullname");
///
/// let result = rule.validate(&json!("  Al  "), &path);
/// assert_eq!(result.into_result().unwrap(), json!("Al"));
///
/// let result = rule.validate(&json!("A"), &path);
/// assert!(result.is_failure());
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct StringRule {
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub trim: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub checks: Vec<StringConstraint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_message: Option<String>,
}

impl StringRule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trims surrounding whitespace before any constraint runs; the trimmed
    /// string is what ends up in the normalized request.
    pub fn trim(mut self) -> Self {
        self.trim = true;
        self
    }

    /// The string must have at least `min` characters (Unicode scalar values).
    pub fn min_len(mut self, min: usize) -> Self {
        self.checks
            .push(StringConstraint::MinLength { min, message: None });
        self
    }

    /// The string must have at most `max` characters (Unicode scalar values).
    pub fn max_len(mut self, max: usize) -> Self {
        self.checks
            .push(StringConstraint::MaxLength { max, message: None });
        self
    }

    /// The string must match `pattern`.
    pub fn pattern(mut self, pattern: Pattern) -> Self {
        self.checks.push(StringConstraint::Pattern {
            pattern,
            message: None,
        });
        self
    }

    /// The string must be a well-formed email address.
    pub fn email(mut self) -> Self {
        self.checks.push(StringConstraint::Email { message: None });
        self
    }

    /// Sets a custom message for the most recent constraint, or for the type
    /// check if no constraint has been added yet.
    pub fn error(mut self, message: impl Into<String>) -> Self {
        match self.checks.last_mut() {
            Some(last) => *last.message_mut() = Some(message.into()),
            None => self.type_message = Some(message.into()),
        }
        self
    }
}

impl ValueRule for StringRule {
    fn validate(&self, value: &Value, path: &FieldPath) -> ValidationResult<Value> {
        let raw = match value.as_str() {
            Some(s) => s,
            None => {
                let mut violation =
                    Violation::type_mismatch(path.clone(), "string", value_type_name(value));
                if let Some(message) = &self.type_message {
                    violation.message = message.clone();
                }
                return Validation::Failure(Violations::single(violation));
            }
        };

        let s = if self.trim { raw.trim() } else { raw };

        match self.checks.iter().find_map(|c| check_constraint(c, s, path)) {
            Some(violation) => Validation::Failure(Violations::single(violation)),
            None => Validation::Success(Value::String(s.to_string())),
        }
    }

    fn check_definition(&self, path: &FieldPath) -> Result<(), SchemaDefinitionError> {
        let min = self.checks.iter().find_map(|c| match c {
            StringConstraint::MinLength { min, .. } => Some(*min),
            _ => None,
        });
        let max = self.checks.iter().find_map(|c| match c {
            StringConstraint::MaxLength { max, .. } => Some(*max),
            _ => None,
        });
        match (min, max) {
            (Some(min), Some(max)) if min > max => Err(SchemaDefinitionError::LengthBounds {
                path: path.to_string(),
                min,
                max,
            }),
            _ => Ok(()),
        }
    }
}

/// Checks a single constraint and returns a violation if it fails.
fn check_constraint(
    constraint: &StringConstraint,
    value: &str,
    path: &FieldPath,
) -> Option<Violation> {
    match constraint {
        StringConstraint::MinLength { min, message } => {
            let len = value.chars().count();
            if len < *min {
                let msg = message
                    .clone()
                    .unwrap_or_else(|| format!("length must be at least {}, got {}", min, len));
                Some(
                    Violation::constraint(path.clone(), msg)
                        .with_code("min_length")
                        .with_expected(format!("at least {} characters", min))
                        .with_got(format!("{} characters", len)),
                )
            } else {
                None
            }
        }
        StringConstraint::MaxLength { max, message } => {
            let len = value.chars().count();
            if len > *max {
                let msg = message
                    .clone()
                    .unwrap_or_else(|| format!("length must be at most {}, got {}", max, len));
                Some(
                    Violation::constraint(path.clone(), msg)
                        .with_code("max_length")
                        .with_expected(format!("at most {} characters", max))
                        .with_got(format!("{} characters", len)),
                )
            } else {
                None
            }
        }
        StringConstraint::Pattern { pattern, message } => {
            if pattern.is_match(value) {
                None
            } else {
                let msg = message
                    .clone()
                    .unwrap_or_else(|| format!("must match pattern '{}'", pattern));
                Some(
                    Violation::constraint(path.clone(), msg)
                        .with_code("pattern")
                        .with_expected(format!("string matching '{}'", pattern))
                        .with_got(value.to_string()),
                )
            }
        }
        StringConstraint::Email { message } => {
            if is_email(value) {
                None
            } else {
                let msg = message
                    .clone()
                    .unwrap_or_else(|| "must be a valid email address".to_string());
                Some(
                    Violation::constraint(path.clone(), msg)
                        .with_code("email")
                        .with_expected("email address")
                        .with_got(value.to_string()),
                )
            }
        }
    }
}
