//! Number field rules.
//!
//! This module provides [`NumberRule`] for numeric fields with integer and
//! range constraints, and optional coercion from numeric strings (query and
//! path parameters always arrive as strings).

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use stillwater::Validation;

use crate::error::{SchemaDefinitionError, Violation, Violations};
use crate::path::FieldPath;
use crate::ValidationResult;

use super::traits::ValueRule;
use super::value_type_name;

/// A constraint applied to numbers, checked in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "check", rename_all = "camelCase", deny_unknown_fields)]
pub enum NumberConstraint {
    Integer {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    Minimum {
        value: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    Maximum {
        value: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
}

impl NumberConstraint {
    fn message_mut(&mut self) -> &mut Option<String> {
        match self {
            NumberConstraint::Integer { message }
            | NumberConstraint::Minimum { message, .. }
            | NumberConstraint::Maximum { message, .. } => message,
        }
    }
}

/// A rule for numeric fields.
///
/// # Example
///
/// ```rust
/// use turnstile::{FieldPath, Rule, Section, ValueRule};
/// use serde_json::json;
///
/// let page = Rule::integer().coerce().min(1.0);
/// let path = FieldPath::section(Section::Query).push_field("page");
///
/// assert_eq!(page.validate(&json!("3"), &path).into_result().unwrap(), json!(3));
/// assert!(page.validate(&json!("0"), &path).is_failure());
/// assert!(page.validate(&json!("three"), &path).is_failure());
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NumberRule {
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub coerce: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub checks: Vec<NumberConstraint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_message: Option<String>,
}

impl NumberRule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts strings holding a finite number and normalizes them to numbers.
    pub fn coerce(mut self) -> Self {
        self.coerce = true;
        self
    }

    /// The number must have no fractional part.
    pub fn integer(mut self) -> Self {
        self.checks.push(NumberConstraint::Integer { message: None });
        self
    }

    /// Inclusive lower bound.
    pub fn min(mut self, value: f64) -> Self {
        self.checks.push(NumberConstraint::Minimum {
            value,
            message: None,
        });
        self
    }

    /// Inclusive upper bound.
    pub fn max(mut self, value: f64) -> Self {
        self.checks.push(NumberConstraint::Maximum {
            value,
            message: None,
        });
        self
    }

    /// Shorthand for `.min(start).max(end)`.
    pub fn range(self, start: f64, end: f64) -> Self {
        self.min(start).max(end)
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

    fn type_violation(&self, value: &Value, path: &FieldPath) -> Violations {
        let mut violation = Violation::type_mismatch(path.clone(), "number", value_type_name(value));
        if let Some(message) = &self.type_message {
            violation.message = message.clone();
        }
        Violations::single(violation)
    }

    fn bounds(&self) -> (Option<f64>, Option<f64>) {
        let mut min = None;
        let mut max = None;
        for check in &self.checks {
            match check {
                NumberConstraint::Minimum { value, .. } if min.is_none() => min = Some(*value),
                NumberConstraint::Maximum { value, .. } if max.is_none() => max = Some(*value),
                _ => {}
            }
        }
        (min, max)
    }
}

impl ValueRule for NumberRule {
    fn validate(&self, value: &Value, path: &FieldPath) -> ValidationResult<Value> {
        let (n, normalized) = match value {
            Value::Number(num) => match num.as_f64() {
                Some(n) => (n, value.clone()),
                None => return Validation::Failure(self.type_violation(value, path)),
            },
            Value::String(s) if self.coerce => match parse_number(s) {
                Some(n) => (n, number_value(n)),
                None => return Validation::Failure(self.type_violation(value, path)),
            },
            _ => return Validation::Failure(self.type_violation(value, path)),
        };

        match self.checks.iter().find_map(|c| check_constraint(c, n, path)) {
            Some(violation) => Validation::Failure(Violations::single(violation)),
            None => Validation::Success(normalized),
        }
    }

    fn check_definition(&self, path: &FieldPath) -> Result<(), SchemaDefinitionError> {
        for check in &self.checks {
            match check {
                NumberConstraint::Minimum { value, .. } | NumberConstraint::Maximum { value, .. }
                    if !value.is_finite() =>
                {
                    return Err(SchemaDefinitionError::NonFiniteBound {
                        path: path.to_string(),
                        value: *value,
                    });
                }
                _ => {}
            }
        }

        match self.bounds() {
            (Some(min), Some(max)) if min > max => Err(SchemaDefinitionError::RangeBounds {
                path: path.to_string(),
                min,
                max,
            }),
            _ => Ok(()),
        }
    }
}

/// Parses a coercible string. Empty and non-finite inputs do not count.
fn parse_number(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Integral values become JSON integers so that `"5"` normalizes to `5`.
fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n >= i64::MIN as f64 && n <= i64::MAX as f64 {
        Value::Number(Number::from(n as i64))
    } else {
        Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Checks a single constraint and returns a violation if it fails.
fn check_constraint(constraint: &NumberConstraint, n: f64, path: &FieldPath) -> Option<Violation> {
    match constraint {
        NumberConstraint::Integer { message } if n.fract() != 0.0 => {
            let msg = message
                .clone()
                .unwrap_or_else(|| "must be an integer".to_string());
            Some(
                Violation::constraint(path.clone(), msg)
                    .with_code("integer")
                    .with_expected("integer")
                    .with_got(format_number(n)),
            )
        }
        NumberConstraint::Minimum { value, message } if n < *value => {
            let msg = message.clone().unwrap_or_else(|| {
                format!("must be at least {}, got {}", format_number(*value), format_number(n))
            });
            Some(
                Violation::constraint(path.clone(), msg)
                    .with_code("minimum")
                    .with_expected(format!(">= {}", format_number(*value)))
                    .with_got(format_number(n)),
            )
        }
        NumberConstraint::Maximum { value, message } if n > *value => {
            let msg = message.clone().unwrap_or_else(|| {
                format!("must be at most {}, got {}", format_number(*value), format_number(n))
            });
            Some(
                Violation::constraint(path.clone(), msg)
                    .with_code("maximum")
                    .with_expected(format!("<= {}", format_number(*value)))
                    .with_got(format_number(n)),
            )
        }
        _ => None,
    }
}
