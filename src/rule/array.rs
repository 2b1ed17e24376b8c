//! Array field rules.
//!
//! This module provides [`ArrayRule`] for arrays whose elements all follow
//! one element rule, with item-count constraints.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use stillwater::Validation;

use crate::error::{SchemaDefinitionError, Violation, Violations};
use crate::path::FieldPath;
use crate::ValidationResult;

use super::traits::ValueRule;
use super::{value_type_name, FieldKind};

/// A constraint on the number of items, checked in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "check", rename_all = "camelCase", deny_unknown_fields)]
pub enum ArrayConstraint {
    MinItems {
        min: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    MaxItems {
        max: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
}

/// A rule for array fields.
///
/// Validation order:
///
/// 1. the value must be an array
/// 2. item-count constraints, first failure reported against the array itself
/// 3. every element against the element rule; element failures are reported
///    at `field[i]...` as nested failures of the array field
///
/// # Example
///
/// ```rust
/// use turnstile::{FieldPath, Rule, Section, ValueRule};
/// use serde_json::json;
///
/// let skills = Rule::array(Rule::string().trim().min_len(1)).max_items(3);
/// let path = FieldPath::section(Section::Body).push_field("skills");
///
/// assert!(skills.validate(&json!(["rust", "sql"]), &path).is_success());
///
/// let errors = skills.validate(&json!(["rust", ""]), &path).into_result().unwrap_err();
/// assert_eq!(errors.first().path.to_string(), "body.skills[1]");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArrayRule {
    pub items: Box<FieldKind>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub checks: Vec<ArrayConstraint>,
}

impl ArrayRule {
    pub fn new(items: impl Into<FieldKind>) -> Self {
        Self {
            items: Box::new(items.into()),
            checks: Vec::new(),
        }
    }

    pub fn min_items(mut self, min: usize) -> Self {
        self.checks
            .push(ArrayConstraint::MinItems { min, message: None });
        self
    }

    pub fn max_items(mut self, max: usize) -> Self {
        self.checks
            .push(ArrayConstraint::MaxItems { max, message: None });
        self
    }

    /// Equivalent to `.min_items(1)`.
    pub fn non_empty(self) -> Self {
        self.min_items(1)
    }

    /// Sets a custom message for the most recent item-count constraint.
    pub fn error(mut self, message: impl Into<String>) -> Self {
        if let Some(last) = self.checks.last_mut() {
            match last {
                ArrayConstraint::MinItems { message: m, .. } => *m = Some(message.into()),
                ArrayConstraint::MaxItems { message: m, .. } => *m = Some(message.into()),
            }
        }
        self
    }
}

impl ValueRule for ArrayRule {
    fn validate(&self, value: &Value, path: &FieldPath) -> ValidationResult<Value> {
        let arr = match value.as_array() {
            Some(a) => a,
            None => {
                return Validation::Failure(Violations::single(Violation::type_mismatch(
                    path.clone(),
                    "array",
                    value_type_name(value),
                )))
            }
        };

        if let Some(violation) = self
            .checks
            .iter()
            .find_map(|c| check_constraint(c, arr.len(), path))
        {
            return Validation::Failure(Violations::single(violation));
        }

        let mut violations = Vec::new();
        let mut validated = Vec::with_capacity(arr.len());
        for (index, item) in arr.iter().enumerate() {
            match self.items.validate(item, &path.push_index(index)) {
                Validation::Success(v) => validated.push(v),
                Validation::Failure(e) => {
                    violations.extend(e.into_iter().map(|v| v.nested_under(path)))
                }
            }
        }

        match Violations::from_vec(violations) {
            Some(violations) => Validation::Failure(violations),
            None => Validation::Success(Value::Array(validated)),
        }
    }

    fn check_definition(&self, path: &FieldPath) -> Result<(), SchemaDefinitionError> {
        let min = self.checks.iter().find_map(|c| match c {
            ArrayConstraint::MinItems { min, .. } => Some(*min),
            _ => None,
        });
        let max = self.checks.iter().find_map(|c| match c {
            ArrayConstraint::MaxItems { max, .. } => Some(*max),
            _ => None,
        });
        if let (Some(min), Some(max)) = (min, max) {
            if min > max {
                return Err(SchemaDefinitionError::LengthBounds {
                    path: path.to_string(),
                    min,
                    max,
                });
            }
        }
        self.items.check_definition(&path.push_index(0))
    }
}

fn check_constraint(constraint: &ArrayConstraint, len: usize, path: &FieldPath) -> Option<Violation> {
    match constraint {
        ArrayConstraint::MinItems { min, message } if len < *min => {
            let msg = message
                .clone()
                .unwrap_or_else(|| format!("must have at least {} items, got {}", min, len));
            Some(
                Violation::constraint(path.clone(), msg)
                    .with_code("min_items")
                    .with_expected(format!("at least {} items", min))
                    .with_got(format!("{} items", len)),
            )
        }
        ArrayConstraint::MaxItems { max, message } if len > *max => {
            let msg = message
                .clone()
                .unwrap_or_else(|| format!("must have at most {} items, got {}", max, len));
            Some(
                Violation::constraint(path.clone(), msg)
                    .with_code("max_items")
                    .with_expected(format!("at most {} items", max))
                    .with_got(format!("{} items", len)),
            )
        }
        _ => None,
    }
}
