//! Enumerated string fields.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use stillwater::Validation;

use crate::error::{SchemaDefinitionError, Violation, Violations};
use crate::path::FieldPath;
use crate::ValidationResult;

use super::traits::ValueRule;
use super::value_type_name;

/// A string that must be one of a fixed set of values. Matching is exact
/// and case-sensitive: `"Recruiter"` is not `"recruiter"`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnumRule {
    pub values: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl EnumRule {
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: values.into_iter().map(Into::into).collect(),
            message: None,
        }
    }

    /// Sets a custom message for the membership check.
    pub fn error(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    fn expected(&self) -> String {
        format!("one of [{}]", self.values.join(", "))
    }
}

impl ValueRule for EnumRule {
    fn validate(&self, value: &Value, path: &FieldPath) -> ValidationResult<Value> {
        let s = match value.as_str() {
            Some(s) => s,
            None => {
                return Validation::Failure(Violations::single(Violation::type_mismatch(
                    path.clone(),
                    "string",
                    value_type_name(value),
                )))
            }
        };

        if self.values.iter().any(|v| v == s) {
            return Validation::Success(value.clone());
        }

        let message = self
            .message
            .clone()
            .unwrap_or_else(|| format!("must be {}", self.expected()));
        Validation::Failure(Violations::single(
            Violation::constraint(path.clone(), message)
                .with_code("enum")
                .with_expected(self.expected())
                .with_got(s),
        ))
    }

    fn check_definition(&self, path: &FieldPath) -> Result<(), SchemaDefinitionError> {
        if self.values.is_empty() {
            return Err(SchemaDefinitionError::EmptyEnum {
                path: path.to_string(),
            });
        }
        for (i, value) in self.values.iter().enumerate() {
            if self.values[..i].contains(value) {
                return Err(SchemaDefinitionError::DuplicateEnumValue {
                    path: path.to_string(),
                    value: value.clone(),
                });
            }
        }
        Ok(())
    }
}
