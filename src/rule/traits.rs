//! The seam every rule kind validates through.

use serde_json::Value;

use crate::error::SchemaDefinitionError;
use crate::path::FieldPath;
use crate::ValidationResult;

/// A rule that can validate (and normalize) a single present JSON value.
///
/// Presence and requiredness are handled by the enclosing object or section;
/// implementors only ever see a value that is there. On success they return
/// the normalized value (trimmed strings, coerced numbers, filtered objects).
///
/// The `Send + Sync` bounds let rules live in schemas shared across threads.
pub trait ValueRule: Send + Sync {
    /// Validates `value`, reporting violations at `path`.
    fn validate(&self, value: &Value, path: &FieldPath) -> ValidationResult<Value>;

    /// Checks the rule itself for contradictions, e.g. `min_len` above `max_len`.
    fn check_definition(&self, path: &FieldPath) -> Result<(), SchemaDefinitionError>;
}
