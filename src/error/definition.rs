use thiserror::Error;

/// A malformed schema definition.
///
/// These are programming or configuration mistakes, surfaced when a schema is
/// checked, registered or loaded, never while validating a request.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaDefinitionError {
    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("{path}: empty field name")]
    EmptyFieldName { path: String },

    #[error("{path}: minimum length {min} exceeds maximum length {max}")]
    LengthBounds { path: String, min: usize, max: usize },

    #[error("{path}: minimum {min} exceeds maximum {max}")]
    RangeBounds { path: String, min: f64, max: f64 },

    #[error("{path}: bound {value} is not a finite number")]
    NonFiniteBound { path: String, value: f64 },

    #[error("{path}: enum declares no values")]
    EmptyEnum { path: String },

    #[error("{path}: enum value '{value}' declared twice")]
    DuplicateEnumValue { path: String, value: String },

    #[error("{path}: default value does not satisfy the field rule: {reason}")]
    InvalidDefault { path: String, reason: String },

    #[error("{path}: required field declares a default")]
    RequiredWithDefault { path: String },
}
