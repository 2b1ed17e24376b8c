//! Regular-expression patterns that are also plain schema data.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::SchemaDefinitionError;

/// 24 hexadecimal characters, the shape of a document object identifier.
pub const OBJECT_ID: &str = r"^[0-9a-fA-F]{24}$";

/// 7 to 15 digits with an optional leading `+`.
pub const PHONE_NUMBER: &str = r"^\+?[0-9]{7,15}$";

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$",
    )
    .expect("email regex")
});

/// Returns true if `value` looks like a deliverable email address.
///
/// Local part of RFC 5322 atext characters, a dotted domain with at least
/// two labels, no whitespace, no leading/trailing or doubled dots.
pub fn is_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
        && !value.contains("..")
        && !value.starts_with('.')
        && !value.contains(".@")
}

/// A compiled regular expression.
///
/// Compiles once when the schema is built or deserialized; an invalid
/// expression is a schema definition error. Compares and serializes by its
/// source text.
#[derive(Clone)]
pub struct Pattern(Regex);

impl Pattern {
    pub fn new(source: &str) -> Result<Self, SchemaDefinitionError> {
        Regex::new(source)
            .map(Pattern)
            .map_err(|e| SchemaDefinitionError::InvalidPattern {
                pattern: source.to_string(),
                reason: e.to_string(),
            })
    }

    pub fn object_id() -> Self {
        static OBJECT_ID_RE: Lazy<Regex> =
            Lazy::new(|| Regex::new(OBJECT_ID).expect("object id regex"));
        Pattern(OBJECT_ID_RE.clone())
    }

    pub fn phone_number() -> Self {
        static PHONE_NUMBER_RE: Lazy<Regex> =
            Lazy::new(|| Regex::new(PHONE_NUMBER).expect("phone number regex"));
        Pattern(PHONE_NUMBER_RE.clone())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn is_match(&self, value: &str) -> bool {
        self.0.is_match(value)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pattern").field(&self.as_str()).finish()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Pattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Pattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let source = String::deserialize(deserializer)?;
        Pattern::new(&source).map_err(serde::de::Error::custom)
    }
}
