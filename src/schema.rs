//! Request schemas and the validator.
//!
//! A [`RequestSchema`] declares, for each of `params`, `query` and `body`,
//! whether the section must be present and which fields it holds.
//! [`validate`] checks a [`Request`] against it and returns either the
//! normalized request or every violation found.
//!
//! # Example
//!
//! ```rust
//! use turnstile::{validate, Request, RequestSchema, Rule, SectionRule};
//! use serde_json::json;
//!
//! let login = RequestSchema::new().body(SectionRule::required(
//!     Rule::object()
//!         .field("email", Rule::email())
//!         .field("password", Rule::string().min_len(1))
//!         .strict(),
//! ));
//!
//! let request = Request::new().with_body(json!({"email": " x@y.com ", "password": "pw"}));
//! let normalized = validate(&login, &request).into_result().unwrap();
//! assert_eq!(normalized.body.unwrap()["email"], json!("x@y.com"));
//!
//! let request = Request::new().with_body(json!({"email": "x@y.com", "password": ""}));
//! let violations = validate(&login, &request).into_result().unwrap_err();
//! assert_eq!(violations.first().path.to_string(), "body.password");
//! ```

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use stillwater::Validation;
use tracing::debug;

use crate::error::{SchemaDefinitionError, Violation, Violations};
use crate::path::FieldPath;
use crate::request::{NormalizedRequest, Request, Section};
use crate::rule::{take_flag, value_type_name, ObjectRule};
use crate::ValidationResult;

/// The rule for one request section.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SectionRule {
    /// When true, an absent section is a `MissingSection` violation.
    pub required: bool,
    #[serde(flatten)]
    pub rules: ObjectRule,
}

impl<'de> Deserialize<'de> for SectionRule {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut map = Map::<String, Value>::deserialize(deserializer)?;
        let required = take_flag(&mut map, "required", false)?;
        let rules = ObjectRule::deserialize(Value::Object(map)).map_err(de::Error::custom)?;
        Ok(Self { required, rules })
    }
}

impl SectionRule {
    pub fn required(rules: ObjectRule) -> Self {
        Self {
            required: true,
            rules,
        }
    }

    /// An absent optional section is valid even if it declares required fields.
    pub fn optional(rules: ObjectRule) -> Self {
        Self {
            required: false,
            rules,
        }
    }
}

/// A declarative description of an acceptable request.
///
/// Schemas are built once at start-up, checked with [`RequestSchema::check`]
/// (the registry does this on registration), and then shared read-only.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RequestSchema {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<SectionRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<SectionRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<SectionRule>,
}

impl RequestSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn body(mut self, rule: SectionRule) -> Self {
        self.body = Some(rule);
        self
    }

    pub fn params(mut self, rule: SectionRule) -> Self {
        self.params = Some(rule);
        self
    }

    pub fn query(mut self, rule: SectionRule) -> Self {
        self.query = Some(rule);
        self
    }

    pub fn section(&self, section: Section) -> Option<&SectionRule> {
        match section {
            Section::Body => self.body.as_ref(),
            Section::Params => self.params.as_ref(),
            Section::Query => self.query.as_ref(),
        }
    }

    /// Declared sections in validation order.
    pub fn sections(&self) -> impl Iterator<Item = (Section, &SectionRule)> {
        Section::ALL
            .into_iter()
            .filter_map(move |s| self.section(s).map(|rule| (s, rule)))
    }

    /// Checks the schema definition itself.
    pub fn check(&self) -> Result<(), SchemaDefinitionError> {
        for (section, rule) in self.sections() {
            rule.rules.check_fields(&FieldPath::section(section))?;
        }
        Ok(())
    }

    /// Validates `request` against this schema. See [`validate`].
    pub fn validate(&self, request: &Request) -> ValidationResult<NormalizedRequest> {
        let mut violations = Vec::new();
        let mut normalized = NormalizedRequest::default();

        for (section, rule) in self.sections() {
            let path = FieldPath::section(section);

            match request.section(section) {
                None | Some(Value::Null) if rule.required => {
                    violations.push(Violation::missing_section(path));
                }
                None | Some(Value::Null) => {}
                Some(Value::Object(map)) => match rule.rules.validate_map(map, &path) {
                    Validation::Success(fields) => normalized.set_section(section, fields),
                    Validation::Failure(e) => violations.extend(e),
                },
                Some(other) => {
                    violations.push(Violation::type_mismatch(
                        path,
                        "object",
                        value_type_name(other),
                    ));
                }
            }
        }

        match Violations::from_vec(violations) {
            Some(violations) => {
                debug!(violations = violations.len(), "request rejected");
                Validation::Failure(violations)
            }
            None => Validation::Success(normalized),
        }
    }
}

/// Validates `request` against `schema`.
///
/// Pure and synchronous: the result depends only on the two arguments.
/// Sections are checked in the order `params`, `query`, `body`; within a
/// section declared fields are checked in declaration order, then undeclared
/// keys. Every field is checked and contributes at most one violation, so
/// the caller sees all problems at once.
pub fn validate(schema: &RequestSchema, request: &Request) -> ValidationResult<NormalizedRequest> {
    schema.validate(request)
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<RequestSchema>();
    assert_sync::<RequestSchema>();
};
