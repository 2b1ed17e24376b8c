//! Inbound requests and normalized outputs.

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One of the three sections of a request a schema can describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Body,
    Params,
    Query,
}

impl Section {
    /// Sections in the order they are validated and reported.
    pub const ALL: [Section; 3] = [Section::Params, Section::Query, Section::Body];

    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Body => "body",
            Section::Params => "params",
            Section::Query => "query",
        }
    }
}

impl Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request as the calling layer hands it over.
///
/// Sections hold arbitrary JSON; a section that should be a mapping but is
/// not is reported as a type mismatch, not rejected here.
///
/// ```rust
/// use turnstile::Request;
/// use serde_json::json;
///
/// let request = Request::new()
///     .with_params(json!({"id": "64b7f0c2a1e4d93f2c8b4567"}))
///     .with_body(json!({"bio": "Rust developer"}));
/// assert!(request.query.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Request {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<Value>,
}

impl Request {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_params(mut self, params: Value) -> Self {
        self.params = Some(params);
        self
    }

    pub fn with_query(mut self, query: Value) -> Self {
        self.query = Some(query);
        self
    }

    pub fn section(&self, section: Section) -> Option<&Value> {
        match section {
            Section::Body => self.body.as_ref(),
            Section::Params => self.params.as_ref(),
            Section::Query => self.query.as_ref(),
        }
    }
}

/// The success output of validation: each section filtered and normalized.
///
/// A section is `None` when the request did not carry it or the schema does
/// not describe it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NormalizedRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<Map<String, Value>>,
}

impl NormalizedRequest {
    pub fn section(&self, section: Section) -> Option<&Map<String, Value>> {
        match section {
            Section::Body => self.body.as_ref(),
            Section::Params => self.params.as_ref(),
            Section::Query => self.query.as_ref(),
        }
    }

    pub(crate) fn set_section(&mut self, section: Section, value: Map<String, Value>) {
        let slot = match section {
            Section::Body => &mut self.body,
            Section::Params => &mut self.params,
            Section::Query => &mut self.query,
        };
        *slot = Some(value);
    }

    /// Looks up a normalized value, e.g. `get(Section::Query, "page")`.
    pub fn get(&self, section: Section, field: &str) -> Option<&Value> {
        self.section(section).and_then(|s| s.get(field))
    }

    /// Turns the output back into a request, e.g. to validate it again.
    pub fn into_request(self) -> Request {
        Request {
            body: self.body.map(Value::Object),
            params: self.params.map(Value::Object),
            query: self.query.map(Value::Object),
        }
    }
}
