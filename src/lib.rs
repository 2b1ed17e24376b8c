//! # Turnstile
//!
//! Declarative request validation for HTTP handlers. A [`RequestSchema`]
//! describes what an endpoint accepts in its route `params`, `query` string
//! and `body`; [`validate`] checks an incoming [`Request`] against it and
//! returns either a [`NormalizedRequest`] (trimmed, coerced, filtered) or
//! every problem found as [`Violations`].
//!
//! ## Overview
//!
//! Validation never stops at the first bad field. Each field reports at most
//! one violation (its first failing constraint) and all fields across all
//! sections are checked, so a client can fix everything in one round trip.
//! Violations accumulate through stillwater's `Validation` type.
//!
//! Schemas are plain data: they serialize to JSON, compare with `==`, and can
//! be loaded from definition files. A malformed schema (say `min_len` above
//! `max_len`, or a regex that does not compile) is rejected when it is
//! registered, never while serving a request.
//!
//! ## Core Types
//!
//! - [`FieldPath`]: where a violation happened, e.g. `body.location.city`
//! - [`Violation`] / [`Violations`]: what went wrong, with a [`ViolationKind`]
//! - [`Rule`]: entry point for building field rules
//! - [`RequestSchema`] / [`SectionRule`]: per-section field tables
//! - [`SchemaRegistry`]: named schemas shared across threads
//!
//! ## Example
//!
//! ```rust
//! use turnstile::{validate, Request, RequestSchema, Rule, SectionRule, ViolationKind};
//! use serde_json::json;
//!
//! let schema = RequestSchema::new().body(SectionRule::required(
//!     Rule::object()
//!         .field("fullname", Rule::string().trim().min_len(2).max_len(50))
//!         .field("email", Rule::email())
//!         .optional("role", Rule::enumeration(["candidate", "recruiter"]))
//!         .strict(),
//! ));
//!
//! let request = Request::new().with_body(json!({
//!     "fullname": "A",
//!     "email": "a@b.com",
//!     "isAdmin": true
//! }));
//!
//! let violations = validate(&schema, &request).into_result().unwrap_err();
//! assert_eq!(violations.len(), 2);
//! assert_eq!(violations.first().path.to_string(), "body.fullname");
//! assert_eq!(violations.of_kind(&ViolationKind::UnknownField).len(), 1);
//! ```

pub mod catalog;
pub mod error;
pub mod interop;
pub mod loading;
pub mod path;
pub mod pattern;
pub mod registry;
pub mod request;
pub mod rule;
pub mod schema;

pub use error::{SchemaDefinitionError, Violation, ViolationKind, ViolationRecord, Violations};
pub use interop::ToJsonSchema;
pub use loading::{FileSystem, SchemaEnv, SchemaLoadError, StdEnv, StdFileSystem};
pub use path::FieldPath;
pub use pattern::Pattern;
pub use registry::{RegistryError, SchemaRegistry};
pub use request::{NormalizedRequest, Request, Section};
pub use rule::{
    ArrayRule, EnumRule, FieldKind, FieldRule, NumberRule, ObjectRule, Rule, StringRule,
    UnknownKeys, ValueRule,
};
pub use schema::{validate, RequestSchema, SectionRule};

/// Type alias for validation results carrying [`Violations`].
pub type ValidationResult<T> = stillwater::Validation<T, Violations>;
