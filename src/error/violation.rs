//! Request validation violations.
//!
//! This module provides [`Violation`] for a single field-level failure and
//! [`Violations`] for the non-empty, ordered collection a failed validation
//! returns.

use std::fmt::{self, Display};

use serde::{Serialize, Serializer};
use stillwater::prelude::*;

use crate::path::FieldPath;

/// What kind of failure a [`Violation`] describes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ViolationKind {
    /// A section the schema requires is absent from the request.
    MissingSection,
    /// A strict section contains a key the schema does not declare.
    UnknownField,
    /// A required field is absent (or `null`).
    MissingField,
    /// A present value has the wrong JSON type.
    TypeMismatch,
    /// A value of the right type fails a length, pattern, format, enum or range check.
    ConstraintViolation,
    /// A child of an object or array field failed; `inner` is the child's own kind.
    NestedValidationFailure {
        parent: FieldPath,
        inner: Box<ViolationKind>,
    },
}

impl ViolationKind {
    /// Returns the wire name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationKind::MissingSection => "MissingSection",
            ViolationKind::UnknownField => "UnknownField",
            ViolationKind::MissingField => "MissingField",
            ViolationKind::TypeMismatch => "TypeMismatch",
            ViolationKind::ConstraintViolation => "ConstraintViolation",
            ViolationKind::NestedValidationFailure { .. } => "NestedValidationFailure",
        }
    }

    /// Unwraps any nesting and returns the kind of the innermost failure.
    pub fn root_kind(&self) -> &ViolationKind {
        match self {
            ViolationKind::NestedValidationFailure { inner, .. } => inner.root_kind(),
            other => other,
        }
    }

    fn default_code(&self) -> &'static str {
        match self.root_kind() {
            ViolationKind::MissingSection => "missing_section",
            ViolationKind::UnknownField => "unknown_field",
            ViolationKind::MissingField => "required",
            ViolationKind::TypeMismatch => "invalid_type",
            _ => "constraint",
        }
    }
}

impl Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single validation failure with full context.
///
/// - **path**: where in the request the failure occurred (`body.email`)
/// - **message**: human-readable description
/// - **kind**: the taxonomy entry, see [`ViolationKind`]
/// - **code**: machine-readable detail (`min_length`, `pattern`, `email`, ...)
/// - **expected** / **got**: optional extra context
///
/// # Example
///
/// ```rust
/// use turnstile::{FieldPath, Section, Violation, ViolationKind};
///
/// let violation = Violation::constraint(
///     FieldPath::section(Section::Body).push_field("email"),
///     "must be a valid email address",
/// )
/// .with_code("email")
/// .with_got("bad");
///
/// assert_eq!(violation.kind, ViolationKind::ConstraintViolation);
/// assert_eq!(violation.path.to_string(), "body.email");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    pub path: FieldPath,
    pub message: String,
    pub kind: ViolationKind,
    pub code: String,
    pub got: Option<String>,
    pub expected: Option<String>,
}

impl Violation {
    /// Creates a violation of the given kind; the code defaults from the kind.
    pub fn new(kind: ViolationKind, path: FieldPath, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
            code: kind.default_code().to_string(),
            kind,
            got: None,
            expected: None,
        }
    }

    pub fn missing_section(path: FieldPath) -> Self {
        let message = format!("section '{}' is required", path);
        Self::new(ViolationKind::MissingSection, path, message)
    }

    pub fn unknown_field(path: FieldPath, key: &str) -> Self {
        Self::new(
            ViolationKind::UnknownField,
            path,
            format!("unknown field '{}'", key),
        )
    }

    pub fn missing_field(path: FieldPath, name: &str) -> Self {
        Self::new(
            ViolationKind::MissingField,
            path,
            format!("required field '{}' is missing", name),
        )
        .with_expected("value")
    }

    pub fn type_mismatch(path: FieldPath, expected: &str, got: &str) -> Self {
        Self::new(
            ViolationKind::TypeMismatch,
            path,
            format!("expected {}, got {}", expected, got),
        )
        .with_expected(expected)
        .with_got(got)
    }

    pub fn constraint(path: FieldPath, message: impl Into<String>) -> Self {
        Self::new(ViolationKind::ConstraintViolation, path, message)
    }

    /// Sets the error code and returns self for chaining.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    /// Sets the "got" (actual value) field and returns self for chaining.
    pub fn with_got(mut self, got: impl Into<String>) -> Self {
        self.got = Some(got.into());
        self
    }

    /// Sets the "expected" field and returns self for chaining.
    pub fn with_expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self
    }

    /// Wraps this violation as a failure of the enclosing field at `parent`.
    ///
    /// The path already carries the parent prefix (children are validated at
    /// their full path); only the kind changes. The code is kept.
    pub fn nested_under(self, parent: &FieldPath) -> Self {
        Self {
            kind: ViolationKind::NestedValidationFailure {
                parent: parent.clone(),
                inner: Box::new(self.kind),
            },
            ..self
        }
    }

    /// Kind of the innermost failure, looking through nesting.
    pub fn root_kind(&self) -> &ViolationKind {
        self.kind.root_kind()
    }

    /// Returns the flat wire form of this violation.
    pub fn to_record(&self) -> ViolationRecord {
        ViolationRecord {
            path: self.path.to_string(),
            message: self.message.clone(),
            constraint_kind: self.kind.as_str().to_string(),
            code: self.code.clone(),
        }
    }
}

impl Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path_str = if self.path.is_root() {
            "(request)".to_string()
        } else {
            self.path.to_string()
        };

        write!(f, "{}: {}", path_str, self.message)?;

        if let Some(ref expected) = self.expected {
            write!(f, " (expected: {})", expected)?;
        }
        if let Some(ref got) = self.got {
            write!(f, " (got: {})", got)?;
        }

        Ok(())
    }
}

impl std::error::Error for Violation {}

impl Serialize for Violation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_record().serialize(serializer)
    }
}

/// The serialized shape of a [`Violation`] handed to the calling layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViolationRecord {
    pub path: String,
    pub message: String,
    pub constraint_kind: String,
    pub code: String,
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<Violation>();
    assert_sync::<Violation>();
};

/// A non-empty, ordered collection of violations.
///
/// `Violations` wraps a `NonEmptyVec<Violation>` so a failed validation always
/// carries at least one entry. It implements `Semigroup`, which is how
/// violations from independent fields and sections are accumulated.
///
/// ```rust
/// use turnstile::{FieldPath, Section, Violation, Violations};
/// use stillwater::prelude::*;
///
/// let body = FieldPath::section(Section::Body);
/// let a = Violations::single(Violation::missing_field(body.push_field("email"), "email"));
/// let b = Violations::single(Violation::missing_field(body.push_field("password"), "password"));
///
/// assert_eq!(a.combine(b).len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Violations(NonEmptyVec<Violation>);

impl Violations {
    pub fn single(violation: Violation) -> Self {
        Self(NonEmptyVec::singleton(violation))
    }

    /// Builds a collection from a vec, or `None` if the vec is empty.
    pub fn from_vec(violations: Vec<Violation>) -> Option<Self> {
        NonEmptyVec::from_vec(violations).map(Self)
    }

    /// Wraps every violation as a nested failure of the field at `parent`.
    pub fn nested_under(self, parent: &FieldPath) -> Self {
        Self(self.0.map(|v| v.nested_under(parent)))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; the collection is non-empty by construction.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.0.iter()
    }

    pub fn first(&self) -> &Violation {
        self.0.head()
    }

    /// Returns all violations at exactly the given path.
    pub fn at_path(&self, path: &FieldPath) -> Vec<&Violation> {
        self.0.iter().filter(|v| &v.path == path).collect()
    }

    /// Returns the violation at the path rendered as `path`, e.g. `"body.email"`.
    pub fn at(&self, path: &str) -> Option<&Violation> {
        self.0.iter().find(|v| v.path.to_string() == path)
    }

    /// Returns all violations with the given code.
    pub fn with_code(&self, code: &str) -> Vec<&Violation> {
        self.0.iter().filter(|v| v.code == code).collect()
    }

    /// Returns all violations whose innermost kind equals `kind`.
    pub fn of_kind(&self, kind: &ViolationKind) -> Vec<&Violation> {
        self.0.iter().filter(|v| v.root_kind() == kind).collect()
    }

    pub fn to_records(&self) -> Vec<ViolationRecord> {
        self.0.iter().map(Violation::to_record).collect()
    }

    pub fn into_vec(self) -> Vec<Violation> {
        self.0.into_vec()
    }
}

impl Semigroup for Violations {
    fn combine(self, other: Self) -> Self {
        Violations(self.0.combine(other.0))
    }
}

impl Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "request rejected with {} violation(s):", self.len())?;
        for (i, violation) in self.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, violation)?;
        }
        Ok(())
    }
}

impl std::error::Error for Violations {}

impl Serialize for Violations {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter().map(Violation::to_record))
    }
}

impl IntoIterator for Violations {
    type Item = Violation;
    type IntoIter = std::vec::IntoIter<Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_vec().into_iter()
    }
}

impl<'a> IntoIterator for &'a Violations {
    type Item = &'a Violation;
    type IntoIter = Box<dyn Iterator<Item = &'a Violation> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.0.iter())
    }
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<Violations>();
    assert_sync::<Violations>();
};
