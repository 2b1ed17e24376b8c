//! Field paths for locating values inside a request.
//!
//! A [`FieldPath`] starts at a request section and walks down through object
//! fields and array indices, e.g. `body.experience[0].title`.

use std::fmt::{self, Display};

use serde::{Serialize, Serializer};

use crate::request::Section;

/// A segment of a field path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum PathSegment {
    /// A field/property access (e.g., `body`, `email`)
    Field(String),
    /// An array index access (e.g., `[0]`, `[42]`)
    Index(usize),
}

/// A path to a value inside a request.
///
/// Paths are immutable; `push_field` and `push_index` return extended copies
/// so a parent path can be shared by all of its children.
///
/// # Example
///
/// ```rust
/// use turnstile::{FieldPath, Section};
///
/// let path = FieldPath::section(Section::Body)
///     .push_field("experience")
///     .push_index(0)
///     .push_field("title");
///
/// assert_eq!(path.to_string(), "body.experience[0].title");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

impl FieldPath {
    /// Creates an empty path.
    pub fn root() -> Self {
        Self::default()
    }

    /// Creates a path rooted at a request section.
    pub fn section(section: Section) -> Self {
        Self::from_field(section.as_str())
    }

    /// Creates a path from a single field segment.
    pub fn from_field(name: impl Into<String>) -> Self {
        Self {
            segments: vec![PathSegment::Field(name.into())],
        }
    }

    /// Returns a new path with a field segment appended.
    pub fn push_field(&self, name: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Field(name.into()));
        Self { segments }
    }

    /// Returns a new path with an index segment appended.
    pub fn push_index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Index(index));
        Self { segments }
    }

    /// Returns true if this is the root path (no segments).
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Field(name) => {
                    if i > 0 {
                        write!(f, ".")?;
                    }
                    write!(f, "{}", name)?;
                }
                PathSegment::Index(idx) => write!(f, "[{}]", idx)?,
            }
        }
        Ok(())
    }
}

// Paths cross the wire as their dotted rendering.
impl Serialize for FieldPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
