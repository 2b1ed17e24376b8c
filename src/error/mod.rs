//! Error types.
//!
//! Input problems are [`Violations`]: plain data returned to the caller.
//! Problems with a schema itself are [`SchemaDefinitionError`]s, reported
//! once when the schema is built or loaded.

mod definition;
mod violation;

pub use definition::SchemaDefinitionError;
pub use violation::{Violation, ViolationKind, ViolationRecord, Violations};
