//! Interoperability with other schema formats.

pub mod json_schema;

pub use json_schema::ToJsonSchema;
