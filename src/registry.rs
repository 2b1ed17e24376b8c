//! Named storage for request schemas.
//!
//! A service registers its schemas once at start-up, then looks them up by
//! name for each incoming request.

use parking_lot::RwLock;
use rayon::prelude::*;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

use crate::catalog;
use crate::error::SchemaDefinitionError;
use crate::interop::ToJsonSchema;
use crate::request::{NormalizedRequest, Request};
use crate::schema::RequestSchema;
use crate::ValidationResult;

type SchemaMap = Arc<RwLock<HashMap<String, Arc<RequestSchema>>>>;

/// A thread-safe registry of named request schemas.
///
/// Cloning is cheap and clones share storage. Validation takes the read lock
/// only long enough to clone the schema's `Arc` out.
///
/// # Example
///
/// ```rust
/// use turnstile::{Request, RequestSchema, Rule, SchemaRegistry, SectionRule};
/// use serde_json::json;
///
/// let registry = SchemaRegistry::new();
/// registry
///     .register(
///         "apply_job",
///         RequestSchema::new().params(SectionRule::required(
///             Rule::object().field("id", Rule::object_id()).strict(),
///         )),
///     )
///     .unwrap();
///
/// let request = Request::new().with_params(json!({"id": "64b7f0c2a1e4d93f2c8b4567"}));
/// assert!(registry.validate("apply_job", &request).unwrap().is_success());
/// ```
pub struct SchemaRegistry {
    schemas: SchemaMap,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self {
            schemas: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Creates a registry holding every schema in [`catalog::all`].
    pub fn with_catalog() -> Result<Self, RegistryError> {
        let registry = Self::new();
        for (name, schema) in catalog::all() {
            registry.register(name, schema)?;
        }
        Ok(registry)
    }

    /// Checks `schema` and stores it under `name`.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::Definition` if the schema is malformed and
    /// `RegistryError::DuplicateName` if the name is taken.
    ///
    /// ```rust
    /// use turnstile::{RequestSchema, SchemaRegistry};
    ///
    /// let registry = SchemaRegistry::new();
    /// registry.register("login", RequestSchema::new()).unwrap();
    /// assert!(registry.register("login", RequestSchema::new()).is_err());
    /// ```
    pub fn register(
        &self,
        name: impl Into<String>,
        schema: RequestSchema,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        schema.check()?;

        let mut schemas = self.schemas.write();
        if schemas.contains_key(&name) {
            return Err(RegistryError::DuplicateName(name));
        }

        info!(schema = %name, "registered request schema");
        schemas.insert(name, Arc::new(schema));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<RequestSchema>> {
        self.schemas.read().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.schemas.read().contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.schemas.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.schemas.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.read().is_empty()
    }

    /// Validates a request against the named schema.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::SchemaNotFound` if no schema has that name.
    /// Invalid requests are not errors; they come back as a failed
    /// validation.
    pub fn validate(
        &self,
        schema_name: &str,
        request: &Request,
    ) -> Result<ValidationResult<NormalizedRequest>, RegistryError> {
        let schema = self.lookup(schema_name)?;
        let result = schema.validate(request);
        debug!(
            schema = schema_name,
            valid = result.is_success(),
            "validated request"
        );
        Ok(result)
    }

    /// Validates many requests against one schema in parallel.
    ///
    /// Results are in the same order as `requests`.
    pub fn validate_batch(
        &self,
        schema_name: &str,
        requests: &[Request],
    ) -> Result<Vec<ValidationResult<NormalizedRequest>>, RegistryError> {
        let schema = self.lookup(schema_name)?;
        let results: Vec<_> = requests.par_iter().map(|r| schema.validate(r)).collect();
        debug!(
            schema = schema_name,
            requests = requests.len(),
            rejected = results.iter().filter(|r| !r.is_success()).count(),
            "validated request batch"
        );
        Ok(results)
    }

    /// Exports every schema as a JSON Schema draft 2020-12 document, one
    /// entry per schema under `$defs`.
    pub fn to_json_schema(&self) -> Value {
        let schemas = self.schemas.read();
        let mut names: Vec<_> = schemas.keys().collect();
        names.sort();

        let mut defs = serde_json::Map::new();
        for name in names {
            defs.insert(name.clone(), schemas[name].to_json_schema());
        }

        json!({
            "$schema": "https://json-schema.org/draft/2020-12/schema",
            "$defs": defs
        })
    }

    /// Exports one schema as a standalone JSON Schema document.
    pub fn export_schema(&self, name: &str) -> Option<Value> {
        let schema = self.get(name)?;
        let mut result = schema.to_json_schema();
        result["$schema"] = json!("https://json-schema.org/draft/2020-12/schema");
        result["title"] = json!(name);
        Some(result)
    }

    fn lookup(&self, name: &str) -> Result<Arc<RequestSchema>, RegistryError> {
        self.get(name)
            .ok_or_else(|| RegistryError::SchemaNotFound(name.to_string()))
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for SchemaRegistry {
    fn clone(&self) -> Self {
        Self {
            schemas: Arc::clone(&self.schemas),
        }
    }
}

/// Errors that can occur during registry operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("schema '{0}' already registered")]
    DuplicateName(String),

    #[error("schema '{0}' not found")]
    SchemaNotFound(String),

    #[error("invalid schema definition: {0}")]
    Definition(#[from] SchemaDefinitionError),
}
