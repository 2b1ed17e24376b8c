//! Request schemas for the job platform's HTTP routes.
//!
//! Each function builds one [`RequestSchema`]; [`all`] lists them under the
//! names [`SchemaRegistry::with_catalog`](crate::SchemaRegistry::with_catalog)
//! registers them with.

mod auth;
mod jobs;
mod profile;

pub use auth::{login, register};
pub use jobs::{
    apply_job, create_job, search_jobs, update_application_status, APPLICATION_STATUSES,
    CURRENCIES, JOB_TYPES,
};
pub use profile::update_profile;

use crate::rule::Rule;
use crate::schema::{RequestSchema, SectionRule};

/// Route parameters holding a single document id.
fn id_params() -> SectionRule {
    SectionRule::required(Rule::object().field("id", Rule::object_id()).strict())
}

/// Every catalog schema with its registry name.
pub fn all() -> Vec<(&'static str, RequestSchema)> {
    vec![
        ("register", register()),
        ("login", login()),
        ("update_profile", update_profile()),
        ("create_job", create_job()),
        ("search_jobs", search_jobs()),
        ("apply_job", apply_job()),
        ("update_application_status", update_application_status()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_definitions_are_well_formed() {
        for (name, schema) in all() {
            assert!(schema.check().is_ok(), "{} failed its definition check", name);
        }
    }

    #[test]
    fn test_catalog_names_unique() {
        let mut names: Vec<_> = all().into_iter().map(|(name, _)| name).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), all().len());
    }

    #[test]
    fn test_catalog_survives_serde() {
        for (name, schema) in all() {
            let json = serde_json::to_string(&schema).unwrap();
            let back: RequestSchema = serde_json::from_str(&json).unwrap();
            assert_eq!(back, schema, "{} changed after a serde round trip", name);
        }
    }
}
