//! Job postings, search and applications.

use serde_json::json;

use crate::rule::{FieldRule, Rule};
use crate::schema::{RequestSchema, SectionRule};

use super::id_params;

pub const JOB_TYPES: [&str; 4] = ["full-time", "part-time", "contract", "internship"];

pub const CURRENCIES: [&str; 4] = ["USD", "EUR", "GBP", "INR"];

pub const APPLICATION_STATUSES: [&str; 3] = ["pending", "accepted", "rejected"];

/// `POST /jobs`: a recruiter posts a job.
pub fn create_job() -> RequestSchema {
    let salary = Rule::object()
        .field("min", Rule::number().min(0.0))
        .field("max", Rule::number().min(0.0))
        .default("currency", Rule::enumeration(CURRENCIES), json!("USD"))
        .strict();

    RequestSchema::new().body(SectionRule::required(
        Rule::object()
            .field("title", Rule::string().trim().min_len(3).max_len(100))
            .field("description", Rule::string().trim().min_len(20).max_len(5000))
            .field(
                "requirements",
                Rule::array(Rule::string().trim().min_len(1))
                    .non_empty()
                    .error("at least one requirement is needed"),
            )
            .optional("salary", salary)
            .field("location", Rule::string().trim().min_len(1))
            .field("jobType", Rule::enumeration(JOB_TYPES))
            .optional("experienceLevel", Rule::integer().range(0.0, 50.0))
            .field("position", Rule::integer().range(1.0, 1000.0))
            .strict(),
    ))
}

/// `GET /jobs`: query strings arrive as text, so numbers are coerced.
/// Unknown query keys (tracking parameters and the like) are dropped.
pub fn search_jobs() -> RequestSchema {
    RequestSchema::new().query(SectionRule::optional(
        Rule::object()
            .optional("keyword", Rule::string().trim().max_len(100))
            .optional("location", Rule::string().trim().max_len(100))
            .optional("jobType", Rule::enumeration(JOB_TYPES))
            .rule(
                "page",
                FieldRule::optional(Rule::integer().coerce().min(1.0)).with_default(json!(1)),
            )
            .rule(
                "limit",
                FieldRule::optional(Rule::integer().coerce().range(1.0, 100.0))
                    .with_default(json!(10)),
            ),
    ))
}

/// `POST /jobs/:id/apply`.
pub fn apply_job() -> RequestSchema {
    RequestSchema::new().params(id_params())
}

/// `PATCH /applications/:id/status`: a recruiter accepts or rejects.
pub fn update_application_status() -> RequestSchema {
    RequestSchema::new().params(id_params()).body(SectionRule::required(
        Rule::object()
            .field("status", Rule::enumeration(APPLICATION_STATUSES))
            .strict(),
    ))
}
