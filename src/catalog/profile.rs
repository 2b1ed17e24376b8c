//! Candidate profile updates.

use crate::rule::Rule;
use crate::schema::{RequestSchema, SectionRule};

use super::id_params;

/// `PUT /users/:id/profile`: every body field is optional, but unknown
/// fields are rejected.
pub fn update_profile() -> RequestSchema {
    RequestSchema::new().params(id_params()).body(SectionRule::required(
        Rule::object()
            .optional("fullname", Rule::string().trim().min_len(2).max_len(50))
            .optional("bio", Rule::string().max_len(500))
            .optional(
                "skills",
                Rule::array(Rule::string().trim().min_len(1).max_len(50)).max_items(50),
            )
            .optional("phoneNumber", Rule::phone_number())
            .optional(
                "location",
                Rule::object()
                    .field("city", Rule::string().trim().min_len(1).max_len(100))
                    .optional("country", Rule::string().trim().min_len(2).max_len(56))
                    .strict(),
            )
            .strict(),
    ))
}
