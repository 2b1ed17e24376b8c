//! Account registration and sign-in.

use crate::rule::Rule;
use crate::schema::{RequestSchema, SectionRule};

/// `POST /register`: creates a candidate or recruiter account.
pub fn register() -> RequestSchema {
    RequestSchema::new().body(SectionRule::required(
        Rule::object()
            .field(
                "fullname",
                Rule::string()
                    .trim()
                    .min_len(2)
                    .error("full name must be at least 2 characters")
                    .max_len(50),
            )
            .field("email", Rule::email().error("must be a valid email address"))
            .field(
                "password",
                Rule::string()
                    .min_len(6)
                    .error("password must be at least 6 characters")
                    .max_len(100),
            )
            .optional("role", Rule::enumeration(["candidate", "recruiter"]))
            .optional("phoneNumber", Rule::phone_number())
            .strict(),
    ))
}

/// `POST /login`.
pub fn login() -> RequestSchema {
    RequestSchema::new().body(SectionRule::required(
        Rule::object()
            .field("email", Rule::email().error("must be a valid email address"))
            .field(
                "password",
                Rule::string().min_len(1).error("password is required"),
            )
            .strict(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ViolationKind;
    use crate::request::{Request, Section};
    use serde_json::json;

    #[test]
    fn test_register_normalizes_body() {
        let request = Request::new().with_body(json!({
            "fullname": "  Asha Rao ",
            "email": " asha@example.com",
            "password": "secret1",
            "role": "recruiter",
            "phoneNumber": "+919876543210"
        }));

        let normalized = register().validate(&request).into_result().unwrap();
        assert_eq!(
            normalized.get(Section::Body, "fullname"),
            Some(&json!("Asha Rao"))
        );
        assert_eq!(
            normalized.get(Section::Body, "email"),
            Some(&json!("asha@example.com"))
        );
    }

    #[test]
    fn test_register_role_is_case_sensitive() {
        let request = Request::new().with_body(json!({
            "fullname": "Al",
            "email": "a@b.com",
            "password": "secret1",
            "role": "Recruiter"
        }));

        let errors = register().validate(&request).into_result().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.first().path.to_string(), "body.role");
        assert_eq!(errors.first().code, "enum");
    }

    #[test]
    fn test_login_requires_body() {
        let errors = login().validate(&Request::new()).into_result().unwrap_err();
        assert_eq!(errors.first().kind, ViolationKind::MissingSection);
    }
}
