//! crates/vibebot_core/src/validate.rs
//!
//! Client-side credential validation, run before any network call. Failures
//! are field-keyed so the front-end can render them inline.

use regex::Regex;
use std::sync::OnceLock;

use crate::domain::{AuthMode, Credentials};

/// A validation failure on a single form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap())
}

/// Validates credentials for the given form.
///
/// Rules: username at least 3 characters, password at least 6 characters,
/// and on register a syntactically valid email address.
pub fn validate(mode: AuthMode, credentials: &Credentials) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();

    if credentials.username.trim().chars().count() < 3 {
        errors.push(FieldError {
            field: "username",
            message: "Username must be at least 3 characters",
        });
    }

    if mode == AuthMode::Register {
        let email = credentials.email.as_deref().unwrap_or_default();
        if !email_regex().is_match(email.trim()) {
            errors.push(FieldError {
                field: "email",
                message: "Please enter a valid email address",
            });
        }
    }

    if credentials.password.chars().count() < 6 {
        errors.push(FieldError {
            field: "password",
            message: "Password must be at least 6 characters",
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
