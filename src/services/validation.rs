//! Accumulating input validation.
//!
//! Every rule of an operation is evaluated; violations are collected in rule
//! order and reported together as a single 422.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{AppError, ValidationError};

static EMAIL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").ok());

pub fn valid_email(email: &str) -> bool {
    EMAIL.as_ref().is_some_and(|re| re.is_match(email))
}

/// Character count after trimming surrounding whitespace.
pub fn trimmed_len(value: &str) -> usize {
    value.trim().chars().count()
}

#[derive(Debug, Default)]
pub struct Validator {
    violations: Vec<ValidationError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check(&mut self, ok: bool, field: &str, message: &str) -> &mut Self {
        if !ok {
            self.violations.push(ValidationError::new(field, message));
        }
        self
    }

    pub fn email(&mut self, field: &str, value: &str, message: &str) -> &mut Self {
        self.check(valid_email(value.trim()), field, message)
    }

    pub fn min_len(&mut self, field: &str, value: &str, min: usize, message: &str) -> &mut Self {
        self.check(trimmed_len(value) >= min, field, message)
    }

    pub fn finish(&mut self) -> Result<(), AppError> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(std::mem::take(&mut self.violations)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_email_accepts_basic_format() {
        assert!(valid_email("a@b.com"));
        assert!(valid_email("first.last+tag@mail.example.org"));
    }

    #[test]
    fn valid_email_rejects_missing_parts() {
        assert!(!valid_email("a.com"));
        assert!(!valid_email("a@b"));
        assert!(!valid_email("@b.com"));
        assert!(!valid_email("a b@c.com"));
    }

    #[test]
    fn counts_characters_not_bytes() {
        assert_eq!(trimmed_len("  héllo  "), 5);
        assert_eq!(trimmed_len("   "), 0);
    }

    #[test]
    fn collects_every_violation_in_rule_order() {
        let err = Validator::new()
            .min_len("title", "ab", 3, "Title is invalid.")
            .min_len("body", "abc", 5, "Body is invalid.")
            .finish()
            .unwrap_err();

        let AppError::Validation(violations) = err else {
            panic!("expected a validation failure");
        };
        assert_eq!(
            violations,
            vec![
                ValidationError::new("title", "Title is invalid."),
                ValidationError::new("body", "Body is invalid."),
            ]
        );
    }

    #[test]
    fn passes_when_no_rule_is_violated() {
        assert!(
            Validator::new()
                .email("email", "a@b.com", "E-Mail is invalid.")
                .min_len("password", "12345678", 8, "Password too short!")
                .finish()
                .is_ok()
        );
    }
}
