/*
 * Responsibility
 * - register / login request and response DTOs
 * - register's rule set (email format, password length)
 */
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::services::validation::Validator;

pub const PASSWORD_MIN_LEN: usize = 8;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    pub email: String,
    pub name: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        Validator::new()
            .email("email", &self.email, "E-Mail is invalid.")
            // Length is counted trimmed like every other rule; the password
            // itself is hashed exactly as sent.
            .min_len(
                "password",
                &self.password,
                PASSWORD_MIN_LEN,
                "Password too short!",
            )
            .finish()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub subject_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.into(),
            name: "Someone".into(),
            password: password.into(),
        }
    }

    #[test]
    fn accepts_minimal_valid_registration() {
        assert!(register("a@b.com", "12345678").validate().is_ok());
    }

    #[test]
    fn reports_both_violations() {
        let err = register("not-an-email", "short").validate().unwrap_err();
        let fields: Vec<&str> = err.data().unwrap().iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["email", "password"]);
    }

    #[test]
    fn missing_fields_deserialize_as_empty() {
        let req: RegisterRequest = serde_json::from_str(r#"{"email":"a@b.com"}"#).unwrap();
        assert_eq!(req.password, "");
        assert_eq!(req.validate().unwrap_err().data().unwrap().len(), 1);
    }

    #[test]
    fn password_length_ignores_surrounding_whitespace() {
        let err = register("a@b.com", "1234567 ").validate().unwrap_err();
        assert_eq!(err.data().unwrap()[0].message, "Password too short!");
        assert!(register("a@b.com", " 12345678 ").validate().is_ok());
    }
}
