/*
 * Responsibility
 * - The single failure type of the API (AppError)
 * - IntoResponse: numeric code -> HTTP status, body is always {"message", "data"}
 * - Converts repo / token / codec errors, logging at the conversion point
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::repos::error::RepoError;
use crate::services::auth::password::PasswordError;
use crate::services::id_codec::IdCodecError;

/// One violated input rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
    pub data: Option<Vec<ValidationError>>,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Unauthenticated(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("Invalid input.")]
    Validation(Vec<ValidationError>),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    // Failures of the transport itself (bad JSON, unknown route, timeout ...)
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },
    #[error("An error occurred")]
    Internal,
}

impl AppError {
    pub fn not_authenticated() -> Self {
        Self::Unauthenticated("Not Authenticated".into())
    }

    pub fn not_authorized() -> Self {
        Self::Unauthorized("Not Authorized".into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn rejected(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
        }
    }

    pub fn code(&self) -> u16 {
        match self {
            AppError::Unauthenticated(_) => 401,
            AppError::Unauthorized(_) => 403,
            AppError::Validation(_) => 422,
            AppError::NotFound(_) => 404,
            AppError::Conflict(_) => 409,
            AppError::Rejected { status, .. } => status.as_u16(),
            AppError::Internal => 500,
        }
    }

    pub fn data(&self) -> Option<&[ValidationError]> {
        match self {
            AppError::Validation(violations) => Some(violations),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let message = self.to_string();
        let data = self.data().map(<[ValidationError]>::to_vec);

        (status, Json(ErrorResponse { message, data })).into_response()
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::Conflict => AppError::conflict("User already exists"),
            RepoError::Db(err) => {
                error!(error = %err, "persistence failure");
                AppError::Internal
            }
        }
    }
}

impl From<IdCodecError> for AppError {
    fn from(e: IdCodecError) -> Self {
        // Decoding failures never get here (they surface as "not found");
        // anything else is a server-side configuration problem.
        error!(error = %e, "id codec failure");
        AppError::Internal
    }
}

impl From<PasswordError> for AppError {
    fn from(e: PasswordError) -> Self {
        error!(error = %e, "password hashing failure");
        AppError::Internal
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use serde_json::{Value, json};

    use super::*;

    async fn render(err: AppError) -> (StatusCode, Value) {
        let res = err.into_response();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn validation_failure_carries_every_violation() {
        let (status, body) = render(AppError::Validation(vec![
            ValidationError::new("title", "Title is invalid."),
            ValidationError::new("body", "Body is invalid."),
        ]))
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            body,
            json!({
                "message": "Invalid input.",
                "data": [
                    {"field": "title", "message": "Title is invalid."},
                    {"field": "body", "message": "Body is invalid."}
                ]
            })
        );
    }

    #[tokio::test]
    async fn non_validation_failures_have_null_data() {
        let (status, body) = render(AppError::not_authorized()).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, json!({"message": "Not Authorized", "data": null}));

        let (status, body) = render(AppError::Internal).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"message": "An error occurred", "data": null}));
    }

    #[test]
    fn codes_follow_the_taxonomy() {
        assert_eq!(AppError::not_authenticated().code(), 401);
        assert_eq!(AppError::not_authorized().code(), 403);
        assert_eq!(AppError::Validation(Vec::new()).code(), 422);
        assert_eq!(AppError::not_found("x").code(), 404);
        assert_eq!(AppError::conflict("x").code(), 409);
        assert_eq!(AppError::Internal.code(), 500);
        assert_eq!(
            AppError::rejected(StatusCode::REQUEST_TIMEOUT, "Request timed out.").code(),
            408
        );
    }

    #[test]
    fn repo_conflict_becomes_409() {
        let err: AppError = RepoError::Conflict.into();
        assert_eq!(err.code(), 409);
        assert!(err.data().is_none());
    }
}
