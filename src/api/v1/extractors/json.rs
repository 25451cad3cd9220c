/*
 * Responsibility
 * - axum::Json with the rejection translated into AppError,
 *   so malformed bodies get the same {"message", "data"} shape
 */
use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
    http::StatusCode,
};
use serde::de::DeserializeOwned;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            // 422 is reserved for rule violations (with data); a body of the
            // wrong shape is a malformed request.
            Err(JsonRejection::JsonDataError(err)) => Err(AppError::rejected(
                StatusCode::BAD_REQUEST,
                err.body_text(),
            )),
            Err(rejection) => Err(AppError::rejected(rejection.status(), rejection.body_text())),
        }
    }
}
