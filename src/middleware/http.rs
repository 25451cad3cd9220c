//! Transport-level layers applied to the whole router.
//!
//! Request id (x-request-id), access tracing, 30 s timeout.
//! Failures raised here never reach a handler, so they are rendered through
//! AppError to keep the `{"message", "data"}` body shape.

use std::any::Any;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::error_handling::HandleErrorLayer;
use axum::http::{Request, StatusCode, header::HeaderName};
use axum::response::{IntoResponse, Response};
use tower::timeout::TimeoutLayer;
use tower::{BoxError, ServiceBuilder};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::{Span, info_span};

use crate::error::AppError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub fn apply(router: Router) -> Router {
    let request_id_header = HeaderName::from_static("x-request-id");

    let layers = ServiceBuilder::new()
        .layer(HandleErrorLayer::new(|err: BoxError| async move {
            handle_layer_error(err)
        }))
        .layer(SetRequestIdLayer::new(
            request_id_header.clone(),
            MakeRequestUuid,
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header))
        .layer(TraceLayer::new_for_http().make_span_with(make_span))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT));

    router.layer(layers)
}

// Runs after SetRequestIdLayer, so the header is always there.
fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.path = request.uri().path(),
        request_id
    )
}

fn handle_layer_error(err: BoxError) -> AppError {
    if err.is::<tower::timeout::error::Elapsed>() {
        AppError::rejected(StatusCode::REQUEST_TIMEOUT, "Request timed out.")
    } else {
        tracing::error!(error = %err, "unhandled middleware error");
        AppError::Internal
    }
}

fn handle_panic(_payload: Box<dyn Any + Send + 'static>) -> Response {
    // Payload and location are already logged by the panic hook.
    AppError::Internal.into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_becomes_408() {
        let err = handle_layer_error(Box::new(tower::timeout::error::Elapsed::new()));
        assert_eq!(err.code(), 408);
        assert_eq!(err.to_string(), "Request timed out.");
    }

    #[test]
    fn anything_else_is_internal() {
        let err = handle_layer_error("boom".into());
        assert_eq!(err.code(), 500);
    }
}
