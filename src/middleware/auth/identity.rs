//! Bearer token → IdentityContext, inserted into request extensions.
//!
//! This middleware never rejects. A missing header, a non-Bearer scheme or a
//! token that fails verification all produce an anonymous context, and the
//! handler's own guard decides whether that matters.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::{self, Next},
    response::Response,
};
use uuid::Uuid;

use crate::api::v1::extractors::IdentityContext;
use crate::services::auth::TokenCodec;
use crate::state::AppState;

pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.layer(middleware::from_fn_with_state(state, identity_middleware))
}

async fn identity_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let identity = resolve(&state.tokens, req.headers());
    tracing::trace!(authenticated = identity.is_authenticated(), "identity resolved");

    // middleware -> extractor
    req.extensions_mut().insert(identity);

    next.run(req).await
}

pub fn resolve(tokens: &TokenCodec, headers: &HeaderMap) -> IdentityContext {
    let Some(token) = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
    else {
        return IdentityContext::anonymous();
    };

    let claims = match tokens.verify(token) {
        Ok(claims) => claims,
        Err(err) => {
            // Anonymous requests are legal; keep this below warn.
            tracing::debug!(error = %err, "bearer token not accepted");
            return IdentityContext::anonymous();
        }
    };

    match Uuid::parse_str(&claims.subject_id) {
        Ok(subject_id) => IdentityContext::authenticated(subject_id),
        Err(_) => {
            tracing::warn!("signed token carries a non-uuid subject");
            IdentityContext::anonymous()
        }
    }
}
