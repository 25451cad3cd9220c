use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use super::IdentityContext;

/// Reads the IdentityContext inserted by the identity middleware.
/// Never rejects: a request that was not resolved counts as anonymous.
impl<S> FromRequestParts<S> for IdentityContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<IdentityContext>()
            .copied()
            .unwrap_or_else(IdentityContext::anonymous))
    }
}
