//! CORS policy for the browser feed client.
//!
//! - Development: any origin.
//! - Production: exact-match allow-list from `CORS_ALLOWED_ORIGINS`; an empty
//!   list allows no cross-origin callers.
//!
//! Credentials are never allowed; the bearer token travels in a header.

use axum::Router;
use axum::http::{HeaderName, HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::config::{AppEnv, Config};

pub fn apply(router: Router, config: &Config) -> Router {
    router.layer(layer(config.app_env, &config.cors_allowed_origins))
}

fn layer(app_env: AppEnv, allowed_origins: &[String]) -> CorsLayer {
    let base = if app_env.is_production() {
        let allowed: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|s| HeaderValue::from_str(s).ok())
            .collect();

        CorsLayer::new().allow_origin(AllowOrigin::list(allowed))
    } else {
        CorsLayer::new().allow_origin(Any)
    };

    base.allow_methods([
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::PATCH,
        Method::DELETE,
        Method::OPTIONS,
    ])
    .allow_headers([
        header::AUTHORIZATION,
        header::CONTENT_TYPE,
        HeaderName::from_static("x-request-id"),
    ])
    .max_age(std::time::Duration::from_secs(60 * 10))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        routing::get,
    };
    use tower::ServiceExt;

    use super::*;

    async fn preflight(app_env: AppEnv, allowed: &[String], origin: &str) -> Option<String> {
        let app = Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(layer(app_env, allowed));

        let res = app
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/")
                    .header(header::ORIGIN, origin)
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "PUT")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        res.headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .map(|v| v.to_str().unwrap().to_string())
    }

    #[tokio::test]
    async fn development_allows_any_origin() {
        let allow = preflight(AppEnv::Development, &[], "http://localhost:3000").await;
        assert_eq!(allow.as_deref(), Some("*"));
    }

    #[tokio::test]
    async fn production_only_echoes_listed_origins() {
        let allowed = vec!["https://feed.example".to_string()];

        let allow = preflight(AppEnv::Production, &allowed, "https://feed.example").await;
        assert_eq!(allow.as_deref(), Some("https://feed.example"));

        let allow = preflight(AppEnv::Production, &allowed, "https://evil.example").await;
        assert_eq!(allow, None);
    }
}
