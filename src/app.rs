/*
 * Responsibility
 * - Config -> collaborators (store, codecs, hasher) -> Router -> axum::serve
 * - Layer order (outermost first): http, cors, security headers, identity
 * - No DATABASE_URL: fall back to the process-local store
 */
use std::{panic, process, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use axum::{Router, extract::DefaultBodyLimit, http::StatusCode, routing::get};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::api::v1::handlers::health::health;
use crate::config::Config;
use crate::error::AppError;
use crate::middleware;
use crate::repos::{
    AccountRepo, ContentRepo, MemoryAccountRepo, MemoryContentRepo, PgAccountRepo, PgContentRepo,
};
use crate::services::{
    auth::{PasswordHasher, TokenCodec},
    id_codec::IdCodec,
};
use crate::state::AppState;

fn init_tracing() {
    // RUST_LOG wins when set, e.g.
    // RUST_LOG=info,content_feed=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // Development: crash so it gets noticed. Production: CatchPanicLayer answers 500.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env().context("failed to load configuration")?;

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(?config, "starting content feed API");

    let state = build_state(&config).await?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    tracing::info!("listening on {}", config.addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn build_state(config: &Config) -> Result<AppState> {
    let (accounts, content): (Arc<dyn AccountRepo>, Arc<dyn ContentRepo>) =
        match &config.database_url {
            Some(url) => {
                let pool = PgPoolOptions::new()
                    .max_connections(10)
                    .acquire_timeout(Duration::from_secs(5))
                    .connect(url)
                    .await
                    .context("failed to connect to postgres")?;

                sqlx::migrate!()
                    .run(&pool)
                    .await
                    .context("failed to run migrations")?;

                (
                    Arc::new(PgAccountRepo::new(pool.clone())),
                    Arc::new(PgContentRepo::new(pool)),
                )
            }
            None => {
                tracing::warn!("DATABASE_URL not set; using the in-memory store");
                (
                    Arc::new(MemoryAccountRepo::new()),
                    Arc::new(MemoryContentRepo::new()),
                )
            }
        };

    let id_codec = IdCodec::new(config.sqids_min_length, &config.sqids_alphabet)
        .context("invalid SQIDS_* configuration")?;

    Ok(AppState {
        accounts,
        content,
        tokens: Arc::new(TokenCodec::new(&config.jwt_secret, config.token_ttl_seconds)),
        passwords: PasswordHasher::default(),
        id_codec,
        page_size: config.page_size,
    })
}

pub const BODY_LIMIT_BYTES: usize = 1024 * 1024;

/// Routes plus identity resolution, without the transport/browser layers.
pub fn router(state: AppState) -> Router {
    let v1 = middleware::auth::identity::apply(api::v1::routes(), state.clone());

    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", v1)
        .fallback(|| async { AppError::not_found("Resource not found.") })
        .method_not_allowed_fallback(|| async {
            AppError::rejected(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed.")
        })
        // Enforced by the body extractors, so an oversized body is a 413 in
        // the usual error shape and never pre-empts the auth check.
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .with_state(state)
}

fn build_router(state: AppState, config: &Config) -> Router {
    let router = router(state);
    let router = middleware::security_headers::apply(router);
    let router = middleware::cors::apply(router, config);
    middleware::http::apply(router)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
