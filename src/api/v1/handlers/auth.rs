/*
 * Responsibility
 * - register: validate -> duplicate email (409) -> hash -> persist
 * - login: account lookup (401) -> password check (401) -> issue token
 * - Neither operation looks at the IdentityContext
 */
use axum::{Json, extract::State};
use tracing::{info, warn};

use crate::{
    api::v1::{
        dto::{
            account::AccountResponse,
            auth::{LoginRequest, LoginResponse, RegisterRequest},
        },
        extractors::ApiJson,
        handlers::account::to_account_response,
    },
    error::AppError,
    repos::NewAccount,
    state::AppState,
};

pub async fn register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> Result<Json<AccountResponse>, AppError> {
    req.validate()?;

    let email = req.email.trim();
    if state.accounts.find_by_email(email).await?.is_some() {
        return Err(AppError::conflict("User already exists"));
    }

    let password_digest = state.passwords.hash(&req.password).await?;

    // A concurrent register with the same email loses at the UNIQUE
    // constraint and surfaces as the same 409 (RepoError::Conflict).
    let row = state
        .accounts
        .create(NewAccount {
            email,
            name: req.name.trim(),
            password_digest: &password_digest,
        })
        .await?;

    info!(account_id = %row.id, "account registered");

    Ok(Json(to_account_response(&state, row, &[])?))
}

pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let Some(account) = state.accounts.find_by_email(req.email.trim()).await? else {
        warn!("login attempt for unknown email");
        return Err(AppError::Unauthenticated("User not found".into()));
    };

    if !state
        .passwords
        .verify(&account.password_digest, &req.password)
        .await?
    {
        warn!(account_id = %account.id, "login attempt with incorrect password");
        return Err(AppError::Unauthenticated("Incorrect password".into()));
    }

    let token = state.tokens.issue(account.id, &account.email)?;

    info!(account_id = %account.id, "token issued");

    Ok(Json(LoginResponse {
        token,
        subject_id: account.id.to_string(),
    }))
}
