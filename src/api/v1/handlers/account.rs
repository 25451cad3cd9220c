/*
 * Responsibility
 * - getCurrentAccount: auth -> existence
 * - updateStatus: auth -> validate -> existence/persist
 * - AccountRow -> AccountResponse (drops the digest, encodes content ids)
 */
use axum::{Json, extract::State};
use tracing::info;

use crate::{
    api::v1::{
        dto::account::{AccountResponse, UpdateStatusRequest},
        extractors::{ApiJson, IdentityContext},
    },
    error::AppError,
    policy,
    repos::AccountRow,
    state::AppState,
};

pub(crate) fn to_account_response(
    state: &AppState,
    row: AccountRow,
    content_ids: &[i64],
) -> Result<AccountResponse, AppError> {
    Ok(AccountResponse {
        id: row.id.to_string(),
        email: row.email,
        name: row.name,
        status: row.status,
        content_ids: state.id_codec.encode_all(content_ids)?,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn account_not_found() -> AppError {
    AppError::not_found("User not found.")
}

pub async fn get_current_account(
    State(state): State<AppState>,
    identity: IdentityContext,
) -> Result<Json<AccountResponse>, AppError> {
    let subject_id = policy::require_authenticated(&identity)?;

    let row = state
        .accounts
        .find_by_id(subject_id)
        .await?
        .ok_or_else(account_not_found)?;
    let content_ids = state.content.ids_by_owner(row.id).await?;

    Ok(Json(to_account_response(&state, row, &content_ids)?))
}

pub async fn update_status(
    State(state): State<AppState>,
    identity: IdentityContext,
    body: Result<ApiJson<UpdateStatusRequest>, AppError>,
) -> Result<Json<AccountResponse>, AppError> {
    let subject_id = policy::require_authenticated(&identity)?;
    let ApiJson(req) = body?;
    req.validate()?;

    let row = state
        .accounts
        .update_status(subject_id, req.status.trim())
        .await?
        .ok_or_else(account_not_found)?;
    let content_ids = state.content.ids_by_owner(row.id).await?;

    info!(account_id = %row.id, "status updated");

    Ok(Json(to_account_response(&state, row, &content_ids)?))
}
