/*
 * Responsibility
 * - Content item operations, each with its own check order:
 *   - list / get:  auth -> (existence)
 *   - create:      auth -> validate -> owner account exists -> persist
 *   - update:      auth -> validate -> existence -> ownership -> persist
 *   - delete:      auth -> existence -> ownership -> delete
 * - Path ids are public (sqids) ids; one that does not decode is simply "not found"
 * - The ownership check is read-then-act; concurrent updates are last-write-wins
 */
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{PathRejection, QueryRejection},
    },
    http::StatusCode,
};
use tracing::info;

use crate::{
    api::v1::{
        dto::content::{
            ContentItemResponse, ContentPageResponse, CreateContentItemRequest, ListQuery,
            UpdateContentItemRequest,
        },
        extractors::{ApiJson, IdentityContext},
    },
    error::AppError,
    policy,
    repos::{ContentRow, NewContent},
    state::AppState,
};

fn to_response(state: &AppState, row: ContentRow) -> Result<ContentItemResponse, AppError> {
    Ok(ContentItemResponse {
        id: state.id_codec.encode(row.id)?,
        title: row.title,
        body: row.body,
        media_ref: row.media_ref,
        owner_id: row.owner_id.to_string(),
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn item_not_found() -> AppError {
    AppError::not_found("Content item not found.")
}

// An id that is not even valid UTF-8 cannot name an item either.
async fn find_item(
    state: &AppState,
    path: Result<Path<String>, PathRejection>,
) -> Result<ContentRow, AppError> {
    let Path(public_id) = path.map_err(|_| item_not_found())?;
    let id = state.id_codec.decode(&public_id).ok_or_else(item_not_found)?;
    state.content.get(id).await?.ok_or_else(item_not_found)
}

pub async fn list_content_items(
    State(state): State<AppState>,
    identity: IdentityContext,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<ContentPageResponse>, AppError> {
    policy::require_authenticated(&identity)?;

    let page = query.map(|Query(q)| q.page()).unwrap_or(1);
    let limit = state.page_size;
    let offset = (page - 1).saturating_mul(limit);

    let rows = state.content.list_page(limit, offset).await?;
    let total_count = state.content.count().await?;

    let mut items = Vec::with_capacity(rows.len());
    for row in rows {
        items.push(to_response(&state, row)?);
    }

    Ok(Json(ContentPageResponse { items, total_count }))
}

pub async fn get_content_item(
    State(state): State<AppState>,
    identity: IdentityContext,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<ContentItemResponse>, AppError> {
    policy::require_authenticated(&identity)?;

    let row = find_item(&state, path).await?;

    Ok(Json(to_response(&state, row)?))
}

pub async fn create_content_item(
    State(state): State<AppState>,
    identity: IdentityContext,
    body: Result<ApiJson<CreateContentItemRequest>, AppError>,
) -> Result<(StatusCode, Json<ContentItemResponse>), AppError> {
    let subject_id = policy::require_authenticated(&identity)?;
    let ApiJson(req) = body?;
    req.validate()?;

    // The token may outlive the account it names.
    let owner = state
        .accounts
        .find_by_id(subject_id)
        .await?
        .ok_or_else(|| AppError::Unauthenticated("Invalid user.".into()))?;

    let row = state
        .content
        .create(NewContent {
            title: req.title.trim(),
            body: req.body.trim(),
            media_ref: req.media_ref.as_deref(),
            owner_id: owner.id,
        })
        .await?;

    info!(content_id = row.id, owner_id = %row.owner_id, "content item created");

    Ok((StatusCode::CREATED, Json(to_response(&state, row)?)))
}

pub async fn update_content_item(
    State(state): State<AppState>,
    identity: IdentityContext,
    path: Result<Path<String>, PathRejection>,
    body: Result<ApiJson<UpdateContentItemRequest>, AppError>,
) -> Result<Json<ContentItemResponse>, AppError> {
    policy::require_authenticated(&identity)?;
    let ApiJson(req) = body?;
    req.validate()?;

    let item = find_item(&state, path).await?;
    policy::require_owner(&identity, item.owner_id)?;

    let row = state
        .content
        .update(
            item.id,
            req.title.trim(),
            req.body.trim(),
            req.media_ref.as_deref(),
        )
        .await?
        .ok_or_else(item_not_found)?;

    info!(content_id = row.id, "content item updated");

    Ok(Json(to_response(&state, row)?))
}

pub async fn delete_content_item(
    State(state): State<AppState>,
    identity: IdentityContext,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<bool>, AppError> {
    policy::require_authenticated(&identity)?;

    let item = find_item(&state, path).await?;
    policy::require_owner(&identity, item.owner_id)?;

    if !state.content.delete(item.id).await? {
        // Deleted by a concurrent request between lookup and delete
        return Err(item_not_found());
    }

    info!(content_id = item.id, owner_id = %item.owner_id, "content item deleted");

    Ok(Json(true))
}
