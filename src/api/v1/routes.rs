/*
 * Responsibility
 * - v1 URL layout
 * - Every route sees an IdentityContext (applied in app::router); whether a
 *   route requires authentication is decided by its handler, not here
 */
use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

use crate::api::v1::handlers::{
    account::{get_current_account, update_status},
    auth::{login, register},
    content::{
        create_content_item, delete_content_item, get_content_item, list_content_items,
        update_content_item,
    },
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route(
            "/content",
            get(list_content_items).post(create_content_item),
        )
        .route(
            "/content/{id}",
            get(get_content_item)
                .put(update_content_item)
                .delete(delete_content_item),
        )
        .route("/me", get(get_current_account))
        .route("/me/status", put(update_status))
}
