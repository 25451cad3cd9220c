/*
 * Responsibility
 * - Shared context bound to the Router (AppState)
 *   - persistence collaborator, token codec, password hasher, id codec, page size
 * - Clone is cheap (Arc inside); nothing in here is mutated per request
 */
use std::sync::Arc;

use crate::repos::{AccountRepo, ContentRepo};
use crate::services::{
    auth::{PasswordHasher, TokenCodec},
    id_codec::IdCodec,
};

#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<dyn AccountRepo>,
    pub content: Arc<dyn ContentRepo>,
    pub tokens: Arc<TokenCodec>,
    pub passwords: PasswordHasher,
    pub id_codec: IdCodec,
    pub page_size: i64,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("tokens", &self.tokens)
            .field("page_size", &self.page_size)
            .finish_non_exhaustive()
    }
}
