/*
 * Responsibility
 * - Persistence seams (AccountRepo / ContentRepo) and their implementations
 *   - pg: sqlx + PgPool
 *   - memory: process-local store (no DATABASE_URL, tests)
 */
pub mod account_repo;
pub mod content_repo;
pub mod error;
pub mod memory;

pub use account_repo::{AccountRepo, AccountRow, NewAccount, PgAccountRepo};
pub use content_repo::{ContentRepo, ContentRow, NewContent, PgContentRepo};
pub use memory::{MemoryAccountRepo, MemoryContentRepo};
