/*
 * Responsibility
 * - content_items table access behind the ContentRepo trait
 * - owner_id is the only record of ownership; an account's content ids are
 *   derived with ids_by_owner, so create/delete are single writes
 * - owner_id FK (CASCADE) to accounts
 */
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::repos::error::RepoResult;

#[derive(Debug, Clone, FromRow)]
pub struct ContentRow {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub media_ref: Option<String>,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy)]
pub struct NewContent<'a> {
    pub title: &'a str,
    pub body: &'a str,
    pub media_ref: Option<&'a str>,
    pub owner_id: Uuid,
}

#[async_trait]
pub trait ContentRepo: Send + Sync {
    // Newest first (created_at DESC, id DESC)
    async fn list_page(&self, limit: i64, offset: i64) -> RepoResult<Vec<ContentRow>>;

    async fn count(&self) -> RepoResult<i64>;

    // Oldest first
    async fn ids_by_owner(&self, owner_id: Uuid) -> RepoResult<Vec<i64>>;

    async fn get(&self, id: i64) -> RepoResult<Option<ContentRow>>;

    async fn create(&self, new: NewContent<'_>) -> RepoResult<ContentRow>;

    // media_ref: None keeps the stored value
    async fn update(
        &self,
        id: i64,
        title: &str,
        body: &str,
        media_ref: Option<&str>,
    ) -> RepoResult<Option<ContentRow>>;

    async fn delete(&self, id: i64) -> RepoResult<bool>;
}

#[derive(Clone, Debug)]
pub struct PgContentRepo {
    pool: PgPool,
}

impl PgContentRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContentRepo for PgContentRepo {
    async fn list_page(&self, limit: i64, offset: i64) -> RepoResult<Vec<ContentRow>> {
        let rows = sqlx::query_as::<_, ContentRow>(
            r#"
            SELECT id, title, body, media_ref, owner_id, created_at, updated_at
            FROM content_items
            ORDER BY created_at DESC, id DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn count(&self) -> RepoResult<i64> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM content_items")
            .fetch_one(&self.pool)
            .await?;

        Ok(total)
    }

    async fn ids_by_owner(&self, owner_id: Uuid) -> RepoResult<Vec<i64>> {
        let ids = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT id
            FROM content_items
            WHERE owner_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }

    async fn get(&self, id: i64) -> RepoResult<Option<ContentRow>> {
        let row = sqlx::query_as::<_, ContentRow>(
            r#"
            SELECT id, title, body, media_ref, owner_id, created_at, updated_at
            FROM content_items
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn create(&self, new: NewContent<'_>) -> RepoResult<ContentRow> {
        let row = sqlx::query_as::<_, ContentRow>(
            r#"
            INSERT INTO content_items (title, body, media_ref, owner_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, body, media_ref, owner_id, created_at, updated_at
            "#,
        )
        .bind(new.title)
        .bind(new.body)
        .bind(new.media_ref)
        .bind(new.owner_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn update(
        &self,
        id: i64,
        title: &str,
        body: &str,
        media_ref: Option<&str>,
    ) -> RepoResult<Option<ContentRow>> {
        let row = sqlx::query_as::<_, ContentRow>(
            r#"
            UPDATE content_items
            SET
                title = $2,
                body = $3,
                media_ref = COALESCE($4, media_ref),
                updated_at = now()
            WHERE id = $1
            RETURNING id, title, body, media_ref, owner_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(body)
        .bind(media_ref)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn delete(&self, id: i64) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM content_items
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
