/*
 * Responsibility
 * - accounts table access behind the AccountRepo trait
 * - email is UNIQUE; a duplicate insert surfaces as RepoError::Conflict
 * - accounts are never deleted here
 */
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::repos::error::{RepoError, RepoResult};

pub const DEFAULT_STATUS: &str = "I am new!";

#[derive(Debug, Clone, FromRow)]
pub struct AccountRow {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub password_digest: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy)]
pub struct NewAccount<'a> {
    pub email: &'a str,
    pub name: &'a str,
    pub password_digest: &'a str,
}

#[async_trait]
pub trait AccountRepo: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<AccountRow>>;

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<AccountRow>>;

    async fn create(&self, new: NewAccount<'_>) -> RepoResult<AccountRow>;

    // None when the account does not exist
    async fn update_status(&self, id: Uuid, status: &str) -> RepoResult<Option<AccountRow>>;
}

#[derive(Clone, Debug)]
pub struct PgAccountRepo {
    pool: PgPool,
}

impl PgAccountRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepo for PgAccountRepo {
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<AccountRow>> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, email, name, password_digest, status, created_at, updated_at
            FROM accounts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<AccountRow>> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, email, name, password_digest, status, created_at, updated_at
            FROM accounts
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn create(&self, new: NewAccount<'_>) -> RepoResult<AccountRow> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            INSERT INTO accounts (email, name, password_digest, status)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, name, password_digest, status, created_at, updated_at
            "#,
        )
        .bind(new.email)
        .bind(new.name)
        .bind(new.password_digest)
        .bind(DEFAULT_STATUS)
        .fetch_one(&self.pool)
        .await
        .map_err(RepoError::from_sqlx)?;

        Ok(row)
    }

    async fn update_status(&self, id: Uuid, status: &str) -> RepoResult<Option<AccountRow>> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            UPDATE accounts
            SET status = $2, updated_at = now()
            WHERE id = $1
            RETURNING id, email, name, password_digest, status, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }
}
