//! Process-local implementations of the repo traits.
//!
//! Used when `DATABASE_URL` is not configured and by the test-suite. Each
//! operation takes the lock once, so every write is atomic on its own.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::repos::account_repo::{AccountRepo, AccountRow, DEFAULT_STATUS, NewAccount};
use crate::repos::content_repo::{ContentRepo, ContentRow, NewContent};
use crate::repos::error::{RepoError, RepoResult};

#[derive(Debug, Default)]
pub struct MemoryAccountRepo {
    accounts: RwLock<HashMap<Uuid, AccountRow>>,
}

impl MemoryAccountRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountRepo for MemoryAccountRepo {
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<AccountRow>> {
        Ok(self.accounts.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<AccountRow>> {
        let accounts = self.accounts.read().await;
        Ok(accounts.values().find(|a| a.email == email).cloned())
    }

    async fn create(&self, new: NewAccount<'_>) -> RepoResult<AccountRow> {
        let mut accounts = self.accounts.write().await;
        if accounts.values().any(|a| a.email == new.email) {
            return Err(RepoError::Conflict);
        }

        let now = Utc::now();
        let row = AccountRow {
            id: Uuid::new_v4(),
            email: new.email.to_string(),
            name: new.name.to_string(),
            password_digest: new.password_digest.to_string(),
            status: DEFAULT_STATUS.to_string(),
            created_at: now,
            updated_at: now,
        };
        accounts.insert(row.id, row.clone());

        Ok(row)
    }

    async fn update_status(&self, id: Uuid, status: &str) -> RepoResult<Option<AccountRow>> {
        let mut accounts = self.accounts.write().await;
        let Some(account) = accounts.get_mut(&id) else {
            return Ok(None);
        };
        account.status = status.to_string();
        account.updated_at = Utc::now();

        Ok(Some(account.clone()))
    }
}

#[derive(Debug, Default)]
struct ContentTable {
    next_id: i64,
    rows: BTreeMap<i64, ContentRow>,
}

#[derive(Debug, Default)]
pub struct MemoryContentRepo {
    table: RwLock<ContentTable>,
}

impl MemoryContentRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContentRepo for MemoryContentRepo {
    async fn list_page(&self, limit: i64, offset: i64) -> RepoResult<Vec<ContentRow>> {
        let table = self.table.read().await;

        let mut rows: Vec<&ContentRow> = table.rows.values().collect();
        rows.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        let skip = usize::try_from(offset.max(0)).unwrap_or(usize::MAX);
        let take = usize::try_from(limit.max(0)).unwrap_or(usize::MAX);

        Ok(rows.into_iter().skip(skip).take(take).cloned().collect())
    }

    async fn count(&self) -> RepoResult<i64> {
        let table = self.table.read().await;
        Ok(i64::try_from(table.rows.len()).unwrap_or(i64::MAX))
    }

    async fn ids_by_owner(&self, owner_id: Uuid) -> RepoResult<Vec<i64>> {
        let table = self.table.read().await;

        let mut owned: Vec<&ContentRow> = table
            .rows
            .values()
            .filter(|row| row.owner_id == owner_id)
            .collect();
        owned.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));

        Ok(owned.into_iter().map(|row| row.id).collect())
    }

    async fn get(&self, id: i64) -> RepoResult<Option<ContentRow>> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn create(&self, new: NewContent<'_>) -> RepoResult<ContentRow> {
        let mut table = self.table.write().await;
        table.next_id += 1;

        let now = Utc::now();
        let row = ContentRow {
            id: table.next_id,
            title: new.title.to_string(),
            body: new.body.to_string(),
            media_ref: new.media_ref.map(str::to_string),
            owner_id: new.owner_id,
            created_at: now,
            updated_at: now,
        };
        table.rows.insert(row.id, row.clone());

        Ok(row)
    }

    async fn update(
        &self,
        id: i64,
        title: &str,
        body: &str,
        media_ref: Option<&str>,
    ) -> RepoResult<Option<ContentRow>> {
        let mut table = self.table.write().await;
        let Some(row) = table.rows.get_mut(&id) else {
            return Ok(None);
        };

        row.title = title.to_string();
        row.body = body.to_string();
        if let Some(media_ref) = media_ref {
            row.media_ref = Some(media_ref.to_string());
        }
        row.updated_at = Utc::now();

        Ok(Some(row.clone()))
    }

    async fn delete(&self, id: i64) -> RepoResult<bool> {
        Ok(self.table.write().await.rows.remove(&id).is_some())
    }
}
