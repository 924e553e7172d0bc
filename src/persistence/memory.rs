//! In-memory store for tests and persistence-disabled runs.
//!
//! Entries live in per-user vectors behind a [`tokio::sync::RwLock`].
//! Appends push to the end, so each vector is in insertion (and thus
//! timestamp) order; listing reverses it.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{LedgerStore, UserStore};
use crate::domain::{EntryKind, LedgerEntry, User, UserId};
use crate::error::ApiError;

/// Process-local ledger and user store.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: RwLock<HashMap<(UserId, EntryKind), Vec<LedgerEntry>>>,
    users: RwLock<HashMap<UserId, User>>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an entry with an explicit timestamp, bypassing the store
    /// clock. Used to seed histories in tests.
    #[cfg(test)]
    pub(crate) async fn insert_entry(&self, entry: LedgerEntry) {
        let mut map = self.entries.write().await;
        let list = map.entry((entry.user_id, entry.kind)).or_default();
        list.push(entry);
        list.sort_by_key(|e| e.created_at);
    }
}

#[async_trait]
impl LedgerStore for InMemoryStore {
    async fn append_entry(
        &self,
        user_id: UserId,
        kind: EntryKind,
        amount: f64,
    ) -> Result<LedgerEntry, ApiError> {
        let mut map = self.entries.write().await;
        let entry = LedgerEntry {
            id: uuid::Uuid::new_v4(),
            user_id,
            kind,
            amount,
            created_at: Utc::now(),
        };
        map.entry((user_id, kind)).or_default().push(entry.clone());
        Ok(entry)
    }

    async fn list_entries(
        &self,
        user_id: UserId,
        kind: EntryKind,
        limit: Option<u32>,
    ) -> Result<Vec<LedgerEntry>, ApiError> {
        let map = self.entries.read().await;
        let Some(list) = map.get(&(user_id, kind)) else {
            return Ok(Vec::new());
        };
        let take = limit.map_or(usize::MAX, |l| l as usize);
        Ok(list.iter().rev().take(take).cloned().collect())
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, ApiError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == email) {
            return Err(ApiError::EmailTaken);
        }
        let user = User {
            id: UserId::new(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_user(&self, user_id: UserId) -> Result<Option<User>, ApiError> {
        Ok(self.users.read().await.get(&user_id).cloned())
    }
}
