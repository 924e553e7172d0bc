//! Persistence layer: append-only ledger and user accounts.
//!
//! [`LedgerStore`] and [`UserStore`] are the narrow interfaces the
//! services consume. [`postgres::PostgresStore`] is the production
//! implementation on `sqlx::PgPool`; [`memory::InMemoryStore`] backs
//! tests and persistence-disabled runs.
//!
//! Both implementations stamp entries with their own clock at insert
//! time. Clients never supply `created_at`.

pub mod memory;
pub mod models;
pub mod postgres;

use std::fmt::Debug;

use async_trait::async_trait;

use crate::domain::{EntryKind, LedgerEntry, User, UserId};
use crate::error::ApiError;

pub use memory::InMemoryStore;
pub use postgres::PostgresStore;

/// Append-only store of deposits and withdrawals.
#[async_trait]
pub trait LedgerStore: Send + Sync + Debug {
    /// Appends a new entry stamped with the store's clock.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::PersistenceError`] on storage failure.
    async fn append_entry(
        &self,
        user_id: UserId,
        kind: EntryKind,
        amount: f64,
    ) -> Result<LedgerEntry, ApiError>;

    /// Lists a user's entries of one kind, newest first. `None` returns
    /// the full history.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::PersistenceError`] on storage failure.
    async fn list_entries(
        &self,
        user_id: UserId,
        kind: EntryKind,
        limit: Option<u32>,
    ) -> Result<Vec<LedgerEntry>, ApiError>;
}

/// Store of registered accounts.
#[async_trait]
pub trait UserStore: Send + Sync + Debug {
    /// Creates an account for an already-normalized email.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::EmailTaken`] if the email is registered, or
    /// [`ApiError::PersistenceError`] on storage failure.
    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, ApiError>;

    /// Looks up an account by normalized email.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::PersistenceError`] on storage failure.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, ApiError>;

    /// Looks up an account by ID.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::PersistenceError`] on storage failure.
    async fn find_user(&self, user_id: UserId) -> Result<Option<User>, ApiError>;
}
