//! PostgreSQL implementation of the ledger and user stores.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use super::models::{EntryRow, UserRow, table_for};
use super::{LedgerStore, UserStore};
use crate::config::AppConfig;
use crate::domain::{EntryKind, LedgerEntry, User, UserId};
use crate::error::ApiError;

/// PostgreSQL-backed store using `sqlx::PgPool`.
///
/// Ledger tables are only ever inserted into; timestamps come from the
/// column default `now()`.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a store over an existing connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a connection pool sized from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::PersistenceError`] if the database is
    /// unreachable.
    pub async fn connect(config: &AppConfig) -> Result<Self, ApiError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
            .connect(&config.database_url)
            .await
            .map_err(|e| ApiError::PersistenceError(e.to_string()))?;
        Ok(Self::new(pool))
    }

    /// Applies the embedded migrations in `migrations/`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::PersistenceError`] if a migration fails.
    pub async fn migrate(&self) -> Result<(), ApiError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| ApiError::PersistenceError(e.to_string()))
    }
}

#[async_trait]
impl LedgerStore for PostgresStore {
    async fn append_entry(
        &self,
        user_id: UserId,
        kind: EntryKind,
        amount: f64,
    ) -> Result<LedgerEntry, ApiError> {
        let sql = format!(
            "INSERT INTO {} (user_id, amount_usat) VALUES ($1, CAST($2 AS NUMERIC)) \
             RETURNING id, user_id, amount_usat::float8 AS amount, created_at",
            table_for(kind)
        );
        let row = sqlx::query_as::<_, EntryRow>(&sql)
            .bind(*user_id.as_uuid())
            .bind(amount)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| ApiError::PersistenceError(e.to_string()))?;

        Ok(row.into_entry(kind))
    }

    async fn list_entries(
        &self,
        user_id: UserId,
        kind: EntryKind,
        limit: Option<u32>,
    ) -> Result<Vec<LedgerEntry>, ApiError> {
        // LIMIT NULL is no limit.
        let sql = format!(
            "SELECT id, user_id, amount_usat::float8 AS amount, created_at FROM {} \
             WHERE user_id = $1 ORDER BY created_at DESC LIMIT $2",
            table_for(kind)
        );
        let rows = sqlx::query_as::<_, EntryRow>(&sql)
            .bind(*user_id.as_uuid())
            .bind(limit.map(i64::from))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| ApiError::PersistenceError(e.to_string()))?;

        Ok(rows.into_iter().map(|row| row.into_entry(kind)).collect())
    }
}

#[async_trait]
impl UserStore for PostgresStore {
    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, ApiError> {
        let row = sqlx::query_as::<_, UserRow>(
            "INSERT INTO users (email, password_hash) VALUES ($1, $2) \
             RETURNING id, email, password_hash, created_at",
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => ApiError::EmailTaken,
            other => ApiError::PersistenceError(other.to_string()),
        })?;

        Ok(row.into())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, email, password_hash, created_at FROM users WHERE email = $1 LIMIT 1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| ApiError::PersistenceError(e.to_string()))?;

        Ok(row.map(User::from))
    }

    async fn find_user(&self, user_id: UserId) -> Result<Option<User>, ApiError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, email, password_hash, created_at FROM users WHERE id = $1",
        )
        .bind(*user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| ApiError::PersistenceError(e.to_string()))?;

        Ok(row.map(User::from))
    }
}
