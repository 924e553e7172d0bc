//! Database row types for users and ledger entries.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{EntryKind, LedgerEntry, User, UserId};

/// A row from the `deposits` or `withdrawals` table.
///
/// `amount` is selected as `amount_usat::float8`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EntryRow {
    /// Entry identifier.
    pub id: Uuid,
    /// Owning account.
    pub user_id: Uuid,
    /// Face amount.
    pub amount: f64,
    /// Server-side creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl EntryRow {
    /// Converts the row into a domain entry of the given kind.
    #[must_use]
    pub fn into_entry(self, kind: EntryKind) -> LedgerEntry {
        LedgerEntry {
            id: self.id,
            user_id: UserId::from_uuid(self.user_id),
            kind,
            amount: self.amount,
            created_at: self.created_at,
        }
    }
}

/// A row from the `users` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    /// Account identifier.
    pub id: Uuid,
    /// Normalized email.
    pub email: String,
    /// Argon2 PHC string.
    pub password_hash: String,
    /// Registration timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::from_uuid(row.id),
            email: row.email,
            password_hash: row.password_hash,
            created_at: row.created_at,
        }
    }
}

/// Table holding entries of the given kind.
#[must_use]
pub const fn table_for(kind: EntryKind) -> &'static str {
    match kind {
        EntryKind::Deposit => "deposits",
        EntryKind::Withdrawal => "withdrawals",
    }
}
