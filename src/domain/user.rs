//! User account record.

use chrono::{DateTime, Utc};

use super::UserId;

/// A registered account as held by the user store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Account identifier.
    pub id: UserId,
    /// Normalized (trimmed, lowercase) email address.
    pub email: String,
    /// Argon2 PHC-format password hash.
    pub password_hash: String,
    /// Registration time.
    pub created_at: DateTime<Utc>,
}
