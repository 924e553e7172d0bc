//! Deposit and withdrawal DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::LedgerEntry;
use crate::domain::accrual::{DEFAULT_PRECISION, round_half_up};
use crate::error::ApiError;

/// An amount given either as a JSON number or as a numeric string.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum AmountInput {
    /// `12.5`
    Number(f64),
    /// `"12.5"`
    Text(String),
}

impl AmountInput {
    /// Parses the amount. Range checks happen in the service.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidAmount`] if a string is not a number.
    pub fn value(&self) -> Result<f64, ApiError> {
        match self {
            Self::Number(n) => Ok(*n),
            Self::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| ApiError::InvalidAmount(s.clone())),
        }
    }
}

/// Request body for `POST /deposits`. `amount` is accepted as an alias.
#[derive(Debug, Deserialize, ToSchema)]
pub struct DepositRequest {
    /// Amount to deposit.
    #[serde(alias = "amount")]
    pub amount_usat: AmountInput,
}

/// Request body for `POST /withdrawals`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct WithdrawalRequest {
    /// Amount to withdraw.
    pub amount_usat: AmountInput,
}

/// A single ledger entry.
#[derive(Debug, Serialize, ToSchema)]
pub struct EntryDto {
    /// Entry identifier.
    pub id: uuid::Uuid,
    /// Face amount.
    pub amount_usat: f64,
    /// Store-assigned timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<&LedgerEntry> for EntryDto {
    fn from(entry: &LedgerEntry) -> Self {
        Self {
            id: entry.id,
            amount_usat: round_half_up(entry.amount, DEFAULT_PRECISION),
            created_at: entry.created_at,
        }
    }
}

/// Response body for `GET /deposits` and `GET /withdrawals`.
#[derive(Debug, Serialize, ToSchema)]
pub struct EntryListResponse {
    /// Entries, newest first.
    pub items: Vec<EntryDto>,
}
