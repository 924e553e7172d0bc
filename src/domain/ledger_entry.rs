//! Append-only ledger entries and amount validation.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::UserId;
use super::accrual::{DepositEvent, MAX_PRECISION, WithdrawalEvent, round_half_up};
use crate::error::ApiError;

/// Which side of the ledger an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// Value added to the account; accrues over time.
    Deposit,
    /// Value removed from the account at face amount.
    Withdrawal,
}

impl EntryKind {
    /// Returns the kind as a static string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Deposit => "deposit",
            Self::Withdrawal => "withdrawal",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored deposit or withdrawal.
///
/// Created once by the store with the store's own clock and never
/// mutated or deleted afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerEntry {
    /// Store-assigned entry identifier.
    pub id: uuid::Uuid,
    /// Owning account.
    pub user_id: UserId,
    /// Deposit or withdrawal.
    pub kind: EntryKind,
    /// Face amount, always positive.
    pub amount: f64,
    /// Insert time according to the store.
    pub created_at: DateTime<Utc>,
}

impl From<&LedgerEntry> for DepositEvent {
    fn from(entry: &LedgerEntry) -> Self {
        Self::new(entry.amount, entry.created_at)
    }
}

impl From<&LedgerEntry> for WithdrawalEvent {
    fn from(entry: &LedgerEntry) -> Self {
        Self::new(entry.amount, entry.created_at)
    }
}

/// Exclusive upper bound for a single entry amount. Stored amounts are
/// `NUMERIC(20, 6)`, which holds at most 14 integer digits.
pub const MAX_ENTRY_AMOUNT: f64 = 1e14;

/// Checks a client-supplied amount and rounds it half-up to the stored
/// precision of [`MAX_PRECISION`] decimals.
///
/// # Errors
///
/// Returns [`ApiError::InvalidAmount`] if the amount is not finite, is
/// not below [`MAX_ENTRY_AMOUNT`], or rounds to zero at the stored
/// precision.
pub fn validate_amount(amount: f64) -> Result<f64, ApiError> {
    if !amount.is_finite() || amount >= MAX_ENTRY_AMOUNT {
        return Err(ApiError::InvalidAmount(amount.to_string()));
    }
    let stored = round_half_up(amount, MAX_PRECISION);
    if stored > 0.0 && stored < MAX_ENTRY_AMOUNT {
        Ok(stored)
    } else {
        Err(ApiError::InvalidAmount(amount.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn positive_amounts_pass() {
        assert!(validate_amount(0.01).is_ok());
        assert!(validate_amount(1_000_000.0).is_ok());
    }

    #[test]
    fn zero_negative_and_non_finite_fail() {
        for bad in [0.0, -5.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(validate_amount(bad), Err(ApiError::InvalidAmount(_))));
        }
    }

    #[test]
    fn amounts_below_stored_precision_fail() {
        assert!(matches!(
            validate_amount(0.000_000_1),
            Err(ApiError::InvalidAmount(_))
        ));
        assert!(matches!(
            validate_amount(0.000_000_4),
            Err(ApiError::InvalidAmount(_))
        ));
        assert!(matches!(validate_amount(0.000_001), Ok(v) if v > 0.0));
    }

    #[test]
    fn amounts_are_rounded_to_stored_precision() {
        let Ok(stored) = validate_amount(1.234_567_5) else {
            panic!("valid amount rejected");
        };
        assert!((stored - 1.234_568).abs() < 1e-12);
    }

    #[test]
    fn amounts_beyond_column_range_fail() {
        for bad in [MAX_ENTRY_AMOUNT, 1e15, f64::MAX] {
            assert!(matches!(validate_amount(bad), Err(ApiError::InvalidAmount(_))));
        }
        assert!(validate_amount(99_999_999_999_999.0).is_ok());
    }

    #[test]
    fn entry_converts_to_engine_events() {
        let entry = LedgerEntry {
            id: uuid::Uuid::new_v4(),
            user_id: UserId::new(),
            kind: EntryKind::Deposit,
            amount: 12.5,
            created_at: Utc::now(),
        };
        let deposit = DepositEvent::from(&entry);
        assert_eq!(deposit.occurred_at, entry.created_at);
        let withdrawal = WithdrawalEvent::from(&entry);
        assert!((withdrawal.amount - 12.5).abs() < f64::EPSILON);
    }

    #[test]
    fn kind_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&EntryKind::Withdrawal).unwrap_or_default(),
            "\"withdrawal\""
        );
        assert_eq!(EntryKind::Deposit.to_string(), "deposit");
    }
}
