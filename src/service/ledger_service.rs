//! Ledger service: records deposits and withdrawals, computes balances.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::accrual::{DepositEvent, WithdrawalEvent};
use crate::domain::ledger_entry::validate_amount;
use crate::domain::{AccrualEngine, BalanceSnapshot, EntryKind, LedgerEntry, UserId};
use crate::error::ApiError;
use crate::persistence::LedgerStore;

/// A computed balance and the instant it was evaluated at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Balance {
    /// Unrounded snapshot.
    pub snapshot: BalanceSnapshot,
    /// Evaluation instant shared by every event in the computation.
    pub as_of: DateTime<Utc>,
}

/// Orchestration layer for ledger operations.
///
/// Holds no balance state: every [`LedgerService::balance`] call reads
/// the full event history and recomputes.
#[derive(Debug, Clone)]
pub struct LedgerService {
    store: Arc<dyn LedgerStore>,
    engine: AccrualEngine,
    history_limit: u32,
}

impl LedgerService {
    /// Creates a new `LedgerService`.
    #[must_use]
    pub fn new(store: Arc<dyn LedgerStore>, engine: AccrualEngine, history_limit: u32) -> Self {
        Self {
            store,
            engine,
            history_limit,
        }
    }

    /// Returns the accrual engine in use.
    #[must_use]
    pub const fn engine(&self) -> &AccrualEngine {
        &self.engine
    }

    /// Records a deposit.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidAmount`] for non-positive or non-finite
    /// amounts, or a store error.
    pub async fn deposit(&self, user_id: UserId, amount: f64) -> Result<LedgerEntry, ApiError> {
        self.record(user_id, EntryKind::Deposit, amount).await
    }

    /// Records a withdrawal.
    ///
    /// No available-balance check is made; withdrawing more than the
    /// grown total clamps the balance to zero.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidAmount`] for non-positive or non-finite
    /// amounts, or a store error.
    pub async fn withdraw(&self, user_id: UserId, amount: f64) -> Result<LedgerEntry, ApiError> {
        self.record(user_id, EntryKind::Withdrawal, amount).await
    }

    async fn record(
        &self,
        user_id: UserId,
        kind: EntryKind,
        amount: f64,
    ) -> Result<LedgerEntry, ApiError> {
        let amount = validate_amount(amount)?;
        let entry = self.store.append_entry(user_id, kind, amount).await?;
        tracing::info!(%user_id, %kind, amount, entry_id = %entry.id, "ledger entry recorded");
        Ok(entry)
    }

    /// Most recent entries of one kind, newest first, capped at the
    /// configured history limit.
    ///
    /// # Errors
    ///
    /// Returns a store error.
    pub async fn history(
        &self,
        user_id: UserId,
        kind: EntryKind,
    ) -> Result<Vec<LedgerEntry>, ApiError> {
        self.store
            .list_entries(user_id, kind, Some(self.history_limit))
            .await
    }

    /// Computes the user's balance as of now.
    ///
    /// Both histories are read concurrently; `now` is captured once,
    /// after the reads, so every observed event has `created_at <= now`
    /// up to clock skew (which the engine clamps).
    ///
    /// # Errors
    ///
    /// Returns a store error, or [`ApiError::DataIntegrity`] if the
    /// stored history cannot be turned into a balance.
    pub async fn balance(&self, user_id: UserId) -> Result<Balance, ApiError> {
        let (deposits, withdrawals) = tokio::try_join!(
            self.store.list_entries(user_id, EntryKind::Deposit, None),
            self.store.list_entries(user_id, EntryKind::Withdrawal, None),
        )?;
        let now = Utc::now();
        self.balance_at(&deposits, &withdrawals, now)
    }

    /// Runs the engine over already-loaded entries at a fixed instant.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::DataIntegrity`] on malformed amounts or
    /// overflow.
    pub fn balance_at(
        &self,
        deposits: &[LedgerEntry],
        withdrawals: &[LedgerEntry],
        now: DateTime<Utc>,
    ) -> Result<Balance, ApiError> {
        let deposits: Vec<DepositEvent> = deposits.iter().map(DepositEvent::from).collect();
        let withdrawals: Vec<WithdrawalEvent> =
            withdrawals.iter().map(WithdrawalEvent::from).collect();

        let snapshot = self
            .engine
            .compute(&deposits, &withdrawals, now)
            .inspect_err(|e| tracing::error!(error = %e, "balance computation rejected"))?;

        tracing::debug!(
            deposits = deposits.len(),
            withdrawals = withdrawals.len(),
            total = snapshot.total,
            "balance computed"
        );
        Ok(Balance {
            snapshot,
            as_of: now,
        })
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::accrual::SECONDS_PER_MONTH;
    use crate::persistence::InMemoryStore;
    use chrono::TimeDelta;

    fn make_service() -> (LedgerService, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::new());
        let service = LedgerService::new(
            Arc::clone(&store) as Arc<dyn LedgerStore>,
            AccrualEngine::default(),
            200,
        );
        (service, store)
    }

    fn entry(user_id: UserId, kind: EntryKind, amount: f64, at: DateTime<Utc>) -> LedgerEntry {
        LedgerEntry {
            id: uuid::Uuid::new_v4(),
            user_id,
            kind,
            amount,
            created_at: at,
        }
    }

    #[tokio::test]
    async fn deposit_rejects_bad_amounts() {
        let (service, _) = make_service();
        let user = UserId::new();
        assert!(matches!(
            service.deposit(user, 0.0).await,
            Err(ApiError::InvalidAmount(_))
        ));
        assert!(matches!(
            service.withdraw(user, f64::NAN).await,
            Err(ApiError::InvalidAmount(_))
        ));
    }

    #[tokio::test]
    async fn fresh_deposit_has_no_accrual() {
        let (service, _) = make_service();
        let user = UserId::new();
        assert!(service.deposit(user, 500.0).await.is_ok());

        let Ok(balance) = service.balance(user).await else {
            panic!("balance failed");
        };
        let rounded = balance.snapshot.rounded(2);
        assert!((rounded.principal - 500.0).abs() < f64::EPSILON);
        assert!((rounded.total - 500.0).abs() < f64::EPSILON);
        assert!(rounded.accrued.abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn month_old_deposit_has_grown() {
        let (service, store) = make_service();
        let user = UserId::new();
        let month_ago = Utc::now() - TimeDelta::seconds(SECONDS_PER_MONTH as i64);
        store
            .insert_entry(entry(user, EntryKind::Deposit, 1000.0, month_ago))
            .await;

        let Ok(balance) = service.balance(user).await else {
            panic!("balance failed");
        };
        let rounded = balance.snapshot.rounded(2);
        assert!((rounded.total - 1250.0).abs() < 0.01);
        assert!((rounded.accrued - 250.0).abs() < 0.01);
    }

    #[tokio::test]
    async fn balance_is_per_user() {
        let (service, _) = make_service();
        let alice = UserId::new();
        let bob = UserId::new();
        assert!(service.deposit(alice, 100.0).await.is_ok());

        let Ok(balance) = service.balance(bob).await else {
            panic!("balance failed");
        };
        assert_eq!(balance.snapshot, BalanceSnapshot::default());
    }

    #[tokio::test]
    async fn over_withdrawal_clamps() {
        let (service, _) = make_service();
        let user = UserId::new();
        assert!(service.deposit(user, 1000.0).await.is_ok());
        assert!(service.withdraw(user, 1500.0).await.is_ok());

        let Ok(balance) = service.balance(user).await else {
            panic!("balance failed");
        };
        assert!(balance.snapshot.total.abs() < f64::EPSILON);
        assert!((balance.snapshot.principal - 1000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn corrupt_history_is_a_data_integrity_error() {
        let (service, _) = make_service();
        let user = UserId::new();
        let now = Utc::now();
        let deposits = [entry(user, EntryKind::Deposit, -3.0, now)];
        assert!(matches!(
            service.balance_at(&deposits, &[], now),
            Err(ApiError::DataIntegrity(_))
        ));
    }

    #[tokio::test]
    async fn history_is_capped() {
        let store = Arc::new(InMemoryStore::new());
        let service = LedgerService::new(store, AccrualEngine::default(), 3);
        let user = UserId::new();
        for _ in 0..5 {
            assert!(service.deposit(user, 1.0).await.is_ok());
        }
        let Ok(items) = service.history(user, EntryKind::Deposit).await else {
            panic!("history failed");
        };
        assert_eq!(items.len(), 3);
    }
}
