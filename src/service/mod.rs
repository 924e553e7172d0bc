//! Service layer: business logic orchestration.
//!
//! [`AccountService`] handles registration and login. [`LedgerService`]
//! records deposits and withdrawals and computes balances through the
//! [`crate::domain::AccrualEngine`].

pub mod account_service;
pub mod ledger_service;

pub use account_service::{AccountService, Session};
pub use ledger_service::{Balance, LedgerService};
