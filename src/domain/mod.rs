//! Domain layer: the accrual engine, identities, and ledger entries.
//!
//! The accrual engine is pure and has no dependency on the store, the
//! auth layer, or HTTP. Everything else in this module is plain data.

pub mod accrual;
pub mod ledger_entry;
pub mod user;
pub mod user_id;

pub use accrual::{AccrualEngine, AccrualError, AccrualParams, BalanceSnapshot};
pub use ledger_entry::{EntryKind, LedgerEntry};
pub use user::User;
pub use user_id::UserId;
