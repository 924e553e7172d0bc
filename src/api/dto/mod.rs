//! Data Transfer Objects for REST request/response serialization.
//!
//! Amounts are plain JSON numbers rounded for display; requests accept
//! either a number or a numeric string.

pub mod auth_dto;
pub mod balance_dto;
pub mod ledger_dto;

pub use auth_dto::*;
pub use balance_dto::*;
pub use ledger_dto::*;
