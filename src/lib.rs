//! # usat-ledger
//!
//! REST API for the USATether demo ledger: users register, record
//! deposits and withdrawals, and read a balance that compounds
//! continuously from the moment each deposit was recorded.
//!
//! The balance is never stored. Each read loads the raw event history and
//! runs it through the pure [`domain::AccrualEngine`].
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── REST Handlers (api/) ── AuthUser extractor (auth/)
//!     │
//!     ├── AccountService / LedgerService (service/)
//!     │
//!     ├── AccrualEngine (domain/)        pure, no I/O
//!     │
//!     └── LedgerStore / UserStore (persistence/)
//!             ├── PostgreSQL
//!             └── in-memory
//! ```

pub mod api;
pub mod app_state;
pub mod auth;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
