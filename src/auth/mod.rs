//! Authentication collaborators: bearer tokens, password hashing, and the
//! request extractor that turns a token into an authenticated user.
//!
//! The accrual engine has no notion of identity. Unauthenticated requests
//! are rejected here, before any ledger read happens.

pub mod extract;
pub mod password;
pub mod token;

pub use extract::AuthUser;
pub use token::{Claims, TokenService};
