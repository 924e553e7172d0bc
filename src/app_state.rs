//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::auth::TokenService;
use crate::config::AppConfig;
use crate::domain::AccrualEngine;
use crate::persistence::{LedgerStore, UserStore};
use crate::service::{AccountService, LedgerService};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Registration and login.
    pub accounts: Arc<AccountService>,
    /// Deposits, withdrawals, and balances.
    pub ledger: Arc<LedgerService>,
    /// Bearer token verification for the [`crate::auth::AuthUser`] extractor.
    pub tokens: Arc<TokenService>,
}

impl AppState {
    /// Wires services over the given stores.
    #[must_use]
    pub fn new(
        users: Arc<dyn UserStore>,
        ledger: Arc<dyn LedgerStore>,
        config: &AppConfig,
    ) -> Self {
        let tokens = Arc::new(TokenService::new(&config.jwt_secret, config.jwt_ttl_hours));
        let accounts = Arc::new(AccountService::new(users, Arc::clone(&tokens)));
        let ledger = Arc::new(LedgerService::new(
            ledger,
            AccrualEngine::new(config.accrual),
            config.history_limit,
        ));
        Self {
            accounts,
            ledger,
            tokens,
        }
    }
}
