//! Account service: registration, login, and profile lookup.

use std::sync::Arc;

use crate::auth::TokenService;
use crate::auth::password::{self, MIN_PASSWORD_LEN};
use crate::domain::{User, UserId};
use crate::error::ApiError;
use crate::persistence::UserStore;

/// A freshly authenticated account and its bearer token.
#[derive(Debug, Clone)]
pub struct Session {
    /// Signed bearer token.
    pub token: String,
    /// The authenticated account.
    pub user: User,
}

/// Orchestrates account operations over a [`UserStore`].
#[derive(Debug, Clone)]
pub struct AccountService {
    users: Arc<dyn UserStore>,
    tokens: Arc<TokenService>,
}

impl AccountService {
    /// Creates a new `AccountService`.
    #[must_use]
    pub fn new(users: Arc<dyn UserStore>, tokens: Arc<TokenService>) -> Self {
        Self { users, tokens }
    }

    /// Registers a new account and signs a token for it.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidEmail`], [`ApiError::WeakPassword`],
    /// [`ApiError::EmailTaken`], or a store error.
    pub async fn register(&self, email: &str, password: &str) -> Result<Session, ApiError> {
        let email = normalize_email(email);
        if !looks_like_email(&email) {
            return Err(ApiError::InvalidEmail);
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ApiError::WeakPassword {
                min_len: MIN_PASSWORD_LEN,
            });
        }

        let hash = password::hash_password(password.to_string()).await?;
        let user = self.users.create_user(&email, &hash).await?;
        let token = self.tokens.issue(&user)?;

        tracing::info!(user_id = %user.id, "account registered");
        Ok(Session { token, user })
    }

    /// Checks credentials and signs a token.
    ///
    /// Unknown email and wrong password are indistinguishable to the
    /// caller.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidCredentials`] or a store error.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, ApiError> {
        let email = normalize_email(email);
        if email.is_empty() || password.is_empty() {
            return Err(ApiError::InvalidCredentials);
        }

        let Some(user) = self.users.find_user_by_email(&email).await? else {
            tracing::debug!("login for unknown email");
            return Err(ApiError::InvalidCredentials);
        };
        if !password::verify_password(password.to_string(), user.password_hash.clone()).await? {
            tracing::debug!(user_id = %user.id, "login with wrong password");
            return Err(ApiError::InvalidCredentials);
        }

        let token = self.tokens.issue(&user)?;
        tracing::info!(user_id = %user.id, "login succeeded");
        Ok(Session { token, user })
    }

    /// Loads the account behind a verified token.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::UserNotFound`] if the account no longer exists.
    pub async fn profile(&self, user_id: UserId) -> Result<User, ApiError> {
        self.users
            .find_user(user_id)
            .await?
            .ok_or(ApiError::UserNotFound(*user_id.as_uuid()))
    }
}

/// Trims and lowercases an email address.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// `local@domain.tld` with no whitespace.
fn looks_like_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    matches!(domain.rsplit_once('.'), Some((host, tld)) if !host.is_empty() && !tld.is_empty())
}
