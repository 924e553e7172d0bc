//! Authentication DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::User;

/// Request body for `POST /auth/register` and `POST /auth/login`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CredentialsRequest {
    /// Email address; trimmed and lowercased by the server.
    #[serde(default)]
    pub email: String,
    /// Plain-text password.
    #[serde(default)]
    pub password: String,
}

/// Public view of an account.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserDto {
    /// Account identifier.
    pub id: uuid::Uuid,
    /// Normalized email.
    pub email: String,
}

impl From<&User> for UserDto {
    fn from(user: &User) -> Self {
        Self {
            id: *user.id.as_uuid(),
            email: user.email.clone(),
        }
    }
}

/// Response body for successful register and login.
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    /// Bearer token for subsequent requests.
    pub token: String,
    /// The authenticated account.
    pub user: UserDto,
}

/// Response body for `POST /auth/logout`.
#[derive(Debug, Serialize, ToSchema)]
pub struct OkResponse {
    /// Always `true`.
    pub ok: bool,
}
