//! Account handlers: register, login, logout, current user.

use axum::extract::State;
use axum::http::StatusCode;
use axum::http::header::SET_COOKIE;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{AuthResponse, CredentialsRequest, OkResponse, UserDto};
use crate::app_state::AppState;
use crate::auth::AuthUser;
use crate::auth::extract::{clear_session_cookie, session_cookie};
use crate::error::{ApiError, ErrorResponse};
use crate::service::Session;

fn session_response(state: &AppState, status: StatusCode, session: &Session) -> Response {
    let cookie = session_cookie(&session.token, state.tokens.ttl().num_seconds());
    (
        status,
        [(SET_COOKIE, cookie)],
        Json(AuthResponse {
            token: session.token.clone(),
            user: UserDto::from(&session.user),
        }),
    )
        .into_response()
}

/// `POST /auth/register` — Create an account.
///
/// # Errors
///
/// Returns [`ApiError`] on invalid input or a taken email.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "Auth",
    summary = "Register",
    description = "Creates an account and returns a bearer token. The token is also set as an HttpOnly `jwt` cookie.",
    request_body = CredentialsRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Invalid email or weak password", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse),
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<CredentialsRequest>,
) -> Result<Response, ApiError> {
    let session = state.accounts.register(&req.email, &req.password).await?;
    Ok(session_response(&state, StatusCode::CREATED, &session))
}

/// `POST /auth/login` — Exchange credentials for a token.
///
/// # Errors
///
/// Returns [`ApiError::InvalidCredentials`] on mismatch.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Auth",
    summary = "Log in",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Authenticated", body = AuthResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<CredentialsRequest>,
) -> Result<Response, ApiError> {
    let session = state.accounts.login(&req.email, &req.password).await?;
    Ok(session_response(&state, StatusCode::OK, &session))
}

/// `POST /auth/logout` — Clear the session cookie.
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    tag = "Auth",
    summary = "Log out",
    description = "Clears the `jwt` cookie. Bearer tokens stay valid until they expire.",
    responses(
        (status = 200, description = "Cookie cleared", body = OkResponse),
    )
)]
pub async fn logout() -> impl IntoResponse {
    (
        [(SET_COOKIE, clear_session_cookie())],
        Json(OkResponse { ok: true }),
    )
}

/// `GET /me` — Current account.
///
/// # Errors
///
/// Returns [`ApiError::Unauthorized`] without a valid token, or
/// [`ApiError::UserNotFound`] if the account is gone.
#[utoipa::path(
    get,
    path = "/api/v1/me",
    tag = "Auth",
    summary = "Current user",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Authenticated account", body = UserDto),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
    )
)]
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.accounts.profile(auth.user_id).await?;
    Ok(Json(UserDto::from(&user)))
}

/// Account routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/me", get(me))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::domain::{User, UserId};
    use crate::persistence::{InMemoryStore, LedgerStore, UserStore};
    use std::sync::Arc;

    fn state() -> AppState {
        let store = Arc::new(InMemoryStore::new());
        AppState::new(
            Arc::clone(&store) as Arc<dyn UserStore>,
            store as Arc<dyn LedgerStore>,
            &AppConfig::default(),
        )
    }

    #[test]
    fn session_response_owns_its_body_and_sets_cookie() {
        let response = {
            let state = state();
            let session = Session {
                token: "tok".to_string(),
                user: User {
                    id: UserId::new(),
                    email: "a@b.io".to_string(),
                    password_hash: String::new(),
                    created_at: chrono::Utc::now(),
                },
            };
            session_response(&state, StatusCode::CREATED, &session)
        };
        assert_eq!(response.status(), StatusCode::CREATED);
        let Some(cookie) = response.headers().get(SET_COOKIE) else {
            panic!("no Set-Cookie header");
        };
        assert!(cookie.to_str().is_ok_and(|c| c.starts_with("jwt=tok;")));
    }
}
