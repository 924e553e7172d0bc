//! Deposit and withdrawal handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{DepositRequest, EntryDto, EntryListResponse, WithdrawalRequest};
use crate::app_state::AppState;
use crate::auth::AuthUser;
use crate::domain::EntryKind;
use crate::error::{ApiError, ErrorResponse};

/// `GET /deposits` — Deposit history.
///
/// # Errors
///
/// Returns [`ApiError`] on auth or store failure.
#[utoipa::path(
    get,
    path = "/api/v1/deposits",
    tag = "Ledger",
    summary = "List deposits",
    description = "Most recent deposits of the caller, newest first.",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Deposit history", body = EntryListResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
    )
)]
pub async fn list_deposits(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    list(&state, auth, EntryKind::Deposit).await
}

/// `POST /deposits` — Record a deposit.
///
/// # Errors
///
/// Returns [`ApiError::InvalidAmount`] for non-positive amounts.
#[utoipa::path(
    post,
    path = "/api/v1/deposits",
    tag = "Ledger",
    summary = "Create deposit",
    description = "Appends a deposit stamped with the server clock. Accrual starts from that timestamp.",
    security(("bearer" = [])),
    request_body = DepositRequest,
    responses(
        (status = 201, description = "Deposit recorded", body = EntryDto),
        (status = 400, description = "Invalid amount", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
    )
)]
pub async fn create_deposit(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<DepositRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let amount = req.amount_usat.value()?;
    let entry = state.ledger.deposit(auth.user_id, amount).await?;
    Ok((StatusCode::CREATED, Json(EntryDto::from(&entry))))
}

/// `GET /withdrawals` — Withdrawal history.
///
/// # Errors
///
/// Returns [`ApiError`] on auth or store failure.
#[utoipa::path(
    get,
    path = "/api/v1/withdrawals",
    tag = "Ledger",
    summary = "List withdrawals",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Withdrawal history", body = EntryListResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
    )
)]
pub async fn list_withdrawals(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    list(&state, auth, EntryKind::Withdrawal).await
}

/// `POST /withdrawals` — Record a withdrawal.
///
/// # Errors
///
/// Returns [`ApiError::InvalidAmount`] for non-positive amounts.
#[utoipa::path(
    post,
    path = "/api/v1/withdrawals",
    tag = "Ledger",
    summary = "Create withdrawal",
    description = "Appends a withdrawal. It subtracts at face value from the grown total; the balance floors at zero.",
    security(("bearer" = [])),
    request_body = WithdrawalRequest,
    responses(
        (status = 201, description = "Withdrawal recorded", body = EntryDto),
        (status = 400, description = "Invalid amount", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
    )
)]
pub async fn create_withdrawal(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<WithdrawalRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let amount = req.amount_usat.value()?;
    let entry = state.ledger.withdraw(auth.user_id, amount).await?;
    Ok((StatusCode::CREATED, Json(EntryDto::from(&entry))))
}

async fn list(
    state: &AppState,
    auth: AuthUser,
    kind: EntryKind,
) -> Result<Json<EntryListResponse>, ApiError> {
    let entries = state.ledger.history(auth.user_id, kind).await?;
    Ok(Json(EntryListResponse {
        items: entries.iter().map(EntryDto::from).collect(),
    }))
}

/// Ledger routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/deposits", get(list_deposits).post(create_deposit))
        .route("/withdrawals", get(list_withdrawals).post(create_withdrawal))
}
