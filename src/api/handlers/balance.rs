//! Balance handler.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{BalanceQuery, BalanceResponse};
use crate::app_state::AppState;
use crate::auth::AuthUser;
use crate::error::{ApiError, ErrorResponse};

/// `GET /balance` — Current balance projection.
///
/// Recomputed from the full deposit and withdrawal history on every call.
///
/// # Errors
///
/// Returns [`ApiError`] on auth failure, bad precision, store failure,
/// or corrupt ledger data.
#[utoipa::path(
    get,
    path = "/api/v1/balance",
    tag = "Ledger",
    summary = "Get balance",
    description = "Principal, accrued growth, and total as of now. Deposits compound in whole steps at the rate published by `/config/accrual`; withdrawals subtract at face value.",
    security(("bearer" = [])),
    params(BalanceQuery),
    responses(
        (status = 200, description = "Balance snapshot", body = BalanceResponse),
        (status = 400, description = "Invalid precision", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 500, description = "Ledger data integrity error", body = ErrorResponse),
    )
)]
pub async fn get_balance(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<BalanceQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let places = query.places()?;
    let balance = state.ledger.balance(auth.user_id).await?;
    Ok(Json(BalanceResponse::from_balance(&balance, places)))
}

/// Balance routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/balance", get(get_balance))
}
