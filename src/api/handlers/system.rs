//! System endpoints: health check and accrual configuration.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;
use crate::domain::accrual::SECONDS_PER_MONTH;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
}

/// `GET /health` — Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, and current timestamp.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// Compounding parameters in effect.
#[derive(Debug, Serialize, ToSchema)]
pub struct AccrualInfo {
    monthly_rate: f64,
    step_seconds: u64,
    seconds_per_month: u64,
    steps_per_month: u64,
    factor_per_step: f64,
}

/// `GET /config/accrual` — Compounding parameters.
#[utoipa::path(
    get,
    path = "/config/accrual",
    tag = "System",
    summary = "Accrual parameters",
    description = "Rate, step size, and derived per-step factor used by the balance engine. Lets clients project balances between polls.",
    responses(
        (status = 200, description = "Accrual parameters", body = AccrualInfo),
    )
)]
pub async fn accrual_handler(State(state): State<AppState>) -> impl IntoResponse {
    let engine = state.ledger.engine();
    let params = engine.params();
    Json(AccrualInfo {
        monthly_rate: params.monthly_rate(),
        step_seconds: params.step_seconds(),
        seconds_per_month: SECONDS_PER_MONTH,
        steps_per_month: params.steps_per_month(),
        factor_per_step: engine.factor_per_step(),
    })
}

/// System routes mounted at the root level (not under /api/v1).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/config/accrual", get(accrual_handler))
}
