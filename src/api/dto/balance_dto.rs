//! Balance DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::accrual::{DEFAULT_PRECISION, MAX_PRECISION};
use crate::error::ApiError;
use crate::service::Balance;

/// Query parameters for `GET /balance`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BalanceQuery {
    /// Decimal places, 0 to 6. Defaults to 2.
    #[serde(default)]
    pub precision: Option<u32>,
}

impl BalanceQuery {
    /// Requested precision, validated.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRequest`] above [`MAX_PRECISION`].
    pub fn places(&self) -> Result<u32, ApiError> {
        match self.precision {
            None => Ok(DEFAULT_PRECISION),
            Some(p) if p <= MAX_PRECISION => Ok(p),
            Some(p) => Err(ApiError::InvalidRequest(format!(
                "precision must be at most {MAX_PRECISION}, got {p}"
            ))),
        }
    }
}

/// Response body for `GET /balance`. All amounts are non-negative.
#[derive(Debug, Serialize, ToSchema)]
pub struct BalanceResponse {
    /// Sum of deposit face values.
    pub principal_usat: f64,
    /// Growth above principal, floored at zero.
    pub accrued_usat: f64,
    /// Grown deposits minus withdrawals, floored at zero.
    pub total_usat: f64,
    /// Evaluation instant.
    pub as_of: DateTime<Utc>,
}

impl BalanceResponse {
    /// Rounds a computed balance for display.
    #[must_use]
    pub fn from_balance(balance: &Balance, places: u32) -> Self {
        let rounded = balance.snapshot.rounded(places);
        Self {
            principal_usat: rounded.principal,
            accrued_usat: rounded.accrued,
            total_usat: rounded.total,
            as_of: balance.as_of,
        }
    }
}
