//! OpenAPI document for the REST API.

use utoipa::openapi::Components;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use super::handlers;

/// Generated OpenAPI specification.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "usat-ledger",
        description = "Demo ledger with a continuously compounding balance projection."
    ),
    paths(
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::logout,
        handlers::auth::me,
        handlers::ledger::list_deposits,
        handlers::ledger::create_deposit,
        handlers::ledger::list_withdrawals,
        handlers::ledger::create_withdrawal,
        handlers::balance::get_balance,
        handlers::system::health_handler,
        handlers::system::accrual_handler,
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "Auth", description = "Registration and bearer tokens"),
        (name = "Ledger", description = "Deposits, withdrawals, and balance"),
        (name = "System", description = "Health and configuration"),
    )
)]
pub struct ApiDoc;

/// Registers the `bearer` security scheme referenced by protected paths.
#[derive(Debug)]
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Components::new);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_balance_path() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/v1/balance"));
        assert!(doc.paths.paths.contains_key("/health"));
    }
}
