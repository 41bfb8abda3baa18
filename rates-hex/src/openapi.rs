//! OpenAPI specification and documentation.

#![allow(dead_code)] // Path functions are only used by utoipa for documentation generation

use std::collections::HashMap;

use rates_types::{
    CurrencyCode, CurrencyRate, ErrorResponse, HealthResponse, Operation, RateEntry, RateQuote,
    RatesQuery,
};
use utoipa::OpenApi;

// Dummy functions to generate path documentation
// These are not the actual handlers, just for OpenAPI path generation

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
async fn health() {}

/// Exchange rates for a date
///
/// Fetches the NBP mid rate of every supported currency and derives purchase
/// and selling rates. A currency that could not be fetched carries an
/// `error` entry instead of rates.
#[utoipa::path(
    get,
    path = "/api/exchange-rates",
    tag = "rates",
    params(RatesQuery),
    responses(
        (status = 200, description = "Rates keyed by currency code", body = HashMap<String, RateEntry>,
            example = json!({
                "USD": {"code": "USD", "currency": "dolar amerykański", "rates": {"nbp": 4.0, "purchase": 3.95, "selling": 4.07}},
                "CZK": {"error": "Failed to fetch data for CZK"}
            })),
        (status = 400, description = "Invalid or out-of-range date", body = ErrorResponse,
            example = json!({"error": "Invalid date format"}))
    )
)]
async fn exchange_rates() {}

/// OpenAPI documentation for the exchange rates API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Exchange Rate Board API",
        version = "1.0.0",
        description = "Daily NBP mid rates with derived purchase and selling rates.\n\n## Markups\n\nEUR and USD are bought at `mid - 0.05` and sold at `mid + 0.07`. Every other currency is only sold, at `mid + 0.15`.",
        license(name = "MIT"),
    ),
    paths(health, exchange_rates),
    components(
        schemas(
            CurrencyCode,
            CurrencyRate,
            RateEntry,
            RateQuote,
            Operation,
            ErrorResponse,
            HealthResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "rates", description = "Exchange rate lookups"),
    )
)]
pub struct ApiDoc;
