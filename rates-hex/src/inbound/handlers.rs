//! HTTP request handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use utoipa::OpenApi;

use rates_types::{AppError, ErrorResponse, HealthResponse, MidRateProvider, RatesQuery};

use crate::RateService;
use crate::openapi::ApiDoc;

/// Application state shared across handlers.
pub struct AppState<P: MidRateProvider> {
    pub service: RateService<P>,
}

/// Wrapper to implement IntoResponse for AppError (orphan rule workaround).
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self.0 {
            AppError::BadRequest(msg) => {
                tracing::debug!(error = %msg, "Rejected request");
                (StatusCode::BAD_REQUEST, msg)
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".into(),
    })
}

/// Exchange rates for one date, keyed by currency code.
#[tracing::instrument(skip_all, fields(date = ?query.date))]
pub async fn exchange_rates<P: MidRateProvider>(
    State(state): State<Arc<AppState<P>>>,
    Query(query): Query<RatesQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let snapshot = state.service.exchange_rates(query.date.as_deref()).await?;
    Ok(Json(snapshot.into_entries()))
}

/// OpenAPI document as JSON.
pub async fn openapi() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}
