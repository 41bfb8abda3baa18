//! # Rates Client SDK
//!
//! A typed Rust client for the exchange rates API, plus the client-side
//! state of the rate page:
//! - `board` - selected date, loading/error state, filter and the two snapshots
//! - `conversion` - converting an amount between two quoted currencies

pub mod board;
pub mod conversion;

use chrono::NaiveDate;
use reqwest::Client;
use serde::de::DeserializeOwned;

use rates_types::{HealthResponse, RateEntries, RateSnapshot, format_date};

pub use board::{BoardRow, LoadTicket, LoadedRates, RateBoard};
pub use conversion::{ConversionContext, ConversionError};

/// Error type for client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Exchange rates API client.
#[derive(Debug, Clone)]
pub struct RatesClient {
    base_url: String,
    http: Client,
}

impl RatesClient {
    /// Creates a new client.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    /// Checks if the API is healthy.
    pub async fn health(&self) -> Result<bool, ClientError> {
        let resp = self
            .http
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;
        if !resp.status().is_success() {
            return Ok(false);
        }
        let body: HealthResponse = resp.json().await?;
        Ok(body.status == "healthy")
    }

    /// Fetches the rate snapshot for a date.
    pub async fn exchange_rates(&self, date: NaiveDate) -> Result<RateSnapshot, ClientError> {
        let path = format!("/api/exchange-rates?date={}", format_date(date));
        let entries: RateEntries = self.get(&path).await?;
        Ok(RateSnapshot::new(date, entries))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        tracing::debug!("GET {}{}", self.base_url, path);
        let resp = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await?;
        self.handle_response(resp).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            Ok(serde_json::from_str(&body)?)
        } else {
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
                .unwrap_or(body);
            Err(ClientError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}
