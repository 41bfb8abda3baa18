//! Mid rate provider port.
//!
//! This trait defines the interface to the official rate publisher.
//! Implementations can be HTTP clients, mock providers, etc.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::CurrencyCode;

/// Error type for upstream fetches. Each one is scoped to a single currency.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("Upstream request for {0} timed out")]
    Timeout(CurrencyCode),

    #[error("Upstream returned status {status} for {code}")]
    Status { code: CurrencyCode, status: u16 },

    #[error("Upstream transport error: {0}")]
    Transport(String),

    #[error("Unexpected upstream payload: {0}")]
    Decode(String),

    #[error("No rate published for {code} on {date}")]
    NoRate { code: CurrencyCode, date: NaiveDate },
}

/// Official mid rate of one currency, as published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MidRate {
    pub code: CurrencyCode,
    /// Display name reported by the publisher
    pub currency: String,
    pub mid: Decimal,
}

/// Port trait for official mid rate publishers.
#[async_trait::async_trait]
pub trait MidRateProvider: Send + Sync + 'static {
    /// Fetches the mid rate of `code` against PLN published for `date`.
    async fn fetch_mid(&self, code: CurrencyCode, date: NaiveDate)
    -> Result<MidRate, UpstreamError>;
}
