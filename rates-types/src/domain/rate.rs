//! Per-currency rate records.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use exchange_rates::{CurrencyCode, Operation, RateError, RateQuote};

/// One currency's derived rates for a date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CurrencyRate {
    pub code: CurrencyCode,
    /// Display name as published by NBP
    #[schema(example = "dolar amerykański")]
    pub currency: String,
    pub rates: RateQuote,
}

impl CurrencyRate {
    pub fn new(code: CurrencyCode, currency: impl Into<String>, rates: RateQuote) -> Self {
        Self {
            code,
            currency: currency.into(),
            rates,
        }
    }

    /// Builds a record from an official mid rate, applying the currency's markup.
    pub fn derive(
        code: CurrencyCode,
        currency: impl Into<String>,
        mid: Decimal,
    ) -> Result<Self, RateError> {
        Ok(Self::new(code, currency, code.derive(mid)?))
    }

    /// PLN priced against itself.
    pub fn base() -> Self {
        let code = CurrencyCode::BASE;
        Self::new(code, code.display_name(), RateQuote::unit())
    }

    pub fn mid(&self) -> Decimal {
        self.rates.nbp
    }

    pub fn purchase(&self) -> Option<Decimal> {
        self.rates.purchase
    }

    pub fn selling(&self) -> Decimal {
        self.rates.selling
    }

    pub fn rate_for(&self, operation: Operation) -> Option<Decimal> {
        self.rates.for_operation(operation)
    }
}

/// Snapshot entry: either rates or the reason they are missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum RateEntry {
    Rate(CurrencyRate),
    Failed {
        #[schema(example = "Failed to fetch data for USD")]
        error: String,
    },
}

impl RateEntry {
    /// Marker for a currency whose upstream fetch did not succeed.
    pub fn failed(code: CurrencyCode) -> Self {
        RateEntry::Failed {
            error: format!("Failed to fetch data for {}", code),
        }
    }

    pub fn as_rate(&self) -> Option<&CurrencyRate> {
        match self {
            RateEntry::Rate(rate) => Some(rate),
            RateEntry::Failed { .. } => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, RateEntry::Failed { .. })
    }
}

impl From<CurrencyRate> for RateEntry {
    fn from(rate: CurrencyRate) -> Self {
        RateEntry::Rate(rate)
    }
}
