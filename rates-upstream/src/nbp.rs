//! NBP table A mid rates.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, instrument};

use rates_types::{CurrencyCode, MidRate, MidRateProvider, UpstreamError, format_date};

/// Fetches single-currency mid rates from the NBP API.
#[derive(Debug, Clone)]
pub struct NbpProvider {
    base_url: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct NbpRateResponse {
    code: String,
    currency: String,
    rates: Vec<NbpRate>,
}

#[derive(Debug, Deserialize)]
struct NbpRate {
    #[serde(with = "rust_decimal::serde::float")]
    mid: Decimal,
}

impl NbpProvider {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .user_agent("rates-board/0.1")
            .timeout(timeout)
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    fn rate_url(&self, code: CurrencyCode, date: NaiveDate) -> String {
        format!(
            "{}/exchangerates/rates/A/{}/{}/?format=json",
            self.base_url,
            code,
            format_date(date)
        )
    }
}

fn map_transport(code: CurrencyCode, err: reqwest::Error) -> UpstreamError {
    if err.is_timeout() {
        UpstreamError::Timeout(code)
    } else {
        UpstreamError::Transport(err.to_string())
    }
}

#[async_trait]
impl MidRateProvider for NbpProvider {
    #[instrument(name = "NbpMidFetch", skip(self), fields(code = %code, date = %date))]
    async fn fetch_mid(
        &self,
        code: CurrencyCode,
        date: NaiveDate,
    ) -> Result<MidRate, UpstreamError> {
        let url = self.rate_url(code, date);
        debug!("Requesting mid rate from {}", url);

        let response = self
            .http
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| map_transport(code, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status {
                code,
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| map_transport(code, e))?;
        let data: NbpRateResponse =
            serde_json::from_str(&body).map_err(|e| UpstreamError::Decode(e.to_string()))?;

        if !data.code.eq_ignore_ascii_case(code.code()) {
            return Err(UpstreamError::Decode(format!(
                "expected {} but got {}",
                code, data.code
            )));
        }

        let rate = data
            .rates
            .first()
            .ok_or(UpstreamError::NoRate { code, date })?;

        Ok(MidRate {
            code,
            currency: data.currency,
            mid: rate.mid,
        })
    }
}
