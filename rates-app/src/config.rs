//! Configuration loading from environment.

use std::env;
use std::time::Duration;

use chrono::NaiveDate;

use rates_types::{DateWindow, parse_date};
use rates_upstream::DEFAULT_NBP_API_URL;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub nbp_api_url: String,
    pub upstream_timeout: Duration,
    /// Earliest date rates are served for
    pub floor_date: NaiveDate,
    /// OTLP collector; telemetry export is off when unset
    pub otlp_endpoint: Option<String>,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let port = var("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()
            .map_err(|e| anyhow::anyhow!("PORT must be a port number: {}", e))?;

        let nbp_api_url = var("NBP_API_URL").unwrap_or_else(|| DEFAULT_NBP_API_URL.to_string());

        let timeout_ms: u64 = var("UPSTREAM_TIMEOUT_MS")
            .unwrap_or_else(|| "5000".to_string())
            .parse()
            .map_err(|e| anyhow::anyhow!("UPSTREAM_TIMEOUT_MS must be milliseconds: {}", e))?;

        let floor_date = match var("RATES_FLOOR_DATE") {
            Some(raw) => parse_date(&raw).ok_or_else(|| {
                anyhow::anyhow!("RATES_FLOOR_DATE must be YYYY-MM-DD, got {:?}", raw)
            })?,
            None => DateWindow::default_floor(),
        };

        let otlp_endpoint = var("OTEL_EXPORTER_OTLP_ENDPOINT").filter(|v| !v.trim().is_empty());

        Ok(Self {
            port,
            nbp_api_url,
            upstream_timeout: Duration::from_millis(timeout_ms),
            floor_date,
            otlp_endpoint,
        })
    }
}
