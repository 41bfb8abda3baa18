//! # Rates Upstream
//!
//! Concrete mid rate providers (adapters) for the exchange rate service.
//! This crate provides the HTTP adapter that implements the `MidRateProvider` port
//! against the NBP public API.

use std::time::Duration;

pub mod nbp;

pub use nbp::NbpProvider;

/// Public NBP API root.
pub const DEFAULT_NBP_API_URL: &str = "https://api.nbp.pl/api";

/// Build an NBP provider for the given API root.
///
/// Every request made by the provider is bounded by `timeout`.
///
/// # Examples
///
/// ```ignore
/// let provider = build_provider("https://api.nbp.pl/api", Duration::from_secs(5))?;
/// ```
pub fn build_provider(base_url: &str, timeout: Duration) -> anyhow::Result<NbpProvider> {
    Ok(NbpProvider::new(base_url, timeout)?)
}
