//! # Rates Hex
//!
//! Application service layer and HTTP adapter for the exchange rate service.
//!
//! ## Architecture
//!
//! - `service/` - Application service (assembles rate snapshots)
//! - `inbound/` - HTTP adapter (Axum server)
//! - `openapi/` - API documentation
//!
//! The service is generic over `P: MidRateProvider`, allowing
//! different upstream implementations to be injected.

pub mod inbound;
pub mod openapi;
pub mod service;

#[cfg(test)]
mod service_tests;

pub use service::RateService;
