//! # Rates Types
//!
//! Domain types and port traits for the exchange rate service.
//! This crate has ZERO external IO dependencies - only data structures,
//! validation rules, and trait definitions.
//!
//! ## Architecture
//!
//! This crate represents the **innermost core** of the hexagonal architecture:
//! - `domain/` - Rate records, snapshots and date validation
//! - `ports/` - Trait definitions that adapters must implement
//! - `dto/` - Data Transfer Objects for API boundaries
//! - `error/` - Domain and application error types

pub mod domain;
pub mod dto;
pub mod error;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    CurrencyRate, DateWindow, RateEntries, RateEntry, RateSnapshot, format_date, is_valid_date,
    parse_date,
};
pub use dto::*;
pub use error::{AppError, DomainError};
pub use exchange_rates::{CurrencyCode, Operation, RateQuote};
pub use ports::{Clock, FixedClock, MidRate, MidRateProvider, SystemClock, UpstreamError};
