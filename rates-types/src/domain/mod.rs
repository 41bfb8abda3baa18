//! Domain models for the exchange rate service.

pub mod date;
pub mod rate;
pub mod snapshot;

pub use date::{DateWindow, format_date, is_valid_date, parse_date};
pub use rate::{CurrencyRate, RateEntry};
pub use snapshot::{RateEntries, RateSnapshot};
