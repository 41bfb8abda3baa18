//! Source of "today".

use chrono::{NaiveDate, Utc};

/// Supplies the current date. Read once per request and passed down.
pub trait Clock: Send + Sync + 'static {
    fn today(&self) -> NaiveDate;
}

/// UTC calendar date of the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// Always reports the same date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
