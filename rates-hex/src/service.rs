//! Exchange Rate Application Service
//!
//! Assembles rate snapshots through the mid rate provider port.
//! Contains NO infrastructure logic - pure orchestration and pricing rules.

use std::sync::Arc;

use chrono::NaiveDate;
use futures::future::join_all;
use tracing::{debug, instrument, warn};

use rates_types::{
    AppError, Clock, CurrencyCode, CurrencyRate, DateWindow, MidRateProvider, RateEntry,
    RateSnapshot, SystemClock,
};

/// Application service for exchange rate lookups.
///
/// Generic over `P: MidRateProvider` - the upstream adapter is injected at compile time.
/// The service holds no mutable state; every call builds a fresh snapshot.
pub struct RateService<P: MidRateProvider> {
    provider: P,
    clock: Arc<dyn Clock>,
    floor: NaiveDate,
}

impl<P: MidRateProvider> RateService<P> {
    /// Creates a service reading "today" from the system clock.
    pub fn new(provider: P, floor: NaiveDate) -> Self {
        Self {
            provider,
            clock: Arc::new(SystemClock),
            floor,
        }
    }

    /// Replaces the clock used to decide what "today" is.
    pub fn with_clock(mut self, clock: impl Clock) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Returns a reference to the underlying provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Selectable dates, with "today" read once from the clock.
    pub fn window(&self) -> DateWindow {
        DateWindow::new(self.floor, self.clock.today())
    }

    /// Rates for the requested date, or for today when no date is given.
    ///
    /// The date is validated before anything is fetched.
    #[instrument(skip(self))]
    pub async fn exchange_rates(&self, date: Option<&str>) -> Result<RateSnapshot, AppError> {
        let date = self.window().resolve(date)?;
        Ok(self.snapshot(date).await)
    }

    /// Fetches every supported currency concurrently.
    ///
    /// A failed currency becomes an error entry; the others are unaffected.
    pub async fn snapshot(&self, date: NaiveDate) -> RateSnapshot {
        let codes = CurrencyCode::supported();
        let entries = join_all(codes.iter().map(|&code| self.entry(code, date))).await;

        let snapshot = RateSnapshot::new(date, codes.iter().copied().zip(entries).collect());
        debug!(
            date = %date,
            failed = ?snapshot.failed(),
            "Assembled rate snapshot"
        );
        snapshot
    }

    async fn entry(&self, code: CurrencyCode, date: NaiveDate) -> RateEntry {
        let mid = match self.provider.fetch_mid(code, date).await {
            Ok(mid) => mid,
            Err(e) => {
                warn!(code = %code, date = %date, error = %e, "Mid rate fetch failed");
                return RateEntry::failed(code);
            }
        };

        match CurrencyRate::derive(code, mid.currency, mid.mid) {
            Ok(rate) => rate.into(),
            Err(e) => {
                warn!(code = %code, date = %date, error = %e, "Rejected upstream mid rate");
                RateEntry::failed(code)
            }
        }
    }
}
