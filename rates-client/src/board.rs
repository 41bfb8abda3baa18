//! Client-side state of the rate page.
//!
//! Every date selection hands out a [`LoadTicket`]. Only the most recent
//! ticket may land its result, so a slow response for an earlier date can
//! never overwrite the table of a later one.

use chrono::NaiveDate;

use rates_types::{CurrencyCode, CurrencyRate, DateWindow, DomainError, RateSnapshot};

use crate::conversion::{ConversionContext, ConversionError};
use crate::{ClientError, RatesClient};

/// One pending fetch for a selected date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    date: NaiveDate,
    as_of: NaiveDate,
    fetch_today: bool,
}

/// Snapshots fetched for a ticket.
#[derive(Debug, Clone)]
pub struct LoadedRates {
    pub reference: RateSnapshot,
    /// Today's rates, when the ticket asked for them separately.
    pub today: Option<RateSnapshot>,
}

impl LoadTicket {
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn fetches_today(&self) -> bool {
        self.fetch_today
    }

    /// Fetches the snapshots this ticket needs, concurrently when there are two.
    pub async fn fetch(&self, client: &RatesClient) -> Result<LoadedRates, ClientError> {
        if self.fetch_today {
            let (reference, today) = tokio::try_join!(
                client.exchange_rates(self.date),
                client.exchange_rates(self.as_of)
            )?;
            Ok(LoadedRates {
                reference,
                today: Some(today),
            })
        } else {
            let reference = client.exchange_rates(self.date).await?;
            Ok(LoadedRates {
                reference,
                today: None,
            })
        }
    }
}

/// A row of the table: the rate on the selected date next to today's.
#[derive(Debug, Clone, Copy)]
pub struct BoardRow<'a> {
    pub rate: &'a CurrencyRate,
    pub today: Option<&'a CurrencyRate>,
}

#[derive(Debug)]
pub struct RateBoard {
    window: DateWindow,
    date: NaiveDate,
    generation: u64,
    loading: bool,
    error: Option<String>,
    reference: Option<RateSnapshot>,
    today: Option<RateSnapshot>,
    filter: String,
    conversion: Option<ConversionContext>,
}

impl RateBoard {
    /// Board starting on the window's `as_of` date.
    ///
    /// It reports loading until the first ticket completes or fails.
    pub fn new(window: DateWindow) -> Self {
        Self {
            window,
            date: window.as_of(),
            generation: 0,
            loading: true,
            error: None,
            reference: None,
            today: None,
            filter: String::new(),
            conversion: None,
        }
    }

    pub fn window(&self) -> DateWindow {
        self.window
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Page-level error of the last load.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn reference(&self) -> Option<&RateSnapshot> {
        self.reference.as_ref()
    }

    pub fn today(&self) -> Option<&RateSnapshot> {
        self.today.as_ref()
    }

    /// Whether rows carry a separate "today" column.
    pub fn shows_today(&self) -> bool {
        self.date != self.window.as_of()
    }

    /// Selects a date and starts a load for it.
    ///
    /// Out-of-window dates are rejected without touching the current state.
    /// An open conversion is closed since its targets belong to the old date.
    pub fn select_date(&mut self, date: NaiveDate) -> Result<LoadTicket, DomainError> {
        let date = self.window.check(date)?;
        self.generation += 1;
        self.date = date;
        self.loading = true;
        self.error = None;
        self.conversion = None;

        let as_of = self.window.as_of();
        Ok(LoadTicket {
            generation: self.generation,
            date,
            as_of,
            fetch_today: date != as_of && self.today.is_none(),
        })
    }

    /// Same as [`Self::select_date`] for raw `YYYY-MM-DD` input.
    pub fn select_date_str(&mut self, raw: &str) -> Result<LoadTicket, DomainError> {
        let date = self.window.resolve(Some(raw))?;
        self.select_date(date)
    }

    /// Lands a finished load. Returns `false` when the ticket was superseded.
    pub fn complete(&mut self, ticket: &LoadTicket, loaded: LoadedRates) -> bool {
        if ticket.generation != self.generation {
            tracing::debug!(date = %ticket.date, "Dropping superseded rates");
            return false;
        }

        if let Some(today) = loaded.today {
            self.today = Some(today);
        } else if ticket.date == ticket.as_of {
            self.today = Some(loaded.reference.clone());
        }
        self.reference = Some(loaded.reference);
        self.loading = false;
        true
    }

    /// Records a failed load as a page-level error and clears the table.
    pub fn fail(&mut self, ticket: &LoadTicket, err: &ClientError) -> bool {
        if ticket.generation != self.generation {
            return false;
        }
        self.error = Some(err.to_string());
        self.reference = None;
        self.conversion = None;
        self.loading = false;
        true
    }

    pub fn set_filter(&mut self, filter: impl Into<String>) {
        self.filter = filter.into();
    }

    /// Visible rows: successful rates whose code matches the filter.
    pub fn rows(&self) -> Vec<BoardRow<'_>> {
        let Some(reference) = &self.reference else {
            return Vec::new();
        };
        reference
            .matching(&self.filter)
            .into_iter()
            .map(|rate| BoardRow {
                rate,
                today: self.today.as_ref().and_then(|t| t.rate(rate.code)),
            })
            .collect()
    }

    /// Opens a conversion from `code`, priced at today's rate.
    pub fn open_conversion(
        &mut self,
        code: CurrencyCode,
    ) -> Result<&mut ConversionContext, ConversionError> {
        let source = self
            .today
            .as_ref()
            .and_then(|t| t.rate(code))
            .cloned()
            .ok_or(ConversionError::MissingRate(code))?;
        let reference = self
            .reference
            .as_ref()
            .ok_or(ConversionError::MissingRate(code))?;

        Ok(self
            .conversion
            .insert(ConversionContext::open(source, reference)))
    }

    pub fn conversion(&self) -> Option<&ConversionContext> {
        self.conversion.as_ref()
    }

    pub fn conversion_mut(&mut self) -> Option<&mut ConversionContext> {
        self.conversion.as_mut()
    }

    pub fn close_conversion(&mut self) {
        self.conversion = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rates_types::{Operation, RateEntry};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        ymd(2024, 6, 3)
    }

    fn board() -> RateBoard {
        RateBoard::new(DateWindow::new(ymd(2023, 1, 1), today()))
    }

    fn snapshot(date: NaiveDate, usd_mid: Decimal) -> RateSnapshot {
        let rate = |code: CurrencyCode, mid| {
            RateEntry::from(CurrencyRate::derive(code, code.display_name(), mid).unwrap())
        };
        let entries = [
            (CurrencyCode::EUR, rate(CurrencyCode::EUR, dec!(4.50))),
            (CurrencyCode::USD, rate(CurrencyCode::USD, usd_mid)),
            (CurrencyCode::CZK, RateEntry::failed(CurrencyCode::CZK)),
            (CurrencyCode::BRL, rate(CurrencyCode::BRL, dec!(0.76))),
        ]
        .into_iter()
        .collect();
        RateSnapshot::new(date, entries)
    }

    fn load(board: &mut RateBoard, date: NaiveDate, usd_mid: Decimal) {
        let ticket = board.select_date(date).unwrap();
        let loaded = LoadedRates {
            reference: snapshot(date, usd_mid),
            today: ticket.fetches_today().then(|| snapshot(today(), dec!(4.00))),
        };
        assert!(board.complete(&ticket, loaded));
    }

    #[test]
    fn test_new_board_is_loading() {
        let board = board();
        assert!(board.is_loading());
        assert!(board.rows().is_empty());
        assert!(board.error().is_none());
    }

    #[test]
    fn test_new_date_closes_open_conversion() {
        let mut board = board();
        load(&mut board, today(), dec!(4.00));
        board.open_conversion(CurrencyCode::USD).unwrap();

        board.select_date(ymd(2024, 5, 31)).unwrap();
        assert!(board.conversion().is_none());
    }

    #[test]
    fn test_failed_load_closes_open_conversion() {
        let mut board = board();
        load(&mut board, today(), dec!(4.00));
        board.open_conversion(CurrencyCode::USD).unwrap();

        let ticket = board.select_date(ymd(2024, 5, 31)).unwrap();
        // reopened while the new date is loading
        board.open_conversion(CurrencyCode::USD).unwrap();
        let err = ClientError::Api {
            status: 502,
            message: "upstream down".into(),
        };
        assert!(board.fail(&ticket, &err));
        assert!(board.error().is_some());
        assert!(board.conversion().is_none());
    }

    #[test]
    fn test_today_load_doubles_as_today_snapshot() {
        let mut board = board();
        let ticket = board.select_date(today()).unwrap();
        assert!(!ticket.fetches_today());
        assert!(board.is_loading());

        board.complete(
            &ticket,
            LoadedRates {
                reference: snapshot(today(), dec!(4.00)),
                today: None,
            },
        );
        assert!(!board.is_loading());
        assert!(!board.shows_today());
        assert_eq!(board.today().unwrap().date(), today());
    }

    #[test]
    fn test_past_date_fetches_today_once() {
        let mut board = board();
        let first = board.select_date(ymd(2024, 5, 31)).unwrap();
        assert!(first.fetches_today());
        board.complete(
            &first,
            LoadedRates {
                reference: snapshot(ymd(2024, 5, 31), dec!(3.90)),
                today: Some(snapshot(today(), dec!(4.00))),
            },
        );

        let second = board.select_date(ymd(2024, 5, 30)).unwrap();
        assert!(!second.fetches_today());
    }

    #[test]
    fn test_superseded_load_is_dropped() {
        let mut board = board();
        let slow = board.select_date(ymd(2024, 5, 2)).unwrap();
        let fast = board.select_date(ymd(2024, 5, 3)).unwrap();

        assert!(board.complete(
            &fast,
            LoadedRates {
                reference: snapshot(ymd(2024, 5, 3), dec!(3.95)),
                today: Some(snapshot(today(), dec!(4.00))),
            },
        ));
        assert!(!board.complete(
            &slow,
            LoadedRates {
                reference: snapshot(ymd(2024, 5, 2), dec!(3.80)),
                today: Some(snapshot(today(), dec!(4.00))),
            },
        ));

        assert_eq!(board.date(), ymd(2024, 5, 3));
        assert_eq!(board.reference().unwrap().date(), ymd(2024, 5, 3));
        let err = ClientError::Api {
            status: 500,
            message: "late".into(),
        };
        assert!(!board.fail(&slow, &err));
        assert!(board.error().is_none());
    }

    #[test]
    fn test_out_of_window_selection_keeps_state() {
        let mut board = board();
        load(&mut board, today(), dec!(4.00));
        let generation = board.generation;

        assert!(matches!(
            board.select_date(ymd(2024, 6, 4)),
            Err(DomainError::DateOutOfRange { .. })
        ));
        assert!(matches!(
            board.select_date_str("2024-02-30"),
            Err(DomainError::InvalidDateFormat { .. })
        ));
        assert_eq!(board.generation, generation);
        assert_eq!(board.date(), today());
        assert!(!board.is_loading());
    }

    #[test]
    fn test_failure_is_page_level() {
        let mut board = board();
        load(&mut board, today(), dec!(4.00));

        let ticket = board.select_date(ymd(2024, 5, 31)).unwrap();
        let err = ClientError::Api {
            status: 400,
            message: "Date out of range".into(),
        };
        assert!(board.fail(&ticket, &err));
        assert!(board.rows().is_empty());
        assert_eq!(
            board.error(),
            Some("API error: 400 - Date out of range")
        );

        // a new selection clears the error
        board.select_date(today()).unwrap();
        assert!(board.error().is_none());
    }

    #[test]
    fn test_rows_pair_reference_with_today() {
        let mut board = board();
        load(&mut board, ymd(2024, 5, 31), dec!(3.90));
        assert!(board.shows_today());

        let rows = board.rows();
        let codes: Vec<_> = rows.iter().map(|r| r.rate.code).collect();
        assert_eq!(
            codes,
            vec![CurrencyCode::EUR, CurrencyCode::USD, CurrencyCode::BRL]
        );
        let usd = rows[1];
        assert_eq!(usd.rate.mid(), dec!(3.90));
        assert_eq!(usd.today.unwrap().mid(), dec!(4.00));
    }

    #[test]
    fn test_filter() {
        let mut board = board();
        load(&mut board, today(), dec!(4.00));

        board.set_filter("c");
        assert!(board.rows().is_empty());

        board.set_filter("Us");
        let codes: Vec<_> = board.rows().iter().map(|r| r.rate.code).collect();
        assert_eq!(codes, vec![CurrencyCode::USD]);
    }

    #[test]
    fn test_conversion_uses_today_source_and_reference_targets() {
        let mut board = board();
        load(&mut board, ymd(2024, 5, 31), dec!(3.90));

        let ctx = board.open_conversion(CurrencyCode::USD).unwrap();
        assert_eq!(ctx.source().mid(), dec!(4.00));
        ctx.set_amount("10");
        assert_eq!(ctx.result(), Some(dec!(40.70)));

        ctx.set_target(CurrencyCode::USD).unwrap();
        // today's 4.07 against the selected date's 3.97
        assert_eq!(ctx.multiplier().unwrap(), dec!(1.025189));
    }

    #[test]
    fn test_reopened_conversion_starts_fresh() {
        let mut board = board();
        load(&mut board, today(), dec!(4.00));

        let ctx = board.open_conversion(CurrencyCode::EUR).unwrap();
        ctx.set_operation(Operation::Buy);
        ctx.set_target(CurrencyCode::USD).unwrap();
        ctx.set_amount("50");
        board.close_conversion();
        assert!(board.conversion().is_none());

        let ctx = board.open_conversion(CurrencyCode::BRL).unwrap();
        assert_eq!(ctx.operation(), Operation::Sell);
        assert_eq!(ctx.target(), CurrencyCode::PLN);
        assert_eq!(ctx.amount(), "");
        assert_eq!(ctx.available_operations(), vec![Operation::Sell]);
    }

    #[test]
    fn test_conversion_needs_a_rate() {
        let mut board = board();
        assert_eq!(
            board.open_conversion(CurrencyCode::USD).err(),
            Some(ConversionError::MissingRate(CurrencyCode::USD))
        );

        load(&mut board, today(), dec!(4.00));
        assert_eq!(
            board.open_conversion(CurrencyCode::CZK).err(),
            Some(ConversionError::MissingRate(CurrencyCode::CZK))
        );
    }
}
