//! RateService unit tests.

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use rates_types::{
        AppError, CurrencyCode, FixedClock, MidRate, MidRateProvider, RateEntry, UpstreamError,
    };

    use crate::RateService;

    /// In-memory mid rate publisher recording every request.
    pub struct MockProvider {
        mids: HashMap<CurrencyCode, Decimal>,
        calls: Mutex<Vec<(CurrencyCode, NaiveDate)>>,
    }

    impl MockProvider {
        pub fn new() -> Self {
            Self {
                mids: HashMap::from([
                    (CurrencyCode::EUR, dec!(4.30)),
                    (CurrencyCode::USD, dec!(4.00)),
                    (CurrencyCode::CZK, dec!(0.18)),
                    (CurrencyCode::IDR, dec!(0.000245)),
                    (CurrencyCode::BRL, dec!(0.76)),
                ]),
                calls: Mutex::new(Vec::new()),
            }
        }

        /// Makes the fetch for `code` fail.
        pub fn without(mut self, code: CurrencyCode) -> Self {
            self.mids.remove(&code);
            self
        }

        /// Publishes a specific mid for `code`.
        pub fn with_mid(mut self, code: CurrencyCode, mid: Decimal) -> Self {
            self.mids.insert(code, mid);
            self
        }

        pub fn calls(&self) -> Vec<(CurrencyCode, NaiveDate)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MidRateProvider for MockProvider {
        async fn fetch_mid(
            &self,
            code: CurrencyCode,
            date: NaiveDate,
        ) -> Result<MidRate, UpstreamError> {
            self.calls.lock().unwrap().push((code, date));
            let mid = self
                .mids
                .get(&code)
                .copied()
                .ok_or(UpstreamError::Status { code, status: 404 })?;
            Ok(MidRate {
                code,
                currency: code.display_name().to_string(),
                mid,
            })
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()
    }

    fn service(provider: MockProvider) -> RateService<MockProvider> {
        RateService::new(provider, NaiveDate::from_ymd_opt(2023, 1, 1).unwrap())
            .with_clock(FixedClock(today()))
    }

    #[tokio::test]
    async fn test_snapshot_has_every_supported_currency_in_order() {
        let service = service(MockProvider::new());
        let snapshot = service.exchange_rates(Some("2024-05-31")).await.unwrap();

        let codes: Vec<_> = snapshot.entries().iter().map(|(c, _)| c).collect();
        assert_eq!(codes, CurrencyCode::supported());
        assert_eq!(snapshot.date(), NaiveDate::from_ymd_opt(2024, 5, 31).unwrap());

        let usd = snapshot.rate(CurrencyCode::USD).unwrap();
        assert_eq!(usd.purchase(), Some(dec!(3.95)));
        assert_eq!(usd.selling(), dec!(4.07));

        let czk = snapshot.rate(CurrencyCode::CZK).unwrap();
        assert_eq!(czk.purchase(), None);
        assert_eq!(czk.selling(), dec!(0.33));
    }

    #[tokio::test]
    async fn test_missing_date_uses_clock() {
        let service = service(MockProvider::new());
        let snapshot = service.exchange_rates(None).await.unwrap();

        assert_eq!(snapshot.date(), today());
        assert!(
            service
                .provider()
                .calls()
                .iter()
                .all(|(_, date)| *date == today())
        );
    }

    #[tokio::test]
    async fn test_partial_failure_keeps_other_currencies() {
        let service = service(MockProvider::new().without(CurrencyCode::CZK));
        let snapshot = service.exchange_rates(Some("2024-06-03")).await.unwrap();

        assert_eq!(snapshot.entries().len(), 5);
        assert_eq!(
            snapshot.entries().get(CurrencyCode::CZK),
            Some(&RateEntry::failed(CurrencyCode::CZK))
        );
        assert_eq!(snapshot.failed(), vec![CurrencyCode::CZK]);
        assert_eq!(snapshot.rates().count(), 4);
    }

    #[tokio::test]
    async fn test_non_positive_mid_becomes_error_entry() {
        let service = service(MockProvider::new().with_mid(CurrencyCode::BRL, Decimal::ZERO));
        let snapshot = service.exchange_rates(None).await.unwrap();

        assert!(snapshot.entries().get(CurrencyCode::BRL).unwrap().is_error());
        assert!(snapshot.rate(CurrencyCode::EUR).is_some());
    }

    #[tokio::test]
    async fn test_invalid_date_rejected_before_fetching() {
        let service = service(MockProvider::new());

        for bad in ["2024-02-30", "2024/02/29", "invalid-date", ""] {
            let result = service.exchange_rates(Some(bad)).await;
            assert!(
                matches!(result, Err(AppError::BadRequest(ref m)) if m == "Invalid date format"),
                "{bad} should be rejected"
            );
        }
        assert!(service.provider().calls().is_empty());
    }

    #[tokio::test]
    async fn test_out_of_range_dates_rejected() {
        let service = service(MockProvider::new());

        for bad in ["2024-06-04", "2022-12-31"] {
            let result = service.exchange_rates(Some(bad)).await;
            assert!(matches!(result, Err(AppError::BadRequest(ref m)) if m == "Date out of range"));
        }
        assert!(service.provider().calls().is_empty());
    }

    #[tokio::test]
    async fn test_leap_day_is_accepted() {
        let service = service(MockProvider::new());
        let snapshot = service.exchange_rates(Some("2024-02-29")).await.unwrap();
        assert_eq!(snapshot.date(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }
}
