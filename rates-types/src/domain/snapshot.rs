//! Rate snapshots: every supported currency for one date.

use std::fmt;

use chrono::NaiveDate;
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use exchange_rates::CurrencyCode;

use super::rate::{CurrencyRate, RateEntry};

/// Entries keyed by currency code, in insertion order.
///
/// Serializes as a JSON object (`{"EUR": {...}, "USD": {...}}`) and keeps the
/// order of the keys in both directions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RateEntries(Vec<(CurrencyCode, RateEntry)>);

impl RateEntries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the entry for `code`.
    pub fn insert(&mut self, code: CurrencyCode, entry: RateEntry) {
        match self.0.iter_mut().find(|(c, _)| *c == code) {
            Some(slot) => slot.1 = entry,
            None => self.0.push((code, entry)),
        }
    }

    pub fn get(&self, code: CurrencyCode) -> Option<&RateEntry> {
        self.0.iter().find(|(c, _)| *c == code).map(|(_, e)| e)
    }

    pub fn iter(&self) -> impl Iterator<Item = (CurrencyCode, &RateEntry)> {
        self.0.iter().map(|(c, e)| (*c, e))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(CurrencyCode, RateEntry)> for RateEntries {
    fn from_iter<I: IntoIterator<Item = (CurrencyCode, RateEntry)>>(iter: I) -> Self {
        let mut entries = RateEntries::new();
        for (code, entry) in iter {
            entries.insert(code, entry);
        }
        entries
    }
}

impl Serialize for RateEntries {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (code, entry) in &self.0 {
            map.serialize_entry(code.code(), entry)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for RateEntries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = RateEntries;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of currency codes to rate entries")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = RateEntries::new();
                while let Some((key, entry)) = access.next_entry::<String, RateEntry>()? {
                    let code = key.parse::<CurrencyCode>().map_err(de::Error::custom)?;
                    entries.insert(code, entry);
                }
                Ok(entries)
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

/// All rate entries published for one date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateSnapshot {
    date: NaiveDate,
    entries: RateEntries,
}

impl RateSnapshot {
    pub fn new(date: NaiveDate, entries: RateEntries) -> Self {
        Self { date, entries }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn entries(&self) -> &RateEntries {
        &self.entries
    }

    pub fn into_entries(self) -> RateEntries {
        self.entries
    }

    /// Successfully fetched rate for `code`.
    pub fn rate(&self, code: CurrencyCode) -> Option<&CurrencyRate> {
        self.entries.get(code).and_then(RateEntry::as_rate)
    }

    /// Every successfully fetched rate, in snapshot order.
    pub fn rates(&self) -> impl Iterator<Item = &CurrencyRate> {
        self.entries.iter().filter_map(|(_, e)| e.as_rate())
    }

    /// Codes whose fetch failed.
    pub fn failed(&self) -> Vec<CurrencyCode> {
        self.entries
            .iter()
            .filter(|(_, e)| e.is_error())
            .map(|(c, _)| c)
            .collect()
    }

    /// Rates whose code contains `filter`, ignoring case. Failed entries are
    /// never returned.
    pub fn matching(&self, filter: &str) -> Vec<&CurrencyRate> {
        let needle = filter.to_lowercase();
        self.rates()
            .filter(|rate| rate.code.code().to_lowercase().contains(&needle))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn snapshot() -> RateSnapshot {
        let date = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        let entries = [
            (
                CurrencyCode::USD,
                CurrencyRate::derive(CurrencyCode::USD, "dolar amerykański", dec!(4.00))
                    .unwrap()
                    .into(),
            ),
            (CurrencyCode::CZK, RateEntry::failed(CurrencyCode::CZK)),
            (
                CurrencyCode::BRL,
                CurrencyRate::derive(CurrencyCode::BRL, "real (Brazylia)", dec!(0.76))
                    .unwrap()
                    .into(),
            ),
        ]
        .into_iter()
        .collect();
        RateSnapshot::new(date, entries)
    }

    #[test]
    fn test_filter_excludes_failed_entries() {
        let snapshot = snapshot();
        // "c" matches CZK lexically, but CZK has no data
        let codes: Vec<_> = snapshot.matching("c").iter().map(|r| r.code).collect();
        assert!(codes.is_empty());
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let snapshot = snapshot();
        let codes: Vec<_> = snapshot.matching("uS").iter().map(|r| r.code).collect();
        assert_eq!(codes, vec![CurrencyCode::USD]);
    }

    #[test]
    fn test_empty_filter_keeps_order() {
        let snapshot = snapshot();
        let codes: Vec<_> = snapshot.matching("").iter().map(|r| r.code).collect();
        assert_eq!(codes, vec![CurrencyCode::USD, CurrencyCode::BRL]);
        assert_eq!(snapshot.failed(), vec![CurrencyCode::CZK]);
    }

    #[test]
    fn test_entries_keep_key_order_on_the_wire() {
        let snapshot = snapshot();
        let json = serde_json::to_string(snapshot.entries()).unwrap();
        let usd = json.find("\"USD\"").unwrap();
        let czk = json.find("\"CZK\"").unwrap();
        let brl = json.find("\"BRL\"").unwrap();
        assert!(usd < czk && czk < brl);

        let back: RateEntries = serde_json::from_str(&json).unwrap();
        assert_eq!(&back, snapshot.entries());
    }

    #[test]
    fn test_unknown_code_is_rejected() {
        let result = serde_json::from_str::<RateEntries>(r#"{"XYZ":{"error":"nope"}}"#);
        assert!(result.is_err());
    }
}
