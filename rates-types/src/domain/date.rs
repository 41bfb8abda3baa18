//! Calendar date validation for rate requests.

use chrono::NaiveDate;

use crate::error::DomainError;

/// Wire format of every date in the API.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a `YYYY-MM-DD` date.
///
/// The input must format back to exactly the same string, which rejects
/// impossible calendar dates as well as unpadded or otherwise loose input.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input, DATE_FORMAT)
        .ok()
        .filter(|date| format_date(*date) == input)
}

pub fn is_valid_date(input: &str) -> bool {
    parse_date(input).is_some()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Inclusive range of dates rates can be requested for.
///
/// `as_of` is "today" as captured once by the caller; nothing in here reads
/// the system clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    floor: NaiveDate,
    as_of: NaiveDate,
}

impl DateWindow {
    pub fn new(floor: NaiveDate, as_of: NaiveDate) -> Self {
        Self { floor, as_of }
    }

    /// First date of the board (2023-01-01).
    pub fn default_floor() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn floor(&self) -> NaiveDate {
        self.floor
    }

    pub fn as_of(&self) -> NaiveDate {
        self.as_of
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.floor && date <= self.as_of
    }

    /// Rejects dates before the floor or after `as_of`.
    pub fn check(&self, date: NaiveDate) -> Result<NaiveDate, DomainError> {
        if self.contains(date) {
            Ok(date)
        } else {
            Err(DomainError::DateOutOfRange {
                date,
                floor: self.floor,
                as_of: self.as_of,
            })
        }
    }

    /// Resolves an optional raw date: absent means `as_of`.
    pub fn resolve(&self, raw: Option<&str>) -> Result<NaiveDate, DomainError> {
        match raw {
            None => Ok(self.as_of),
            Some(raw) => {
                let date = parse_date(raw).ok_or_else(|| DomainError::InvalidDateFormat {
                    input: raw.to_string(),
                })?;
                self.check(date)
            }
        }
    }
}
