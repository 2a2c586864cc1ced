use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::format_description::well_known::Iso8601;
use time::{Date, Month, Weekday};

use crate::ValidationError;

/// Calendar date without time of day, formatted as `YYYY-MM-DD`.
///
/// Any calendar day is representable, including weekends. Trading-day
/// semantics (weekend snapping, dense indices) live in
/// [`DateIndex`](crate::DateIndex).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TradingDate(Date);

impl TradingDate {
    pub fn new(year: i32, month: u8, day: u8) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidDate {
            value: format!("{year:04}-{month:02}-{day:02}"),
        };
        let month = Month::try_from(month).map_err(|_| invalid())?;
        Date::from_calendar_date(year, month, day)
            .map(Self)
            .map_err(|_| invalid())
    }

    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        let invalid = || ValidationError::InvalidDate {
            value: input.to_owned(),
        };

        // ISO 8601 also admits week and ordinal dates; only the extended
        // calendar form is accepted here.
        let bytes = trimmed.as_bytes();
        if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
            return Err(invalid());
        }

        Date::parse(trimmed, &Iso8601::DATE)
            .map(Self)
            .map_err(|_| invalid())
    }

    pub const fn from_date(date: Date) -> Self {
        Self(date)
    }

    pub fn year(self) -> i32 {
        self.0.year()
    }

    pub fn weekday(self) -> Weekday {
        self.0.weekday()
    }

    pub fn is_weekend(self) -> bool {
        matches!(self.weekday(), Weekday::Saturday | Weekday::Sunday)
    }

    /// Seconds since the Unix epoch at UTC midnight of this date.
    pub fn posix_timestamp(self) -> i64 {
        self.0.midnight().assume_utc().unix_timestamp()
    }

    pub fn next_day(self) -> Option<Self> {
        self.0.next_day().map(Self)
    }

    pub fn previous_day(self) -> Option<Self> {
        self.0.previous_day().map(Self)
    }

    /// First weekday strictly after `self`.
    pub fn next_trading_day(self) -> Option<Self> {
        let mut date = self.next_day()?;
        while date.is_weekend() {
            date = date.next_day()?;
        }
        Some(date)
    }

    /// Last weekday strictly before `self`.
    pub fn previous_trading_day(self) -> Option<Self> {
        let mut date = self.previous_day()?;
        while date.is_weekend() {
            date = date.previous_day()?;
        }
        Some(date)
    }

    /// `self` when it is a weekday, otherwise the following Monday.
    pub fn snap_forward(self) -> Self {
        let mut date = self;
        while date.is_weekend() {
            match date.next_day() {
                Some(next) => date = next,
                None => break,
            }
        }
        date
    }

    /// Signed number of calendar days from `self` to `other`.
    pub fn days_until(self, other: Self) -> i64 {
        (other.0 - self.0).whole_days()
    }
}

impl Display for TradingDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}",
            self.0.year(),
            u8::from(self.0.month()),
            self.0.day()
        )
    }
}

impl FromStr for TradingDate {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl From<Date> for TradingDate {
    fn from(value: Date) -> Self {
        Self(value)
    }
}

impl Serialize for TradingDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TradingDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(input: &str) -> TradingDate {
        TradingDate::parse(input).expect("valid date")
    }

    #[test]
    fn parses_and_formats_calendar_date() {
        let parsed = date("2024-03-05");
        assert_eq!(parsed.to_string(), "2024-03-05");
        assert_eq!(parsed, TradingDate::new(2024, 3, 5).expect("valid"));
    }

    #[test]
    fn rejects_non_calendar_forms() {
        for input in ["2024-W10-2", "20240305", "2024-3-5", "2024-02-30", ""] {
            let err = TradingDate::parse(input).expect_err("must fail");
            assert!(matches!(err, ValidationError::InvalidDate { .. }), "{input}");
        }
    }

    #[test]
    fn detects_weekends() {
        assert!(date("2024-03-09").is_weekend());
        assert!(date("2024-03-10").is_weekend());
        assert!(!date("2024-03-11").is_weekend());
    }

    #[test]
    fn snaps_weekends_to_monday() {
        assert_eq!(date("2024-03-09").snap_forward(), date("2024-03-11"));
        assert_eq!(date("2024-03-10").snap_forward(), date("2024-03-11"));
        assert_eq!(date("2024-03-08").snap_forward(), date("2024-03-08"));
    }

    #[test]
    fn steps_over_weekends() {
        assert_eq!(date("2024-03-08").next_trading_day(), Some(date("2024-03-11")));
        assert_eq!(
            date("2024-03-11").previous_trading_day(),
            Some(date("2024-03-08"))
        );
    }

    #[test]
    fn posix_timestamp_is_utc_midnight() {
        assert_eq!(date("1970-01-02").posix_timestamp(), 86_400);
        assert_eq!(date("2010-01-01").posix_timestamp(), 1_262_304_000);
    }

    #[test]
    fn counts_signed_calendar_days() {
        assert_eq!(date("2024-01-01").days_until(date("2024-01-05")), 4);
        assert_eq!(date("2024-01-05").days_until(date("2024-01-01")), -4);
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_string(&date("2021-07-04")).expect("serialize");
        assert_eq!(json, "\"2021-07-04\"");
        let back: TradingDate = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, date("2021-07-04"));
    }
}
