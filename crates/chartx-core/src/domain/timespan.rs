use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Trailing selection presets.
///
/// Calendar spans are converted to trading days with a 5/7 weekday ratio,
/// truncated toward zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timespan {
    #[serde(rename = "all")]
    All,
    #[serde(rename = "3y")]
    ThreeYears,
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "3m")]
    ThreeMonths,
    #[serde(rename = "1m")]
    OneMonth,
    #[serde(rename = "1w")]
    OneWeek,
}

impl Timespan {
    pub const ALL: [Self; 6] = [
        Self::All,
        Self::ThreeYears,
        Self::OneYear,
        Self::ThreeMonths,
        Self::OneMonth,
        Self::OneWeek,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::ThreeYears => "3y",
            Self::OneYear => "1y",
            Self::ThreeMonths => "3m",
            Self::OneMonth => "1m",
            Self::OneWeek => "1w",
        }
    }

    /// Number of trading days covered, `None` for an unbounded span.
    pub fn trading_days(self) -> Option<i64> {
        let calendar_days = match self {
            Self::All => return None,
            Self::ThreeYears => 3.0 * 365.0,
            Self::OneYear => 365.0,
            Self::ThreeMonths => 365.0 / 4.0,
            Self::OneMonth => 365.0 / 12.0,
            Self::OneWeek => return Some(5),
        };
        Some((calendar_days * 5.0 / 7.0_f64).floor() as i64)
    }
}

impl Display for Timespan {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timespan {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "3y" => Ok(Self::ThreeYears),
            "1y" => Ok(Self::OneYear),
            "3m" => Ok(Self::ThreeMonths),
            "1m" => Ok(Self::OneMonth),
            "1w" => Ok(Self::OneWeek),
            other => Err(ValidationError::InvalidTimespan {
                value: other.to_owned(),
            }),
        }
    }
}
