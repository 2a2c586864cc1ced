use time::{Date, Month};

use crate::evaluation::DEFAULT_EDGE_TOLERANCE_DAYS;
use crate::TradingDate;

const DEFAULT_ORIGIN: Date = match Date::from_calendar_date(2010, Month::January, 1) {
    Ok(date) => date,
    Err(_) => panic!("default origin must be a valid calendar date"),
};

/// Settings fixed for the lifetime of an [`ExplorerSession`](crate::ExplorerSession).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Calendar date assigned trading-day index `0`.
    pub origin: TradingDate,
    /// Calendar days a boundary bar may sit away from a selection edge.
    pub edge_tolerance_days: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            origin: TradingDate::from_date(DEFAULT_ORIGIN),
            edge_tolerance_days: DEFAULT_EDGE_TOLERANCE_DAYS,
        }
    }
}

impl SessionConfig {
    pub fn with_origin(mut self, origin: TradingDate) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_edge_tolerance_days(mut self, days: i64) -> Self {
        self.edge_tolerance_days = days;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_origin_is_first_trading_day_of_2010() {
        let config = SessionConfig::default();
        assert_eq!(config.origin.to_string(), "2010-01-01");
        assert!(!config.origin.is_weekend());
        assert_eq!(config.edge_tolerance_days, 4);
    }
}
