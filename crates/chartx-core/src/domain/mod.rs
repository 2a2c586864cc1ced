//! # Domain Models
//!
//! Canonical domain types for chartx price data.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`TradingDate`] | Calendar date (`YYYY-MM-DD`) with weekday helpers |
//! | [`EntityId`] | Ticker or company name, totally ordered |
//! | [`Bar`] | One trading day of OHLCV data |
//! | [`BarRecord`] | Unparsed loader fields for one bar |
//! | [`Series`] | Validated, date-ascending bars of one entity |
//! | [`Timespan`] | Trailing selection presets |
//!
//! ## Validation
//!
//! Bars enforce `high >= low` and `low <= open, close <= high` at
//! construction time. A [`Series`] re-checks every bar and refuses to
//! build if any bar is invalid:
//!
//! ```rust,ignore
//! use chartx_core::{Bar, TradingDate, ValidationError};
//!
//! let day = TradingDate::parse("2024-01-02")?;
//! let bar = Bar::new(day, 10.0, 15.0, 8.0, 12.0, 12.0, 1_000.0)?;
//!
//! let invalid = Bar::new(day, 10.0, 11.0, 8.0, 12.0, 12.0, 1_000.0);
//! assert!(matches!(invalid, Err(ValidationError::OpenCloseAboveHigh)));
//! ```

mod date;
mod entity;
mod models;
mod timespan;

pub use date::TradingDate;
pub use entity::EntityId;
pub use models::{Bar, BarRecord, Series, SeriesSummary};
pub use timespan::Timespan;
