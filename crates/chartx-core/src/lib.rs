//! # Chartx Core
//!
//! Engine for exploring daily price series of many entities side by side.
//!
//! ## Overview
//!
//! - **Trading-day calendar** mapping weekdays to contiguous integer positions
//! - **Moving-average overlays** memoized per entity and width
//! - **Selection evaluation**: pairwise correlations and per-entity window
//!   statistics, with a symmetric cache for pair results
//! - **Explorer session** holding all mutable state behind one owner
//! - **Response envelope** for machine-readable output
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Session settings (calendar origin, edge tolerance) |
//! | [`date_index`] | Lazily grown trading-day calendar |
//! | [`domain`] | Dates, entity ids, bars, series, timespans |
//! | [`envelope`] | Response envelope with metadata |
//! | [`error`] | Core error types |
//! | [`evaluation`] | Correlations and windowed statistics |
//! | [`moving_average`] | Padded trailing moving average |
//! | [`pair_cache`] | Unordered-pair cache |
//! | [`session`] | Explorer session state machine |
//! | [`stats`] | Mean, standard deviation, Pearson correlation |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use chartx_core::{ExplorerSession, SessionConfig, TradingDate};
//!
//! let mut session = ExplorerSession::with_series(SessionConfig::default(), series)?;
//! session.set_requested(session_ids.iter())?;
//! session.select_dates(TradingDate::parse("2012-03-01")?, TradingDate::parse("2012-06-29")?);
//!
//! let evaluation = session.evaluate()?;
//! for (id, stats) in &evaluation.stats {
//!     println!("{id}: {stats:?}");
//! }
//! ```

pub mod config;
pub mod date_index;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod evaluation;
pub mod moving_average;
pub mod pair_cache;
pub mod session;
pub mod stats;

pub use config::SessionConfig;
pub use date_index::{DateIndex, MAX_SPAN_TRADING_DAYS};
pub use domain::{Bar, BarRecord, EntityId, Series, SeriesSummary, Timespan, TradingDate};
pub use envelope::{Envelope, EnvelopeError, EnvelopeMeta, SCHEMA_VERSION};
pub use error::{CoreError, ValidationError};
pub use evaluation::{
    CorrelationMatrix, EntityStats, Evaluation, Evaluator, SelectionWindow, WindowStats,
    DEFAULT_EDGE_TOLERANCE_DAYS,
};
pub use moving_average::{padded_moving_average, MovingAverageEngine};
pub use pair_cache::PairStatsCache;
pub use session::{EvaluationState, ExplorerSession, PriceRange};
