//! Correlation and windowed statistics over a user selection.
//!
//! A selection is a pair of fractional trading-day positions. Evaluation
//! maps it to calendar dates through the [`DateIndex`], correlates every
//! pair of requested entities on the midprices they share strictly inside
//! the window, and summarizes each entity's bars between the window edges.
//!
//! Selections are user driven and often transient, so nothing here fails on
//! a bad window: an empty or inverted selection produces an empty
//! [`Evaluation`], and an entity without bars near the window edges reports
//! [`EntityStats::NoData`].

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::stats::{mean, pearson, population_std_dev};
use crate::{CoreError, DateIndex, EntityId, PairStatsCache, Series, TradingDate};

/// Default number of calendar days a boundary bar may sit away from the
/// selection edge (absorbs weekends and market holidays).
pub const DEFAULT_EDGE_TOLERANCE_DAYS: i64 = 4;

/// Ratio converting a trading-day span to calendar days.
const CALENDAR_DAYS_PER_TRADING_DAY: f64 = 7.0 / 5.0;

/// User selection in trading-day index units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectionWindow {
    pub left: f64,
    pub right: f64,
}

impl SelectionWindow {
    pub const fn new(left: f64, right: f64) -> Self {
        Self { left, right }
    }

    /// A window is usable when both edges are finite and `right > left`.
    pub fn is_valid(&self) -> bool {
        self.left.is_finite() && self.right.is_finite() && self.right > self.left
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }
}

/// Summary of one entity's bars inside a selection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowStats {
    /// Open-to-open change per calendar-equivalent day.
    pub average_price_change: f64,
    pub average_volume: f64,
    /// Population standard deviation of `close - open`.
    pub gap_std_dev: f64,
    /// Mean of `|close - open|`.
    pub average_gap: f64,
}

/// Per-entity statistics, or an explicit marker that the window edges are
/// not covered by the entity's data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EntityStats {
    Available(WindowStats),
    NoData,
}

impl EntityStats {
    pub fn as_available(&self) -> Option<&WindowStats> {
        match self {
            Self::Available(stats) => Some(stats),
            Self::NoData => None,
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, Self::NoData)
    }
}

/// Square correlation grid over the requested entities, in id order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub entities: Vec<EntityId>,
    /// `values[i][j]` correlates `entities[i]` with `entities[j]`.
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    fn from_cache(entities: Vec<EntityId>, cache: &PairStatsCache) -> Self {
        let values = entities
            .iter()
            .map(|row| entities.iter().map(|column| cache.get(row, column)).collect())
            .collect();
        Self { entities, values }
    }

    pub fn get(&self, a: &EntityId, b: &EntityId) -> Option<f64> {
        let row = self.entities.iter().position(|id| id == a)?;
        let column = self.entities.iter().position(|id| id == b)?;
        self.values[row][column]
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

/// Result of evaluating one selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub window: Option<SelectionWindow>,
    pub left_date: Option<TradingDate>,
    pub right_date: Option<TradingDate>,
    pub correlations: CorrelationMatrix,
    pub stats: BTreeMap<EntityId, EntityStats>,
    /// Pairs for which a Pearson coefficient was actually computed.
    pub computed_pairs: usize,
}

impl Evaluation {
    pub fn empty(window: Option<SelectionWindow>) -> Self {
        Self {
            window,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.correlations.is_empty() && self.stats.is_empty()
    }
}

/// Computes correlations and per-entity statistics for a selection.
#[derive(Debug, Clone, Copy)]
pub struct Evaluator {
    edge_tolerance_days: i64,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new(DEFAULT_EDGE_TOLERANCE_DAYS)
    }
}

impl Evaluator {
    pub const fn new(edge_tolerance_days: i64) -> Self {
        Self {
            edge_tolerance_days,
        }
    }

    pub const fn edge_tolerance_days(&self) -> i64 {
        self.edge_tolerance_days
    }

    /// Evaluates `window` over `entities`, filling `cache` with any pair
    /// correlation it does not already hold.
    ///
    /// Only [`CoreError::LengthMismatch`] can be returned, and only if the
    /// date join is broken.
    pub fn evaluate(
        &self,
        entities: &[&Series],
        window: Option<SelectionWindow>,
        date_index: &mut DateIndex,
        cache: &mut PairStatsCache,
    ) -> Result<Evaluation, CoreError> {
        let Some(selection) = window.filter(SelectionWindow::is_valid) else {
            return Ok(Evaluation::empty(window));
        };

        let left_date = date_index.date_of(selection.left.floor() as i64);
        let right_date = date_index.date_of(selection.right.ceil() as i64);

        let midprices: Vec<(&EntityId, BTreeMap<TradingDate, f64>)> = entities
            .iter()
            .map(|series| (series.id(), series.midprices_inside(left_date, right_date)))
            .collect();

        let mut computed_pairs = 0;
        for (first_id, first_prices) in &midprices {
            for (second_id, second_prices) in &midprices {
                if first_id == second_id {
                    cache.set(first_id, second_id, 1.0);
                    continue;
                }
                if cache.contains(first_id, second_id) {
                    continue;
                }

                let (xs, ys): (Vec<f64>, Vec<f64>) = first_prices
                    .iter()
                    .filter_map(|(date, x)| second_prices.get(date).map(|y| (*x, *y)))
                    .unzip();
                let r = pearson(&xs, &ys)?;
                cache.set(first_id, second_id, r);
                computed_pairs += 1;
                tracing::trace!(
                    first = %first_id,
                    second = %second_id,
                    samples = xs.len(),
                    r,
                    "pair correlated"
                );
            }
        }

        let stats: BTreeMap<EntityId, EntityStats> = entities
            .iter()
            .map(|series| {
                (
                    series.id().clone(),
                    self.window_stats(series, left_date, right_date),
                )
            })
            .collect();

        let ordered: BTreeSet<EntityId> = entities.iter().map(|series| series.id().clone()).collect();
        let correlations = CorrelationMatrix::from_cache(ordered.into_iter().collect(), cache);

        tracing::debug!(
            entities = entities.len(),
            computed_pairs,
            no_data = stats.values().filter(|entry| entry.is_no_data()).count(),
            left = %left_date,
            right = %right_date,
            "selection evaluated"
        );

        Ok(Evaluation {
            window: Some(selection),
            left_date: Some(left_date),
            right_date: Some(right_date),
            correlations,
            stats,
            computed_pairs,
        })
    }

    /// Statistics over bars from the first one dated on or after `left` up
    /// to, but excluding, the first one dated after `right`.
    ///
    /// Either boundary bar lying more than the edge tolerance away from its
    /// edge yields [`EntityStats::NoData`], as does an empty slice.
    pub fn window_stats(&self, series: &Series, left: TradingDate, right: TradingDate) -> EntityStats {
        let bars = series.bars();

        let Some(first) = series.position_at_or_after(left) else {
            return EntityStats::NoData;
        };
        if left.days_until(bars[first].date) > self.edge_tolerance_days {
            return EntityStats::NoData;
        }

        let Some(last) = series.position_after(right) else {
            return EntityStats::NoData;
        };
        if bars[last].date.days_until(right) > self.edge_tolerance_days {
            return EntityStats::NoData;
        }

        if last <= first {
            return EntityStats::NoData;
        }

        let slice = &bars[first..last];
        let span = (last - first) as f64 * CALENDAR_DAYS_PER_TRADING_DAY;
        let volumes: Vec<f64> = slice.iter().map(|bar| bar.volume).collect();
        let gaps: Vec<f64> = slice.iter().map(|bar| bar.gap()).collect();
        let absolute_gaps: Vec<f64> = gaps.iter().map(|gap| gap.abs()).collect();

        match (
            mean(&volumes),
            population_std_dev(&gaps),
            mean(&absolute_gaps),
        ) {
            (Some(average_volume), Some(gap_std_dev), Some(average_gap)) => {
                EntityStats::Available(WindowStats {
                    average_price_change: (bars[last].open - bars[first].open) / span,
                    average_volume,
                    gap_std_dev,
                    average_gap,
                })
            }
            _ => EntityStats::NoData,
        }
    }
}
