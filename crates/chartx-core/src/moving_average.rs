//! Trailing moving averages of closing prices with per-width memoization.

use std::collections::HashMap;
use std::sync::Arc;

use crate::{EntityId, Series};

/// Trailing mean of `closes` over `width` values, one output per input.
///
/// Runs a single running sum, so the cost is O(n) regardless of `width`.
/// Until `width` closes have been seen, the missing earlier values are taken
/// to be `closes[0]`: the first output is always `closes[0]` and the window
/// fills from a flat start rather than shrinking.
///
/// `width` must be at least 1. An empty input yields an empty output.
pub fn padded_moving_average(closes: &[f64], width: usize) -> Vec<f64> {
    let Some(&first) = closes.first() else {
        return Vec::new();
    };
    let width = width.max(1);
    let divisor = width as f64;

    let mut running_sum = first * divisor;
    closes
        .iter()
        .enumerate()
        .map(|(position, close)| {
            let leaving = if position >= width {
                closes[position - width]
            } else {
                first
            };
            running_sum += close - leaving;
            running_sum / divisor
        })
        .collect()
}

/// Memoizing moving-average calculator.
///
/// Results are keyed by entity id and integer width. A [`Series`] cannot
/// change after construction, so cached values never go stale. Entries are
/// kept for the life of the engine.
#[derive(Debug, Default)]
pub struct MovingAverageEngine {
    memo: HashMap<(EntityId, usize), Arc<[f64]>>,
    computations: usize,
}

impl MovingAverageEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moving average of `series` closes, aligned with its bars.
    ///
    /// Widths below 2 return the raw closes without smoothing. Larger widths
    /// are truncated to an integer before the cache lookup, so `5.0` and
    /// `5.9` share one entry.
    pub fn moving_average(&mut self, series: &Series, width: f64) -> Arc<[f64]> {
        if width.is_nan() || width < 2.0 {
            return Arc::from(series.closes());
        }

        let width = width.floor() as usize;
        let key = (series.id().clone(), width);
        if let Some(cached) = self.memo.get(&key) {
            tracing::trace!(entity = %series.id(), width, "moving average cache hit");
            return Arc::clone(cached);
        }

        let values: Arc<[f64]> = Arc::from(padded_moving_average(&series.closes(), width));
        self.computations += 1;
        tracing::debug!(
            entity = %series.id(),
            width,
            points = values.len(),
            "moving average computed"
        );
        self.memo.insert(key, Arc::clone(&values));
        values
    }

    /// Number of sliding-window passes performed so far.
    pub fn computations(&self) -> usize {
        self.computations
    }

    /// Number of memoized `(entity, width)` entries.
    pub fn cached_entries(&self) -> usize {
        self.memo.len()
    }
}
