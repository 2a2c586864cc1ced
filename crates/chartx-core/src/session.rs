//! Explicit explorer session state.
//!
//! An [`ExplorerSession`] owns everything that lives for one interactive
//! session: the loaded catalog, the [`DateIndex`], the moving-average memo,
//! the pair cache, the current selection, and the set of requested
//! entities. Changing the selection or the requested set marks the session
//! [`EvaluationState::Dirty`] and drops cached correlations and statistics;
//! [`ExplorerSession::evaluate`] brings it back to
//! [`EvaluationState::Evaluated`].

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{
    CoreError, DateIndex, EntityId, Evaluation, Evaluator, MovingAverageEngine, PairStatsCache,
    SelectionWindow, Series, SessionConfig, Timespan, TradingDate,
};

/// Whether the stored evaluation matches the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationState {
    Dirty,
    Evaluated,
}

/// Lowest low and highest high over a set of bars.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub low: f64,
    pub high: f64,
}

/// Single-owner session over an immutable catalog of series.
#[derive(Debug)]
pub struct ExplorerSession {
    catalog: BTreeMap<EntityId, Series>,
    date_index: DateIndex,
    moving_averages: MovingAverageEngine,
    pair_cache: PairStatsCache,
    evaluator: Evaluator,
    selection: Option<SelectionWindow>,
    requested: BTreeSet<EntityId>,
    evaluation: Option<Evaluation>,
    state: EvaluationState,
}

impl Default for ExplorerSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl ExplorerSession {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            catalog: BTreeMap::new(),
            date_index: DateIndex::new(config.origin),
            moving_averages: MovingAverageEngine::new(),
            pair_cache: PairStatsCache::new(),
            evaluator: Evaluator::new(config.edge_tolerance_days),
            selection: None,
            requested: BTreeSet::new(),
            evaluation: None,
            state: EvaluationState::Dirty,
        }
    }

    /// Builds a session over `series`. Ids must be unique.
    pub fn with_series(
        config: SessionConfig,
        series: impl IntoIterator<Item = Series>,
    ) -> Result<Self, CoreError> {
        let mut session = Self::new(config);
        for entry in series {
            session.insert_series(entry)?;
        }
        Ok(session)
    }

    pub fn insert_series(&mut self, series: Series) -> Result<(), CoreError> {
        if self.catalog.contains_key(series.id()) {
            return Err(CoreError::DuplicateEntity {
                id: series.id().clone(),
            });
        }
        self.catalog.insert(series.id().clone(), series);
        Ok(())
    }

    pub fn series(&self, id: &EntityId) -> Option<&Series> {
        self.catalog.get(id)
    }

    /// Loaded series in id order.
    pub fn catalog(&self) -> impl Iterator<Item = &Series> {
        self.catalog.values()
    }

    pub fn date_index(&self) -> &DateIndex {
        &self.date_index
    }

    pub fn index_of(&mut self, date: TradingDate) -> i64 {
        self.date_index.index_of(date)
    }

    pub fn date_of(&mut self, index: i64) -> TradingDate {
        self.date_index.date_of(index)
    }

    /// Overlay values for `id`, aligned with its bars.
    pub fn moving_average(&mut self, id: &EntityId, width: f64) -> Result<Arc<[f64]>, CoreError> {
        let series = self
            .catalog
            .get(id)
            .ok_or_else(|| CoreError::UnknownEntity { id: id.clone() })?;
        Ok(self.moving_averages.moving_average(series, width))
    }

    pub fn moving_average_engine(&self) -> &MovingAverageEngine {
        &self.moving_averages
    }

    pub fn state(&self) -> EvaluationState {
        self.state
    }

    pub fn selection(&self) -> Option<SelectionWindow> {
        self.selection
    }

    pub fn set_selection(&mut self, window: SelectionWindow) {
        self.selection = Some(window);
        self.mark_dirty();
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
        self.mark_dirty();
    }

    /// Selects from `from` to `to` through the session's date index.
    pub fn select_dates(&mut self, from: TradingDate, to: TradingDate) -> SelectionWindow {
        let window = SelectionWindow::new(
            self.date_index.index_of(from) as f64,
            self.date_index.index_of(to) as f64,
        );
        self.set_selection(window);
        window
    }

    /// Selects a trailing span of the requested entities' data.
    ///
    /// The window closes one trading day before the newest requested bar so
    /// that bar can close the statistics slice. [`Timespan::All`] opens at the
    /// oldest requested bar. Returns `None`, leaving the selection untouched,
    /// when nothing is requested.
    pub fn select_trailing(&mut self, timespan: Timespan) -> Option<SelectionWindow> {
        let (oldest, newest) = self.requested_extent()?;
        let right = self.date_index.index_of(newest) - 1;
        let left = match timespan.trading_days() {
            Some(days) => right - days,
            None => self.date_index.index_of(oldest),
        };

        let window = SelectionWindow::new(left as f64, right as f64);
        self.set_selection(window);
        Some(window)
    }

    pub fn requested(&self) -> &BTreeSet<EntityId> {
        &self.requested
    }

    pub fn request(&mut self, id: &EntityId) -> Result<(), CoreError> {
        self.ensure_known(id)?;
        self.requested.insert(id.clone());
        self.mark_dirty();
        Ok(())
    }

    /// Flips `id` in the requested set and returns whether it is now requested.
    pub fn toggle_entity(&mut self, id: &EntityId) -> Result<bool, CoreError> {
        self.ensure_known(id)?;
        let now_requested = if self.requested.remove(id) {
            false
        } else {
            self.requested.insert(id.clone());
            true
        };
        self.mark_dirty();
        Ok(now_requested)
    }

    /// Replaces the requested set. Fails without changes on an unknown id.
    pub fn set_requested<'a>(
        &mut self,
        ids: impl IntoIterator<Item = &'a EntityId>,
    ) -> Result<(), CoreError> {
        let ids: Vec<&EntityId> = ids.into_iter().collect();
        for id in &ids {
            self.ensure_known(id)?;
        }
        self.requested = ids.into_iter().cloned().collect();
        self.mark_dirty();
        Ok(())
    }

    pub fn clear_requested(&mut self) {
        self.requested.clear();
        self.mark_dirty();
    }

    /// Evaluates the current selection over the requested entities.
    ///
    /// While the session is [`EvaluationState::Evaluated`] the stored result
    /// is returned as is.
    pub fn evaluate(&mut self) -> Result<&Evaluation, CoreError> {
        let evaluation = match self.evaluation.take() {
            Some(stored) if self.state == EvaluationState::Evaluated => stored,
            _ => {
                let entities: Vec<&Series> = self
                    .requested
                    .iter()
                    .filter_map(|id| self.catalog.get(id))
                    .collect();
                let fresh = self.evaluator.evaluate(
                    &entities,
                    self.selection,
                    &mut self.date_index,
                    &mut self.pair_cache,
                )?;
                self.state = EvaluationState::Evaluated;
                tracing::debug!(requested = self.requested.len(), "session evaluated");
                fresh
            }
        };

        Ok(self.evaluation.insert(evaluation))
    }

    /// Last evaluation, present only while the session is evaluated.
    pub fn evaluation(&self) -> Option<&Evaluation> {
        self.evaluation.as_ref()
    }

    pub fn pair_cache(&self) -> &PairStatsCache {
        &self.pair_cache
    }

    /// Lowest low and highest high of requested bars dated `from..=to`.
    pub fn price_range(&self, from: TradingDate, to: TradingDate) -> Option<PriceRange> {
        self.requested_series()
            .flat_map(|series| series.bars_between(from, to))
            .fold(None, |range: Option<PriceRange>, bar| {
                Some(match range {
                    Some(range) => PriceRange {
                        low: range.low.min(bar.low),
                        high: range.high.max(bar.high),
                    },
                    None => PriceRange {
                        low: bar.low,
                        high: bar.high,
                    },
                })
            })
    }

    /// Earliest first bar and latest last bar across requested entities.
    pub fn requested_extent(&self) -> Option<(TradingDate, TradingDate)> {
        let oldest = self.requested_series().filter_map(Series::first_date).min()?;
        let newest = self.requested_series().filter_map(Series::last_date).max()?;
        Some((oldest, newest))
    }

    fn requested_series(&self) -> impl Iterator<Item = &Series> {
        self.requested.iter().filter_map(|id| self.catalog.get(id))
    }

    fn ensure_known(&self, id: &EntityId) -> Result<(), CoreError> {
        if !self.catalog.contains_key(id) {
            tracing::warn!(entity = %id, "unknown entity requested");
            return Err(CoreError::UnknownEntity { id: id.clone() });
        }
        Ok(())
    }

    fn mark_dirty(&mut self) {
        if self.state == EvaluationState::Evaluated {
            tracing::debug!("session marked dirty");
        }
        self.pair_cache.clear();
        self.evaluation = None;
        self.state = EvaluationState::Dirty;
    }
}
