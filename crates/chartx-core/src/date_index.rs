//! Dense, weekend-free coordinates for calendar dates.
//!
//! Index `0` is the session origin; every weekday after it gets the next
//! integer and every weekday before it the previous one. Saturdays and
//! Sundays never receive an index, so a time axis drawn in index units has
//! no weekend gaps.
//!
//! The mapping is materialized lazily. Queries outside the known range walk
//! outward one trading day at a time and record every day they pass, so each
//! day is visited at most once per session and nothing is ever recomputed or
//! evicted. Growth stops [`MAX_SPAN_TRADING_DAYS`] away from the origin in
//! either direction; queries beyond that clamp to the last reachable day.

use std::collections::BTreeMap;

use crate::TradingDate;

/// Furthest index from the origin the map will materialize, about 250 years.
pub const MAX_SPAN_TRADING_DAYS: i64 = 65_000;

/// Bidirectional map between calendar dates and trading-day indices.
#[derive(Debug, Clone)]
pub struct DateIndex {
    origin: TradingDate,
    date_to_index: BTreeMap<TradingDate, i64>,
    index_to_date: BTreeMap<i64, TradingDate>,
    oldest: TradingDate,
    newest: TradingDate,
    oldest_index: i64,
    newest_index: i64,
}

impl DateIndex {
    /// Creates an index whose `0` is `origin`, moved forward to Monday if it
    /// falls on a weekend.
    pub fn new(origin: TradingDate) -> Self {
        let origin = origin.snap_forward();
        Self {
            origin,
            date_to_index: BTreeMap::from([(origin, 0)]),
            index_to_date: BTreeMap::from([(0, origin)]),
            oldest: origin,
            newest: origin,
            oldest_index: 0,
            newest_index: 0,
        }
    }

    pub fn origin(&self) -> TradingDate {
        self.origin
    }

    /// Oldest materialized trading day.
    pub fn oldest(&self) -> TradingDate {
        self.oldest
    }

    /// Newest materialized trading day.
    pub fn newest(&self) -> TradingDate {
        self.newest
    }

    /// Number of materialized trading days.
    pub fn len(&self) -> usize {
        self.date_to_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.date_to_index.is_empty()
    }

    /// Trading-day index of `date`. Weekends resolve to the following Monday.
    ///
    /// Dates past the span limit resolve to the index at the limit.
    pub fn index_of(&mut self, date: TradingDate) -> i64 {
        let target = date.snap_forward();
        if target > self.newest {
            self.grow_forward(|newest, _| newest < target);
        } else if target < self.oldest {
            self.grow_backward(|oldest, _| oldest > target);
        }

        match self.date_to_index.get(&target) {
            Some(index) => *index,
            None if target > self.newest => self.newest_index,
            None => self.oldest_index,
        }
    }

    /// Calendar date of trading-day `index`, clamped to the span limit.
    pub fn date_of(&mut self, index: i64) -> TradingDate {
        let index = index.clamp(-MAX_SPAN_TRADING_DAYS, MAX_SPAN_TRADING_DAYS);
        if index > self.newest_index {
            self.grow_forward(|_, newest_index| newest_index < index);
        } else if index < self.oldest_index {
            self.grow_backward(|_, oldest_index| oldest_index > index);
        }

        match self.index_to_date.get(&index) {
            Some(date) => *date,
            None if index > self.newest_index => self.newest,
            None => self.oldest,
        }
    }

    /// Index of `date` if it is already materialized. Never grows the map.
    pub fn peek_index(&self, date: TradingDate) -> Option<i64> {
        self.date_to_index.get(&date).copied()
    }

    /// Date of `index` if it is already materialized. Never grows the map.
    pub fn peek_date(&self, index: i64) -> Option<TradingDate> {
        self.index_to_date.get(&index).copied()
    }

    fn grow_forward(&mut self, mut keep_going: impl FnMut(TradingDate, i64) -> bool) {
        let mut added = 0_usize;
        while self.newest_index < MAX_SPAN_TRADING_DAYS && keep_going(self.newest, self.newest_index) {
            let Some(next) = self.newest.next_trading_day() else {
                break;
            };
            self.newest = next;
            self.newest_index += 1;
            self.date_to_index.insert(next, self.newest_index);
            self.index_to_date.insert(self.newest_index, next);
            added += 1;
        }

        if added > 0 {
            tracing::trace!(
                added,
                newest = %self.newest,
                newest_index = self.newest_index,
                "date index grew forward"
            );
        }
    }

    fn grow_backward(&mut self, mut keep_going: impl FnMut(TradingDate, i64) -> bool) {
        let mut added = 0_usize;
        while self.oldest_index > -MAX_SPAN_TRADING_DAYS && keep_going(self.oldest, self.oldest_index) {
            let Some(previous) = self.oldest.previous_trading_day() else {
                break;
            };
            self.oldest = previous;
            self.oldest_index -= 1;
            self.date_to_index.insert(previous, self.oldest_index);
            self.index_to_date.insert(self.oldest_index, previous);
            added += 1;
        }

        if added > 0 {
            tracing::trace!(
                added,
                oldest = %self.oldest,
                oldest_index = self.oldest_index,
                "date index grew backward"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(input: &str) -> TradingDate {
        TradingDate::parse(input).expect("valid date")
    }

    // 2010-01-01 is a Friday.
    fn index() -> DateIndex {
        DateIndex::new(date("2010-01-01"))
    }

    #[test]
    fn origin_is_index_zero() {
        let mut index = index();
        assert_eq!(index.index_of(date("2010-01-01")), 0);
        assert_eq!(index.date_of(0), date("2010-01-01"));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn weekend_origin_moves_to_monday() {
        let mut index = DateIndex::new(date("2010-01-02"));
        assert_eq!(index.origin(), date("2010-01-04"));
        assert_eq!(index.index_of(date("2010-01-03")), 0);
    }

    #[test]
    fn skips_weekends_going_forward() {
        let mut index = index();
        assert_eq!(index.index_of(date("2010-01-04")), 1);
        assert_eq!(index.index_of(date("2010-01-08")), 5);
        assert_eq!(index.index_of(date("2010-01-11")), 6);
    }

    #[test]
    fn skips_weekends_going_backward() {
        let mut index = index();
        assert_eq!(index.index_of(date("2009-12-31")), -1);
        assert_eq!(index.index_of(date("2009-12-28")), -4);
        assert_eq!(index.index_of(date("2009-12-25")), -5);
        assert_eq!(index.oldest(), date("2009-12-25"));
    }

    #[test]
    fn weekends_snap_to_following_monday() {
        let mut index = index();
        let monday = index.index_of(date("2010-01-11"));
        assert_eq!(index.index_of(date("2010-01-09")), monday);
        assert_eq!(index.index_of(date("2010-01-10")), monday);

        // Same rule below the origin, where the walk runs backward.
        let earlier_monday = index.index_of(date("2009-12-21"));
        assert_eq!(index.index_of(date("2009-12-19")), earlier_monday);
        assert_eq!(index.index_of(date("2009-12-20")), earlier_monday);
    }

    #[test]
    fn date_of_grows_in_both_directions() {
        let mut index = index();
        assert_eq!(index.date_of(6), date("2010-01-11"));
        assert_eq!(index.date_of(-5), date("2009-12-25"));
        assert_eq!(index.newest(), date("2010-01-11"));
        assert_eq!(index.oldest(), date("2009-12-25"));
        assert_eq!(index.len(), 12);
    }

    #[test]
    fn round_trips_trading_days() {
        let mut index = index();
        let mut day = date("2009-06-01");
        while day < date("2011-06-01") {
            if !day.is_weekend() {
                let position = index.index_of(day);
                assert_eq!(index.date_of(position), day);
            }
            day = day.next_day().expect("in range");
        }
    }

    #[test]
    fn indices_increase_with_trading_days() {
        let mut index = index();
        let mut previous = index.index_of(date("2008-01-01"));
        let mut day = date("2008-01-02");
        while day < date("2012-01-01") {
            if !day.is_weekend() {
                let current = index.index_of(day);
                assert_eq!(current, previous + 1, "{day}");
                previous = current;
            }
            day = day.next_day().expect("in range");
        }
    }

    #[test]
    fn materialized_entries_are_never_rewritten() {
        let mut index = index();
        let before = index.index_of(date("2010-03-01"));
        let len = index.len();

        index.index_of(date("2012-03-01"));
        index.index_of(date("2008-03-03"));

        assert!(index.len() > len);
        assert_eq!(index.peek_index(date("2010-03-01")), Some(before));
        assert_eq!(index.index_of(date("2010-03-01")), before);
    }

    #[test]
    fn extreme_indices_stop_at_the_span_limit() {
        let mut index = index();

        let far_future = index.date_of(i64::MAX);
        let far_past = index.date_of(i64::MIN);

        assert_eq!(index.index_of(far_future), MAX_SPAN_TRADING_DAYS);
        assert_eq!(index.index_of(far_past), -MAX_SPAN_TRADING_DAYS);
        assert_eq!(index.len() as i64, 2 * MAX_SPAN_TRADING_DAYS + 1);
    }

    #[test]
    fn dates_beyond_the_limit_clamp_without_growing() {
        let mut index = index();
        let limit = index.index_of(date("9999-12-31"));
        assert_eq!(limit, MAX_SPAN_TRADING_DAYS);
        assert!(index.newest() < date("2300-01-01"));

        let len = index.len();
        assert_eq!(index.index_of(date("9000-01-01")), MAX_SPAN_TRADING_DAYS);
        assert_eq!(index.len(), len);
    }

    #[test]
    fn peeking_does_not_grow() {
        let index = index();
        assert_eq!(index.peek_index(date("2010-01-04")), None);
        assert_eq!(index.peek_date(1), None);
        assert_eq!(index.len(), 1);
    }
}
