//! Behavior tests for the explorer session lifecycle.

use chartx_tests::{
    date, id, series_with_closes, EvaluationState, ExplorerSession, SelectionWindow,
    SessionConfig, Timespan,
};

fn rising(start: f64, count: i32) -> Vec<f64> {
    (0..count).map(|day| start + f64::from(day)).collect()
}

fn session() -> ExplorerSession {
    ExplorerSession::with_series(
        SessionConfig::default(),
        [
            series_with_closes("Acme", "2010-01-04", &rising(10.0, 300)),
            series_with_closes("Globex", "2010-01-04", &rising(50.0, 300)),
            series_with_closes("Initech", "2010-06-01", &rising(5.0, 60)),
        ],
    )
    .expect("unique ids")
}

#[test]
fn re_evaluating_without_changes_reuses_the_result() {
    // Given: A session with two requested entities and a selection
    let mut session = session();
    session
        .set_requested([&id("Acme"), &id("Globex")])
        .expect("known ids");
    session.select_dates(date("2010-02-01"), date("2010-05-28"));

    // When: The selection is evaluated twice
    let first = session.evaluate().expect("evaluates").clone();
    let second = session.evaluate().expect("evaluates").clone();

    // Then: The second call returns the stored evaluation
    assert_eq!(first, second);
    assert_eq!(session.state(), EvaluationState::Evaluated);
    assert_eq!(session.pair_cache().len(), 3);
}

#[test]
fn any_selection_change_invalidates_cached_results() {
    // Given: An evaluated session
    let mut session = session();
    session.set_requested([&id("Acme"), &id("Globex")]).expect("known ids");
    session.set_selection(SelectionWindow::new(20.0, 80.0));
    session.evaluate().expect("evaluates");

    // When: The same selection is set again
    session.set_selection(SelectionWindow::new(20.0, 80.0));

    // Then: The session is dirty and the caches are empty
    assert_eq!(session.state(), EvaluationState::Dirty);
    assert!(session.pair_cache().is_empty());
    assert!(session.evaluation().is_none());

    // When: It is evaluated again
    let evaluation = session.evaluate().expect("evaluates");

    // Then: The pair is computed afresh
    assert_eq!(evaluation.computed_pairs, 1);
}

#[test]
fn requested_set_changes_invalidate_cached_results() {
    // Given: An evaluated session
    let mut session = session();
    session.request(&id("Acme")).expect("known id");
    session.set_selection(SelectionWindow::new(20.0, 80.0));
    session.evaluate().expect("evaluates");

    // When: Another entity is toggled on
    assert!(session.toggle_entity(&id("Globex")).expect("known id"));

    // Then: The next evaluation covers both entities
    assert_eq!(session.state(), EvaluationState::Dirty);
    let evaluation = session.evaluate().expect("evaluates");
    assert_eq!(evaluation.stats.len(), 2);

    // When: Everything is cleared
    session.clear_requested();

    // Then: Evaluation yields nothing
    let evaluation = session.evaluate().expect("evaluates");
    assert!(evaluation.stats.is_empty());
}

#[test]
fn trailing_span_tracks_newest_requested_data() {
    // Given: A session with Acme and the shorter Initech requested
    let mut session = session();
    session
        .set_requested([&id("Acme"), &id("Initech")])
        .expect("known ids");

    // When: The trailing month is selected
    let window = session.select_trailing(Timespan::OneMonth).expect("entities requested");

    // Then: It spans 21 trading days ending just before Acme's last bar
    assert_eq!(window.width(), 21.0);
    let (_, newest) = session.requested_extent().expect("entities requested");
    assert_eq!(session.date_of(window.right as i64 + 1), newest);

    // And: Initech, which stopped trading earlier, has no statistics
    let evaluation = session.evaluate().expect("evaluates");
    assert!(evaluation.stats[&id("Initech")].is_no_data());
    assert!(!evaluation.stats[&id("Acme")].is_no_data());
}

#[test]
fn visible_price_range_spans_requested_entities() {
    // Given: Two requested entities at different price levels
    let mut session = session();
    session
        .set_requested([&id("Acme"), &id("Globex")])
        .expect("known ids");

    // When: The range over the first week is queried
    let range = session
        .price_range(date("2010-01-04"), date("2010-01-08"))
        .expect("bars visible");

    // Then: It runs from Acme's lowest low to Globex's highest high
    assert_eq!(range.low, 9.0);
    assert_eq!(range.high, 55.0);

    // And: A range with no bars reports nothing
    assert_eq!(session.price_range(date("2009-01-05"), date("2009-01-09")), None);
}
