//! Behavior tests for loading price files into a session.

use std::fs;
use std::path::Path;

use chartx_data::{load_dir, DataConfig, LoadError};
use chartx_tests::{date, id, CoreError, ExplorerSession, SessionConfig, ValidationError};

fn write(dir: &Path, name: &str, contents: &str) {
    fs::write(dir.join(name), contents).expect("fixture file is writable");
}

const LABELS: &str = "Date,Open,High,Low,Close,Adj Close,Volume,";

const TECH: &str = "\
Acme,,,,,,,,Globex,,,,,,,
Date,Open,High,Low,Close,Adj Close,Volume,,Date,Open,High,Low,Close,Adj Close,Volume,
2010-01-04,10,11,9,10.5,10.5,100,,2010-01-04,20,21,19,20.5,20.5,200,
2010-01-05,10.5,12,10,11.5,11.5,110,,,,,,,,,
2010-01-06,11.5,12,11,11,11,120,,2010-01-06,20.5,22,20,21.5,21.5,210,
";

#[test]
fn user_loads_a_data_directory_into_a_session() {
    // Given: A data directory with one price file
    let dir = tempfile::tempdir().expect("tempdir");
    write(dir.path(), "tech.csv", TECH);

    // When: The directory is loaded and handed to a session
    let catalog = load_dir(&DataConfig::default().with_data_dir(dir.path())).expect("loads");
    let mut session =
        ExplorerSession::with_series(SessionConfig::default(), catalog.into_series()).expect("unique ids");

    // Then: Both entities are available with their own trading days
    let acme = session.series(&id("Acme")).expect("Acme loaded");
    assert_eq!(acme.len(), 3);
    let globex = session.series(&id("Globex")).expect("Globex loaded");
    assert_eq!(globex.len(), 2);
    assert_eq!(globex.last_date(), Some(date("2010-01-06")));

    // And: The loaded entities can be requested
    session.request(&id("Globex")).expect("known id");
    let range = session
        .price_range(date("2010-01-04"), date("2010-01-06"))
        .expect("bars visible");
    assert_eq!(range.high, 22.0);
}

#[test]
fn corrupt_bar_fails_loading_with_the_file_name() {
    // Given: A file whose second Acme bar has a high below its low
    let dir = tempfile::tempdir().expect("tempdir");
    write(
        dir.path(),
        "broken.csv",
        &format!("Acme\n{LABELS}\n2010-01-04,10,11,9,10,10,1\n2010-01-05,10,8,9,10,10,1\n"),
    );

    // When: The directory is loaded
    let err = load_dir(&DataConfig::default().with_data_dir(dir.path())).expect_err("must fail");

    // Then: The error names the file and the integrity violation
    assert!(matches!(err, LoadError::InFile { .. }));
    assert!(err.to_string().contains("broken.csv"));
    assert!(matches!(
        err.core(),
        Some(CoreError::DataIntegrity {
            source: ValidationError::InvalidBarRange,
            ..
        })
    ));
}

#[test]
fn repeated_entity_within_one_file_loads_as_one_series() {
    // Given: A file that lists Acme twice, each group covering different days
    let dir = tempfile::tempdir().expect("tempdir");
    write(
        dir.path(),
        "split.csv",
        &format!(
            "Acme,,,,,,,,Acme,,,,,,,\n{LABELS}{LABELS}\n\
             2010-01-04,10,11,9,10,10,1,,2010-01-06,11,12,10,11,11,1,\n\
             2010-01-05,10,11,9,10.5,10.5,1,,,,,,,,,\n"
        ),
    );

    // When: The directory is loaded
    let catalog = load_dir(&DataConfig::default().with_data_dir(dir.path())).expect("loads");

    // Then: Both groups feed a single Acme series
    assert_eq!(catalog.len(), 1);
    let acme = &catalog.entities[&id("Acme")];
    assert_eq!(acme.len(), 3);
    assert_eq!(acme.first_date(), Some(date("2010-01-04")));
    assert_eq!(acme.last_date(), Some(date("2010-01-06")));
}

#[test]
fn missing_directory_is_an_io_error() {
    // Given: A path that does not exist
    let dir = tempfile::tempdir().expect("tempdir");
    let config = DataConfig::default().with_data_dir(dir.path().join("absent"));

    // When / Then: Loading fails with an I/O error
    let err = load_dir(&config).expect_err("must fail");
    assert!(matches!(err, LoadError::Io(_)));
}
