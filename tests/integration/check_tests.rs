//! End-to-end checks against real database files

use crate::common::TestFixture;
use repldiff::cli::OutputFormat;
use repldiff::commands::{run_check, CheckOutcome};
use repldiff::RepldiffError;
use std::fs;

const ITEMS: &str = "CREATE TABLE items (id VARCHAR PRIMARY KEY, name VARCHAR); \
                     INSERT INTO items VALUES ('a', 'anvil'), ('b', 'bolt'), ('c', 'crate');";

#[test]
fn test_in_sync_tables() {
    let fixture = TestFixture::new().unwrap();
    fixture.seed_both(ITEMS).unwrap();

    let outcome = run_check(&fixture.config("items")).unwrap();
    assert_eq!(outcome, CheckOutcome::InSync);
}

#[test]
fn test_row_missing_from_replica() {
    let fixture = TestFixture::new().unwrap();
    fixture.seed(&fixture.source_db, ITEMS).unwrap();
    fixture
        .seed(
            &fixture.replica_db,
            "CREATE TABLE items (id VARCHAR PRIMARY KEY, name VARCHAR); \
             INSERT INTO items VALUES ('a', 'anvil'), ('c', 'crate');",
        )
        .unwrap();

    let outcome = run_check(&fixture.config("items")).unwrap();
    assert_eq!(outcome, CheckOutcome::DifferencesFound);
}

#[test]
fn test_extra_row_on_replica() {
    let fixture = TestFixture::new().unwrap();
    fixture
        .seed(
            &fixture.source_db,
            "CREATE TABLE items (id VARCHAR PRIMARY KEY, name VARCHAR); \
             INSERT INTO items VALUES ('a', 'anvil'), ('c', 'crate');",
        )
        .unwrap();
    fixture.seed(&fixture.replica_db, ITEMS).unwrap();

    let outcome = run_check(&fixture.config("items")).unwrap();
    assert_eq!(outcome, CheckOutcome::DifferencesFound);
}

#[test]
fn test_value_drift_is_a_difference() {
    let fixture = TestFixture::new().unwrap();
    fixture.seed(&fixture.source_db, ITEMS).unwrap();
    fixture
        .seed(
            &fixture.replica_db,
            "CREATE TABLE items (id VARCHAR PRIMARY KEY, name VARCHAR); \
             INSERT INTO items VALUES ('a', 'anvil'), ('b', 'brace'), ('c', 'crate');",
        )
        .unwrap();

    let outcome = run_check(&fixture.config("items")).unwrap();
    assert_eq!(outcome, CheckOutcome::DifferencesFound);
}

#[test]
fn test_null_values_stay_in_sync() {
    let fixture = TestFixture::new().unwrap();
    fixture
        .seed_both(
            "CREATE TABLE items (id VARCHAR PRIMARY KEY, name VARCHAR); \
             INSERT INTO items VALUES ('a', NULL), ('b', 'bolt'), ('c', NULL);",
        )
        .unwrap();

    let outcome = run_check(&fixture.config("items")).unwrap();
    assert_eq!(outcome, CheckOutcome::InSync);
}

#[test]
fn test_table_without_unique_key_uses_full_row_order() {
    let fixture = TestFixture::new().unwrap();
    fixture
        .seed_both(
            "CREATE TABLE readings (sensor VARCHAR, value VARCHAR); \
             INSERT INTO readings VALUES ('a', '1'), ('b', '2'), ('b', '3');",
        )
        .unwrap();

    let outcome = run_check(&fixture.config("readings")).unwrap();
    assert_eq!(outcome, CheckOutcome::InSync);
}

#[test]
fn test_unknown_table_is_fatal() {
    let fixture = TestFixture::new().unwrap();
    fixture.seed_both(ITEMS).unwrap();

    let err = run_check(&fixture.config("missing")).unwrap_err();
    assert!(matches!(err, RepldiffError::MetadataNotFound { .. }));
}

#[test]
fn test_report_written_to_output_file() {
    let fixture = TestFixture::new().unwrap();
    fixture.seed(&fixture.source_db, ITEMS).unwrap();
    fixture
        .seed(
            &fixture.replica_db,
            "CREATE TABLE items (id VARCHAR PRIMARY KEY, name VARCHAR); \
             INSERT INTO items VALUES ('a', 'anvil');",
        )
        .unwrap();

    let mut config = fixture.config("items");
    config.output = Some(fixture.report_path());
    let outcome = run_check(&config).unwrap();
    assert_eq!(outcome, CheckOutcome::DifferencesFound);

    let report = fs::read_to_string(fixture.report_path()).unwrap();
    assert!(report.contains("NOT in sync"));
    assert!(report.contains("Rows missing from the replica:"));
    assert!(report.contains("b | bolt"));
    assert!(report.contains("c | crate"));
}

#[test]
fn test_budget_truncates_report() {
    let fixture = TestFixture::new().unwrap();
    fixture.seed(&fixture.source_db, ITEMS).unwrap();
    fixture
        .seed(
            &fixture.replica_db,
            "CREATE TABLE items (id VARCHAR PRIMARY KEY, name VARCHAR);",
        )
        .unwrap();

    let mut config = fixture.config("items");
    config.max_differences = 2;
    config.output = Some(fixture.report_path());
    let outcome = run_check(&config).unwrap();
    assert_eq!(outcome, CheckOutcome::DifferencesFound);

    let report = fs::read_to_string(fixture.report_path()).unwrap();
    assert!(report.contains("Showing the first 2 differences; more may exist."));
    assert!(report.contains("a | anvil"));
    assert!(report.contains("b | bolt"));
    assert!(!report.contains("c | crate"));
}

#[test]
fn test_json_report() {
    let fixture = TestFixture::new().unwrap();
    fixture.seed(&fixture.source_db, ITEMS).unwrap();
    fixture
        .seed(
            &fixture.replica_db,
            "CREATE TABLE items (id VARCHAR PRIMARY KEY, name VARCHAR); \
             INSERT INTO items VALUES ('a', 'anvil'), ('c', 'crate');",
        )
        .unwrap();

    let mut config = fixture.config("items");
    config.format = OutputFormat::Json;
    config.output = Some(fixture.report_path());
    run_check(&config).unwrap();

    let doc: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(fixture.report_path()).unwrap()).unwrap();
    assert_eq!(doc["in_sync"], serde_json::json!(false));
    assert_eq!(doc["differences_shown"], serde_json::json!(1));
    assert_eq!(
        doc["missing_from_replica"],
        serde_json::json!([["b", "bolt"]])
    );
    assert_eq!(doc["missing_from_source"], serde_json::json!([]));
}
