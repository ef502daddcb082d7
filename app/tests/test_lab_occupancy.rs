//! FILENAME: tests/test_lab_occupancy.rs
//! Integration tests for lab occupancy submissions.

mod common;

use common::{TestHarness, ADMIN, LAB_USER, STRANGER};
use dashboard_lib::lab_occupancy::lab_occupancy_page;
use dashboard_lib::{record_submission, user_records, DashboardError, SubmissionOutcome};
use records::{FieldValue, Record};
use serde_json::json;
use store::{DocumentStore, Query};

fn entry(timestamp: &str) -> Record {
    Record::new()
        .with("uni", LAB_USER)
        .with("timestamp", timestamp)
        .with("action", "Sign in")
        .with("room", "Schermerhorn 901")
}

#[test]
fn test_submission_is_stored() {
    let harness = TestHarness::new();
    let table = &harness.config.tables.lab_occupancy;
    let body = json!({
        "Destination": "My Lab",
        "RoomByPI": [{"Label": "Schermerhorn 901"}],
        "Entry": {"Timestamp": "2020-07-01T09:15:00"},
        "UNI": LAB_USER,
        "Action": "Sign in"
    });

    let outcome = record_submission(&harness.store, table, &body).unwrap();
    assert_eq!(outcome, SubmissionOutcome::Success);

    let records = user_records(&harness.store, table, LAB_USER, "2020-06-21").unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].text("room"), Some("Schermerhorn 901"));
}

#[test]
fn test_broken_submission_leaves_marker() {
    let harness = TestHarness::new();
    let table = &harness.config.tables.lab_occupancy;
    let body = json!({"Destination": "another lab", "UNI": LAB_USER});

    let outcome = record_submission(&harness.store, table, &body).unwrap();
    assert_eq!(outcome, SubmissionOutcome::Failure);

    let markers = harness.store.query(table, &Query::partition("key error")).unwrap();
    assert_eq!(markers.len(), 1);
    assert!(markers[0].text("timestamp").is_some());
}

#[test]
fn test_unknown_destination_fails_without_marker() {
    let harness = TestHarness::new();
    let table = &harness.config.tables.lab_occupancy;
    let body = json!({"Destination": "Library", "UNI": LAB_USER});

    let outcome = record_submission(&harness.store, table, &body).unwrap();
    assert_eq!(outcome, SubmissionOutcome::Failure);
    assert!(harness.store.scan(table).unwrap().is_empty());
}

#[test]
fn test_records_newest_first_from_start_date() {
    let harness = TestHarness::with_sample_data();
    let table = &harness.config.tables.lab_occupancy;
    for timestamp in ["2020-06-01T08:00:00", "2020-07-01T09:00:00", "2020-07-02T10:00:00"] {
        harness.put(table, entry(timestamp));
    }

    let records = user_records(&harness.store, table, LAB_USER, "2020-06-21").unwrap();
    let timestamps: Vec<&str> = records.iter().filter_map(|r| r.text("timestamp")).collect();
    assert_eq!(timestamps, vec!["2020-07-02T10:00:00", "2020-07-01T09:00:00"]);

    let page = lab_occupancy_page(&harness.ctx(LAB_USER)).unwrap();
    assert_eq!(page.records.len(), 2);
    assert_eq!(page.form_url.as_deref(), Some("https://forms.example.edu/lab"));
}

#[test]
fn test_page_requires_role() {
    let harness = TestHarness::with_sample_data();
    assert!(matches!(
        lab_occupancy_page(&harness.ctx(STRANGER)),
        Err(DashboardError::Forbidden(_))
    ));

    let denied = harness.access_logs_for(STRANGER);
    assert_eq!(denied.len(), 1);
    assert_eq!(denied[0].display_value("page"), "lab_occupancy");
    assert_eq!(denied[0].get("has_access"), Some(&FieldValue::Bool(false)));

    assert!(lab_occupancy_page(&harness.ctx(ADMIN)).is_ok());
}
