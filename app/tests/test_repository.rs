//! FILENAME: tests/test_repository.rs
//! Integration tests for the committee document repository.

mod common;

use common::{TestHarness, STRANGER};
use dashboard_lib::repository::{query_repository, search_options, unit_options, year_options};
use dashboard_lib::{repository_listing, CommitteeFiles, FilterOption};
use grouping_engine::{DisplayItem, ItemLink, RenderNode};

fn section(label: &str) -> RenderNode {
    RenderNode::Section {
        label: label.to_string(),
    }
}

fn subsection(label: &str) -> RenderNode {
    RenderNode::Subsection {
        label: label.to_string(),
        level: 1,
    }
}

fn link(unit: &str, name: &str) -> RenderNode {
    RenderNode::Item(DisplayItem {
        caption: None,
        links: vec![ItemLink {
            text: name.to_string(),
            key: format!("{}/{}", unit, name),
        }],
    })
}

// ============================================================================
// QUERIES AND OPTIONS
// ============================================================================

#[test]
fn test_query_by_unit_and_year() {
    let harness = TestHarness::with_sample_data();
    let table = &harness.config.tables.repository;

    let all = query_repository(&harness.store, table, "PPC", None).unwrap();
    assert_eq!(all.len(), 3);

    let only_2020 = query_repository(&harness.store, table, "PPC", Some("2020")).unwrap();
    assert_eq!(only_2020.len(), 2);

    // An empty year means every year.
    let blank = query_repository(&harness.store, table, "PPC", Some("")).unwrap();
    assert_eq!(blank.len(), 3);
}

#[test]
fn test_filter_options() {
    let harness = TestHarness::with_sample_data();
    let table = &harness.config.tables.repository;

    let units = unit_options(&harness.store, table).unwrap();
    let values: Vec<&str> = units.iter().map(|o| o.value.as_str()).collect();
    assert_eq!(values, vec!["CED", "EPPC", "PPC"]);

    let years = year_options(&harness.store, table, "PPC").unwrap();
    assert_eq!(
        years,
        vec![
            FilterOption::new("All", ""),
            FilterOption::new("2019/20", "2020"),
            FilterOption::new("2018/19", "2019"),
        ]
    );
}

#[test]
fn test_search_options_order() {
    let harness = TestHarness::with_sample_data();
    let options = search_options(&harness.store, &harness.config.tables.repository, false).unwrap();

    let labels: Vec<&str> = options.iter().map(|o| o.label.as_str()).collect();
    assert_eq!(
        labels,
        vec![
            "PPC - 2020 - Appointments.pdf",
            "PPC - 2020 - Budget.pdf",
            "PPC - 2019 - Agenda.pdf",
            "EPPC - 2020 - Curriculum.docx",
            "CED - 2018 - Report.pdf",
        ]
    );
    assert_eq!(options[0].value, "PPC/Appointments.pdf");
}

// ============================================================================
// LISTINGS
// ============================================================================

#[test]
fn test_listing_by_committee_and_by_year() {
    let harness = TestHarness::with_sample_data();
    let ctx = harness.ctx(STRANGER);

    let listing = repository_listing(&ctx, "PPC", None).unwrap();
    assert_eq!(
        listing.by_committee,
        vec![
            section("PPC"),
            subsection("2019"),
            link("PPC", "Agenda.pdf"),
            subsection("2020"),
            link("PPC", "Budget.pdf"),
            link("PPC", "Appointments.pdf"),
        ]
    );
    assert_eq!(
        listing.by_year,
        vec![
            section("2019"),
            subsection("PPC"),
            link("PPC", "Agenda.pdf"),
            section("2020"),
            subsection("PPC"),
            link("PPC", "Budget.pdf"),
            link("PPC", "Appointments.pdf"),
        ]
    );
    assert!(listing.year.is_none());
}

#[test]
fn test_listing_records_visit() {
    let harness = TestHarness::with_sample_data();
    let ctx = harness.ctx(STRANGER);
    repository_listing(&ctx, "CED", Some("2018")).unwrap();

    let logs = harness.access_logs_for(STRANGER);
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].text("page"), Some("repository"));
}

#[test]
fn test_unknown_unit_is_empty() {
    let harness = TestHarness::with_sample_data();
    let ctx = harness.ctx(STRANGER);
    let listing = repository_listing(&ctx, "NOPE", None).unwrap();
    assert!(listing.by_committee.is_empty());
    assert_eq!(listing.year_options, vec![FilterOption::new("All", "")]);
}

#[test]
fn test_committee_files_trees() {
    let harness = TestHarness::with_sample_data();
    let items = query_repository(&harness.store, &harness.config.tables.repository, "PPC", None).unwrap();
    let files = CommitteeFiles::new(items).unwrap();

    let by_committee = files.tree(dashboard_lib::repository::GroupBy::Committee);
    assert_eq!(by_committee.top_keys(), vec!["PPC"]);
    assert_eq!(by_committee.item_count(), 3);

    let by_year = files.tree(dashboard_lib::repository::GroupBy::Year);
    assert_eq!(by_year.top_keys(), vec!["2019", "2020"]);
}
