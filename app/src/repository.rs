//! FILENAME: app/src/repository.rs
// PURPOSE: Committee document repository: listings, filters and search.
// CONTEXT: Items look like
//   {"unit": "PPC", "year": "2020", "file_name": "abc.pdf", "key": "PPC/abc.pdf"}
// and are queried through the unit-year index.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use grouping_engine::{
    group, multisort, project, DisplayPolicy, GroupTree, KeyExtractor, RenderNode, SortSpec,
};
use records::{checkbox_label, fiscal_to_academic, Record};
use store::{DocumentStore, KeyCondition, Query};

use crate::context::RequestContext;
use crate::error::DashboardResult;
use crate::log_info;

pub const UNIT_YEAR_INDEX: &str = "unit-year-index";

/// One radio/checkbox/dropdown choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
    pub label: String,
    pub value: String,
}

impl FilterOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        FilterOption {
            label: label.into(),
            value: value.into(),
        }
    }
}

// ============================================================================
// QUERIES
// ============================================================================

/// Items of one unit, optionally narrowed to a fiscal year ("" means all).
pub fn query_repository(
    store: &dyn DocumentStore,
    table: &str,
    unit: &str,
    year: Option<&str>,
) -> DashboardResult<Vec<Record>> {
    let mut query = Query::partition(unit).on_index(UNIT_YEAR_INDEX);
    if let Some(year) = year.filter(|y| !y.trim().is_empty()) {
        query = query.sort_key(KeyCondition::eq(year));
    }
    Ok(store.query(table, &query)?)
}

/// Distinct units across the table, ascending, with checkbox labels.
pub fn unit_options(store: &dyn DocumentStore, table: &str) -> DashboardResult<Vec<FilterOption>> {
    let units: BTreeSet<String> = store
        .scan(table)?
        .iter()
        .filter(|item| item.contains("unit"))
        .map(|item| item.display_value("unit"))
        .collect();
    Ok(units
        .into_iter()
        .map(|unit| FilterOption::new(checkbox_label(&unit), unit.clone()))
        .collect())
}

/// "All" followed by the unit's years, newest first, as academic years.
pub fn year_options(
    store: &dyn DocumentStore,
    table: &str,
    unit: &str,
) -> DashboardResult<Vec<FilterOption>> {
    let years: BTreeSet<String> = query_repository(store, table, unit, None)?
        .iter()
        .map(|item| item.display_value("year"))
        .collect();

    let mut options = vec![FilterOption::new("All", "")];
    for year in years.into_iter().rev() {
        options.push(FilterOption::new(fiscal_to_academic(&year)?, year));
    }
    Ok(options)
}

/// Search dropdown over every file: unit desc, year desc, file name asc.
///
/// Labels read "<unit> - <year> - <file name>"; with `academic_years` the
/// year is shown as an academic year.
pub fn search_options(
    store: &dyn DocumentStore,
    table: &str,
    academic_years: bool,
) -> DashboardResult<Vec<FilterOption>> {
    let spec = SortSpec::from_pairs(&[("unit", true), ("year", true), ("file_name", false)]);
    let items = multisort(store.scan(table)?, &spec)?;

    items
        .iter()
        .map(|item| -> DashboardResult<FilterOption> {
            let year = item.display_value("year");
            let year = if academic_years {
                fiscal_to_academic(&year)?
            } else {
                year
            };
            let label = format!(
                "{} - {} - {}",
                checkbox_label(&item.display_value("unit")),
                year,
                item.display_value("file_name")
            );
            Ok(FilterOption::new(label, item.display_value("key")))
        })
        .collect()
}

// ============================================================================
// COMMITTEE FILES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupBy {
    Committee,
    Year,
}

/// Repository items grouped two ways: committee -> year and year -> committee.
#[derive(Debug, Clone)]
pub struct CommitteeFiles {
    by_committee: GroupTree<Record>,
    by_year: GroupTree<Record>,
}

impl CommitteeFiles {
    pub fn new(items: Vec<Record>) -> DashboardResult<Self> {
        let unit = KeyExtractor::field("unit");
        let year = KeyExtractor::field("year");

        let by_committee = group(items.clone(), &[unit.clone(), year.clone()])?;
        let by_year = group(items, &[year, unit])?;
        Ok(CommitteeFiles {
            by_committee,
            by_year,
        })
    }

    pub fn tree(&self, by: GroupBy) -> &GroupTree<Record> {
        match by {
            GroupBy::Committee => &self.by_committee,
            GroupBy::Year => &self.by_year,
        }
    }

    pub fn file_list(&self, by: GroupBy) -> DashboardResult<Vec<RenderNode>> {
        Ok(project(self.tree(by), &DisplayPolicy::plain())?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryListing {
    pub unit: String,
    pub year: Option<String>,
    pub year_options: Vec<FilterOption>,
    pub by_committee: Vec<RenderNode>,
    pub by_year: Vec<RenderNode>,
}

/// The repository page for one unit (and optional year).
pub fn repository_listing(
    ctx: &RequestContext,
    unit: &str,
    year: Option<&str>,
) -> DashboardResult<RepositoryListing> {
    let table = &ctx.config.tables.repository;
    let items = query_repository(ctx.store, table, unit, year)?;
    log_info!(
        "REPO",
        "unit={} year={} items={}",
        unit,
        year.unwrap_or("all"),
        items.len()
    );

    let files = CommitteeFiles::new(items)?;
    let listing = RepositoryListing {
        unit: unit.to_string(),
        year: year.filter(|y| !y.is_empty()).map(str::to_string),
        year_options: year_options(ctx.store, table, unit)?,
        by_committee: files.file_list(GroupBy::Committee)?,
        by_year: files.file_list(GroupBy::Year)?,
    };
    ctx.log_visit("repository", true)?;
    Ok(listing)
}
