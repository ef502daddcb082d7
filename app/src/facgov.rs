//! FILENAME: app/src/facgov.rs
// PURPOSE: Faculty governance archive: general committee files and faculty meetings.
// CONTEXT: Meeting files are named "<title> <Agenda|Minutes> <YYYY-MM-DD>"; each
// meeting date becomes one entry linking its agenda and minutes.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use grouping_engine::{
    render_listing, DateMerge, DisplayPolicy, KeyExtractor, KeyTransform, ListingDefinition,
    RenderNode, SortSpec,
};
use records::Record;

use crate::access::require;
use crate::context::RequestContext;
use crate::error::DashboardResult;
use crate::repository::{query_repository, search_options, year_options, FilterOption};
use crate::{log_info, log_warn};

pub const FACULTY_MEETING_UNIT: &str = "faculty_meeting";
pub const MEETING_CAPTION_PREFIX: &str = "Faculty Meeting ";
pub const MEETING_NOTICE: &str = "Minutes will be made available whenever possible";
pub const NO_ACCESS_MESSAGE: &str =
    "You do not have access to this page. Please reach out to the dashboard administrator to get access.";

/// Trailing "<Category> <YYYY-MM-DD>" of a meeting file name.
const MEETING_NAME_PATTERN: &str = r"\s(?P<category>\S+)\s(?P<date>\d{4}-\d{2}-\d{2})$";

/// Compiled once per process.
static MEETING_NAME: Lazy<Result<Regex, regex::Error>> =
    Lazy::new(|| Regex::new(MEETING_NAME_PATTERN));

fn meeting_name_regex() -> DashboardResult<&'static Regex> {
    Ok(Lazy::force(&MEETING_NAME).as_ref().map_err(Clone::clone)?)
}

/// Unit radio buttons of the faculty governance page.
pub fn unit_options() -> Vec<FilterOption> {
    vec![
        FilterOption::new("Faculty Meetings", FACULTY_MEETING_UNIT),
        FilterOption::new("PPC", "PPC"),
        FilterOption::new("EPPC", "EPPC"),
        FilterOption::new("CED", "CED"),
    ]
}

/// Committee files: unit heading -> academic year -> files.
pub fn general_definition() -> ListingDefinition {
    ListingDefinition::new(
        SortSpec::from_pairs(&[("year", true), ("file_name", false)]),
        vec![
            KeyExtractor::field("unit").then(KeyTransform::Heading),
            KeyExtractor::field("year").then(KeyTransform::FiscalToAcademic),
        ],
        DisplayPolicy::plain(),
    )
}

/// Meetings: unit heading -> academic year -> meeting date, merged per date.
pub fn meeting_definition() -> ListingDefinition {
    ListingDefinition::new(
        SortSpec::from_pairs(&[("year", true), ("meeting_date", false), ("file_name", false)]),
        vec![
            KeyExtractor::field("unit").then(KeyTransform::Heading),
            KeyExtractor::field("year").then(KeyTransform::FiscalToAcademic),
            KeyExtractor::field("meeting_date"),
        ],
        DisplayPolicy::merge_by_date(DateMerge::meetings(MEETING_CAPTION_PREFIX)),
    )
}

/// Tags meeting files with their date; files not named like a meeting are dropped.
pub fn prepare_meeting_items(items: Vec<Record>) -> DashboardResult<Vec<Record>> {
    let meeting_name = meeting_name_regex()?;
    Ok(items
        .into_iter()
        .filter_map(|mut item| {
            let name = item.display_value("file_name");
            match meeting_name.captures(&name) {
                Some(caps) => {
                    item.insert("meeting_date", &caps["date"]);
                    Some(item)
                }
                None => {
                    log_warn!("FACGOV", "skipping non-meeting file '{}'", name);
                    None
                }
            }
        })
        .collect())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacgovListing {
    pub unit: String,
    pub year: Option<String>,
    pub year_options: Vec<FilterOption>,
    pub notice: Option<String>,
    pub nodes: Vec<RenderNode>,
}

/// Renders the listing for `unit`; meetings use the date-merged layout.
pub fn render_facgov(unit: &str, items: Vec<Record>) -> DashboardResult<(Option<String>, Vec<RenderNode>)> {
    if unit == FACULTY_MEETING_UNIT {
        let nodes = render_listing(&meeting_definition(), prepare_meeting_items(items)?)?;
        Ok((Some(MEETING_NOTICE.to_string()), nodes))
    } else {
        Ok((None, render_listing(&general_definition(), items)?))
    }
}

/// The faculty governance page for one unit (and optional year).
pub fn facgov_listing(
    ctx: &RequestContext,
    unit: &str,
    year: Option<&str>,
) -> DashboardResult<FacgovListing> {
    let allowed = ctx.user.has_facgov_access();
    ctx.log_visit("facgov", allowed)?;
    require(allowed, NO_ACCESS_MESSAGE)?;

    let table = &ctx.config.tables.facgov;
    let items = query_repository(ctx.store, table, unit, year)?;
    log_info!(
        "FACGOV",
        "unit={} year={} items={}",
        unit,
        year.unwrap_or("all"),
        items.len()
    );

    let (notice, nodes) = render_facgov(unit, items)?;
    Ok(FacgovListing {
        unit: unit.to_string(),
        year: year.filter(|y| !y.is_empty()).map(str::to_string),
        year_options: year_options(ctx.store, table, unit)?,
        notice,
        nodes,
    })
}

/// Search dropdown over every governance file, years shown academically.
pub fn facgov_search_options(ctx: &RequestContext) -> DashboardResult<Vec<FilterOption>> {
    require(ctx.user.has_facgov_access(), NO_ACCESS_MESSAGE)?;
    search_options(ctx.store, &ctx.config.tables.facgov, true)
}
