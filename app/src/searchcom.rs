//! FILENAME: app/src/searchcom.rs
// PURPOSE: Search committee dashboard: posting info, applicant crosstab and
// the availability chart for one job requisition.
// CONTEXT: Posting and applicant items are keyed by `req_num`; pipeline and
// subfield items by the posting's department code (`Dept`). Applicant
// aggregates are withheld below the confidentiality thresholds.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use grouping_engine::{multisort, SortSpec};
use records::{FieldValue, Record};
use store::{DocumentStore, Query};

use crate::access::require;
use crate::config::TableNames;
use crate::context::RequestContext;
use crate::deptprofile::{palette, BarMode, Chart, ChartLayout, Trace, TraceKind};
use crate::error::{DashboardError, DashboardResult};
use crate::repository::FilterOption;
use crate::{log_debug, log_info};

/// Below this many applicants the chart is hidden.
pub const CHART_MIN_APPLICANTS: f64 = 3.0;
/// Below this many female or male applicants the crosstab is hidden.
pub const CROSSTAB_MIN_PER_GENDER: f64 = 5.0;

// Crosstab categories as stored, paired with their cell id fragments.
const GENDERS: [(&str, &str); 3] = [("Female", "fem"), ("Male", "male"), ("Blank", "na")];
const ETHNICITIES: [(&str, &str); 6] = [
    ("American Indian or Alaska Native", "amind"),
    ("Asian", "asian"),
    ("Black or African American", "black"),
    ("Native Hawaiian or Other Pacific Islander", "pacific"),
    ("White", "white"),
    ("Blank", "na"),
];
const HISPANIC: [(&str, &str); 3] = [("Yes", "hisp"), ("No", "nonhisp"), ("Blank", "na")];

// ============================================================================
// TYPED VIEWS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    pub req_num: String,
    pub dept_code: String,
    #[serde(default)]
    pub dept_name: String,
    #[serde(default)]
    pub position_title: String,
    #[serde(default)]
    pub open_date: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub field: String,
    #[serde(default)]
    pub academic_year: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplicantAggregate {
    #[serde(default)]
    pub person_id_count: f64,
    #[serde(default, rename = "gender_Female_sum")]
    pub female_sum: f64,
    #[serde(default, rename = "gender_Male_sum")]
    pub male_sum: f64,
    #[serde(default, rename = "gender_Female_pcnt")]
    pub female_pcnt: f64,
    #[serde(default, rename = "ethnicity_URM_sum")]
    pub urm_sum: f64,
    #[serde(default, rename = "ethnicity_URM_pcnt")]
    pub urm_pcnt: f64,
    #[serde(default, rename = "ethnicity_Asian_sum")]
    pub asian_sum: f64,
    #[serde(default, rename = "ethnicity_Asian_pcnt")]
    pub asian_pcnt: f64,
    #[serde(default, rename = "ethnicity_White_sum")]
    pub white_sum: f64,
    #[serde(default, rename = "ethnicity_White_pcnt")]
    pub white_pcnt: f64,
}

/// gender -> ethnicity -> hispanic -> count
pub type CrosstabCounts = BTreeMap<String, BTreeMap<String, BTreeMap<String, f64>>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Applicant {
    pub req_num: String,
    #[serde(default)]
    pub refresh_date: String,
    /// `None` once withheld (or when the item has none).
    #[serde(default)]
    pub agg: Option<ApplicantAggregate>,
    #[serde(default)]
    pub xtab: Option<CrosstabCounts>,
}

impl Applicant {
    /// Clears the parts that fall below the confidentiality thresholds.
    pub fn apply_thresholds(mut self) -> Self {
        let chart_ok = self
            .agg
            .as_ref()
            .map_or(false, |agg| agg.person_id_count >= CHART_MIN_APPLICANTS);
        let crosstab_ok = self.agg.as_ref().map_or(false, |agg| {
            agg.female_sum >= CROSSTAB_MIN_PER_GENDER && agg.male_sum >= CROSSTAB_MIN_PER_GENDER
        });

        if !chart_ok {
            self.agg = None;
        }
        if !crosstab_ok {
            self.xtab = None;
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchInfo {
    pub dept: String,
    pub title: String,
    pub open_date: String,
    pub start_date: String,
    pub field: String,
    pub refresh_date: String,
}

pub fn search_info(posting: &Posting, applicant: &Applicant) -> SearchInfo {
    SearchInfo {
        dept: posting.dept_name.clone(),
        title: posting.position_title.clone(),
        open_date: posting.open_date.clone(),
        start_date: posting.start_date.clone(),
        field: posting.field.clone(),
        refresh_date: applicant.refresh_date.clone(),
    }
}

// ============================================================================
// LOADING
// ============================================================================

fn first_item(store: &dyn DocumentStore, table: &str, key: &str, what: &str) -> DashboardResult<Record> {
    store
        .query(table, &Query::partition(key))?
        .into_iter()
        .next()
        .ok_or_else(|| DashboardError::NotFound(format!("No {} found for {}", what, key)))
}

fn non_empty(req_num: &str) -> DashboardResult<&str> {
    let req_num = req_num.trim();
    if req_num.is_empty() {
        return Err(DashboardError::InvalidRequest(
            "A requisition number is required".to_string(),
        ));
    }
    Ok(req_num)
}

pub fn load_posting(store: &dyn DocumentStore, tables: &TableNames, req_num: &str) -> DashboardResult<Posting> {
    let item = first_item(store, &tables.searchcom_posting, non_empty(req_num)?, "posting")?;
    Ok(serde_json::from_value(item.to_json())?)
}

/// Applicant data with the confidentiality thresholds applied.
pub fn load_applicant(store: &dyn DocumentStore, tables: &TableNames, req_num: &str) -> DashboardResult<Applicant> {
    let item = first_item(store, &tables.searchcom_applicant, non_empty(req_num)?, "applicant data")?;
    let applicant: Applicant = serde_json::from_value(item.to_json())?;
    Ok(applicant.apply_thresholds())
}

/// Availability pipeline for the posting's department.
pub fn load_pipeline(store: &dyn DocumentStore, tables: &TableNames, posting: &Posting) -> DashboardResult<Record> {
    first_item(store, &tables.searchcom_pipeline, &posting.dept_code, "pipeline")
}

pub fn load_subfields(store: &dyn DocumentStore, tables: &TableNames, posting: &Posting) -> DashboardResult<String> {
    let item = first_item(store, &tables.searchcom_subfields, &posting.dept_code, "subfields")?;
    Ok(item.display_value("Subfield"))
}

// ============================================================================
// CROSSTAB
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrosstabCell {
    /// `<ethnicity>-<hispanic>-<gender>`, e.g. "white-nonhisp-fem".
    pub id: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrosstabRow {
    pub gender: String,
    pub cells: Vec<CrosstabCell>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crosstab {
    /// False when the data was withheld; every cell is then "-".
    pub visible: bool,
    pub rows: Vec<CrosstabRow>,
}

fn count_of(counts: &CrosstabCounts, gender: &str, ethnicity: &str, hispanic: &str) -> Option<f64> {
    counts.get(gender)?.get(ethnicity)?.get(hispanic).copied()
}

/// Gender rows by ethnicity x hispanic columns.
pub fn build_crosstab(applicant: &Applicant) -> Crosstab {
    let rows = GENDERS
        .iter()
        .map(|(gender, gen_id)| {
            let mut cells = Vec::with_capacity(ETHNICITIES.len() * HISPANIC.len());
            for (ethnicity, ethn_id) in ETHNICITIES.iter() {
                for (hispanic, hisp_id) in HISPANIC.iter() {
                    let value = applicant
                        .xtab
                        .as_ref()
                        .and_then(|counts| count_of(counts, gender, ethnicity, hispanic))
                        .filter(|count| *count != 0.0)
                        .map(|count| FieldValue::Number(count).display_value())
                        .unwrap_or_else(|| "-".to_string());
                    cells.push(CrosstabCell {
                        id: format!("{}-{}-{}", ethn_id, hisp_id, gen_id),
                        value,
                    });
                }
            }
            CrosstabRow {
                gender: gender.to_string(),
                cells,
            }
        })
        .collect();

    Crosstab {
        visible: applicant.xtab.is_some(),
        rows,
    }
}

// ============================================================================
// AVAILABILITY CHART
// ============================================================================

const CHART_GROUPS: [&str; 4] = ["Female", "URM", "Asian", "White"];
const PIPELINE_SUFFIXES: [&str; 4] = ["women", "urm", "asian", "white"];

/// (pipeline field prefix, trace name, colour)
const AVAILABILITY: [(&str, &str, &str); 4] = [
    ("combined_1993-2012", "Combined availability 1993-2012", palette::BLUE1),
    ("tenured_1993-2007", "Tenured availability 1993-2007", palette::BLUE2),
    ("untenured_2008-2012", "Untenured availability 2008-2012", palette::BLUE3),
    ("untenured_2013-2016", "Untenured availability 2013-2016", palette::BLUE4),
];

fn pipeline_value(pipeline: &Record, field: &str) -> DashboardResult<f64> {
    pipeline
        .require(field, 0)?
        .as_f64()
        .ok_or_else(|| DashboardError::InvalidRequest(format!("Pipeline field '{}' is not a number", field)))
}

fn percent(value: f64) -> String {
    format!("{}%", FieldValue::Number(value))
}

/// Availability vs applicants. `None` when the applicant aggregate was withheld.
pub fn build_availability_chart(applicant: &Applicant, pipeline: &Record) -> DashboardResult<Option<Chart>> {
    let Some(agg) = applicant.agg.as_ref() else {
        return Ok(None);
    };
    let x: Vec<String> = CHART_GROUPS.iter().map(|g| g.to_string()).collect();
    let mut data = Vec::with_capacity(AVAILABILITY.len() + 1);

    for (prefix, name, color) in AVAILABILITY {
        let values = PIPELINE_SUFFIXES
            .iter()
            .map(|suffix| pipeline_value(pipeline, &format!("{}_{}", prefix, suffix)))
            .collect::<DashboardResult<Vec<f64>>>()?;
        let text: Vec<Option<String>> = values.iter().map(|v| Some(percent(*v))).collect();
        data.push(Trace {
            kind: TraceKind::Bar,
            name: name.to_string(),
            x: x.clone(),
            y: values.into_iter().map(Some).collect(),
            hover_text: text.clone(),
            text,
            color: color.to_string(),
            y_axis: None,
        });
    }

    let applicants = [
        (agg.female_pcnt, agg.female_sum),
        (agg.urm_pcnt, agg.urm_sum),
        (agg.asian_pcnt, agg.asian_sum),
        (agg.white_pcnt, agg.white_sum),
    ];
    data.push(Trace {
        kind: TraceKind::Bar,
        name: "Applicants".to_string(),
        x,
        y: applicants.iter().map(|(pcnt, _)| Some(*pcnt)).collect(),
        text: applicants
            .iter()
            .map(|(pcnt, n)| Some(format!("{}<br>n={}", percent(*pcnt), FieldValue::Number(*n))))
            .collect(),
        hover_text: applicants
            .iter()
            .map(|(pcnt, n)| Some(format!("{} (n={})", percent(*pcnt), FieldValue::Number(*n))))
            .collect(),
        color: palette::ORANGE1.to_string(),
        y_axis: None,
    });

    Ok(Some(Chart {
        data,
        layout: ChartLayout {
            bar_mode: BarMode::Group,
            y_title: "%".to_string(),
            y2_title: None,
            y_range: Some([0.0, 110.0]),
        },
    }))
}

// ============================================================================
// DASHBOARD
// ============================================================================

/// Dropdown of searches the user may view, ordered by department, then
/// newest academic year, then requisition number.
pub fn requisition_options(ctx: &RequestContext) -> DashboardResult<Vec<FilterOption>> {
    let tables = &ctx.config.tables;
    let postings: Vec<Record> = if ctx.user.is_admin() {
        ctx.store.scan(&tables.searchcom_posting)?
    } else {
        let mut found = Vec::new();
        for req_num in ctx.user.allowed_requisitions() {
            let query = Query::partition(req_num).project(&[
                "req_num",
                "dept_name",
                "position_title",
                "academic_year",
            ]);
            found.extend(ctx.store.query(&tables.searchcom_posting, &query)?.into_iter().take(1));
        }
        found
    };

    let spec = SortSpec::from_pairs(&[("dept_name", false), ("academic_year", true), ("req_num", false)]);
    let sorted = multisort(postings, &spec)?;
    Ok(sorted
        .iter()
        .map(|p| {
            FilterOption::new(
                format!(
                    "{} - {} - {} - {}",
                    p.display_value("academic_year"),
                    p.display_value("req_num"),
                    p.display_value("dept_name"),
                    p.display_value("position_title")
                ),
                p.display_value("req_num"),
            )
        })
        .collect())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchDashboard {
    pub info: SearchInfo,
    pub crosstab: Crosstab,
    /// `None` shows the threshold warning instead.
    pub chart: Option<Chart>,
    /// Shown under the chart only.
    pub subfields: Option<String>,
}

/// Everything the search committee page shows for one requisition.
pub fn search_dashboard(ctx: &RequestContext, req_num: &str) -> DashboardResult<SearchDashboard> {
    let req_num = non_empty(req_num)?;
    let allowed = ctx.user.can_view_search(req_num);
    ctx.log_visit("searchcom", allowed)?;
    require(allowed, "You don't have access to this search.")?;

    let tables = &ctx.config.tables;
    let posting = load_posting(ctx.store, tables, req_num)?;
    let applicant = load_applicant(ctx.store, tables, req_num)?;
    log_info!(
        "SEARCH",
        "req={} dept={} chart={} crosstab={}",
        req_num,
        posting.dept_code,
        applicant.agg.is_some(),
        applicant.xtab.is_some()
    );

    let (chart, subfields) = if applicant.agg.is_some() {
        let pipeline = load_pipeline(ctx.store, tables, &posting)?;
        let chart = build_availability_chart(&applicant, &pipeline)?;
        let subfields = load_subfields(ctx.store, tables, &posting)?;
        (chart, Some(subfields))
    } else {
        log_debug!("SEARCH", "req={} below chart threshold", req_num);
        (None, None)
    };

    Ok(SearchDashboard {
        info: search_info(&posting, &applicant),
        crosstab: build_crosstab(&applicant),
        chart,
        subfields,
    })
}

/// Crosstab only, for the command line.
pub fn crosstab_for(ctx: &RequestContext, req_num: &str) -> DashboardResult<Crosstab> {
    let req_num = non_empty(req_num)?;
    let allowed = ctx.user.can_view_search(req_num);
    ctx.log_visit("searchcom", allowed)?;
    require(allowed, "You don't have access to this search.")?;
    let applicant = load_applicant(ctx.store, &ctx.config.tables, req_num)?;
    Ok(build_crosstab(&applicant))
}
