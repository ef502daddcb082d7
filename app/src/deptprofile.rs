//! FILENAME: app/src/deptprofile.rs
// PURPOSE: Department profile charts (faculty, students, classes, enrollments).
// CONTEXT: Items live under partition DEPT#<dept> with sort keys
// DATA#<prefix>#<fiscal year>[#...]. A MetricSeries describes how one chart
// reads them; build_chart turns the items into bar and line traces.

use serde::{Deserialize, Serialize};
use records::{AcademicYears, FieldValue, Record, Year};
use store::{data_sort_range, dept_partition, DocumentStore, Filter, KeyCondition, Query};

use crate::access::require;
use crate::context::RequestContext;
use crate::error::{DashboardError, DashboardResult};
use crate::log_info;

// ============================================================================
// COLOURS
// ============================================================================

pub mod palette {
    pub const BLUE1: &str = "#295783";
    pub const BLUE2: &str = "#6798C1";
    pub const BLUE3: &str = "#92C0DF";
    pub const BLUE4: &str = "#89B8DA";
    pub const BLUE5: &str = "#B9DDF1";
    pub const GRAY1: &str = "#57606C";
    pub const GRAY2: &str = "#C7C7C7";
    pub const GRAY3: &str = "#ABABAB";
    pub const GRAY4: &str = "#57606C";
    pub const ORANGE1: &str = "#D75521";
    pub const ORANGE2: &str = "#FFAE34";
    pub const YELLOW1: &str = "#F7A84A";
    pub const YELLOW2: &str = "#D3C95F";
    pub const GREEN1: &str = "#146C36";
    pub const GREEN2: &str = "#67A956";
    pub const GREEN3: &str = "#A3BD5A";
    pub const RED1: &str = "#EF6F6A";
    pub const TEAL1: &str = "#8CC2CA";

    /// (category key, colour) per chart family.
    pub const FACULTY: &[(&str, &str)] = &[
        ("Tenured", BLUE1),
        ("NTBOT", BLUE2),
        ("NTBOT-professor-term", BLUE3),
        ("Lecturers", GRAY1),
        ("Other Full-Time", GRAY2),
        ("Adjunct", GRAY3),
    ];

    pub const UNDERGRADUATE: &[(&str, &str)] = &[
        ("maj", BLUE1),
        ("conc", BLUE2),
        ("intdmaj", BLUE3),
        ("min", GRAY3),
    ];

    pub const GRADUATE: &[(&str, &str)] = &[
        ("existing", BLUE1),
        ("cohort", BLUE2),
        ("selectivity", ORANGE1),
        ("yield", YELLOW1),
    ];

    pub const ENROLLMENTS: &[(&str, &str)] = &[
        ("Tenured", BLUE1),
        ("NTBOT", BLUE2),
        ("NTBOT-professor-term", BLUE4),
        ("Lecturer", BLUE5),
        ("Supplemental", GRAY2),
        ("Part-time", GRAY3),
        ("Graduate-student", GRAY4),
    ];

    pub const CLASSES: &[(&str, &str)] = &[
        ("Tenured", GREEN1),
        ("NTBOT", GREEN2),
        ("NTBOT-professor-term", GREEN3),
        ("Lecturer", YELLOW2),
        ("Supplemental", GRAY2),
        ("Part-time", GRAY3),
        ("Graduate-student", GRAY4),
    ];

    pub fn color_of(colors: &[(&str, &'static str)], key: &str) -> &'static str {
        colors
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, c)| *c)
            .unwrap_or(GRAY2)
    }
}

// ============================================================================
// SERIES CONFIGURATION
// ============================================================================

/// Where a category's value is found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValueLayout {
    /// One item per year; each category is a column of it.
    Columns,
    /// One item per year and category; `category_field` names the category
    /// and `value_field` holds its value.
    CategoryRows {
        category_field: String,
        value_field: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub key: String,
    pub label: String,
    pub color: String,
}

/// A fraction column drawn as a percentage line on the secondary axis.
///
/// Each year's value is the mean of `field` over that year's rows,
/// weighted by `weight_field` when set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineSeries {
    pub field: String,
    pub label: String,
    pub color: String,
    /// Rows the line reads; every row of the year when absent.
    #[serde(default)]
    pub rows: Option<Filter>,
    #[serde(default)]
    pub weight_field: Option<String>,
}

impl LineSeries {
    pub fn new(field: &str, label: &str, color: &str) -> Self {
        LineSeries {
            field: field.to_string(),
            label: label.to_string(),
            color: color.to_string(),
            rows: None,
            weight_field: None,
        }
    }

    pub fn rows(mut self, filter: Filter) -> Self {
        self.rows = Some(filter);
        self
    }

    pub fn weighted_by(mut self, field: &str) -> Self {
        self.weight_field = Some(field.to_string());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BarMode {
    Stack,
    Group,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricSeries {
    pub id: String,
    /// Sort-key prefix after `DATA#`, e.g. "STUDENTS#UG".
    pub sort_prefix: String,
    /// First fiscal year with data.
    pub first_fiscal: u32,
    /// Applied to the query, e.g. only "Core" course rows.
    #[serde(default)]
    pub filter: Option<Filter>,
    pub layout: ValueLayout,
    pub categories: Vec<Category>,
    #[serde(default)]
    pub lines: Vec<LineSeries>,
    pub y_title: String,
    #[serde(default)]
    pub y2_title: Option<String>,
    pub bar_mode: BarMode,
}

fn categories(colors: &[(&str, &'static str)], labels: &[(&str, &str)]) -> Vec<Category> {
    labels
        .iter()
        .map(|(key, label)| Category {
            key: key.to_string(),
            label: label.to_string(),
            color: palette::color_of(colors, key).to_string(),
        })
        .collect()
}

fn tenure_rows(value_field: &str) -> ValueLayout {
    ValueLayout::CategoryRows {
        category_field: "ten_stat".to_string(),
        value_field: value_field.to_string(),
    }
}

fn tenure_filter(statuses: &[&str]) -> Filter {
    Filter::any_of("ten_stat", statuses.iter().copied())
}

fn core_courses() -> Filter {
    Filter::any_of("course_type", ["Core"])
}

const TENURE_LABELS: &[(&str, &str)] = &[
    ("Tenured", "Tenured"),
    ("NTBOT", "NTBOT"),
    ("NTBOT-professor-term", "Term Asst. Prof."),
    ("Lecturer", "Lecturer"),
    ("Supplemental", "Other Full-Time"),
    ("Part-time", "Adjunct"),
    ("Graduate-student", "Graduate St."),
];

const GRAD_LABELS: &[(&str, &str)] = &[
    ("cohort", "Entering Cohort<br>(starting 2009/10)"),
    ("existing", "Existing Students"),
];

impl MetricSeries {
    pub fn faculty_fte() -> Self {
        MetricSeries {
            id: "faculty-fte".to_string(),
            sort_prefix: "FACULTY_DATA".to_string(),
            first_fiscal: 2005,
            filter: None,
            layout: tenure_rows("fte"),
            categories: categories(
                palette::FACULTY,
                &[
                    ("Tenured", "Tenured"),
                    ("NTBOT", "NTBOT"),
                    ("NTBOT-professor-term", "Term Asst. Prof"),
                    ("Lecturers", "Lecturers"),
                    ("Other Full-Time", "Other Full-Time"),
                    ("Adjunct", "Adjunct"),
                ],
            ),
            lines: Vec::new(),
            y_title: "FTE for Faculty/Person Count for Adjuncts".to_string(),
            y2_title: None,
            bar_mode: BarMode::Stack,
        }
    }

    /// Tenured and NTBOT FTE with female and URM shares on the second axis.
    /// The URM line is FTE-weighted across both groups.
    pub fn faculty_demographics() -> Self {
        MetricSeries {
            id: "faculty-demographics".to_string(),
            sort_prefix: "FACULTY_DATA".to_string(),
            first_fiscal: 2005,
            filter: Some(tenure_filter(&["Tenured", "NTBOT"])),
            layout: tenure_rows("fte"),
            categories: categories(palette::FACULTY, &[("Tenured", "Tenured"), ("NTBOT", "NTBOT")]),
            lines: vec![
                LineSeries::new("percent_fem", "% Tenured Female", palette::ORANGE2)
                    .rows(tenure_filter(&["Tenured"])),
                LineSeries::new("percent_fem", "% NTBOT Female", palette::RED1)
                    .rows(tenure_filter(&["NTBOT"])),
                LineSeries::new("percent_urm", "% NTBOT and Tenured URM", palette::TEAL1)
                    .rows(tenure_filter(&["Tenured", "NTBOT"]))
                    .weighted_by("fte"),
            ],
            y_title: "FTE".to_string(),
            y2_title: Some("% FTE".to_string()),
            bar_mode: BarMode::Stack,
        }
    }

    pub fn undergraduate() -> Self {
        MetricSeries {
            id: "students-ug".to_string(),
            sort_prefix: "STUDENTS#UG".to_string(),
            first_fiscal: 2005,
            filter: None,
            layout: ValueLayout::Columns,
            categories: categories(
                palette::UNDERGRADUATE,
                &[
                    ("maj", "Majors"),
                    ("conc", "Concentrations"),
                    ("intdmaj", "Interdepartmental Majors"),
                    ("min", "Minors"),
                ],
            ),
            lines: Vec::new(),
            y_title: "Number of Students".to_string(),
            y2_title: None,
            bar_mode: BarMode::Stack,
        }
    }

    fn graduate(id: &str, prefix: &str) -> Self {
        MetricSeries {
            id: id.to_string(),
            sort_prefix: prefix.to_string(),
            first_fiscal: 2005,
            filter: None,
            layout: ValueLayout::Columns,
            categories: categories(palette::GRADUATE, GRAD_LABELS),
            lines: ["selectivity", "yield"]
                .iter()
                .map(|field| {
                    LineSeries::new(
                        field,
                        &title_case(field),
                        palette::color_of(palette::GRADUATE, field),
                    )
                })
                .collect(),
            y_title: "Number of Students".to_string(),
            y2_title: Some("% Selectivity or Yield".to_string()),
            bar_mode: BarMode::Stack,
        }
    }

    pub fn masters() -> Self {
        Self::graduate("students-masters", "STUDENTS#MASTERS")
    }

    pub fn interdepartmental_masters() -> Self {
        Self::graduate("students-interdept", "STUDENTS#INTDMASTERS")
    }

    pub fn hybrid_masters() -> Self {
        Self::graduate("students-hybrid", "STUDENTS#HYBRIDMASTERS")
    }

    pub fn sps_masters() -> Self {
        Self::graduate("students-sps", "STUDENTS#SPS")
    }

    pub fn phd() -> Self {
        Self::graduate("students-phd", "STUDENTS#PHD")
    }

    pub fn classes() -> Self {
        MetricSeries {
            id: "classes".to_string(),
            sort_prefix: "AGG#CLASSES".to_string(),
            first_fiscal: 2008,
            filter: None,
            layout: tenure_rows("count"),
            categories: categories(palette::CLASSES, TENURE_LABELS),
            lines: Vec::new(),
            y_title: "Number of Classes".to_string(),
            y2_title: None,
            bar_mode: BarMode::Stack,
        }
    }

    pub fn enrollments() -> Self {
        MetricSeries {
            id: "enrollments".to_string(),
            sort_prefix: "AGG#ENRL".to_string(),
            first_fiscal: 2008,
            filter: None,
            layout: tenure_rows("count"),
            categories: categories(palette::ENROLLMENTS, TENURE_LABELS),
            lines: Vec::new(),
            y_title: "Number of Enrollments".to_string(),
            y2_title: None,
            bar_mode: BarMode::Stack,
        }
    }

    /// Classes of core courses only (per-course rows, not the aggregate).
    pub fn core_classes() -> Self {
        MetricSeries {
            id: "classes-core".to_string(),
            sort_prefix: "CLASSES".to_string(),
            filter: Some(core_courses()),
            ..Self::classes()
        }
    }

    pub fn core_enrollments() -> Self {
        MetricSeries {
            id: "enrollments-core".to_string(),
            sort_prefix: "ENRL".to_string(),
            filter: Some(core_courses()),
            ..Self::enrollments()
        }
    }

    pub fn builtin() -> Vec<MetricSeries> {
        vec![
            Self::faculty_fte(),
            Self::faculty_demographics(),
            Self::undergraduate(),
            Self::masters(),
            Self::interdepartmental_masters(),
            Self::hybrid_masters(),
            Self::sps_masters(),
            Self::phd(),
            Self::classes(),
            Self::core_classes(),
            Self::enrollments(),
            Self::core_enrollments(),
        ]
    }

    pub fn by_id(id: &str) -> Option<MetricSeries> {
        Self::builtin().into_iter().find(|s| s.id == id)
    }
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ============================================================================
// CHART OUTPUT
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceKind {
    Bar,
    Scatter,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    pub kind: TraceKind,
    pub name: String,
    pub x: Vec<String>,
    pub y: Vec<Option<f64>>,
    pub text: Vec<Option<String>>,
    pub hover_text: Vec<Option<String>>,
    pub color: String,
    /// "y2" for traces on the secondary axis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_axis: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartLayout {
    pub bar_mode: BarMode,
    pub y_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y2_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_range: Option<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    pub data: Vec<Trace>,
    pub layout: ChartLayout,
}

/// Keeps only the first present label and the last label.
///
/// `[None, None, "30%", "29%", "28%", "34%"]` becomes
/// `[None, None, "30%", None, None, "34%"]`.
pub fn make_text_labels(hover_labels: &[Option<String>]) -> Vec<Option<String>> {
    let mut text_labels = vec![None; hover_labels.len()];
    if let Some(first) = hover_labels.iter().position(Option::is_some) {
        text_labels[first] = hover_labels[first].clone();
        if let Some(last) = text_labels.len().checked_sub(1) {
            text_labels[last] = hover_labels[last].clone();
        }
    }
    text_labels
}

/// Rounded bar label with thousands separators; single characters are
/// padded so the renderer does not rotate them.
pub fn bar_label(value: f64) -> String {
    let rounded = value.round() as i64;
    let digits = rounded.abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0 {
        grouped.insert(0, '-');
    }
    if grouped.chars().count() == 1 {
        format!(" {} ", grouped)
    } else {
        grouped
    }
}

/// Fiscal year encoded in a `DATA#<prefix>#<year>[#...]` sort key.
fn fiscal_year_of(sort_key: &str, prefix: &str) -> Option<u32> {
    let rest = sort_key.strip_prefix("DATA#")?.strip_prefix(prefix)?.strip_prefix('#')?;
    rest.split('#').next()?.parse().ok()
}

/// Per-year values of one field over fiscal years `start..=last`
/// (missing years are `None`).
fn aligned_values<'a, I>(items: I, start: u32, last: u32, prefix: &str, field: &str) -> Vec<Option<f64>>
where
    I: Iterator<Item = &'a Record>,
{
    if start > last {
        return Vec::new();
    }
    let mut values = vec![None; (last - start) as usize + 1];
    for item in items {
        let Some(year) = item.text("SK").and_then(|sk| fiscal_year_of(sk, prefix)) else {
            continue;
        };
        if (start..=last).contains(&year) {
            values[(year - start) as usize] = item.number(field);
        }
    }
    values
}

/// Per-year mean of a line's field over the rows it reads, optionally
/// weighted. Years with no usable rows (or zero total weight) are `None`.
fn line_values(items: &[Record], start: u32, last: u32, prefix: &str, line: &LineSeries) -> Vec<Option<f64>> {
    if start > last {
        return Vec::new();
    }
    // (weighted sum, total weight) per year
    let mut totals = vec![(0.0_f64, 0.0_f64); (last - start) as usize + 1];
    for item in items {
        let Some(year) = item.text("SK").and_then(|sk| fiscal_year_of(sk, prefix)) else {
            continue;
        };
        if !(start..=last).contains(&year) {
            continue;
        }
        if line.rows.as_ref().is_some_and(|rows| !rows.matches(item)) {
            continue;
        }
        let Some(value) = item.number(&line.field) else {
            continue;
        };
        let weight = match &line.weight_field {
            Some(field) => match item.number(field) {
                Some(weight) => weight,
                None => continue,
            },
            None => 1.0,
        };
        let slot = &mut totals[(year - start) as usize];
        slot.0 += value * weight;
        slot.1 += weight;
    }
    totals
        .into_iter()
        .map(|(sum, weight)| (weight != 0.0).then(|| sum / weight))
        .collect()
}

/// Queries the department's series data and builds its chart.
pub fn build_chart(
    store: &dyn DocumentStore,
    table: &str,
    years: &AcademicYears,
    series: &MetricSeries,
    dept: &str,
) -> DashboardResult<Chart> {
    let first = series.first_fiscal.max(years.first_fiscal);
    let last = years.max_fiscal();
    let mut query = Query::partition(dept_partition(dept))
        .sort_key(data_sort_range(&series.sort_prefix, first, last));
    if let Some(filter) = &series.filter {
        query = query.filter(filter.clone());
    }
    let items = store.query(table, &query)?;
    log_info!("DEPT", "series={} dept={} items={}", series.id, dept, items.len());

    let x_axis = years.academic_range_from(first);
    let mut data = Vec::with_capacity(series.categories.len() + series.lines.len());

    for category in &series.categories {
        let y = match &series.layout {
            ValueLayout::Columns => {
                aligned_values(items.iter(), first, last, &series.sort_prefix, &category.key)
            }
            ValueLayout::CategoryRows {
                category_field,
                value_field,
            } => aligned_values(
                items
                    .iter()
                    .filter(|item| item.text(category_field) == Some(category.key.as_str())),
                first,
                last,
                &series.sort_prefix,
                value_field,
            ),
        };

        let text = y.iter().map(|v| v.map(bar_label)).collect();
        let hover_text = y
            .iter()
            .map(|v| v.map(|v| format!("{}: {}", category.label, FieldValue::Number(v))))
            .collect();
        data.push(Trace {
            kind: TraceKind::Bar,
            name: category.label.clone(),
            x: x_axis.clone(),
            y,
            text,
            hover_text,
            color: category.color.clone(),
            y_axis: None,
        });
    }

    for line in &series.lines {
        let y: Vec<Option<f64>> = line_values(&items, first, last, &series.sort_prefix, line)
            .into_iter()
            .map(|v| v.map(|fraction| (fraction * 100.0).round()))
            .collect();
        let hover_text: Vec<Option<String>> =
            y.iter().map(|v| v.map(|pct| format!("{}%", pct))).collect();
        data.push(Trace {
            kind: TraceKind::Scatter,
            name: line.label.clone(),
            x: x_axis.clone(),
            text: make_text_labels(&hover_text),
            y,
            hover_text,
            color: line.color.clone(),
            y_axis: Some("y2".to_string()),
        });
    }

    Ok(Chart {
        data,
        layout: ChartLayout {
            bar_mode: series.bar_mode,
            y_title: series.y_title.clone(),
            y2_title: series.y2_title.clone(),
            y_range: None,
        },
    })
}

// ============================================================================
// TREE CHART
// ============================================================================

/// One year's category breakdown drawn as a treemap under the academic year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeChart {
    pub year: Year,
    pub labels: Vec<String>,
    pub parents: Vec<String>,
    pub values: Vec<u64>,
    pub text_template: String,
}

pub const TREE_TEXT_TEMPLATE: &str = "%{label}<br>%{percentRoot} (%{value})";

/// Breakdown of a category-row series for one fiscal year. Categories
/// without a row that year are left out.
pub fn build_tree_chart(
    store: &dyn DocumentStore,
    table: &str,
    years: &AcademicYears,
    series: &MetricSeries,
    dept: &str,
    fiscal: u32,
) -> DashboardResult<TreeChart> {
    let ValueLayout::CategoryRows {
        category_field,
        value_field,
    } = &series.layout
    else {
        return Err(DashboardError::InvalidRequest(format!(
            "Chart '{}' has no category breakdown",
            series.id
        )));
    };
    let year = fiscal
        .checked_sub(years.first_fiscal)
        .and_then(|id| years.year(id as usize))
        .filter(|_| fiscal >= series.first_fiscal)
        .ok_or_else(|| {
            DashboardError::InvalidRequest(format!("No '{}' data for fiscal year {}", series.id, fiscal))
        })?;

    let mut query = Query::partition(dept_partition(dept))
        .sort_key(data_sort_range(&series.sort_prefix, fiscal, fiscal));
    if let Some(filter) = &series.filter {
        query = query.filter(filter.clone());
    }
    let items = store.query(table, &query)?;
    log_info!("DEPT", "tree series={} dept={} fiscal={} items={}", series.id, dept, fiscal, items.len());

    let mut chart = TreeChart {
        year,
        labels: Vec::new(),
        parents: Vec::new(),
        values: Vec::new(),
        text_template: TREE_TEXT_TEMPLATE.to_string(),
    };
    for category in &series.categories {
        let value = items
            .iter()
            .filter(|item| item.text(category_field) == Some(category.key.as_str()))
            .filter(|item| item.text("SK").and_then(|sk| fiscal_year_of(sk, &series.sort_prefix)) == Some(fiscal))
            .find_map(|item| item.number(value_field));
        if let Some(value) = value {
            chart.labels.push(category.label.clone());
            chart.parents.push(chart.year.academic.clone());
            chart.values.push(value.max(0.0).trunc() as u64);
        }
    }
    Ok(chart)
}

// ============================================================================
// FACULTY LIST
// ============================================================================

/// Faculty roster rows of the window's latest fiscal year.
pub fn faculty_list(
    store: &dyn DocumentStore,
    table: &str,
    years: &AcademicYears,
    dept: &str,
) -> DashboardResult<Vec<Record>> {
    let latest = format!("DATA#FACULTY_LIST#{}", years.max_fiscal());
    let query = Query::partition(dept_partition(dept))
        .sort_key(KeyCondition::between(latest.clone(), format!("{}$", latest)));
    Ok(store.query(table, &query)?)
}

// ============================================================================
// ENTRY POINTS
// ============================================================================

fn require_department(ctx: &RequestContext, dept: &str) -> DashboardResult<()> {
    let allowed = ctx.user.can_view_department(dept);
    ctx.log_visit("deptprofile", allowed)?;
    require(allowed, "You don't have access to this department.")
}

fn builtin_series(series_id: &str) -> DashboardResult<MetricSeries> {
    MetricSeries::by_id(series_id)
        .ok_or_else(|| DashboardError::NotFound(format!("Unknown chart '{}'", series_id)))
}

/// The faculty table of a department the user may view.
pub fn department_faculty_list(ctx: &RequestContext, dept: &str) -> DashboardResult<Vec<Record>> {
    require_department(ctx, dept)?;
    faculty_list(ctx.store, &ctx.config.tables.deptprofile, &ctx.config.years, dept)
}

/// A one-year breakdown of a built-in series for a department the user may view.
pub fn department_tree_chart(
    ctx: &RequestContext,
    series_id: &str,
    dept: &str,
    fiscal: u32,
) -> DashboardResult<TreeChart> {
    require_department(ctx, dept)?;
    let series = builtin_series(series_id)?;
    build_tree_chart(
        ctx.store,
        &ctx.config.tables.deptprofile,
        &ctx.config.years,
        &series,
        dept,
        fiscal,
    )
}

/// A built-in chart for a department the user may view.
pub fn department_chart(ctx: &RequestContext, series_id: &str, dept: &str) -> DashboardResult<Chart> {
    require_department(ctx, dept)?;

    let series = builtin_series(series_id)?;
    build_chart(
        ctx.store,
        &ctx.config.tables.deptprofile,
        &ctx.config.years,
        &series,
        dept,
    )
}
