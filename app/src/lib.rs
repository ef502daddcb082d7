//! FILENAME: app/src/lib.rs
// PURPOSE: Main library entry point for the division dashboards.
// CONTEXT: Each dashboard is a module of plain functions over a RequestContext;
// `run` wires config, stores and logging for the command-line binary.

use serde::Serialize;
use serde_json::Value;
use store::{FsObjectStore, InMemoryObjectStore, InMemoryStore, ObjectStore};

pub mod access;
pub mod access_log;
pub mod config;
pub mod context;
pub mod deptprofile;
pub mod download;
pub mod error;
pub mod facgov;
pub mod lab_occupancy;
pub mod logging;
pub mod repository;
pub mod searchcom;

pub use access::{require, Role, User};
pub use access_log::AccessLogger;
pub use config::{BucketNames, DashboardConfig, DeployEnv, TableNames};
pub use context::RequestContext;
pub use deptprofile::{
    build_chart, build_tree_chart, department_chart, faculty_list, Chart, MetricSeries, Trace,
    TreeChart,
};
pub use download::{download, DownloadArea, FileResponse};
pub use error::{DashboardError, DashboardResult};
pub use facgov::{facgov_listing, FacgovListing};
pub use lab_occupancy::{record_submission, user_records, SubmissionOutcome};
pub use logging::{get_log_path, init_log_file, init_logger, next_seq, write_log};
pub use repository::{repository_listing, CommitteeFiles, FilterOption, RepositoryListing};
pub use searchcom::{build_crosstab, search_dashboard, Crosstab, SearchDashboard};

// ============================================================================
// COMMANDS
// ============================================================================

pub const USAGE: &str = "usage: dashboard <uni> <command> [args]
commands:
  repository <unit> [year]
  faculty-governance <unit> [year]
  chart <metric> <dept>
  tree <metric> <dept> <fiscal_year>
  faculty-list <dept>
  crosstab <req_num>
  search <req_num>
  lab-occupancy
  lab-submit <submission.json>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Repository { unit: String, year: Option<String> },
    FacultyGovernance { unit: String, year: Option<String> },
    Chart { metric: String, dept: String },
    Tree { metric: String, dept: String, fiscal: u32 },
    FacultyList { dept: String },
    Crosstab { req_num: String },
    Search { req_num: String },
    LabOccupancy,
    LabSubmit { path: String },
}

/// Parses `<uni> <command> [args]` into the acting uni and a command.
pub fn parse_command(args: &[String]) -> DashboardResult<(String, Command)> {
    let usage = || DashboardError::InvalidRequest(USAGE.to_string());
    let (uni, rest) = args.split_first().ok_or_else(usage)?;
    let (name, params) = rest.split_first().ok_or_else(usage)?;
    let arg = |i: usize| params.get(i).cloned().ok_or_else(usage);
    let optional = |i: usize| params.get(i).cloned();

    let command = match name.as_str() {
        "repository" => Command::Repository {
            unit: arg(0)?,
            year: optional(1),
        },
        "faculty-governance" => Command::FacultyGovernance {
            unit: arg(0)?,
            year: optional(1),
        },
        "chart" => Command::Chart {
            metric: arg(0)?,
            dept: arg(1)?,
        },
        "tree" => Command::Tree {
            metric: arg(0)?,
            dept: arg(1)?,
            fiscal: arg(2)?.trim().parse().map_err(|_| usage())?,
        },
        "faculty-list" => Command::FacultyList { dept: arg(0)? },
        "crosstab" => Command::Crosstab { req_num: arg(0)? },
        "search" => Command::Search { req_num: arg(0)? },
        "lab-occupancy" => Command::LabOccupancy,
        "lab-submit" => Command::LabSubmit { path: arg(0)? },
        _ => return Err(usage()),
    };
    Ok((uni.clone(), command))
}

fn to_json<T: Serialize>(value: &T) -> DashboardResult<Value> {
    Ok(serde_json::to_value(value)?)
}

/// Runs one command for the context's user.
pub fn execute(ctx: &RequestContext, command: &Command) -> DashboardResult<Value> {
    match command {
        Command::Repository { unit, year } => {
            to_json(&repository_listing(ctx, unit, year.as_deref())?)
        }
        Command::FacultyGovernance { unit, year } => {
            to_json(&facgov_listing(ctx, unit, year.as_deref())?)
        }
        Command::Chart { metric, dept } => to_json(&department_chart(ctx, metric, dept)?),
        Command::Tree {
            metric,
            dept,
            fiscal,
        } => to_json(&deptprofile::department_tree_chart(ctx, metric, dept, *fiscal)?),
        Command::FacultyList { dept } => {
            to_json(&deptprofile::department_faculty_list(ctx, dept)?)
        }
        Command::Crosstab { req_num } => to_json(&searchcom::crosstab_for(ctx, req_num)?),
        Command::Search { req_num } => to_json(&search_dashboard(ctx, req_num)?),
        Command::LabOccupancy => to_json(&lab_occupancy::lab_occupancy_page(ctx)?),
        Command::LabSubmit { path } => {
            let body: Value = serde_json::from_str(&std::fs::read_to_string(path).map_err(|e| {
                DashboardError::InvalidRequest(format!("Cannot read {}: {}", path, e))
            })?)?;
            let outcome =
                record_submission(ctx.store, &ctx.config.tables.lab_occupancy, &body)?;
            Ok(Value::String(outcome.as_str().to_string()))
        }
    }
}

// ============================================================================
// ENTRY POINT
// ============================================================================

/// Document store seeded from the configured fixture (empty without one).
pub fn open_document_store(config: &DashboardConfig) -> DashboardResult<InMemoryStore> {
    match &config.fixture_path {
        Some(path) => {
            log_info!("CONFIG", "seeding store from {}", path.display());
            Ok(InMemoryStore::from_fixture_file(path)?)
        }
        None => {
            log_warn!("CONFIG", "no fixture configured, store is empty");
            Ok(InMemoryStore::new())
        }
    }
}

pub fn open_object_store(config: &DashboardConfig) -> Box<dyn ObjectStore> {
    match &config.object_root {
        Some(root) => Box::new(FsObjectStore::new(root.clone())),
        None => Box::new(InMemoryObjectStore::new()),
    }
}

fn start_logging(config: &DashboardConfig) {
    init_logger(log::LevelFilter::Info);
    let Some(path) = config.log_file.as_deref() else {
        return;
    };
    match init_log_file(path) {
        Ok(path) => log_info!("SYS", "dashboard starting, log={}", path.display()),
        Err(e) => eprintln!("[LOG_INIT] FAILED: {}", e),
    }
}

/// Loads config from the environment, runs one command and returns its JSON.
pub fn run(args: &[String]) -> DashboardResult<String> {
    let (uni, command) = parse_command(args)?;
    let config = DashboardConfig::from_env()?;
    run_command(&config, &uni, &command)
}

/// Runs `command` for `uni` against an explicit configuration.
pub fn run_command(config: &DashboardConfig, uni: &str, command: &Command) -> DashboardResult<String> {
    start_logging(config);

    let store = open_document_store(config)?;
    let objects = open_object_store(config);
    let ctx = RequestContext::for_uni(config, &store, objects.as_ref(), uni)?;

    let output = execute(&ctx, command)?;
    Ok(serde_json::to_string_pretty(&output)?)
}
