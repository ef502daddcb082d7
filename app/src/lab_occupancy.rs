//! FILENAME: app/src/lab_occupancy.rs
// PURPOSE: Lab occupancy sign-in/sign-out records posted by the form webhook.
// CONTEXT: Items are keyed by `uni` with a `timestamp` sort key.

use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use records::Record;
use store::{DocumentStore, KeyCondition, Query};

use crate::access::require;
use crate::context::RequestContext;
use crate::error::DashboardResult;
use crate::{log_info, log_warn};

/// Upper bound of the timestamp range; sorts after every real timestamp.
const TIMESTAMP_CEILING: &str = "9999-99-99";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SubmissionError {
    #[error("Missing key '{0}' in submission")]
    MissingKey(String),

    #[error("Unknown destination '{0}'")]
    UnknownDestination(String),
}

/// Webhook reply body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmissionOutcome {
    Success,
    Failure,
}

impl SubmissionOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionOutcome::Success => "Success",
            SubmissionOutcome::Failure => "Failure",
        }
    }
}

fn key<'a>(body: &'a Value, name: &str) -> Result<&'a Value, SubmissionError> {
    body.get(name)
        .ok_or_else(|| SubmissionError::MissingKey(name.to_string()))
}

/// Scalar as text; numbers and booleans are printed as-is.
fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Reads a form submission into a lab occupancy item.
pub fn parse_submission(body: &Value) -> Result<Record, SubmissionError> {
    let destination = text(key(body, "Destination")?);

    let room = match destination.to_lowercase().as_str() {
        "my lab" => {
            let rooms = key(body, "RoomByPI")?
                .as_array()
                .map(Vec::as_slice)
                .unwrap_or_default();
            rooms
                .iter()
                .map(|room| key(room, "Label").map(text))
                .collect::<Result<Vec<String>, _>>()?
                .join(", ")
        }
        "another lab" => format!(
            "{} {}",
            text(key(body, "BuildingOther")?),
            text(key(key(body, "RoomOther")?, "Label")?)
        ),
        _ => return Err(SubmissionError::UnknownDestination(destination)),
    };

    Ok(Record::new()
        .with("timestamp", text(key(key(body, "Entry")?, "Timestamp")?))
        .with("uni", text(key(body, "UNI")?))
        .with("action", text(key(body, "Action")?))
        .with("destination", destination)
        .with("room", room))
}

/// Stores a submission. A submission with missing keys leaves a
/// "key error" marker item so broken form payloads can be traced.
pub fn record_submission(store: &dyn DocumentStore, table: &str, body: &Value) -> DashboardResult<SubmissionOutcome> {
    match parse_submission(body) {
        Ok(item) => {
            log_info!(
                "LAB",
                "uni={} action={} room={}",
                item.display_value("uni"),
                item.display_value("action"),
                item.display_value("room")
            );
            store.put_item(table, item)?;
            Ok(SubmissionOutcome::Success)
        }
        Err(SubmissionError::MissingKey(name)) => {
            log_warn!("LAB", "submission missing key '{}'", name);
            let marker = Record::new()
                .with("timestamp", Local::now().format("%Y-%m-%d %H:%M:%S%.6f").to_string())
                .with("uni", "key error");
            store.put_item(table, marker)?;
            Ok(SubmissionOutcome::Failure)
        }
        Err(err) => {
            log_warn!("LAB", "{}", err);
            Ok(SubmissionOutcome::Failure)
        }
    }
}

/// The user's records from `start_date` on, newest first.
pub fn user_records(store: &dyn DocumentStore, table: &str, uni: &str, start_date: &str) -> DashboardResult<Vec<Record>> {
    let query = Query::partition(uni)
        .sort_key(KeyCondition::between(start_date, TIMESTAMP_CEILING))
        .descending();
    Ok(store.query(table, &query)?)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabOccupancyPage {
    pub uni: String,
    pub form_url: Option<String>,
    pub records: Vec<Record>,
}

pub fn lab_occupancy_page(ctx: &RequestContext) -> DashboardResult<LabOccupancyPage> {
    let allowed = ctx.user.has_lab_occupancy_access();
    ctx.log_visit("lab_occupancy", allowed)?;
    require(allowed, "You don't have access to lab occupancy.")?;

    let records = user_records(
        ctx.store,
        &ctx.config.tables.lab_occupancy,
        &ctx.user.uni,
        &ctx.config.lab_occupancy_start,
    )?;
    Ok(LabOccupancyPage {
        uni: ctx.user.uni.clone(),
        form_url: ctx.config.form_url.clone(),
        records,
    })
}
