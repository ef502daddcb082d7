//! FILENAME: app/src/access_log.rs
// PURPOSE: Records each dashboard visit and download in the access-log table.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{SecondsFormat, Utc};
use records::Record;
use store::DocumentStore;

use crate::error::DashboardResult;
use crate::log_info;

/// Disambiguates entries written within the same timestamp tick.
static ENTRY_SEQ: AtomicU64 = AtomicU64::new(0);

/// Writes access entries for one page (e.g. "facgov_download").
pub struct AccessLogger<'a> {
    store: &'a dyn DocumentStore,
    table: String,
    page: String,
}

impl<'a> AccessLogger<'a> {
    pub fn new(store: &'a dyn DocumentStore, table: &str, page: &str) -> Self {
        AccessLogger {
            store,
            table: table.to_string(),
            page: page.to_string(),
        }
    }

    pub fn page(&self) -> &str {
        &self.page
    }

    pub fn log_access(
        &self,
        uni: &str,
        has_access: bool,
        downloaded_object: Option<&str>,
    ) -> DashboardResult<()> {
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);
        let seq = ENTRY_SEQ.fetch_add(1, Ordering::SeqCst);

        let mut entry = Record::new()
            .with("uni", uni)
            .with("entry_id", format!("{}#{:06}", timestamp, seq))
            .with("page", self.page.as_str())
            .with("timestamp", timestamp)
            .with("has_access", has_access);
        if let Some(object) = downloaded_object {
            entry.insert("downloaded_object", object);
        }

        self.store.put_item(&self.table, entry)?;
        log_info!(
            "ACCESS",
            "page={} uni={} has_access={} object={}",
            self.page,
            uni,
            has_access,
            downloaded_object.unwrap_or("-")
        );
        Ok(())
    }
}
