//! FILENAME: app/src/download.rs
// PURPOSE: Serves archived documents from object storage.

use serde::{Deserialize, Serialize};
use store::StoreError;

use crate::access::require;
use crate::context::RequestContext;
use crate::error::{DashboardError, DashboardResult};
use crate::facgov::NO_ACCESS_MESSAGE;
use crate::{log_enter, log_exit, log_warn};

/// Which archive a download comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DownloadArea {
    Repository,
    FacultyGovernance,
}

impl DownloadArea {
    /// Page the user is sent back to for folder-like keys.
    pub fn base_path(self) -> &'static str {
        match self {
            DownloadArea::Repository => "/docs2",
            DownloadArea::FacultyGovernance => "/faculty_governance",
        }
    }

    fn log_page(self) -> &'static str {
        match self {
            DownloadArea::Repository => "repository_download",
            DownloadArea::FacultyGovernance => "facgov_download",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileResponse {
    pub body: Vec<u8>,
    pub mime_type: &'static str,
    pub content_disposition: String,
}

/// Last path segment of an object key.
pub fn file_name(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}

/// MIME type guessed from the key's extension.
pub fn mime_type(key: &str) -> &'static str {
    let name = file_name(key);
    let extension = match name.rsplit_once('.') {
        Some((_, ext)) => ext.to_lowercase(),
        None => return "application/octet-stream",
    };
    match extension.as_str() {
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "ppt" => "application/vnd.ms-powerpoint",
        "pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "txt" => "text/plain",
        "csv" => "text/csv",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "html" | "htm" => "text/html",
        _ => "application/octet-stream",
    }
}

/// Fetches `key` from the area's bucket for the current user.
///
/// Every attempt is written to the access log. Folder keys (ending in `/`)
/// redirect to the area's page.
pub fn download(
    ctx: &RequestContext,
    area: DownloadArea,
    key: &str,
) -> DashboardResult<FileResponse> {
    log_enter!("DOWNLOAD", "download", "area={:?} key={}", area, key);
    let logger = ctx.access_logger(area.log_page());
    let uni = ctx.user.uni.as_str();

    let bucket = match area {
        DownloadArea::Repository => &ctx.config.buckets.repository,
        DownloadArea::FacultyGovernance => {
            if !ctx.user.has_facgov_access() {
                logger.log_access(uni, false, Some(key))?;
                log_warn!("DOWNLOAD", "forbidden uni={} key={}", uni, key);
                require(false, NO_ACCESS_MESSAGE)?;
            }
            &ctx.config.buckets.facgov
        }
    };

    if key.ends_with('/') {
        return Err(DashboardError::Redirect(area.base_path().to_string()));
    }

    let body = match ctx.objects.get(bucket, key) {
        Ok(body) => body,
        Err(StoreError::NoSuchKey { .. }) => {
            logger.log_access(uni, false, Some(key))?;
            return Err(DashboardError::NotFound(format!(
                "File {} not found.",
                file_name(key)
            )));
        }
        Err(e) => return Err(e.into()),
    };

    logger.log_access(uni, true, Some(key))?;
    log_exit!("DOWNLOAD", "download", "bytes={}", body.len());
    Ok(FileResponse {
        body,
        mime_type: mime_type(key),
        content_disposition: format!("inline; filename={}", file_name(key)),
    })
}
