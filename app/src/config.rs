//! FILENAME: app/src/config.rs
// PURPOSE: Deployment configuration (table names, buckets, year window).
// CONTEXT: Table and repository bucket names come in a _DEV and a _PROD
// flavour; DASHBOARD_ENV picks one.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use records::AcademicYears;

use crate::error::{DashboardError, DashboardResult};

/// First submission date shown on the lab occupancy page.
pub const LAB_OCCUPANCY_START_DATE: &str = "2020-06-21";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeployEnv {
    Dev,
    Prod,
}

impl DeployEnv {
    fn suffix(self) -> &'static str {
        match self {
            DeployEnv::Dev => "DEV",
            DeployEnv::Prod => "PROD",
        }
    }

    fn parse(value: &str) -> DashboardResult<Self> {
        match value.trim().to_lowercase().as_str() {
            "dev" => Ok(DeployEnv::Dev),
            "" | "prod" => Ok(DeployEnv::Prod),
            other => Err(DashboardError::Config(format!(
                "DASHBOARD_ENV must be 'dev' or 'prod', got '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableNames {
    pub users: String,
    pub access_logs: String,
    pub searchcom_applicant: String,
    pub searchcom_posting: String,
    pub searchcom_pipeline: String,
    pub searchcom_subfields: String,
    pub lab_occupancy: String,
    pub deptprofile: String,
    pub repository: String,
    pub facgov: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketNames {
    pub repository: String,
    pub facgov: String,
    #[serde(default)]
    pub fif: Option<String>,
    #[serde(default)]
    pub templates: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardConfig {
    pub env: DeployEnv,
    pub tables: TableNames,
    pub buckets: BucketNames,
    #[serde(default)]
    pub form_url: Option<String>,
    #[serde(default)]
    pub log_file: Option<PathBuf>,
    /// JSON fixture seeding the in-memory document store.
    #[serde(default)]
    pub fixture_path: Option<PathBuf>,
    /// Directory holding one sub-directory per bucket.
    #[serde(default)]
    pub object_root: Option<PathBuf>,
    #[serde(default)]
    pub years: AcademicYears,
    #[serde(default = "default_lab_start")]
    pub lab_occupancy_start: String,
}

fn default_lab_start() -> String {
    LAB_OCCUPANCY_START_DATE.to_string()
}

impl DashboardConfig {
    /// Reads the configuration from process environment variables.
    pub fn from_env() -> DashboardResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from any variable source.
    pub fn from_lookup<F>(lookup: F) -> DashboardResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = DeployEnv::parse(&lookup("DASHBOARD_ENV").unwrap_or_default())?;
        let suffix = env.suffix();

        let required = |base: &str| -> DashboardResult<String> {
            let name = format!("{}_{}", base, suffix);
            lookup(&name)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| DashboardError::Config(format!("{} is not set", name)))
        };
        let optional = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let tables = TableNames {
            users: required("DB_USERS")?,
            access_logs: required("DB_ACCESS_LOGS")?,
            searchcom_applicant: required("DB_SEARCHCOM_APPLICANT")?,
            searchcom_posting: required("DB_SEARCHCOM_POSTING")?,
            searchcom_pipeline: required("DB_SEARCHCOM_PIPELINE")?,
            searchcom_subfields: required("DB_SEARCHCOM_SUBFIELDS")?,
            lab_occupancy: required("DB_LAB_OCCUPANCY")?,
            deptprofile: required("DB_DEPTPROFILE")?,
            repository: required("DB_REPOSITORY")?,
            facgov: required("DB_FACGOV")?,
        };
        let buckets = BucketNames {
            repository: required("REPOSITORY_BUCKET_NAME")?,
            facgov: required("FACGOV_BUCKET_NAME")?,
            fif: optional("FIF_BUCKET_NAME"),
            templates: optional("TEMPLATES_BUCKET_NAME"),
        };

        let defaults = AcademicYears::default();
        let year = |name: &str, default: u32| -> DashboardResult<u32> {
            match optional(name) {
                Some(v) => v.trim().parse().map_err(|_| {
                    DashboardError::Config(format!("{} must be a year, got '{}'", name, v))
                }),
                None => Ok(default),
            }
        };
        let years = AcademicYears::new(
            year("DASHBOARD_FIRST_FISCAL_YEAR", defaults.first_fiscal)?,
            year("DASHBOARD_LAST_FISCAL_YEAR", defaults.last_fiscal)?,
        );

        Ok(DashboardConfig {
            env,
            tables,
            buckets,
            form_url: optional("FORM_URL"),
            log_file: optional("DASHBOARD_LOG_FILE").map(PathBuf::from),
            fixture_path: optional("DASHBOARD_FIXTURE").map(PathBuf::from),
            object_root: optional("DASHBOARD_OBJECT_ROOT").map(PathBuf::from),
            years,
            lab_occupancy_start: optional("LAB_OCCUPANCY_START_DATE")
                .unwrap_or_else(default_lab_start),
        })
    }

    pub fn from_json_file(path: &Path) -> DashboardResult<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| DashboardError::Config(format!("Cannot read {:?}: {}", path, e)))?;
        Ok(serde_json::from_str(&json)?)
    }
}
