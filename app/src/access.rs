//! FILENAME: app/src/access.rs
// PURPOSE: Users, roles and per-dashboard access checks.
// CONTEXT: The users table holds one item per uni:
//   {"uni": "ab1234", "roles": ["searchcom", "deptprofile"],
//    "requisitions": ["REQ1"], "departments": ["ECON"]}

use serde::{Deserialize, Serialize};
use records::{FieldValue, Record};
use store::{DocumentStore, Query};

use crate::error::{DashboardError, DashboardResult};
use crate::log_debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Role {
    Admin,
    FacultyGovernance,
    SearchCommittee { requisitions: Vec<String> },
    DepartmentProfile { departments: Vec<String> },
    LabOccupancy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub uni: String,
    pub roles: Vec<Role>,
}

fn string_list(item: &Record, field: &str) -> Vec<String> {
    item.get(field)
        .and_then(FieldValue::as_list)
        .map(|values| values.iter().map(FieldValue::display_value).collect())
        .unwrap_or_default()
}

impl User {
    /// A user with no roles.
    pub fn anonymous(uni: &str) -> Self {
        User {
            uni: uni.to_string(),
            roles: Vec::new(),
        }
    }

    /// Builds a user from a users-table item. Unknown role names are ignored.
    pub fn from_item(uni: &str, item: &Record) -> Self {
        let roles = string_list(item, "roles")
            .into_iter()
            .filter_map(|name| match name.as_str() {
                "admin" => Some(Role::Admin),
                "facgov" => Some(Role::FacultyGovernance),
                "searchcom" => Some(Role::SearchCommittee {
                    requisitions: string_list(item, "requisitions"),
                }),
                "deptprofile" => Some(Role::DepartmentProfile {
                    departments: string_list(item, "departments"),
                }),
                "lab_occupancy" => Some(Role::LabOccupancy),
                _ => None,
            })
            .collect();
        User {
            uni: uni.to_string(),
            roles,
        }
    }

    /// Loads a user by uni. A uni missing from the table has no roles.
    pub fn load(store: &dyn DocumentStore, table: &str, uni: &str) -> DashboardResult<Self> {
        let items = store.query(table, &Query::partition(uni))?;
        let user = match items.first() {
            Some(item) => User::from_item(uni, item),
            None => User::anonymous(uni),
        };
        log_debug!("ACCESS", "loaded uni={} roles={}", uni, user.roles.len());
        Ok(user)
    }

    pub fn is_admin(&self) -> bool {
        self.roles.contains(&Role::Admin)
    }

    pub fn has_facgov_access(&self) -> bool {
        self.is_admin() || self.roles.contains(&Role::FacultyGovernance)
    }

    pub fn has_lab_occupancy_access(&self) -> bool {
        self.is_admin() || self.roles.contains(&Role::LabOccupancy)
    }

    /// Requisition numbers granted through search committee roles.
    pub fn allowed_requisitions(&self) -> Vec<&str> {
        self.roles
            .iter()
            .filter_map(|role| match role {
                Role::SearchCommittee { requisitions } => Some(requisitions),
                _ => None,
            })
            .flatten()
            .map(String::as_str)
            .collect()
    }

    pub fn allowed_departments(&self) -> Vec<&str> {
        self.roles
            .iter()
            .filter_map(|role| match role {
                Role::DepartmentProfile { departments } => Some(departments),
                _ => None,
            })
            .flatten()
            .map(String::as_str)
            .collect()
    }

    pub fn can_view_search(&self, req_num: &str) -> bool {
        self.is_admin() || self.allowed_requisitions().contains(&req_num)
    }

    pub fn can_view_department(&self, dept: &str) -> bool {
        self.is_admin() || self.allowed_departments().contains(&dept)
    }
}

/// Turns a failed check into `Forbidden(message)`.
pub fn require(allowed: bool, message: &str) -> DashboardResult<()> {
    if allowed {
        Ok(())
    } else {
        Err(DashboardError::Forbidden(message.to_string()))
    }
}
