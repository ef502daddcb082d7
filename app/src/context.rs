//! FILENAME: app/src/context.rs
// PURPOSE: Everything a dashboard request needs, passed explicitly.

use store::{DocumentStore, ObjectStore};

use crate::access::User;
use crate::access_log::AccessLogger;
use crate::config::DashboardConfig;
use crate::error::DashboardResult;

pub struct RequestContext<'a> {
    pub config: &'a DashboardConfig,
    pub store: &'a dyn DocumentStore,
    pub objects: &'a dyn ObjectStore,
    pub user: User,
}

impl<'a> RequestContext<'a> {
    /// Builds a context for `uni`, loading the user's roles from the users table.
    pub fn for_uni(
        config: &'a DashboardConfig,
        store: &'a dyn DocumentStore,
        objects: &'a dyn ObjectStore,
        uni: &str,
    ) -> DashboardResult<Self> {
        let user = User::load(store, &config.tables.users, uni)?;
        Ok(RequestContext {
            config,
            store,
            objects,
            user,
        })
    }

    pub fn access_logger(&self, page: &str) -> AccessLogger<'a> {
        AccessLogger::new(self.store, &self.config.tables.access_logs, page)
    }

    /// Logs a page visit for the current user.
    pub fn log_visit(&self, page: &str, has_access: bool) -> DashboardResult<()> {
        self.access_logger(page)
            .log_access(&self.user.uni, has_access, None)
    }
}
