//! FILENAME: core/store/src/lib.rs
//! Storage access for the division dashboards.
//!
//! Two seams, both passed to the dashboards explicitly:
//! - `DocumentStore`: partitioned tables of records (queries, scans, puts)
//! - `ObjectStore`: bucketed documents served as downloads
//!
//! The in-memory implementations back tests and the fixture-driven binary.

mod error;
mod memory;
mod object;
mod query;

pub use error::StoreError;
pub use memory::{Fixture, InMemoryStore, IndexSchema, TableFixture, TableSchema};
pub use object::{FsObjectStore, InMemoryObjectStore, ObjectStore};
pub use query::{data_sort_range, dept_partition, Filter, KeyCondition, Query};

use records::Record;

/// Partitioned document tables.
pub trait DocumentStore: Send + Sync {
    /// Items of one partition, ordered by sort key.
    fn query(&self, table: &str, query: &Query) -> Result<Vec<Record>, StoreError>;

    /// Every item of a table.
    fn scan(&self, table: &str) -> Result<Vec<Record>, StoreError>;

    /// Inserts an item, replacing any item with the same primary key.
    fn put_item(&self, table: &str, item: Record) -> Result<(), StoreError>;
}
