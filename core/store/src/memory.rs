//! FILENAME: core/store/src/memory.rs
//! In-memory document store.
//!
//! Tables hold items in insertion order behind a single RwLock. Queries read
//! a snapshot; writes replace items that share a primary key.

use std::path::Path;
use std::sync::RwLock;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use records::Record;

use crate::error::StoreError;
use crate::query::Query;
use crate::DocumentStore;

// ============================================================================
// SCHEMA
// ============================================================================

/// Key attributes of a secondary index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSchema {
    pub name: String,
    pub partition_key: String,
    #[serde(default)]
    pub sort_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    pub partition_key: String,
    #[serde(default)]
    pub sort_key: Option<String>,
    #[serde(default)]
    pub indexes: Vec<IndexSchema>,
}

impl TableSchema {
    pub fn new(partition_key: &str, sort_key: Option<&str>) -> Self {
        TableSchema {
            partition_key: partition_key.to_string(),
            sort_key: sort_key.map(str::to_string),
            indexes: Vec::new(),
        }
    }

    pub fn with_index(mut self, name: &str, partition_key: &str, sort_key: Option<&str>) -> Self {
        self.indexes.push(IndexSchema {
            name: name.to_string(),
            partition_key: partition_key.to_string(),
            sort_key: sort_key.map(str::to_string),
        });
        self
    }

    /// Partition and sort attribute names for the table or one of its indexes.
    fn key_attributes<'a>(
        &'a self,
        table: &str,
        index: Option<&str>,
    ) -> Result<(&'a str, Option<&'a str>), StoreError> {
        match index {
            None => Ok((self.partition_key.as_str(), self.sort_key.as_deref())),
            Some(name) => self
                .indexes
                .iter()
                .find(|i| i.name == name)
                .map(|i| (i.partition_key.as_str(), i.sort_key.as_deref()))
                .ok_or_else(|| StoreError::IndexNotFound {
                    table: table.to_string(),
                    index: name.to_string(),
                }),
        }
    }
}

// ============================================================================
// FIXTURES
// ============================================================================

/// One table of a fixture file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableFixture {
    pub schema: TableSchema,
    #[serde(default)]
    pub items: Vec<Record>,
}

/// JSON fixture: `{"tables": {"<name>": {"schema": {...}, "items": [...]}}}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Fixture {
    pub tables: FxHashMap<String, TableFixture>,
}

// ============================================================================
// STORE
// ============================================================================

#[derive(Debug)]
struct Table {
    schema: TableSchema,
    items: Vec<Record>,
}

impl Table {
    fn primary_key(&self, table: &str, item: &Record) -> Result<(String, Option<String>), StoreError> {
        let attribute = |name: &str| {
            item.get(name)
                .map(|v| v.display_value())
                .ok_or_else(|| StoreError::MissingKeyAttribute {
                    table: table.to_string(),
                    attribute: name.to_string(),
                })
        };
        let partition = attribute(self.schema.partition_key.as_str())?;
        let sort = match &self.schema.sort_key {
            Some(name) => Some(attribute(name.as_str())?),
            None => None,
        };
        Ok((partition, sort))
    }
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<FxHashMap<String, Table>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates (or empties) a table.
    pub fn create_table(&self, name: &str, schema: TableSchema) -> Result<(), StoreError> {
        let mut tables = self.tables.write().map_err(|_| StoreError::LockPoisoned)?;
        tables.insert(
            name.to_string(),
            Table {
                schema,
                items: Vec::new(),
            },
        );
        Ok(())
    }

    pub fn load_fixture(&self, fixture: Fixture) -> Result<(), StoreError> {
        for (name, table) in fixture.tables {
            self.create_table(&name, table.schema)?;
            for item in table.items {
                self.put_item(&name, item)
                    .map_err(|e| StoreError::InvalidFixture(format!("table '{}': {}", name, e)))?;
            }
        }
        Ok(())
    }

    pub fn from_fixture_str(json: &str) -> Result<Self, StoreError> {
        let fixture: Fixture = serde_json::from_str(json)?;
        let store = InMemoryStore::new();
        store.load_fixture(fixture)?;
        Ok(store)
    }

    pub fn from_fixture_file(path: &Path) -> Result<Self, StoreError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_fixture_str(&json)
    }

    /// Number of items in a table.
    pub fn item_count(&self, table: &str) -> Result<usize, StoreError> {
        let tables = self.tables.read().map_err(|_| StoreError::LockPoisoned)?;
        tables
            .get(table)
            .map(|t| t.items.len())
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))
    }
}

impl DocumentStore for InMemoryStore {
    fn query(&self, table: &str, query: &Query) -> Result<Vec<Record>, StoreError> {
        let tables = self.tables.read().map_err(|_| StoreError::LockPoisoned)?;
        let t = tables
            .get(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;
        let (partition_attr, sort_attr) = t.schema.key_attributes(table, query.index.as_deref())?;

        let mut hits: Vec<(String, &Record)> = Vec::new();
        for item in &t.items {
            // Index entries only exist for items carrying the index keys.
            let Some(partition) = item.get(partition_attr) else {
                continue;
            };
            if partition.display_value() != query.partition {
                continue;
            }
            let sort_value = match sort_attr {
                Some(attr) => match item.get(attr) {
                    Some(v) => v.display_value(),
                    None => continue,
                },
                None => String::new(),
            };
            if let Some(condition) = &query.sort {
                if sort_attr.is_none() || !condition.matches(&sort_value) {
                    continue;
                }
            }
            if let Some(filter) = &query.filter {
                if !filter.matches(item) {
                    continue;
                }
            }
            hits.push((sort_value, item));
        }

        hits.sort_by(|a, b| a.0.cmp(&b.0));
        if !query.scan_forward {
            hits.reverse();
        }

        Ok(hits
            .into_iter()
            .map(|(_, item)| match &query.projection {
                Some(fields) => item.project(fields),
                None => item.clone(),
            })
            .collect())
    }

    fn scan(&self, table: &str) -> Result<Vec<Record>, StoreError> {
        let tables = self.tables.read().map_err(|_| StoreError::LockPoisoned)?;
        tables
            .get(table)
            .map(|t| t.items.clone())
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))
    }

    fn put_item(&self, table: &str, item: Record) -> Result<(), StoreError> {
        let mut tables = self.tables.write().map_err(|_| StoreError::LockPoisoned)?;
        let t = tables
            .get_mut(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;

        let key = t.primary_key(table, &item)?;
        let mut existing = None;
        for (i, stored) in t.items.iter().enumerate() {
            if t.primary_key(table, stored)? == key {
                existing = Some(i);
                break;
            }
        }
        match existing {
            Some(i) => t.items[i] = item,
            None => t.items.push(item),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{data_sort_range, dept_partition, Filter, KeyCondition};
    use std::io::Write;

    fn repository_store() -> InMemoryStore {
        let store = InMemoryStore::new();
        store
            .create_table(
                "repository",
                TableSchema::new("PK", Some("SK"))
                    .with_index("unit-year-index", "unit", Some("year")),
            )
            .unwrap();
        for (unit, year, name) in [
            ("PPC", "2020", "b.pdf"),
            ("PPC", "2019", "a.pdf"),
            ("CED", "2020", "c.pdf"),
        ] {
            store
                .put_item(
                    "repository",
                    Record::new()
                        .with("PK", format!("FILE#{}", name))
                        .with("SK", "META")
                        .with("unit", unit)
                        .with("year", year)
                        .with("file_name", name),
                )
                .unwrap();
        }
        store
    }

    fn names(items: &[Record]) -> Vec<String> {
        items.iter().map(|r| r.display_value("file_name")).collect()
    }

    #[test]
    fn test_index_query_with_and_without_year() {
        let store = repository_store();

        let all = store
            .query("repository", &Query::partition("PPC").on_index("unit-year-index"))
            .unwrap();
        assert_eq!(names(&all), vec!["a.pdf", "b.pdf"]);

        let year = store
            .query(
                "repository",
                &Query::partition("PPC")
                    .on_index("unit-year-index")
                    .sort_key(KeyCondition::eq("2020")),
            )
            .unwrap();
        assert_eq!(names(&year), vec!["b.pdf"]);
    }

    #[test]
    fn test_descending_and_projection() {
        let store = repository_store();
        let items = store
            .query(
                "repository",
                &Query::partition("PPC")
                    .on_index("unit-year-index")
                    .descending()
                    .project(&["file_name"]),
            )
            .unwrap();
        assert_eq!(names(&items), vec!["b.pdf", "a.pdf"]);
        assert_eq!(items[0].len(), 1);
    }

    #[test]
    fn test_sparse_index_skips_items_without_index_keys() {
        let store = repository_store();
        store
            .put_item(
                "repository",
                Record::new().with("PK", "FILE#loose.pdf").with("SK", "META").with("unit", "PPC"),
            )
            .unwrap();
        let items = store
            .query("repository", &Query::partition("PPC").on_index("unit-year-index"))
            .unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(store.item_count("repository").unwrap(), 4);
    }

    #[test]
    fn test_put_replaces_same_primary_key() {
        let store = repository_store();
        store
            .put_item(
                "repository",
                Record::new()
                    .with("PK", "FILE#a.pdf")
                    .with("SK", "META")
                    .with("unit", "PPC")
                    .with("year", "2018")
                    .with("file_name", "a.pdf"),
            )
            .unwrap();
        assert_eq!(store.item_count("repository").unwrap(), 3);
        let items = store
            .query(
                "repository",
                &Query::partition("PPC")
                    .on_index("unit-year-index")
                    .sort_key(KeyCondition::eq("2018")),
            )
            .unwrap();
        assert_eq!(names(&items), vec!["a.pdf"]);
    }

    #[test]
    fn test_put_requires_key_attributes() {
        let store = repository_store();
        let err = store
            .put_item("repository", Record::new().with("PK", "x"))
            .unwrap_err();
        assert!(matches!(err, StoreError::MissingKeyAttribute { ref attribute, .. } if attribute == "SK"));
    }

    #[test]
    fn test_unknown_table_and_index() {
        let store = repository_store();
        assert!(matches!(
            store.scan("nope"),
            Err(StoreError::TableNotFound(_))
        ));
        assert!(matches!(
            store.query("repository", &Query::partition("PPC").on_index("nope")),
            Err(StoreError::IndexNotFound { .. })
        ));
    }

    #[test]
    fn test_range_query_with_filter() {
        let store = InMemoryStore::new();
        store
            .create_table("deptprofile", TableSchema::new("PK", Some("SK")))
            .unwrap();
        for (sk, ten_stat) in [
            ("DATA#CLASSES#2007#Tenured", "Tenured"),
            ("DATA#CLASSES#2010#Tenured", "Tenured"),
            ("DATA#CLASSES#2010#Adjunct", "Adjunct"),
            ("DATA#CLASSES#2019#NTBOT", "NTBOT"),
        ] {
            store
                .put_item(
                    "deptprofile",
                    Record::new()
                        .with("PK", dept_partition("ECON"))
                        .with("SK", sk)
                        .with("ten_stat", ten_stat),
                )
                .unwrap();
        }

        let items = store
            .query(
                "deptprofile",
                &Query::partition("DEPT#ECON")
                    .sort_key(data_sort_range("CLASSES", 2008, 2019))
                    .filter(Filter::AnyOf {
                        field: "ten_stat".to_string(),
                        values: vec!["Tenured".into(), "NTBOT".into()],
                    }),
            )
            .unwrap();
        let keys: Vec<String> = items.iter().map(|r| r.display_value("SK")).collect();
        assert_eq!(keys, vec!["DATA#CLASSES#2010#Tenured", "DATA#CLASSES#2019#NTBOT"]);
    }

    #[test]
    fn test_fixture_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"tables": {{"users": {{
                "schema": {{"partition_key": "uni"}},
                "items": [{{"uni": "ab1234", "roles": ["admin"]}}]
            }}}}}}"#
        )
        .unwrap();

        let store = InMemoryStore::from_fixture_file(file.path()).unwrap();
        let items = store.query("users", &Query::partition("ab1234")).unwrap();
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_fixture_item_missing_key_is_invalid() {
        let json = r#"{"tables": {"users": {"schema": {"partition_key": "uni"}, "items": [{"name": "x"}]}}}"#;
        assert!(matches!(
            InMemoryStore::from_fixture_str(json),
            Err(StoreError::InvalidFixture(_))
        ));
    }
}
