//! FILENAME: core/store/src/query.rs
//! Query description for partitioned document tables.
//!
//! A query selects one partition (of the table or of a secondary index),
//! optionally narrows it by a sort-key condition and an attribute filter,
//! and returns the items ordered by sort key.

use serde::{Deserialize, Serialize};
use records::{FieldValue, Record};

/// Condition on the sort key. Comparisons are on the key's display text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum KeyCondition {
    Eq { value: String },
    /// Inclusive on both ends.
    Between { low: String, high: String },
    BeginsWith { prefix: String },
}

impl KeyCondition {
    pub fn eq(value: impl Into<String>) -> Self {
        KeyCondition::Eq { value: value.into() }
    }

    pub fn between(low: impl Into<String>, high: impl Into<String>) -> Self {
        KeyCondition::Between {
            low: low.into(),
            high: high.into(),
        }
    }

    pub fn begins_with(prefix: impl Into<String>) -> Self {
        KeyCondition::BeginsWith {
            prefix: prefix.into(),
        }
    }

    pub fn matches(&self, key: &str) -> bool {
        match self {
            KeyCondition::Eq { value } => key == value,
            KeyCondition::Between { low, high } => key >= low.as_str() && key <= high.as_str(),
            KeyCondition::BeginsWith { prefix } => key.starts_with(prefix.as_str()),
        }
    }
}

/// Attribute filter applied after the key conditions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Filter {
    /// Attribute equals one of `values`. Items without the attribute fail.
    AnyOf { field: String, values: Vec<FieldValue> },
}

impl Filter {
    pub fn any_of<V: Into<FieldValue>>(field: &str, values: impl IntoIterator<Item = V>) -> Self {
        Filter::AnyOf {
            field: field.to_string(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn matches(&self, item: &Record) -> bool {
        match self {
            Filter::AnyOf { field, values } => item
                .get(field)
                .map(|value| values.contains(value))
                .unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    /// Secondary index to query instead of the table's primary key.
    pub index: Option<String>,
    /// Required partition key value.
    pub partition: String,
    pub sort: Option<KeyCondition>,
    pub filter: Option<Filter>,
    /// Ascending by sort key when true.
    pub scan_forward: bool,
    /// Attributes to return; all when `None`.
    pub projection: Option<Vec<String>>,
}

impl Query {
    pub fn partition(value: impl Into<String>) -> Self {
        Query {
            index: None,
            partition: value.into(),
            sort: None,
            filter: None,
            scan_forward: true,
            projection: None,
        }
    }

    pub fn on_index(mut self, index: impl Into<String>) -> Self {
        self.index = Some(index.into());
        self
    }

    pub fn sort_key(mut self, condition: KeyCondition) -> Self {
        self.sort = Some(condition);
        self
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn descending(mut self) -> Self {
        self.scan_forward = false;
        self
    }

    pub fn project(mut self, fields: &[&str]) -> Self {
        self.projection = Some(fields.iter().map(|f| f.to_string()).collect());
        self
    }
}

// ============================================================================
// KEY HELPERS
// ============================================================================

/// Partition key of a department's profile data.
pub fn dept_partition(dept: &str) -> String {
    format!("DEPT#{}", dept)
}

/// Sort-key range covering fiscal years `first..=last` of a data series.
///
/// The upper bound is `DATA#<prefix>#<last + 1>$` so every key of the last
/// year (`DATA#<prefix>#<last>#...`) falls inside it.
pub fn data_sort_range(prefix: &str, first_fiscal: u32, last_fiscal: u32) -> KeyCondition {
    KeyCondition::between(
        format!("DATA#{}#{}", prefix, first_fiscal),
        format!("DATA#{}#{}$", prefix, last_fiscal + 1),
    )
}
