//! FILENAME: core/records/src/record.rs
//! PURPOSE: A single flat key/value row returned by a store query.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::RecordError;
use crate::value::FieldValue;

/// One item from the document store.
///
/// Field order is not significant; fields are kept in a `BTreeMap` so that
/// serialized records are stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, FieldValue>,
}

impl Record {
    pub fn new() -> Self {
        Record {
            fields: BTreeMap::new(),
        }
    }

    /// Builder-style insert, used heavily by fixtures and tests.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn remove(&mut self, field: &str) -> Option<FieldValue> {
        self.fields.remove(field)
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Returns the field or a `MissingField` error naming the record's
    /// position in the sequence being processed.
    pub fn require(&self, field: &str, record: usize) -> Result<&FieldValue, RecordError> {
        self.fields.get(field).ok_or_else(|| RecordError::MissingField {
            field: field.to_string(),
            record,
        })
    }

    pub fn text(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(FieldValue::as_str)
    }

    pub fn number(&self, field: &str) -> Option<f64> {
        self.get(field).and_then(FieldValue::as_f64)
    }

    /// Display text for a field; missing fields read as empty.
    pub fn display_value(&self, field: &str) -> String {
        self.get(field)
            .map(FieldValue::display_value)
            .unwrap_or_default()
    }

    /// Keeps only the named fields (store projection expressions).
    pub fn project(&self, fields: &[String]) -> Record {
        let fields = self
            .fields
            .iter()
            .filter(|(name, _)| fields.iter().any(|f| f == *name))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        Record { fields }
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Converts the record into a JSON value so typed views can be decoded
    /// with `serde_json::from_value`.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl FromIterator<(String, FieldValue)> for Record {
    fn from_iter<T: IntoIterator<Item = (String, FieldValue)>>(iter: T) -> Self {
        Record {
            fields: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_names_field_and_index() {
        let record = Record::new().with("unit", "PPC");
        assert!(record.require("unit", 0).is_ok());

        let err = record.require("year", 4).unwrap_err();
        assert_eq!(
            err,
            RecordError::MissingField {
                field: "year".to_string(),
                record: 4
            }
        );
    }

    #[test]
    fn test_projection_keeps_named_fields() {
        let record = Record::new()
            .with("fte", 12.0)
            .with("ten_stat", "Tenured")
            .with("PK", "DEPT#ECON");
        let projected = record.project(&["fte".to_string(), "ten_stat".to_string()]);
        assert_eq!(projected.len(), 2);
        assert!(!projected.contains("PK"));
    }

    #[test]
    fn test_json_roundtrip_shape() {
        let record: Record =
            serde_json::from_str(r#"{"unit": "PPC", "year": "2020", "count": 4}"#).unwrap();
        assert_eq!(record.text("unit"), Some("PPC"));
        assert_eq!(record.number("count"), Some(4.0));
        assert_eq!(record.to_json()["year"], serde_json::json!("2020"));
    }
}
