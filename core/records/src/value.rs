//! FILENAME: core/records/src/value.rs
//! PURPOSE: Defines the scalar/document value held in a single record field.
//! CONTEXT: Mirrors the attribute types a document store hands back
//! (null, boolean, number, string, list, map). Values carry a total order so
//! any field can drive a sort without the caller checking types first.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A single attribute value inside a [`crate::Record`].
///
/// Serialized untagged so a record looks exactly like the JSON item the
/// store produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<FieldValue>),
    Map(BTreeMap<String, FieldValue>),
}

impl FieldValue {
    pub fn text(s: impl Into<String>) -> Self {
        FieldValue::Text(s.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view of the value. Numeric strings are accepted because the
    /// aggregate tables store most counts as text.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[FieldValue]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, FieldValue>> {
        match self {
            FieldValue::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Returns the value as display text.
    /// Whole numbers are printed without a decimal point.
    pub fn display_value(&self) -> String {
        match self {
            FieldValue::Null => String::new(),
            FieldValue::Bool(b) => if *b { "true" } else { "false" }.to_string(),
            FieldValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{:.0}", n)
                } else {
                    format!("{}", n)
                }
            }
            FieldValue::Text(s) => s.clone(),
            FieldValue::List(items) => items
                .iter()
                .map(FieldValue::display_value)
                .collect::<Vec<_>>()
                .join(", "),
            FieldValue::Map(m) => m
                .iter()
                .map(|(k, v)| format!("{}={}", k, v.display_value()))
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    /// Cross-type rank: Null < Number < Text < Bool < List < Map.
    fn rank(&self) -> u8 {
        match self {
            FieldValue::Null => 0,
            FieldValue::Number(_) => 1,
            FieldValue::Text(_) => 2,
            FieldValue::Bool(_) => 3,
            FieldValue::List(_) => 4,
            FieldValue::Map(_) => 5,
        }
    }
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Null
    }
}

impl Ord for FieldValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (FieldValue::Null, FieldValue::Null) => Ordering::Equal,
            (FieldValue::Number(a), FieldValue::Number(b)) => a.total_cmp(b),
            (FieldValue::Text(a), FieldValue::Text(b)) => a.cmp(b),
            (FieldValue::Bool(a), FieldValue::Bool(b)) => a.cmp(b),
            (FieldValue::List(a), FieldValue::List(b)) => a.cmp(b),
            (FieldValue::Map(a), FieldValue::Map(b)) => a.iter().cmp(b.iter()),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for FieldValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for FieldValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FieldValue {}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_value())
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value as f64)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<Vec<FieldValue>> for FieldValue {
    fn from(value: Vec<FieldValue>) -> Self {
        FieldValue::List(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cross_type_order() {
        let mut values = vec![
            FieldValue::Bool(false),
            FieldValue::text("b"),
            FieldValue::Number(2.0),
            FieldValue::Null,
            FieldValue::text("a"),
            FieldValue::Number(-1.0),
        ];
        values.sort();
        assert_eq!(
            values,
            vec![
                FieldValue::Null,
                FieldValue::Number(-1.0),
                FieldValue::Number(2.0),
                FieldValue::text("a"),
                FieldValue::text("b"),
                FieldValue::Bool(false),
            ]
        );
    }

    #[test]
    fn test_display_value_drops_trailing_zero() {
        assert_eq!(FieldValue::Number(2020.0).display_value(), "2020");
        assert_eq!(FieldValue::Number(12.5).display_value(), "12.5");
        assert_eq!(FieldValue::Null.display_value(), "");
    }

    #[test]
    fn test_numeric_text_reads_as_number() {
        assert_eq!(FieldValue::text(" 14.5 ").as_f64(), Some(14.5));
        assert_eq!(FieldValue::text("n/a").as_f64(), None);
    }

    #[test]
    fn test_untagged_json_shape() {
        let value: FieldValue =
            serde_json::from_str(r#"{"gender": {"Female": 3}, "tags": ["a", null]}"#).unwrap();
        let map = value.as_map().unwrap();
        assert_eq!(
            map["gender"].as_map().unwrap()["Female"],
            FieldValue::Number(3.0)
        );
        assert_eq!(
            map["tags"],
            FieldValue::List(vec![FieldValue::text("a"), FieldValue::Null])
        );
    }
}
