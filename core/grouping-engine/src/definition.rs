//! FILENAME: core/grouping-engine/src/definition.rs
//! Listing Definition - The serializable configuration.
//!
//! This module contains all the types needed to DESCRIBE a grouped listing:
//! - how records are ordered before grouping (`SortSpec`)
//! - how each nesting level derives its key (`KeyExtractor`)
//! - how leaves are turned into display entries (`DisplayPolicy`)
//!
//! Definitions are plain data so dashboards can keep them as constants or
//! load them from configuration.

use serde::{Deserialize, Serialize};
use records::{checkbox_label, fiscal_to_academic, heading_label, Record};

use crate::error::GroupingError;

/// Deepest nesting a key path may describe (unit -> year -> date).
pub const MAX_GROUP_DEPTH: usize = 3;

/// A group key at one level of the tree. Keys are display text: derived
/// values (academic years, headings) are already applied.
pub type GroupKey = String;

// ============================================================================
// SORTING
// ============================================================================

/// One `(field, descending?)` pair of a multi-key sort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    pub field: String,
    #[serde(default)]
    pub descending: bool,
}

impl SortKey {
    pub fn asc(field: impl Into<String>) -> Self {
        SortKey {
            field: field.into(),
            descending: false,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        SortKey {
            field: field.into(),
            descending: true,
        }
    }
}

/// Ordered sort keys; the first key is the most significant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SortSpec {
    keys: Vec<SortKey>,
}

impl SortSpec {
    pub fn new(keys: Vec<SortKey>) -> Self {
        SortSpec { keys }
    }

    /// Builds a spec from `(field, descending)` pairs.
    pub fn from_pairs(pairs: &[(&str, bool)]) -> Self {
        SortSpec {
            keys: pairs
                .iter()
                .map(|(field, descending)| SortKey {
                    field: (*field).to_string(),
                    descending: *descending,
                })
                .collect(),
        }
    }

    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

// ============================================================================
// KEY EXTRACTION
// ============================================================================

/// A step applied to a field's display text to derive a group key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum KeyTransform {
    /// Fiscal year to academic year ("2020" -> "2019/20").
    FiscalToAcademic,
    /// Unit code to its long heading.
    Heading,
    /// Unit code to its short checkbox label.
    CheckboxLabel,
    Lowercase,
    /// Whitespace-separated token counted from the end (1 = last token).
    /// Meeting files are named "... Agenda 2019-10-17".
    TokenFromEnd { position: usize },
}

impl KeyTransform {
    fn apply(&self, field: &str, value: String) -> Result<String, GroupingError> {
        match self {
            KeyTransform::FiscalToAcademic => {
                fiscal_to_academic(&value).map_err(|_| GroupingError::InvalidKey {
                    field: field.to_string(),
                    reason: format!("'{}' is not a fiscal year", value),
                })
            }
            KeyTransform::Heading => Ok(heading_label(&value).to_string()),
            KeyTransform::CheckboxLabel => Ok(checkbox_label(&value).to_string()),
            KeyTransform::Lowercase => Ok(value.to_lowercase()),
            KeyTransform::TokenFromEnd { position } => {
                let tokens: Vec<&str> = value.split_whitespace().collect();
                if *position == 0 || *position > tokens.len() {
                    return Err(GroupingError::InvalidKey {
                        field: field.to_string(),
                        reason: format!("'{}' has no token {} from the end", value, position),
                    });
                }
                Ok(tokens[tokens.len() - position].to_string())
            }
        }
    }
}

/// Derives a group key from a record.
///
/// Implemented by [`KeyExtractor`] (the serializable form) and by any closure
/// `Fn(&Record, usize) -> Result<GroupKey, GroupingError>`, where the `usize`
/// is the record's position in the input sequence.
pub trait ExtractKey {
    fn extract(&self, record: &Record, index: usize) -> Result<GroupKey, GroupingError>;
}

/// A field read followed by zero or more transforms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyExtractor {
    pub field: String,
    #[serde(default)]
    pub transforms: Vec<KeyTransform>,
}

impl KeyExtractor {
    pub fn field(field: impl Into<String>) -> Self {
        KeyExtractor {
            field: field.into(),
            transforms: Vec::new(),
        }
    }

    pub fn then(mut self, transform: KeyTransform) -> Self {
        self.transforms.push(transform);
        self
    }
}

impl ExtractKey for KeyExtractor {
    fn extract(&self, record: &Record, index: usize) -> Result<GroupKey, GroupingError> {
        let raw = record.require(&self.field, index)?.display_value();
        self.transforms
            .iter()
            .try_fold(raw, |value, transform| transform.apply(&self.field, value))
    }
}

impl<F> ExtractKey for F
where
    F: Fn(&Record, usize) -> Result<GroupKey, GroupingError>,
{
    fn extract(&self, record: &Record, index: usize) -> Result<GroupKey, GroupingError> {
        self(record, index)
    }
}

// ============================================================================
// DISPLAY POLICY
// ============================================================================

/// Which record fields become a link in a display entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemTemplate {
    /// Field shown as the link text.
    pub text_field: String,
    /// Field holding the download identifier.
    pub key_field: String,
}

impl Default for ItemTemplate {
    fn default() -> Self {
        ItemTemplate {
            text_field: "file_name".to_string(),
            key_field: "key".to_string(),
        }
    }
}

/// Merges same-date records into one entry (meeting agendas and minutes).
///
/// Expects a tree grouped `unit -> year -> date`. Each date leaf becomes a
/// single entry captioned `caption_prefix + date`, with one link per
/// category in `category_order`, followed by any other categories in the
/// order they were found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateMerge {
    /// Category key used for merging (compared against `category_order`).
    pub category: KeyExtractor,
    /// Text shown on each category's link.
    pub link_text: KeyExtractor,
    pub category_order: Vec<String>,
    pub caption_prefix: String,
    /// Emit dates most-recent-first (reverse of insertion order).
    #[serde(default = "default_newest_first")]
    pub newest_first: bool,
}

fn default_newest_first() -> bool {
    true
}

impl DateMerge {
    /// Meeting files named "<anything> <Category> <YYYY-MM-DD>".
    pub fn meetings(caption_prefix: impl Into<String>) -> Self {
        DateMerge {
            category: KeyExtractor::field("file_name")
                .then(KeyTransform::TokenFromEnd { position: 2 })
                .then(KeyTransform::Lowercase),
            link_text: KeyExtractor::field("file_name")
                .then(KeyTransform::TokenFromEnd { position: 2 }),
            category_order: vec!["agenda".to_string(), "minutes".to_string()],
            caption_prefix: caption_prefix.into(),
            newest_first: true,
        }
    }
}

/// How leaves are projected into display entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LeafPolicy {
    /// One entry per record, in stored order.
    Plain,
    MergeByDate(DateMerge),
}

impl Default for LeafPolicy {
    fn default() -> Self {
        LeafPolicy::Plain
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayPolicy {
    #[serde(default)]
    pub item: ItemTemplate,
    #[serde(default)]
    pub leaf: LeafPolicy,
}

impl DisplayPolicy {
    pub fn plain() -> Self {
        DisplayPolicy::default()
    }

    pub fn merge_by_date(merge: DateMerge) -> Self {
        DisplayPolicy {
            item: ItemTemplate::default(),
            leaf: LeafPolicy::MergeByDate(merge),
        }
    }

    /// Tree depth this policy requires, if it constrains one.
    pub fn required_depth(&self) -> Option<usize> {
        match self.leaf {
            LeafPolicy::Plain => None,
            LeafPolicy::MergeByDate(_) => Some(MAX_GROUP_DEPTH),
        }
    }
}

// ============================================================================
// LISTING DEFINITION
// ============================================================================

/// Complete description of a grouped listing: sort, group, project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingDefinition {
    pub sort: SortSpec,
    pub key_path: Vec<KeyExtractor>,
    #[serde(default)]
    pub display: DisplayPolicy,
}

impl ListingDefinition {
    pub fn new(sort: SortSpec, key_path: Vec<KeyExtractor>, display: DisplayPolicy) -> Self {
        ListingDefinition {
            sort,
            key_path,
            display,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meeting_record() -> Record {
        Record::new()
            .with("unit", "faculty_meeting")
            .with("year", "2020")
            .with("file_name", "Faculty Meeting Agenda 2019-10-17")
    }

    #[test]
    fn test_extractor_applies_transforms_in_order() {
        let record = meeting_record();

        let year = KeyExtractor::field("year").then(KeyTransform::FiscalToAcademic);
        assert_eq!(year.extract(&record, 0).unwrap(), "2019/20");

        let unit = KeyExtractor::field("unit").then(KeyTransform::Heading);
        assert_eq!(unit.extract(&record, 0).unwrap(), "Faculty Meetings");

        let merge = DateMerge::meetings("Faculty Meeting ");
        assert_eq!(merge.category.extract(&record, 0).unwrap(), "agenda");
        assert_eq!(merge.link_text.extract(&record, 0).unwrap(), "Agenda");
    }

    #[test]
    fn test_extractor_reports_missing_field() {
        let record = meeting_record();
        let err = KeyExtractor::field("date").extract(&record, 7).unwrap_err();
        assert_eq!(
            err,
            GroupingError::MissingField {
                field: "date".to_string(),
                record: 7
            }
        );
    }

    #[test]
    fn test_token_out_of_range() {
        let record = Record::new().with("file_name", "agenda.pdf");
        let extractor =
            KeyExtractor::field("file_name").then(KeyTransform::TokenFromEnd { position: 2 });
        assert!(matches!(
            extractor.extract(&record, 0),
            Err(GroupingError::InvalidKey { .. })
        ));
    }

    #[test]
    fn test_closure_extractor() {
        let first_letter = |record: &Record, index: usize| -> Result<GroupKey, GroupingError> {
            let name = record.require("file_name", index)?.display_value();
            Ok(name.chars().take(1).collect())
        };
        assert_eq!(first_letter.extract(&meeting_record(), 0).unwrap(), "F");
    }

    #[test]
    fn test_definition_from_json() {
        let json = r#"{
            "sort": [{"field": "year", "descending": true}, {"field": "file_name"}],
            "key_path": [
                {"field": "unit", "transforms": [{"kind": "heading"}]},
                {"field": "year", "transforms": [{"kind": "fiscal_to_academic"}]}
            ]
        }"#;
        let definition: ListingDefinition = serde_json::from_str(json).unwrap();
        assert_eq!(definition.sort.keys()[0], SortKey::desc("year"));
        assert_eq!(definition.sort.keys()[1], SortKey::asc("file_name"));
        assert_eq!(definition.key_path.len(), 2);
        assert_eq!(definition.display, DisplayPolicy::plain());
    }
}
