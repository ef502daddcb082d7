//! FILENAME: core/grouping-engine/src/view.rs
//! Listing View - Renderable output for the frontend.
//!
//! This module walks a GroupTree depth-first in insertion order and emits a
//! flat sequence of render instructions:
//! - `Section` for each top-level key
//! - `Subsection` for each key below it (with its nesting level)
//! - `Item` for each display entry of a leaf
//!
//! The rendering layer turns these into headings, lists and links.

use serde::{Deserialize, Serialize};
use records::Record;

use crate::definition::{
    DateMerge, DisplayPolicy, ExtractKey, GroupKey, ItemTemplate, LeafPolicy,
};
use crate::error::GroupingError;
use crate::tree::{GroupNode, GroupTree, OrderedMap};

// ============================================================================
// RENDER NODES
// ============================================================================

/// A link to a downloadable document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemLink {
    pub text: String,
    /// Download identifier (object key).
    pub key: String,
}

/// One display entry: an optional caption followed by one or more links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayItem {
    pub caption: Option<String>,
    pub links: Vec<ItemLink>,
}

/// An ordered render instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum RenderNode {
    Section { label: String },
    Subsection { label: String, level: usize },
    Item(DisplayItem),
}

impl RenderNode {
    pub fn is_item(&self) -> bool {
        matches!(self, RenderNode::Item(_))
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            RenderNode::Section { label } | RenderNode::Subsection { label, .. } => Some(label),
            RenderNode::Item(_) => None,
        }
    }
}

// ============================================================================
// PROJECTION
// ============================================================================

/// Projects a tree of records into render nodes under `policy`.
///
/// Fails with `MalformedTree` if a leaf or branch sits at a depth the tree
/// (or the policy) does not allow; no partial output is returned.
pub fn project(
    tree: &GroupTree<Record>,
    policy: &DisplayPolicy,
) -> Result<Vec<RenderNode>, GroupingError> {
    if let Some(required) = policy.required_depth() {
        if tree.depth() != required {
            return Err(GroupingError::MalformedTree {
                expected: required,
                found: tree.depth(),
            });
        }
    }

    let mut nodes = Vec::new();
    let mut walker = Walker {
        tree_depth: tree.depth(),
        policy,
        nodes: &mut nodes,
    };
    walker.walk_level(tree.root(), 1)?;
    Ok(nodes)
}

struct Walker<'a> {
    tree_depth: usize,
    policy: &'a DisplayPolicy,
    nodes: &'a mut Vec<RenderNode>,
}

impl<'a> Walker<'a> {
    fn walk_level(
        &mut self,
        level: &OrderedMap<GroupKey, GroupNode<Record>>,
        depth: usize,
    ) -> Result<(), GroupingError> {
        let policy = self.policy;
        for (key, node) in level.iter() {
            self.push_label(key, depth);

            match (&policy.leaf, node) {
                // Date merge: the level above the dates emits merged entries.
                (LeafPolicy::MergeByDate(merge), GroupNode::Branch(dates))
                    if depth + 1 == self.tree_depth =>
                {
                    self.emit_merged_dates(dates, merge)?;
                }
                (_, GroupNode::Branch(children)) if depth < self.tree_depth => {
                    self.walk_level(children, depth + 1)?;
                }
                (LeafPolicy::Plain, GroupNode::Leaf(items)) if depth == self.tree_depth => {
                    for (index, record) in items.iter().enumerate() {
                        let item = plain_item(record, index, &policy.item)?;
                        self.nodes.push(RenderNode::Item(item));
                    }
                }
                _ => {
                    return Err(GroupingError::MalformedTree {
                        expected: self.tree_depth,
                        found: depth,
                    })
                }
            }
        }
        Ok(())
    }

    fn push_label(&mut self, key: &str, depth: usize) {
        let label = key.to_string();
        if depth == 1 {
            self.nodes.push(RenderNode::Section { label });
        } else {
            self.nodes.push(RenderNode::Subsection {
                label,
                level: depth - 1,
            });
        }
    }

    fn emit_merged_dates(
        &mut self,
        dates: &OrderedMap<GroupKey, GroupNode<Record>>,
        merge: &DateMerge,
    ) -> Result<(), GroupingError> {
        let mut merged = Vec::with_capacity(dates.len());
        for (date, node) in dates.iter() {
            let GroupNode::Leaf(records) = node else {
                return Err(GroupingError::MalformedTree {
                    expected: self.tree_depth,
                    found: self.tree_depth + 1,
                });
            };
            merged.push(merge_date_leaf(date, records, merge, &self.policy.item)?);
        }

        if merge.newest_first {
            merged.reverse();
        }
        self.nodes.extend(merged.into_iter().map(RenderNode::Item));
        Ok(())
    }
}

/// One entry per record: a single link built from the item template.
fn plain_item(
    record: &Record,
    index: usize,
    template: &ItemTemplate,
) -> Result<DisplayItem, GroupingError> {
    let text = record.require(&template.text_field, index)?.display_value();
    let key = record.require(&template.key_field, index)?.display_value();
    Ok(DisplayItem {
        caption: None,
        links: vec![ItemLink { text, key }],
    })
}

/// Collapses the records of one date into a single entry.
///
/// Categories listed in `category_order` come first in that order; any other
/// category follows in the order it was found. When a category repeats on
/// the same date the later record wins.
fn merge_date_leaf(
    date: &str,
    records: &[Record],
    merge: &DateMerge,
    template: &ItemTemplate,
) -> Result<DisplayItem, GroupingError> {
    let mut slots: Vec<(String, ItemLink)> = Vec::with_capacity(records.len());

    for (index, record) in records.iter().enumerate() {
        let category = merge.category.extract(record, index)?;
        let link = ItemLink {
            text: merge.link_text.extract(record, index)?,
            key: record.require(&template.key_field, index)?.display_value(),
        };

        match slots.iter_mut().find(|(existing, _)| *existing == category) {
            Some(slot) => slot.1 = link,
            None => slots.push((category, link)),
        }
    }

    let rank = |category: &str| {
        merge
            .category_order
            .iter()
            .position(|c| c == category)
            .unwrap_or(merge.category_order.len())
    };
    slots.sort_by_key(|(category, _)| rank(category.as_str()));

    Ok(DisplayItem {
        caption: Some(format!("{}{}", merge.caption_prefix, date)),
        links: slots.into_iter().map(|(_, link)| link).collect(),
    })
}
