//! FILENAME: core/grouping-engine/src/tree.rs
//! Group Tree - The insertion-ordered nested structure built by grouping.
//!
//! Each level is an [`OrderedMap`]: keys iterate in first-insertion order,
//! never in key order, so a tree built from pre-sorted records keeps that
//! sort. The tree records its declared depth; leaves may only sit at that
//! depth.

use std::hash::Hash;

use rustc_hash::FxHashMap;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::definition::{GroupKey, MAX_GROUP_DEPTH};
use crate::error::GroupingError;

// ============================================================================
// ORDERED MAP
// ============================================================================

/// A map that iterates in insertion order with O(1) key lookup.
#[derive(Debug, Clone)]
pub struct OrderedMap<K, V> {
    entries: Vec<(K, V)>,
    index: FxHashMap<K, usize>,
}

impl<K: Hash + Eq + Clone, V> OrderedMap<K, V> {
    pub fn new() -> Self {
        OrderedMap {
            entries: Vec::new(),
            index: FxHashMap::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        match self.index.get(key) {
            Some(&i) => Some(&mut self.entries[i].1),
            None => None,
        }
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Returns the value for `key`, inserting `default()` at the end if the
    /// key has not been seen yet.
    pub fn get_or_insert_with(&mut self, key: K, default: impl FnOnce() -> V) -> &mut V {
        let i = match self.index.get(&key) {
            Some(&i) => i,
            None => {
                let i = self.entries.len();
                self.index.insert(key.clone(), i);
                self.entries.push((key, default()));
                i
            }
        };
        &mut self.entries[i].1
    }

    /// Inserts or replaces. A replaced key keeps its original position.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.index.get(&key) {
            Some(&i) => Some(std::mem::replace(&mut self.entries[i].1, value)),
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&K, &V)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &K> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }
}

impl<K: Hash + Eq + Clone, V> Default for OrderedMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Serialize, V: Serialize> Serialize for OrderedMap<K, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

// ============================================================================
// GROUP TREE
// ============================================================================

/// One level of the tree: either more levels or the grouped items.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum GroupNode<T> {
    Branch(OrderedMap<GroupKey, GroupNode<T>>),
    Leaf(Vec<T>),
}

impl<T> GroupNode<T> {
    fn item_count(&self) -> usize {
        match self {
            GroupNode::Branch(children) => children.values().map(GroupNode::item_count).sum(),
            GroupNode::Leaf(items) => items.len(),
        }
    }

    fn leaf_count(&self) -> usize {
        match self {
            GroupNode::Branch(children) => children.values().map(GroupNode::leaf_count).sum(),
            GroupNode::Leaf(_) => 1,
        }
    }
}

/// Nested, insertion-ordered grouping of items by a key path.
#[derive(Debug, Clone, Serialize)]
pub struct GroupTree<T> {
    depth: usize,
    root: OrderedMap<GroupKey, GroupNode<T>>,
}

impl<T> GroupTree<T> {
    /// Creates an empty tree whose leaves will sit at `depth` (1..=3).
    pub fn new(depth: usize) -> Result<Self, GroupingError> {
        if depth == 0 || depth > MAX_GROUP_DEPTH {
            return Err(GroupingError::InvalidKeyPath(depth));
        }
        Ok(GroupTree {
            depth,
            root: OrderedMap::new(),
        })
    }

    /// Wraps a hand-built root. The shape is not checked here; projection
    /// rejects leaves found at the wrong depth.
    pub fn from_root(depth: usize, root: OrderedMap<GroupKey, GroupNode<T>>) -> Self {
        GroupTree { depth, root }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn root(&self) -> &OrderedMap<GroupKey, GroupNode<T>> {
        &self.root
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    pub fn top_keys(&self) -> Vec<&str> {
        self.root.keys().map(String::as_str).collect()
    }

    /// Total number of items across all leaves.
    pub fn item_count(&self) -> usize {
        self.root.values().map(GroupNode::item_count).sum()
    }

    pub fn leaf_count(&self) -> usize {
        self.root.values().map(GroupNode::leaf_count).sum()
    }

    /// Follows `path` from the root.
    pub fn node(&self, path: &[&str]) -> Option<&GroupNode<T>> {
        let (first, rest) = path.split_first()?;
        let mut node = self.root.get(&first.to_string())?;
        for key in rest {
            node = match node {
                GroupNode::Branch(children) => children.get(&key.to_string())?,
                GroupNode::Leaf(_) => return None,
            };
        }
        Some(node)
    }

    /// Items stored under a full key path.
    pub fn leaf(&self, path: &[&str]) -> Option<&[T]> {
        match self.node(path)? {
            GroupNode::Leaf(items) => Some(items),
            GroupNode::Branch(_) => None,
        }
    }

    /// Appends `item` to the leaf at `path`, creating levels on first use.
    pub fn insert(&mut self, path: &[GroupKey], item: T) -> Result<(), GroupingError> {
        if path.len() != self.depth {
            return Err(GroupingError::MalformedTree {
                expected: self.depth,
                found: path.len(),
            });
        }
        let depth = self.depth;
        let Some((last, parents)) = path.split_last() else {
            return Err(GroupingError::InvalidKeyPath(0));
        };

        let mut level = &mut self.root;
        for (i, key) in parents.iter().enumerate() {
            let node = level.get_or_insert_with(key.clone(), || GroupNode::Branch(OrderedMap::new()));
            level = match node {
                GroupNode::Branch(children) => children,
                GroupNode::Leaf(_) => {
                    return Err(GroupingError::MalformedTree {
                        expected: depth,
                        found: i + 1,
                    })
                }
            };
        }

        match level.get_or_insert_with(last.clone(), || GroupNode::Leaf(Vec::new())) {
            GroupNode::Leaf(items) => {
                items.push(item);
                Ok(())
            }
            GroupNode::Branch(_) => Err(GroupingError::MalformedTree {
                expected: depth,
                found: depth + 1,
            }),
        }
    }
}
