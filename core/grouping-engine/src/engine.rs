//! FILENAME: core/grouping-engine/src/engine.rs
//! Grouping Engine - Folds sorted records into a GroupTree.
//!
//! Algorithm:
//! 1. Validate the key path (1..=3 extractors)
//! 2. Scan records once, in order, computing each record's key tuple
//! 3. Descend/create tree levels on first encounter (insertion-ordered)
//! 4. Append the record (or its projection) to the leaf for its full tuple
//!
//! Keys are always scoped by their full prefix: the same year under two
//! committees lands in two distinct subtrees.

use smallvec::SmallVec;
use records::Record;

use crate::definition::{ExtractKey, GroupKey, ListingDefinition, MAX_GROUP_DEPTH};
use crate::error::GroupingError;
use crate::sort::multisort;
use crate::tree::GroupTree;
use crate::view::{project, RenderNode};

/// Full key tuple of a record; never deeper than `MAX_GROUP_DEPTH`.
pub type GroupPath = SmallVec<[GroupKey; MAX_GROUP_DEPTH]>;

/// Computes the key tuple for one record.
pub fn group_path<K: ExtractKey>(
    record: &Record,
    index: usize,
    key_path: &[K],
) -> Result<GroupPath, GroupingError> {
    key_path
        .iter()
        .map(|extractor| extractor.extract(record, index))
        .collect()
}

/// Groups records by `key_path`, keeping the records themselves as leaves.
pub fn group<K: ExtractKey>(
    records: Vec<Record>,
    key_path: &[K],
) -> Result<GroupTree<Record>, GroupingError> {
    group_with(records, key_path, |record| record)
}

/// Groups records by `key_path`, storing `project(record)` in the leaves.
///
/// The input is expected to be pre-sorted; sibling keys appear in the order
/// their values are first seen. On any extractor failure the error is
/// returned and no tree is produced.
pub fn group_with<K, T, F>(
    records: Vec<Record>,
    key_path: &[K],
    mut project: F,
) -> Result<GroupTree<T>, GroupingError>
where
    K: ExtractKey,
    F: FnMut(Record) -> T,
{
    let mut tree = GroupTree::new(key_path.len())?;

    for (index, record) in records.into_iter().enumerate() {
        let path = group_path(&record, index, key_path)?;
        tree.insert(&path, project(record))?;
    }

    Ok(tree)
}

/// Runs the full sort -> group -> project pipeline for a listing.
pub fn render_listing(
    definition: &ListingDefinition,
    records: Vec<Record>,
) -> Result<Vec<RenderNode>, GroupingError> {
    let sorted = multisort(records, &definition.sort)?;
    let tree = group(sorted, &definition.key_path)?;
    project(&tree, &definition.display)
}
