//! FILENAME: core/grouping-engine/src/sort.rs
//! Multi-key stable sort over records.
//!
//! One stable pass runs per sort key, iterating the keys in reverse so the
//! first key ends up the most significant. Descending passes reverse the
//! comparator, not the sequence, so ties keep their prior relative order.

use std::cmp::Ordering;

use records::Record;

use crate::definition::{SortKey, SortSpec};
use crate::error::GroupingError;

/// Sorts `records` by `spec` and returns them.
///
/// Every record must carry every field named in `spec`; otherwise a
/// `MissingField` error is returned and nothing is sorted.
pub fn multisort(mut records: Vec<Record>, spec: &SortSpec) -> Result<Vec<Record>, GroupingError> {
    sort_in_place(&mut records, spec)?;
    Ok(records)
}

/// In-place variant of [`multisort`].
pub fn sort_in_place(records: &mut [Record], spec: &SortSpec) -> Result<(), GroupingError> {
    validate_fields(records, spec)?;

    for key in spec.keys().iter().rev() {
        records.sort_by(|a, b| compare_by_key(a, b, key));
    }

    Ok(())
}

fn validate_fields(records: &[Record], spec: &SortSpec) -> Result<(), GroupingError> {
    for (index, record) in records.iter().enumerate() {
        for key in spec.keys() {
            if !record.contains(&key.field) {
                return Err(GroupingError::MissingField {
                    field: key.field.clone(),
                    record: index,
                });
            }
        }
    }
    Ok(())
}

fn compare_by_key(a: &Record, b: &Record, key: &SortKey) -> Ordering {
    let ordering = a.get(&key.field).cmp(&b.get(&key.field));
    if key.descending {
        ordering.reverse()
    } else {
        ordering
    }
}
