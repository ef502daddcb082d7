//! FILENAME: core/grouping-engine/src/lib.rs
//! Grouped listings for the division dashboards.
//!
//! Turns a flat sequence of records into an ordered, nested listing: sort by
//! several keys, fold into an insertion-ordered tree, project the tree into
//! section/subsection/item nodes. It depends on `records` only for the shared
//! record types.
//!
//! Layers:
//! - `definition`: Serializable configuration (what the listing IS)
//! - `sort`: Multi-key stable sort
//! - `tree`: Insertion-ordered group tree (HOW records are held)
//! - `engine`: Grouping pipeline (HOW we group)
//! - `view`: Renderable output for the frontend (WHAT we display)

pub mod definition;
pub mod error;
pub mod sort;
pub mod tree;
pub mod engine;
pub mod view;

pub use definition::*;
pub use error::GroupingError;
pub use sort::{multisort, sort_in_place};
pub use tree::{GroupNode, GroupTree, OrderedMap};
pub use engine::{group, group_path, group_with, render_listing, GroupPath};
pub use view::{project, DisplayItem, ItemLink, RenderNode};
