//! FILENAME: core/records/src/lib.rs
//! PURPOSE: Record model shared by the store, the grouping engine and the dashboards.
//! CONTEXT: Re-exports public types and conversions for use by other crates.

pub mod error;
pub mod labels;
pub mod record;
pub mod value;
pub mod years;

pub use error::RecordError;
pub use labels::{checkbox_label, heading_label};
pub use record::Record;
pub use value::FieldValue;
pub use years::{fiscal_to_academic, AcademicYears, Year};
