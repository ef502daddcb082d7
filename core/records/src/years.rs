//! FILENAME: core/records/src/years.rs
//! PURPOSE: Fiscal-year to academic-year conversion.
//! CONTEXT: The store keys everything by fiscal year ("2020"); the dashboards
//! label axes and headings by academic year ("2019/20").

use serde::{Deserialize, Serialize};

use crate::error::RecordError;

/// Converts a fiscal year to its academic year label, e.g. "2020" -> "2019/20".
pub fn fiscal_to_academic(fiscal: &str) -> Result<String, RecordError> {
    let trimmed = fiscal.trim();
    let year: i64 = trimmed
        .parse()
        .map_err(|_| RecordError::InvalidYear(fiscal.to_string()))?;

    let suffix_start = trimmed.len().saturating_sub(2);
    Ok(format!("{}/{}", year - 1, &trimmed[suffix_start..]))
}

/// A fiscal/academic pair for one reporting year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Year {
    pub fiscal: String,
    pub academic: String,
}

/// The window of fiscal years the department profile reports on.
/// Year ids are 0-based offsets from `first_fiscal`.
///
/// Deserializing goes through [`AcademicYears::new`], so a reversed window
/// read from a config file is normalized like one built in code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "YearWindow")]
pub struct AcademicYears {
    pub first_fiscal: u32,
    pub last_fiscal: u32,
}

/// Wire form of [`AcademicYears`], in whatever order the bounds were written.
#[derive(Deserialize)]
struct YearWindow {
    first_fiscal: u32,
    last_fiscal: u32,
}

impl From<YearWindow> for AcademicYears {
    fn from(window: YearWindow) -> Self {
        AcademicYears::new(window.first_fiscal, window.last_fiscal)
    }
}

impl Default for AcademicYears {
    fn default() -> Self {
        AcademicYears {
            first_fiscal: 2005,
            last_fiscal: 2019,
        }
    }
}

impl AcademicYears {
    pub fn new(first_fiscal: u32, last_fiscal: u32) -> Self {
        AcademicYears {
            first_fiscal: first_fiscal.min(last_fiscal),
            last_fiscal: first_fiscal.max(last_fiscal),
        }
    }

    pub fn max_id(&self) -> usize {
        self.last_fiscal.saturating_sub(self.first_fiscal) as usize
    }

    pub fn max_fiscal(&self) -> u32 {
        self.last_fiscal
    }

    pub fn year(&self, id: usize) -> Option<Year> {
        if id > self.max_id() {
            return None;
        }
        let fiscal = self.first_fiscal.checked_add(u32::try_from(id).ok()?)?;
        let previous = fiscal.checked_sub(1)?;
        Some(Year {
            fiscal: fiscal.to_string(),
            academic: format!("{}/{:02}", previous, fiscal % 100),
        })
    }

    pub fn years(&self) -> Vec<Year> {
        (0..=self.max_id()).filter_map(|id| self.year(id)).collect()
    }

    /// Academic year labels for ids `start..=end`, clamped to the window.
    pub fn academic_range(&self, start: usize, end: usize) -> Vec<String> {
        (start..=end.min(self.max_id()))
            .filter_map(|id| self.year(id))
            .map(|y| y.academic)
            .collect()
    }

    /// Academic year labels starting at a given fiscal year (used by series
    /// whose data begins later than the window, e.g. classes from 2008).
    pub fn academic_range_from(&self, first_fiscal: u32) -> Vec<String> {
        let start = first_fiscal.saturating_sub(self.first_fiscal) as usize;
        self.academic_range(start, self.max_id())
    }
}
