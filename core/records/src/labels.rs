//! FILENAME: core/records/src/labels.rs
//! PURPOSE: User-facing names for the unit codes stored in the archive tables.

/// Long headings for repository and governance units.
const HEADING_LABELS: &[(&str, &str)] = &[
    ("EPPC", "Educational Policy and Planning Committee"),
    ("PPC", "Policy and Planning Committee"),
    ("CED", "Committee on Equity and Diversity"),
    ("faculty_meeting", "Faculty Meetings"),
];

/// Short labels for filter checkboxes.
const CHECKBOX_LABELS: &[(&str, &str)] = &[("faculty_meeting", "Faculty Meetings")];

fn lookup<'a>(table: &[(&str, &'a str)], code: &'a str) -> &'a str {
    table
        .iter()
        .find(|(k, _)| *k == code)
        .map(|(_, v)| *v)
        .unwrap_or(code)
}

/// Heading for a unit code; unknown codes are returned unchanged.
pub fn heading_label(code: &str) -> &str {
    lookup(HEADING_LABELS, code)
}

/// Checkbox label for a unit code; unknown codes are returned unchanged.
pub fn checkbox_label(code: &str) -> &str {
    lookup(CHECKBOX_LABELS, code)
}
