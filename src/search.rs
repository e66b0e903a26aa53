//! Global search across every column of a dataset.

use crate::table::Row;

/// Keep rows in which any cell contains `term`, ignoring case.
///
/// A blank term keeps every row.
pub fn search<'a>(rows: Vec<&'a Row>, term: &str) -> Vec<&'a Row> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return rows;
    }

    rows.into_iter()
        .filter(|row| row.values().any(|value| value.to_lowercase().contains(&term)))
        .collect()
}
