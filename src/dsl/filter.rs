//! Filter entry point: validates the `WHERE` keyword and applies a clause
//! to a sequence of rows.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use thiserror::Error;

use super::eval::evaluate_clause;
use super::parser::parse_clause;
use crate::table::Row;

/// Error reported by [`filter`]. Any error means no rows were kept.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("Invalid SQL: WHERE clause required")]
    MissingWhere,

    #[error("SQL Error: {0}")]
    Internal(String),
}

/// Kept rows in input order, or a single error.
pub type FilterResult<'a> = Result<Vec<&'a Row>, FilterError>;

/// Filter `rows` with a `WHERE ...` clause.
///
/// Blank clause text keeps every row.
pub fn filter<'a>(rows: &'a [Row], clause_text: &str) -> FilterResult<'a> {
    let text = clause_text.trim();
    if text.is_empty() {
        return Ok(rows.iter().collect());
    }

    let body = strip_where(text).ok_or(FilterError::MissingWhere)?;

    panic::catch_unwind(AssertUnwindSafe(|| {
        let clause = parse_clause(body);
        tracing::debug!("Parsed clause into {} group(s): {:?}", clause.len(), clause);
        rows.iter()
            .filter(|row| {
                #[cfg(test)]
                if row.contains_key(tests::FAILING_COLUMN) {
                    panic!("cannot evaluate row");
                }
                evaluate_clause(&clause, row)
            })
            .collect::<Vec<_>>()
    }))
    .map_err(|payload| FilterError::Internal(panic_message(payload.as_ref())))
}

/// Return the body after a leading `WHERE` keyword and its whitespace.
fn strip_where(text: &str) -> Option<&str> {
    const KEYWORD: &str = "WHERE";

    let head = text.get(..KEYWORD.len())?;
    if !head.eq_ignore_ascii_case(KEYWORD) {
        return None;
    }

    let rest = &text[KEYWORD.len()..];
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }

    let body = rest.trim_start();
    if body.is_empty() { None } else { Some(body) }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown failure while filtering".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Evaluating a row that has this column panics inside [`filter`].
    pub(super) const FAILING_COLUMN: &str = "__fail__";

    fn row(pairs: &[(&str, &str)]) -> Row {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn projects() -> Vec<Row> {
        vec![
            row(&[("Name", "Project Alpha"), ("Amount", "50000"), ("Status", "Active")]),
            row(&[("Name", "Project Beta"), ("Amount", "75000"), ("Status", "Pending")]),
            row(&[("Name", "Project Gamma"), ("Amount", "120000"), ("Status", "Completed")]),
            row(&[("Name", "Project Delta"), ("Amount", "N/A"), ("Status", "active")]),
        ]
    }

    fn names(rows: &[&Row]) -> Vec<String> {
        rows.iter().map(|r| r["Name"].clone()).collect()
    }

    #[test]
    fn test_blank_clause_keeps_everything() {
        let rows = projects();
        assert_eq!(filter(&rows, "").unwrap().len(), 4);
        assert_eq!(filter(&rows, "   \n").unwrap().len(), 4);
    }

    #[test]
    fn test_missing_where_is_an_error() {
        let rows = projects();
        let err = filter(&rows, "Status = 'Active'").unwrap_err();
        assert_eq!(err, FilterError::MissingWhere);
        assert_eq!(err.to_string(), "Invalid SQL: WHERE clause required");

        assert!(filter(&rows, "WHERE").is_err());
        assert!(filter(&rows, "WHERE   ").is_err());
        assert!(filter(&rows, "WHEREStatus = 'x'").is_err());
        assert!(filter(&rows, "SELECT * WHERE Status = 'x'").is_err());
    }

    #[test]
    fn test_where_is_case_insensitive() {
        let rows = projects();
        let kept = filter(&rows, "  where Status = 'ACTIVE'").unwrap();
        assert_eq!(names(&kept), vec!["Project Alpha", "Project Delta"]);
    }

    #[test]
    fn test_amount_scenario() {
        let rows = vec![row(&[("Amount", "50000")]), row(&[("Amount", "120000")])];
        let kept = filter(&rows, "WHERE Amount > 75000").unwrap();
        assert_eq!(kept, vec![&rows[1]]);
    }

    #[test]
    fn test_thousands_separator_operand() {
        let rows = projects();
        let kept = filter(&rows, "WHERE Amount > 1,000").unwrap();
        // "N/A" coerces to zero.
        assert_eq!(
            names(&kept),
            vec!["Project Alpha", "Project Beta", "Project Gamma"]
        );
    }

    #[test]
    fn test_in_membership() {
        let rows = projects();
        let kept = filter(&rows, "WHERE Status IN 'Active,Pending'").unwrap();
        assert_eq!(
            names(&kept),
            vec!["Project Alpha", "Project Beta", "Project Delta"]
        );
    }

    #[test]
    fn test_vacuous_fragment_keeps_all_rows() {
        let rows = projects();
        assert_eq!(filter(&rows, "WHERE Foo").unwrap().len(), rows.len());
    }

    #[test]
    fn test_order_is_preserved() {
        let rows = projects();
        let kept = filter(&rows, "WHERE Name LIKE 'project' AND Status != 'completed'").unwrap();
        assert_eq!(
            names(&kept),
            vec!["Project Alpha", "Project Beta", "Project Delta"]
        );
    }

    #[test]
    fn test_failure_during_evaluation_keeps_nothing() {
        let mut rows = projects();
        rows.insert(2, row(&[("Status", "Active"), (FAILING_COLUMN, "")]));

        // Row 0 already matched when row 2 fails; nothing is returned.
        let err = filter(&rows, "WHERE Status = 'Active'").unwrap_err();
        assert_eq!(err, FilterError::Internal("cannot evaluate row".into()));
        assert_eq!(err.to_string(), "SQL Error: cannot evaluate row");

        // Blank text never evaluates rows.
        assert_eq!(filter(&rows, "").unwrap().len(), 5);
    }

    #[test]
    fn test_panic_message_extraction() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");
        let payload: Box<dyn Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(payload.as_ref()), "bang");
        assert_eq!(
            FilterError::Internal("bang".into()).to_string(),
            "SQL Error: bang"
        );
    }
}
