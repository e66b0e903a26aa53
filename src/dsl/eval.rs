//! Evaluator for parsed clauses.

use super::ast::{ClauseGroup, Condition};
use crate::table::Row;

/// Evaluate a parsed clause against a row.
///
/// Groups are AND-combined in order and evaluation stops at the first
/// failing group.
pub fn evaluate_clause(groups: &[ClauseGroup], row: &Row) -> bool {
    groups.iter().all(|group| evaluate_group(group, row))
}

fn evaluate_group(group: &ClauseGroup, row: &Row) -> bool {
    match group {
        ClauseGroup::And(condition) => evaluate_member(condition.as_ref(), row),
        ClauseGroup::Or(members) => members
            .iter()
            .any(|member| evaluate_member(member.as_ref(), row)),
    }
}

/// An unparsable fragment (`None`) passes every row.
fn evaluate_member(condition: Option<&Condition>, row: &Row) -> bool {
    condition.is_none_or(|condition| evaluate_condition(condition, row))
}

/// Evaluate one condition. A column missing from the row always fails.
pub fn evaluate_condition(condition: &Condition, row: &Row) -> bool {
    match row.get(&condition.column) {
        None => false,
        Some(actual) => condition.operator.apply(actual, &condition.operand),
    }
}
