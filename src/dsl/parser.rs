//! Parser for WHERE-clause bodies.
//!
//! Grammar (in rough EBNF):
//!
//! body      = and_part ("AND" and_part)*
//! and_part  = condition ("OR" condition)*
//! condition = column operator operand?
//!
//! The body is split on `AND` first and each part on `OR` second, so
//! `A AND B OR C` reads as `A AND (B OR C)`. Parentheses carry no meaning.
//! A fragment without a usable operator parses to `None` and is treated
//! as always true by the evaluator.

use super::ast::{Clause, ClauseGroup, Condition};
use super::lexer::{find_token, split_keyword};
use super::ops::MATCH_ORDER;

/// Parse one `column OP operand` fragment.
///
/// Operators are tried longest first; the first one found past the start
/// of the fragment wins. Returns `None` when no operator qualifies.
pub fn parse_condition(fragment: &str) -> Option<Condition> {
    let fragment = fragment.trim();
    // ASCII upper-casing keeps byte offsets aligned with the original.
    let upper = fragment.to_ascii_uppercase();

    for op in MATCH_ORDER {
        let token = op.token();
        let Some(idx) = find_token(&upper, token, op.is_keyword()) else {
            continue;
        };
        if idx == 0 {
            continue;
        }

        let column = fragment[..idx].trim();
        if column.is_empty() {
            return None;
        }
        let operand = strip_quotes(fragment[idx + token.len()..].trim());
        return Some(Condition::new(column, op, operand));
    }

    None
}

/// Strip at most one leading and one trailing quote character.
fn strip_quotes(value: &str) -> &str {
    let is_quote = |c: char| c == '\'' || c == '"';
    let value = value.strip_prefix(is_quote).unwrap_or(value);
    value.strip_suffix(is_quote).unwrap_or(value)
}

/// Parse a clause body (without the leading `WHERE`).
pub fn parse_clause(body: &str) -> Clause {
    split_keyword(body, "AND")
        .into_iter()
        .map(|part| {
            let alternatives = split_keyword(part, "OR");
            if alternatives.len() > 1 {
                ClauseGroup::Or(alternatives.into_iter().map(parse_condition).collect())
            } else {
                ClauseGroup::And(parse_condition(part))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl::ast::Operator;

    #[test]
    fn test_simple_condition() {
        assert_eq!(
            parse_condition("Status = 'Active'"),
            Some(Condition::new("Status", Operator::Eq, "Active"))
        );
    }

    #[test]
    fn test_longest_operator_wins() {
        let cond = parse_condition("Count >= 5").unwrap();
        assert_eq!(cond.operator, Operator::Ge);
        assert_eq!(cond.column, "Count");
        assert_eq!(cond.operand, "5");

        let cond = parse_condition("Status != 'x'").unwrap();
        assert_eq!(cond.operator, Operator::Ne);

        let cond = parse_condition("Name is not null").unwrap();
        assert_eq!(cond, Condition::new("Name", Operator::IsNotNull, ""));

        let cond = parse_condition("Name NOT LIKE \"corp\"").unwrap();
        assert_eq!(cond, Condition::new("Name", Operator::NotLike, "corp"));
    }

    #[test]
    fn test_keyword_inside_word_is_not_an_operator() {
        let cond = parse_condition("Status = 'Pending'").unwrap();
        assert_eq!(cond, Condition::new("Status", Operator::Eq, "Pending"));

        let cond = parse_condition("Shipping LIKE 'express'").unwrap();
        assert_eq!(cond, Condition::new("Shipping", Operator::Like, "express"));
    }

    #[test]
    fn test_multi_word_operators() {
        let cond = parse_condition("Name starts with 'Pro'").unwrap();
        assert_eq!(cond, Condition::new("Name", Operator::StartsWith, "Pro"));

        let cond = parse_condition("Status NOT IN 'Active,Pending'").unwrap();
        assert_eq!(
            cond,
            Condition::new("Status", Operator::NotIn, "Active,Pending")
        );
    }

    #[test]
    fn test_operand_quotes_stripped_once() {
        let cond = parse_condition("Name = ''Quoted''").unwrap();
        assert_eq!(cond.operand, "'Quoted'");

        let cond = parse_condition("Name = O'Brien").unwrap();
        assert_eq!(cond.operand, "O'Brien");

        let cond = parse_condition("Name = ''").unwrap();
        assert_eq!(cond.operand, "");
    }

    #[test]
    fn test_unparsable_fragments() {
        assert_eq!(parse_condition("Foo"), None);
        assert_eq!(parse_condition(""), None);
        // Operator at index zero means an empty column name.
        assert_eq!(parse_condition("= 'x'"), None);
        assert_eq!(parse_condition("  IS NULL"), None);
    }

    #[test]
    fn test_leading_operator_falls_through_to_shorter_token() {
        // `>=` sits at index zero, so the scan moves on and finds `=`.
        let cond = parse_condition(">= 5").unwrap();
        assert_eq!(cond, Condition::new(">", Operator::Eq, "5"));
    }

    #[test]
    fn test_and_or_grouping() {
        let clause = parse_clause("A = '1' AND B = '2' OR B = '3'");
        assert_eq!(
            clause,
            vec![
                ClauseGroup::And(Some(Condition::new("A", Operator::Eq, "1"))),
                ClauseGroup::Or(vec![
                    Some(Condition::new("B", Operator::Eq, "2")),
                    Some(Condition::new("B", Operator::Eq, "3")),
                ]),
            ]
        );
    }

    #[test]
    fn test_or_group_keeps_unparsable_members() {
        let clause = parse_clause("A = '1' or junk");
        assert_eq!(
            clause,
            vec![ClauseGroup::Or(vec![
                Some(Condition::new("A", Operator::Eq, "1")),
                None,
            ])]
        );
    }

    #[test]
    fn test_parentheses_are_literal() {
        let clause = parse_clause("(A = '1' OR B = '2') AND C = '3'");
        assert_eq!(clause.len(), 2);
        assert_eq!(
            clause[0],
            ClauseGroup::Or(vec![
                Some(Condition::new("(A", Operator::Eq, "1")),
                Some(Condition::new("B", Operator::Eq, "2')")),
            ])
        );
    }

    #[test]
    fn test_clause_is_never_empty() {
        assert_eq!(parse_clause("Foo"), vec![ClauseGroup::And(None)]);
    }
}
