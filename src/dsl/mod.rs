//! SQL-like WHERE-clause filter language for tabular rows.
//!
//! Syntax:
//!   WHERE col = 'value'              - case-insensitive equality (also !=)
//!   WHERE col > 100                  - numeric comparison (>, <, >=, <=)
//!   WHERE col LIKE 'part'            - substring (NOT LIKE, STARTS WITH, ENDS WITH)
//!   WHERE col IN 'a,b,c'             - list membership (NOT IN)
//!   WHERE col IS NULL                - empty value (IS NOT NULL)
//!   cond1 AND cond2                  - both hold
//!   cond1 OR cond2                   - either holds
//!
//! There is no grouping: the body is split on AND first, then each part on
//! OR, so `A AND B OR C` means `A AND (B OR C)`. Fragments without an
//! operator are ignored (they pass every row).

mod ast;
mod eval;
mod filter;
mod lexer;
mod ops;
mod parser;

pub use ast::*;
pub use eval::evaluate_clause;
pub use filter::{FilterError, FilterResult, filter};
pub use lexer::is_float_literal;
pub use ops::{column_examples, operator_groups};
pub use parser::{parse_clause, parse_condition};
