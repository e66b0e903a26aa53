//! Operator registry: comparison semantics and display metadata.
//!
//! Dispatch is a plain `match` on [`Operator`]; there is no runtime
//! registration and no state.

use super::ast::Operator;
use super::lexer::parse_float_prefix;

/// Scan order used by the condition parser.
///
/// Longest token first; ties keep declaration order, so `STARTS WITH` is
/// tried before `IS NOT NULL` and `!=` before `IN`.
pub const MATCH_ORDER: [Operator; 14] = [
    Operator::StartsWith,
    Operator::IsNotNull,
    Operator::EndsWith,
    Operator::NotLike,
    Operator::IsNull,
    Operator::NotIn,
    Operator::Like,
    Operator::Ne,
    Operator::Ge,
    Operator::Le,
    Operator::In,
    Operator::Eq,
    Operator::Gt,
    Operator::Lt,
];

impl Operator {
    /// Compare an actual cell value against a user-supplied operand.
    pub fn apply(self, actual: &str, operand: &str) -> bool {
        match self {
            Operator::Eq => actual.to_lowercase() == operand.to_lowercase(),
            Operator::Ne => actual.to_lowercase() != operand.to_lowercase(),
            Operator::Gt => coerce_number(actual) > coerce_number(operand),
            Operator::Lt => coerce_number(actual) < coerce_number(operand),
            Operator::Ge => coerce_number(actual) >= coerce_number(operand),
            Operator::Le => coerce_number(actual) <= coerce_number(operand),
            Operator::Like => contains_ci(actual, operand),
            Operator::NotLike => !contains_ci(actual, operand),
            Operator::In => in_list(actual, operand),
            Operator::NotIn => !in_list(actual, operand),
            Operator::StartsWith => actual.to_lowercase().starts_with(&operand.to_lowercase()),
            Operator::EndsWith => actual.to_lowercase().ends_with(&operand.to_lowercase()),
            Operator::IsNull => actual.trim().is_empty(),
            Operator::IsNotNull => !actual.trim().is_empty(),
        }
    }

    /// Human-readable label shown by the condition builder.
    pub fn label(self) -> &'static str {
        match self {
            Operator::Eq => "equals (=)",
            Operator::Ne => "not equals (!=)",
            Operator::Gt => "greater than (>)",
            Operator::Lt => "less than (<)",
            Operator::Ge => "greater or equal (>=)",
            Operator::Le => "less or equal (<=)",
            Operator::Like => "contains (LIKE)",
            Operator::NotLike => "does not contain (NOT LIKE)",
            Operator::StartsWith => "starts with",
            Operator::EndsWith => "ends with",
            Operator::In => "is one of (IN)",
            Operator::NotIn => "is not one of (NOT IN)",
            Operator::IsNull => "is empty (IS NULL)",
            Operator::IsNotNull => "is not empty (IS NOT NULL)",
        }
    }

    /// Hint for the operand input; empty for operators without an operand.
    pub fn placeholder(self) -> &'static str {
        match self {
            Operator::Eq => "Enter exact value",
            Operator::Ne => "Enter value to exclude",
            Operator::Gt | Operator::Lt => "Enter number",
            Operator::Ge => "Enter minimum value",
            Operator::Le => "Enter maximum value",
            Operator::Like => "Enter text to search",
            Operator::NotLike => "Enter text to exclude",
            Operator::StartsWith => "Enter starting text",
            Operator::EndsWith => "Enter ending text",
            Operator::In => "Enter values separated by commas",
            Operator::NotIn => "Enter values to exclude (comma-separated)",
            Operator::IsNull | Operator::IsNotNull => "",
        }
    }

    pub fn category(self) -> &'static str {
        match self {
            Operator::Eq
            | Operator::Ne
            | Operator::Gt
            | Operator::Lt
            | Operator::Ge
            | Operator::Le => "Comparison",
            Operator::Like | Operator::NotLike | Operator::StartsWith | Operator::EndsWith => {
                "Text"
            }
            Operator::In | Operator::NotIn => "List",
            Operator::IsNull | Operator::IsNotNull => "Null Check",
        }
    }
}

/// Lenient numeric coercion: strip `,` and `$`, parse the float prefix,
/// and fall back to zero.
pub fn coerce_number(value: &str) -> f64 {
    let cleaned: String = value.chars().filter(|c| !matches!(c, ',' | '$')).collect();
    parse_float_prefix(&cleaned).unwrap_or(0.0)
}

fn contains_ci(actual: &str, operand: &str) -> bool {
    actual.to_lowercase().contains(&operand.to_lowercase())
}

fn in_list(actual: &str, operand: &str) -> bool {
    let actual = actual.to_lowercase();
    operand
        .split(',')
        .any(|item| item.trim().to_lowercase() == actual)
}

/// Operators grouped by category, in display order.
pub fn operator_groups() -> Vec<(&'static str, Vec<Operator>)> {
    let mut groups: Vec<(&'static str, Vec<Operator>)> = Vec::new();
    for op in Operator::ALL {
        match groups.iter_mut().find(|(name, _)| *name == op.category()) {
            Some((_, ops)) => ops.push(op),
            None => groups.push((op.category(), vec![op])),
        }
    }
    groups
}

/// Example clauses for a column, one per operator family.
pub fn column_examples(column: &str) -> Vec<String> {
    vec![
        format!("{column} = 'value'"),
        format!("{column} LIKE 'partial'"),
        format!("{column} > 100"),
        format!("{column} IN 'val1,val2,val3'"),
        format!("{column} IS NOT NULL"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_order_is_longest_first_and_stable() {
        let mut expected = Operator::ALL.to_vec();
        expected.sort_by_key(|op| std::cmp::Reverse(op.token().len()));
        assert_eq!(MATCH_ORDER.to_vec(), expected);
    }

    #[test]
    fn test_equality_ignores_case() {
        assert!(Operator::Eq.apply("Active", "active"));
        assert!(!Operator::Eq.apply("Active", "Activ"));
        assert!(Operator::Ne.apply("Active", "Pending"));
        assert!(!Operator::Ne.apply("ACTIVE", "active"));
    }

    #[test]
    fn test_numeric_coercion() {
        assert_eq!(coerce_number("1,000"), 1000.0);
        assert_eq!(coerce_number("$1,200.50"), 1200.5);
        assert_eq!(coerce_number("N/A"), 0.0);
        assert_eq!(coerce_number(""), 0.0);
        assert!(Operator::Gt.apply("120000", "75000"));
        assert!(!Operator::Gt.apply("N/A", "1000"));
        assert!(Operator::Ge.apply("5", "5"));
        assert!(Operator::Le.apply("$4.99", "5"));
        assert!(Operator::Lt.apply("abc", "1"));
    }

    #[test]
    fn test_text_operators() {
        assert!(Operator::Like.apply("Project Alpha", "alpha"));
        assert!(Operator::NotLike.apply("Project Alpha", "beta"));
        assert!(Operator::StartsWith.apply("Project Alpha", "PROJ"));
        assert!(Operator::EndsWith.apply("Project Alpha", "ALPHA"));
        assert!(!Operator::EndsWith.apply("Project Alpha", "Project"));
    }

    #[test]
    fn test_in_list() {
        assert!(Operator::In.apply("Pending", "Active, pending"));
        assert!(!Operator::In.apply("Completed", "Active,Pending"));
        assert!(Operator::NotIn.apply("Completed", "Active,Pending"));
        // The cell value is not trimmed.
        assert!(!Operator::In.apply(" Active", "Active"));
    }

    #[test]
    fn test_null_checks() {
        assert!(Operator::IsNull.apply("   ", "ignored"));
        assert!(!Operator::IsNull.apply("x", ""));
        assert!(Operator::IsNotNull.apply("x", ""));
    }

    #[test]
    fn test_operator_groups() {
        let groups = operator_groups();
        let names: Vec<_> = groups.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, vec!["Comparison", "Text", "List", "Null Check"]);
        assert_eq!(groups[0].1.len(), 6);
        assert_eq!(groups[1].1.len(), 4);
    }
}
