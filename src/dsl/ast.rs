//! AST types for the WHERE-clause language.

use std::fmt;
use std::str::FromStr;

/// Comparison operator of a single condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,         // =
    Ne,         // !=
    Gt,         // >
    Lt,         // <
    Ge,         // >=
    Le,         // <=
    Like,       // LIKE
    NotLike,    // NOT LIKE
    In,         // IN
    NotIn,      // NOT IN
    StartsWith, // STARTS WITH
    EndsWith,   // ENDS WITH
    IsNull,     // IS NULL
    IsNotNull,  // IS NOT NULL
}

impl Operator {
    /// Every operator, in declaration order.
    pub const ALL: [Operator; 14] = [
        Operator::Eq,
        Operator::Ne,
        Operator::Gt,
        Operator::Lt,
        Operator::Ge,
        Operator::Le,
        Operator::Like,
        Operator::NotLike,
        Operator::In,
        Operator::NotIn,
        Operator::StartsWith,
        Operator::EndsWith,
        Operator::IsNull,
        Operator::IsNotNull,
    ];

    /// Canonical token as written in a clause.
    pub fn token(self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "!=",
            Operator::Gt => ">",
            Operator::Lt => "<",
            Operator::Ge => ">=",
            Operator::Le => "<=",
            Operator::Like => "LIKE",
            Operator::NotLike => "NOT LIKE",
            Operator::In => "IN",
            Operator::NotIn => "NOT IN",
            Operator::StartsWith => "STARTS WITH",
            Operator::EndsWith => "ENDS WITH",
            Operator::IsNull => "IS NULL",
            Operator::IsNotNull => "IS NOT NULL",
        }
    }

    /// Operators whose comparison ignores the operand.
    pub fn takes_operand(self) -> bool {
        !matches!(self, Operator::IsNull | Operator::IsNotNull)
    }

    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            Operator::Gt | Operator::Lt | Operator::Ge | Operator::Le
        )
    }

    /// Keyword operators only match on word boundaries.
    pub fn is_keyword(self) -> bool {
        self.token().starts_with(|c: char| c.is_ascii_alphabetic())
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Operator {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.split_whitespace().collect::<Vec<_>>().join(" ");
        Operator::ALL
            .into_iter()
            .find(|op| op.token().eq_ignore_ascii_case(&normalized))
            .ok_or_else(|| format!("invalid operator: {value}"))
    }
}

/// A single `column OP operand` triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub column: String,
    pub operator: Operator,
    pub operand: String,
}

impl Condition {
    pub fn new(column: impl Into<String>, operator: Operator, operand: impl Into<String>) -> Self {
        Condition {
            column: column.into(),
            operator,
            operand: operand.into(),
        }
    }
}

/// One unit of a parsed clause.
///
/// `None` members are fragments with no recognizable operator. They are
/// kept rather than dropped and always evaluate to true.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClauseGroup {
    /// A single condition that must hold.
    And(Option<Condition>),
    /// At least one of two or more conditions must hold.
    Or(Vec<Option<Condition>>),
}

/// A parsed WHERE body: groups combined with AND in order.
pub type Clause = Vec<ClauseGroup>;

/// Logical join between a builder condition and the one before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Logic {
    #[default]
    And,
    Or,
}

impl fmt::Display for Logic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Logic::And => write!(f, "AND"),
            Logic::Or => write!(f, "OR"),
        }
    }
}

impl FromStr for Logic {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "AND" => Ok(Logic::And),
            "OR" => Ok(Logic::Or),
            _ => Err(format!("invalid logic: {value}")),
        }
    }
}
