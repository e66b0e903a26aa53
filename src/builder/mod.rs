//! Condition builder: a structured list of conditions that generates the
//! same WHERE text the expert mode accepts.
//!
//! Each condition's `logic` joins it to the condition before it. Since the
//! parser splits on AND before OR, every AND-joined condition opens a new
//! group and every OR-joined one extends the current group.

use anyhow::Context;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::dsl::{
    Clause, ClauseGroup, Condition, Logic, Operator, evaluate_clause, is_float_literal,
    parse_clause,
};
use crate::table::Row;

/// Stable identifier of a builder condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConditionId(u64);

/// One user-edited condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleCondition {
    pub id: ConditionId,
    pub column: String,
    pub operator: Operator,
    pub value: String,
    pub logic: Logic,
}

impl SimpleCondition {
    fn to_condition(&self) -> Condition {
        let operand = if self.operator.takes_operand() {
            self.value.clone()
        } else {
            String::new()
        };
        Condition::new(self.column.clone(), self.operator, operand)
    }

    /// `column OP operand` as it appears in the generated text.
    fn fragment(&self) -> String {
        match format_operand(self.operator, &self.value) {
            Some(operand) => format!("{} {} {}", self.column, self.operator.token(), operand),
            None => format!("{} {}", self.column, self.operator.token()),
        }
    }

    /// The generated fragment must parse back to exactly this condition.
    /// The language has no escaping, so values or columns that contain a
    /// separating `AND`/`OR` or another operator token are refused.
    fn validate(&self) -> Result<(), BuilderError> {
        if self.column.trim().is_empty() {
            return Err(BuilderError::BlankColumn);
        }
        let fragment = self.fragment();
        if parse_clause(&fragment) != vec![ClauseGroup::And(Some(self.to_condition()))] {
            return Err(BuilderError::Inexpressible(fragment));
        }
        Ok(())
    }
}

/// A single field edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConditionEdit {
    Column(String),
    Operator(Operator),
    Value(String),
    Logic(Logic),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuilderError {
    #[error("dataset has no columns")]
    NoColumns,

    #[error("unknown condition {0:?}")]
    UnknownCondition(ConditionId),

    #[error("column name must not be blank")]
    BlankColumn,

    #[error("`{0}` does not read back as the same condition (AND, OR or an operator inside the column or value)")]
    Inexpressible(String),
}

/// Ordered list of conditions for one dataset.
#[derive(Debug, Clone, Default)]
pub struct ConditionBuilder {
    headers: Vec<String>,
    conditions: Vec<SimpleCondition>,
    next_id: u64,
    where_clause: String,
}

impl ConditionBuilder {
    pub fn new(headers: Vec<String>) -> Self {
        ConditionBuilder {
            headers,
            ..Default::default()
        }
    }

    pub fn conditions(&self) -> &[SimpleCondition] {
        &self.conditions
    }

    /// Generated WHERE text; empty when there are no conditions.
    pub fn where_clause(&self) -> &str {
        &self.where_clause
    }

    /// Append a condition with defaults: first column, `=`, empty value, AND.
    pub fn add(&mut self) -> Result<ConditionId, BuilderError> {
        let column = self.headers.first().ok_or(BuilderError::NoColumns)?.clone();
        let id = ConditionId(self.next_id);
        let condition = SimpleCondition {
            id,
            column,
            operator: Operator::Eq,
            value: String::new(),
            logic: Logic::And,
        };
        condition.validate()?;

        self.next_id += 1;
        self.conditions.push(condition);
        self.regenerate();
        Ok(id)
    }

    /// Apply an edit. The condition is left untouched when the result
    /// could not be written as clause text.
    pub fn update(&mut self, id: ConditionId, edit: ConditionEdit) -> Result<(), BuilderError> {
        let condition = self
            .conditions
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(BuilderError::UnknownCondition(id))?;

        let mut edited = condition.clone();
        match edit {
            ConditionEdit::Column(column) => edited.column = column,
            ConditionEdit::Operator(operator) => edited.operator = operator,
            ConditionEdit::Value(value) => edited.value = value,
            ConditionEdit::Logic(logic) => edited.logic = logic,
        }
        edited.validate()?;
        *condition = edited;

        self.regenerate();
        Ok(())
    }

    pub fn remove(&mut self, id: ConditionId) -> bool {
        let before = self.conditions.len();
        self.conditions.retain(|c| c.id != id);
        let removed = self.conditions.len() != before;
        if removed {
            self.regenerate();
        }
        removed
    }

    pub fn clear(&mut self) {
        self.conditions.clear();
        self.regenerate();
    }

    /// Switch to another dataset's columns. Existing conditions are dropped
    /// because they refer to the old columns.
    pub fn switch_dataset(&mut self, headers: Vec<String>) {
        self.headers = headers;
        self.clear();
    }

    fn regenerate(&mut self) {
        self.where_clause = generate_where(&self.conditions);
    }

    /// The clause structure the generated text parses to.
    pub fn to_clause(&self) -> Clause {
        let mut groups: Vec<Vec<Condition>> = Vec::new();
        for (idx, simple) in self.conditions.iter().enumerate() {
            if idx > 0
                && simple.logic == Logic::Or
                && let Some(group) = groups.last_mut()
            {
                group.push(simple.to_condition());
                continue;
            }
            groups.push(vec![simple.to_condition()]);
        }

        groups
            .into_iter()
            .map(|mut group| {
                if group.len() == 1 {
                    ClauseGroup::And(group.pop())
                } else {
                    ClauseGroup::Or(group.into_iter().map(Some).collect())
                }
            })
            .collect()
    }

    /// Evaluate the conditions directly, without going through text.
    pub fn matches(&self, row: &Row) -> bool {
        evaluate_clause(&self.to_clause(), row)
    }

    /// Load a condition list from a YAML document.
    pub fn load(headers: Vec<String>, path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Conditions: Failed to read {:?}", path))?;
        let entries: Vec<ConditionEntry> = serde_yaml::from_str(&text)
            .with_context(|| format!("Conditions: Failed to parse {:?}", path))?;
        let mut builder = ConditionBuilder::new(headers);
        for (idx, entry) in entries.into_iter().enumerate() {
            builder.push_entry(entry).map_err(|e| {
                anyhow::anyhow!("Error in condition {} of {:?}: {}", idx + 1, path, e)
            })?;
        }
        Ok(builder)
    }

    fn push_entry(&mut self, entry: ConditionEntry) -> anyhow::Result<()> {
        let id = self.add()?;
        if let Some(column) = entry.column {
            self.update(id, ConditionEdit::Column(column))?;
        }
        if let Some(operator) = entry.operator {
            let operator = operator.parse::<Operator>().map_err(anyhow::Error::msg)?;
            self.update(id, ConditionEdit::Operator(operator))?;
        }
        if let Some(value) = entry.value {
            let value = scalar_to_string(value).map_err(anyhow::Error::msg)?;
            self.update(id, ConditionEdit::Value(value))?;
        }
        if let Some(logic) = entry.logic {
            let logic = logic.parse::<Logic>().map_err(anyhow::Error::msg)?;
            self.update(id, ConditionEdit::Logic(logic))?;
        }
        Ok(())
    }
}

/// Raw condition from a YAML file (before validation).
#[derive(Debug, Clone, Deserialize)]
struct ConditionEntry {
    #[serde(default)]
    column: Option<String>,
    #[serde(default)]
    operator: Option<String>,
    #[serde(default)]
    value: Option<serde_yaml::Value>,
    #[serde(default)]
    logic: Option<String>,
}

/// Values may be written as YAML numbers or booleans; they are used as text.
fn scalar_to_string(value: serde_yaml::Value) -> Result<String, String> {
    match value {
        serde_yaml::Value::Null => Ok(String::new()),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::String(s) => Ok(s),
        other => Err(format!("value must be a scalar, got {:?}", other)),
    }
}

/// Render a condition list as `WHERE ...` text.
pub fn generate_where(conditions: &[SimpleCondition]) -> String {
    if conditions.is_empty() {
        return String::new();
    }

    let mut clause = String::from("WHERE ");
    for (idx, condition) in conditions.iter().enumerate() {
        if idx > 0 {
            clause.push_str(&format!(" {} ", condition.logic));
        }
        clause.push_str(&condition.fragment());
    }
    clause
}

/// Format an operand for the generated text; `None` for operators that
/// take no operand.
pub fn format_operand(operator: Operator, value: &str) -> Option<String> {
    if !operator.takes_operand() {
        return None;
    }
    if value.is_empty() {
        return Some("''".to_string());
    }
    if operator.is_numeric() && value.trim() == value && is_float_literal(value) {
        return Some(value.to_string());
    }
    Some(format!("'{value}'"))
}
