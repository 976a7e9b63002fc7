//! Predicate definitions
//!
//! Predicates are validated when they are built, so a rendered query never
//! carries a half-formed condition.

use crate::errors::QueryError;
use serde_json::Value;
use std::str::FromStr;
use type_mapping::{escape_literal, is_scalar, literal_text, value_kind};

/// Comparison operators for column/value predicates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComparisonOperator {
    #[default]
    Eq, // =
    Ne,  // !=
    Gt,  // >
    Gte, // >=
    Lt,  // <
    Lte, // <=
}

impl ComparisonOperator {
    pub fn to_sql(&self) -> &'static str {
        match self {
            ComparisonOperator::Eq => "=",
            ComparisonOperator::Ne => "!=",
            ComparisonOperator::Gt => ">",
            ComparisonOperator::Gte => ">=",
            ComparisonOperator::Lt => "<",
            ComparisonOperator::Lte => "<=",
        }
    }
}

impl FromStr for ComparisonOperator {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "=" | "==" => Ok(ComparisonOperator::Eq),
            "!=" | "<>" => Ok(ComparisonOperator::Ne),
            ">" => Ok(ComparisonOperator::Gt),
            ">=" => Ok(ComparisonOperator::Gte),
            "<" => Ok(ComparisonOperator::Lt),
            "<=" => Ok(ComparisonOperator::Lte),
            other => Err(QueryError::invalid_predicate(format!(
                "unsupported comparison operator `{}`",
                other
            ))),
        }
    }
}

/// Where the wildcards go in a LIKE pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    /// `%value%`
    Contains,
    /// `%value`
    EndsWith,
    /// `value%`
    StartsWith,
}

impl PatternKind {
    pub fn wrap(&self, text: &str) -> String {
        match self {
            PatternKind::Contains => format!("%{}%", text),
            PatternKind::EndsWith => format!("%{}", text),
            PatternKind::StartsWith => format!("{}%", text),
        }
    }
}

/// One condition of the WHERE clause
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `column op 'value'`
    Compare {
        column: String,
        operator: ComparisonOperator,
        value: Value,
    },
    /// `column LIKE 'pattern'`
    Pattern {
        column: String,
        kind: PatternKind,
        value: Value,
    },
    /// `left = right`, both sides unquoted
    Columns { left: String, right: String },
}

fn checked_column(column: String) -> Result<String, QueryError> {
    if column.trim().is_empty() {
        return Err(QueryError::invalid_predicate("column name cannot be empty"));
    }
    Ok(column)
}

impl Predicate {
    /// Comparison against a scalar value; null and composite values are rejected
    pub fn compare(
        column: impl Into<String>,
        operator: ComparisonOperator,
        value: impl Into<Value>,
    ) -> Result<Self, QueryError> {
        let column = checked_column(column.into())?;
        let value = value.into();

        if value.is_null() || !is_scalar(&value) {
            return Err(QueryError::invalid_predicate(format!(
                "cannot compare `{}` against a {} value",
                column,
                value_kind(&value)
            )));
        }

        Ok(Self::Compare {
            column,
            operator,
            value,
        })
    }

    /// Pattern match; any scalar (null included) is accepted
    pub fn pattern(
        column: impl Into<String>,
        kind: PatternKind,
        value: impl Into<Value>,
    ) -> Result<Self, QueryError> {
        let column = checked_column(column.into())?;
        let value = value.into();

        if !is_scalar(&value) {
            return Err(QueryError::invalid_predicate(format!(
                "cannot match `{}` against a {} value",
                column,
                value_kind(&value)
            )));
        }

        Ok(Self::Pattern {
            column,
            kind,
            value,
        })
    }

    pub fn columns(left: impl Into<String>, right: impl Into<String>) -> Result<Self, QueryError> {
        Ok(Self::Columns {
            left: checked_column(left.into())?,
            right: checked_column(right.into())?,
        })
    }

    pub fn column(&self) -> &str {
        match self {
            Predicate::Compare { column, .. } | Predicate::Pattern { column, .. } => column,
            Predicate::Columns { left, .. } => left,
        }
    }

    pub fn to_sql(&self) -> String {
        match self {
            Predicate::Compare {
                column,
                operator,
                value,
            } => {
                let text = literal_text(value).unwrap_or_default();
                format!("{} {} '{}'", column, operator.to_sql(), escape_literal(&text))
            }
            Predicate::Pattern {
                column,
                kind,
                value,
            } => {
                let text = literal_text(value).unwrap_or_default();
                format!("{} LIKE '{}'", column, escape_literal(&kind.wrap(&text)))
            }
            Predicate::Columns { left, right } => format!("{} = {}", left, right),
        }
    }
}
