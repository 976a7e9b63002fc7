use crate::query_builder::filter::ComparisonOperator;

/// Represents the type of SQL JOIN operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    /// INNER JOIN - returns records that have matching values in both tables
    Inner,
    /// LEFT JOIN - returns all records from the left table and matched records from the right table
    Left,
}

impl JoinType {
    /// Convert JoinType to SQL string
    pub fn to_sql(&self) -> &'static str {
        match self {
            JoinType::Inner => "INNER JOIN",
            JoinType::Left => "LEFT JOIN",
        }
    }
}

/// Represents a complete JOIN clause: `<type> <table> ON <table>.<key> <op> <reference>`
#[derive(Debug, Clone, PartialEq)]
pub struct JoinClause {
    /// Type of join (INNER or LEFT)
    pub join_type: JoinType,
    /// Table to join with
    pub table: String,
    /// Column of the joined table, qualified with the table name when rendered
    pub key: String,
    pub operator: ComparisonOperator,
    /// Already-qualified column on the other side, rendered verbatim
    pub reference: String,
}

impl JoinClause {
    pub fn new(
        join_type: JoinType,
        table: impl Into<String>,
        key: impl Into<String>,
        operator: ComparisonOperator,
        reference: impl Into<String>,
    ) -> Self {
        Self {
            join_type,
            table: table.into(),
            key: key.into(),
            operator,
            reference: reference.into(),
        }
    }

    pub fn to_sql(&self) -> String {
        format!(
            "{} {} ON {}.{} {} {}",
            self.join_type.to_sql(),
            self.table,
            self.table,
            self.key,
            self.operator.to_sql(),
            self.reference
        )
    }
}
