//! Fluent SELECT builder
//!
//! [`SelectQuery`] is a plain value: every method consumes it and hands back
//! the extended query, so a configured query can be cloned, stored and
//! rendered any number of times. Fragments are rendered when the method is
//! called, which means a qualified filter captures the alias that was set at
//! that moment.

use crate::errors::QueryError;
use crate::query_builder::filter::{ComparisonOperator, PatternKind, Predicate};
use crate::query_builder::join::{JoinClause, JoinType};
use crate::query_builder::ordering::SortOrder;
use crate::query_builder::sql_generation::SqlGenerator;
use serde_json::Value;
use std::fmt;

/// `LIMIT offset,count`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limit {
    pub count: u64,
    pub offset: u64,
}

impl Limit {
    pub fn new(count: u64, offset: u64) -> Self {
        Self { count, offset }
    }

    /// Read the limit as a page request: `(current_page, page_size)`.
    ///
    /// Paginated queries store the page number in the offset slot and the
    /// page size in the count slot (see [`SelectQuery::page`]).
    pub fn as_page(&self) -> (i64, u64) {
        (i64::try_from(self.offset).unwrap_or(i64::MAX), self.count)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SelectQuery {
    pub(crate) fields: Vec<String>,
    pub(crate) table: Option<String>,
    pub(crate) alias: Option<String>,
    pub(crate) joins: Vec<JoinClause>,
    pub(crate) predicates: Vec<Predicate>,
    pub(crate) patterns: Vec<Predicate>,
    pub(crate) order_by: Vec<(String, SortOrder)>,
    pub(crate) limit: Option<Limit>,
    pub(crate) found_rows: bool,
}

impl SelectQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the selected expressions; an empty list renders as `*`
    pub fn select<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Set the source table with an alias used to qualify filter columns
    pub fn from(mut self, table: impl Into<String>, alias: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self.alias = Some(alias.into());
        self
    }

    /// Set the source table without an alias
    pub fn from_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self.alias = None;
        self
    }

    /// Add one comparison predicate per `(column, value)` pair, columns used as given
    pub fn filter<I, K, V>(
        mut self,
        conditions: I,
        operator: ComparisonOperator,
    ) -> Result<Self, QueryError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        for (column, value) in conditions {
            self.predicates
                .push(Predicate::compare(column, operator, value)?);
        }
        Ok(self)
    }

    /// Like [`SelectQuery::filter`], with every column prefixed by the current alias
    pub fn filter_qualified<I, K, V>(
        mut self,
        conditions: I,
        operator: ComparisonOperator,
    ) -> Result<Self, QueryError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        for (column, value) in conditions {
            let column = self.qualify(column.into())?;
            self.predicates
                .push(Predicate::compare(column, operator, value)?);
        }
        Ok(self)
    }

    /// Single `column = 'value'` predicate
    pub fn filter_eq(
        mut self,
        column: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<Self, QueryError> {
        self.predicates
            .push(Predicate::compare(column, ComparisonOperator::Eq, value)?);
        Ok(self)
    }

    /// `left = right` between two columns, neither side quoted
    pub fn filter_columns(
        mut self,
        left: impl Into<String>,
        right: impl Into<String>,
    ) -> Result<Self, QueryError> {
        self.predicates.push(Predicate::columns(left, right)?);
        Ok(self)
    }

    pub fn clear_where(mut self) -> Self {
        self.predicates.clear();
        self
    }

    /// `column LIKE '%value%'`
    pub fn like<I, K, V>(self, conditions: I) -> Result<Self, QueryError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.pattern(conditions, PatternKind::Contains)
    }

    /// `column LIKE '%value'`
    pub fn like_left<I, K, V>(self, conditions: I) -> Result<Self, QueryError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.pattern(conditions, PatternKind::EndsWith)
    }

    /// `column LIKE 'value%'`
    pub fn like_right<I, K, V>(self, conditions: I) -> Result<Self, QueryError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.pattern(conditions, PatternKind::StartsWith)
    }

    fn pattern<I, K, V>(mut self, conditions: I, kind: PatternKind) -> Result<Self, QueryError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        for (column, value) in conditions {
            self.patterns.push(Predicate::pattern(column, kind, value)?);
        }
        Ok(self)
    }

    pub fn clear_like(mut self) -> Self {
        self.patterns.clear();
        self
    }

    pub fn order_by(mut self, column: impl Into<String>, order: SortOrder) -> Self {
        self.order_by.push((column.into(), order));
        self
    }

    /// Add ordering from `(column, "ASC" | "DESC")` pairs, direction case-insensitive
    pub fn order_by_terms<I, K, D>(mut self, terms: I) -> Result<Self, QueryError>
    where
        I: IntoIterator<Item = (K, D)>,
        K: Into<String>,
        D: AsRef<str>,
    {
        for (column, direction) in terms {
            let order = direction.as_ref().parse::<SortOrder>()?;
            self.order_by.push((column.into(), order));
        }
        Ok(self)
    }

    pub fn clear_order_by(mut self) -> Self {
        self.order_by.clear();
        self
    }

    /// Renders as `LIMIT offset,count`
    pub fn limit(mut self, count: u64, offset: u64) -> Self {
        self.limit = Some(Limit::new(count, offset));
        self
    }

    /// Request a page: the executor reads this limit as `(current_page, page_size)`
    /// when pagination is on and rewrites it to the computed offset.
    pub fn page(self, current_page: u64, page_size: u64) -> Self {
        self.limit(page_size, current_page)
    }

    pub fn clear_limit(mut self) -> Self {
        self.limit = None;
        self
    }

    /// `INNER JOIN table ON table.key <op> reference`
    pub fn inner_join(
        self,
        table: impl Into<String>,
        key: impl Into<String>,
        reference: impl Into<String>,
        operator: ComparisonOperator,
    ) -> Self {
        self.join(JoinType::Inner, table, key, operator, reference)
    }

    /// `LEFT JOIN table ON table.key <op> reference`
    pub fn left_join(
        self,
        table: impl Into<String>,
        key: impl Into<String>,
        reference: impl Into<String>,
        operator: ComparisonOperator,
    ) -> Self {
        self.join(JoinType::Left, table, key, operator, reference)
    }

    pub fn join(
        mut self,
        join_type: JoinType,
        table: impl Into<String>,
        key: impl Into<String>,
        operator: ComparisonOperator,
        reference: impl Into<String>,
    ) -> Self {
        self.joins
            .push(JoinClause::new(join_type, table, key, operator, reference));
        self
    }

    /// Prefix the select list with `SQL_CALC_FOUND_ROWS`
    pub fn set_pagination(mut self, enabled: bool) -> Self {
        self.found_rows = enabled;
        self
    }

    fn qualify(&self, column: String) -> Result<String, QueryError> {
        match &self.alias {
            Some(alias) => Ok(format!("{}.{}", alias, column)),
            None => Err(QueryError::MissingAlias(column)),
        }
    }

    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn current_limit(&self) -> Option<Limit> {
        self.limit
    }

    pub fn has_found_rows(&self) -> bool {
        self.found_rows
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn patterns(&self) -> &[Predicate] {
        &self.patterns
    }

    pub fn joins(&self) -> &[JoinClause] {
        &self.joins
    }

    /// Render the full SELECT statement
    pub fn to_sql(&self) -> String {
        SqlGenerator::build_select(self)
    }

    /// Render `SELECT COUNT(expr)` over the same source, joins and filters
    pub fn count_sql(&self, expr: &str) -> String {
        SqlGenerator::build_count(self, expr)
    }

    /// Count of the rows this query yields without its limit
    pub fn total_sql(&self) -> String {
        SqlGenerator::build_total(self)
    }
}

impl fmt::Display for SelectQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}
