//! SQL text assembly for [`SelectQuery`](crate::query_builder::SelectQuery)

use crate::query_builder::builder::{Limit, SelectQuery};
use crate::query_builder::filter::Predicate;
use crate::query_builder::join::JoinClause;
use crate::query_builder::ordering::SortOrder;

pub struct SqlGenerator;

impl SqlGenerator {
    /// Build SELECT clause from fields
    pub fn build_select_clause(fields: &[String], found_rows: bool) -> String {
        let list = if fields.is_empty() {
            "*".to_string()
        } else {
            fields.join(", ")
        };

        if found_rows {
            format!("SELECT SQL_CALC_FOUND_ROWS {}", list)
        } else {
            format!("SELECT {}", list)
        }
    }

    pub fn build_from_clause(table: Option<&str>, alias: Option<&str>) -> String {
        match (table, alias) {
            (Some(table), Some(alias)) => format!("FROM {} AS {}", table, alias),
            (Some(table), None) => format!("FROM {}", table),
            (None, _) => "".to_string(),
        }
    }

    /// Build JOIN clauses
    pub fn build_join_clause(joins: &[JoinClause]) -> String {
        joins
            .iter()
            .map(JoinClause::to_sql)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Build WHERE clause; pattern predicates follow the comparisons and open
    /// the clause themselves when there are none
    pub fn build_where_clause(predicates: &[Predicate], patterns: &[Predicate]) -> String {
        let conditions: Vec<String> = predicates
            .iter()
            .chain(patterns)
            .map(Predicate::to_sql)
            .collect();

        if conditions.is_empty() {
            "".to_string()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        }
    }

    /// Build ORDER BY clause
    pub fn build_order_clause(order_by: &[(String, SortOrder)]) -> String {
        if order_by.is_empty() {
            return "".to_string();
        }

        let order_items: Vec<String> = order_by
            .iter()
            .map(|(field, order)| format!("{} {}", field, order.to_sql()))
            .collect();

        format!("ORDER BY {}", order_items.join(", "))
    }

    /// Build MySQL `LIMIT offset,count` clause
    pub fn build_limit_clause(limit: Option<Limit>) -> String {
        match limit {
            Some(limit) => format!("LIMIT {},{}", limit.offset, limit.count),
            None => "".to_string(),
        }
    }

    pub fn build_select(query: &SelectQuery) -> String {
        Self::assemble([
            Self::build_select_clause(&query.fields, query.found_rows),
            Self::build_from_clause(query.table.as_deref(), query.alias.as_deref()),
            Self::build_join_clause(&query.joins),
            Self::build_where_clause(&query.predicates, &query.patterns),
            Self::build_order_clause(&query.order_by),
            Self::build_limit_clause(query.limit),
        ])
    }

    /// Ordering and limit are dropped, they do not change the count
    pub fn build_count(query: &SelectQuery, expr: &str) -> String {
        Self::assemble([
            format!("SELECT COUNT({})", expr),
            Self::build_from_clause(query.table.as_deref(), query.alias.as_deref()),
            Self::build_join_clause(&query.joins),
            Self::build_where_clause(&query.predicates, &query.patterns),
        ])
    }

    /// Total row count of the query as the page query would see it.
    ///
    /// A select list that can change the row count (`DISTINCT`, aggregates)
    /// is kept and counted as a derived table; otherwise the plain count is
    /// enough and avoids duplicate column names from joined `*` selects.
    pub fn build_total(query: &SelectQuery) -> String {
        if !Self::reshapes_rows(&query.fields) {
            return Self::build_count(query, "*");
        }

        let inner = Self::assemble([
            Self::build_select_clause(&query.fields, false),
            Self::build_from_clause(query.table.as_deref(), query.alias.as_deref()),
            Self::build_join_clause(&query.joins),
            Self::build_where_clause(&query.predicates, &query.patterns),
        ]);
        format!("SELECT COUNT(*) FROM ({}) AS page_source", inner)
    }

    fn reshapes_rows(fields: &[String]) -> bool {
        fields.iter().any(|field| {
            let field = field.trim_start();
            field.contains('(')
                || field
                    .get(..9)
                    .is_some_and(|head| head.eq_ignore_ascii_case("DISTINCT "))
        })
    }

    fn assemble<const N: usize>(parts: [String; N]) -> String {
        parts
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
