//! Record operations
//!
//! Single-table insert, update, delete and select with bound parameters.
//! Table and column names are validated before they reach SQL text; values
//! never do.


use crate::connection::{Connection, ExecuteResult};
use crate::errors::QueryError;
use crate::validation::{ValidatedFieldName, ValidatedTableName};
use serde::Serialize;
use serde_json::Value;
use type_mapping::Row;

/// SQL text plus the values for its `?` placeholders, not yet executed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreparedStatement {
    pub sql: String,
    pub values: Vec<Value>,
}

pub struct RecordStore<C: Connection> {
    conn: C,
    table: ValidatedTableName,
}

impl<C: Connection> std::fmt::Debug for RecordStore<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStore")
            .field("table", &self.table)
            .finish()
    }
}

/// Split a record into validated column names and their values
fn columns_of(record: &Row) -> Result<(Vec<String>, Vec<Value>), QueryError> {
    if record.is_empty() {
        return Err(QueryError::InvalidRecord(
            "record has no fields".to_string(),
        ));
    }

    let mut columns = Vec::with_capacity(record.len());
    let mut values = Vec::with_capacity(record.len());
    for (column, value) in record {
        columns.push(ValidatedFieldName::new(column)?.into_string());
        values.push(value.clone());
    }
    Ok((columns, values))
}

fn conditions(columns: &[String]) -> String {
    columns
        .iter()
        .map(|column| format!("{} = ?", column))
        .collect::<Vec<_>>()
        .join(" AND ")
}

impl<C: Connection> RecordStore<C> {
    pub fn new(conn: C, table: &str) -> Result<Self, QueryError> {
        Ok(Self {
            conn,
            table: ValidatedTableName::new(table)?,
        })
    }

    pub fn table(&self) -> &str {
        self.table.as_str()
    }

    pub fn connection_mut(&mut self) -> &mut C {
        &mut self.conn
    }

    pub fn into_inner(self) -> C {
        self.conn
    }

    /// Id generated by the last insert on this connection
    pub fn last_insert_id(&self) -> Option<u64> {
        self.conn.last_insert_id()
    }

    pub fn insert_statement(&self, record: &Row) -> Result<PreparedStatement, QueryError> {
        let (columns, values) = columns_of(record)?;
        let placeholders = vec!["?"; columns.len()].join(", ");

        Ok(PreparedStatement {
            sql: format!(
                "INSERT INTO {} ({}) VALUES ({})",
                self.table,
                columns.join(", "),
                placeholders
            ),
            values,
        })
    }

    /// `INSERT INTO table (a, b) VALUES (?, ?)`
    pub async fn insert(&mut self, record: &Row) -> Result<ExecuteResult, QueryError> {
        let statement = self.insert_statement(record)?;
        self.run(&statement).await
    }

    /// The insert statement for `record`, or `None` when an identical row exists
    pub async fn prepare_insert_unless_exists(
        &mut self,
        record: &Row,
    ) -> Result<Option<PreparedStatement>, QueryError> {
        let statement = self.insert_statement(record)?;
        let existing = self.select(record).await?;

        if existing.is_empty() {
            Ok(Some(statement))
        } else {
            tracing::debug!("[INSERT] {} already has a matching row, skipping", self.table);
            Ok(None)
        }
    }

    /// Insert unless an identical row exists; `None` when nothing was inserted
    pub async fn insert_unless_exists(
        &mut self,
        record: &Row,
    ) -> Result<Option<ExecuteResult>, QueryError> {
        match self.prepare_insert_unless_exists(record).await? {
            Some(statement) => Ok(Some(self.run(&statement).await?)),
            None => Ok(None),
        }
    }

    /// `UPDATE table SET a = ?, b = ? WHERE key = ?`; true when a row changed
    pub async fn update(
        &mut self,
        record: &Row,
        key_field: &str,
        key_value: impl Into<Value>,
    ) -> Result<bool, QueryError> {
        let (columns, mut values) = columns_of(record)?;
        let key_field = ValidatedFieldName::new(key_field)?;
        values.push(key_value.into());

        let assignments = columns
            .iter()
            .map(|column| format!("{} = ?", column))
            .collect::<Vec<_>>()
            .join(", ");
        let statement = PreparedStatement {
            sql: format!(
                "UPDATE {} SET {} WHERE {} = ?",
                self.table, assignments, key_field
            ),
            values,
        };

        Ok(self.run(&statement).await?.rows_affected > 0)
    }

    /// `DELETE FROM table WHERE key = ?`; true when a row was removed
    pub async fn delete(
        &mut self,
        key_field: &str,
        key_value: impl Into<Value>,
    ) -> Result<bool, QueryError> {
        let key_field = ValidatedFieldName::new(key_field)?;
        let statement = PreparedStatement {
            sql: format!("DELETE FROM {} WHERE {} = ?", self.table, key_field),
            values: vec![key_value.into()],
        };

        Ok(self.run(&statement).await?.rows_affected > 0)
    }

    /// Rows matching every `(column, value)` of `criteria`; all rows when empty
    pub async fn select(&mut self, criteria: &Row) -> Result<Vec<Row>, QueryError> {
        let (sql, values) = if criteria.is_empty() {
            (format!("SELECT * FROM {}", self.table), Vec::new())
        } else {
            let (columns, values) = columns_of(criteria)?;
            (
                format!("SELECT * FROM {} WHERE {}", self.table, conditions(&columns)),
                values,
            )
        };

        self.query_prepared(&sql, &values).await
    }

    /// Run raw SQL and return its rows
    pub async fn query(&mut self, sql: &str) -> Result<Vec<Row>, QueryError> {
        self.query_prepared(sql, &[]).await
    }

    /// Run SQL with positional `?` parameters and return its rows
    pub async fn query_prepared(&mut self, sql: &str, params: &[Value]) -> Result<Vec<Row>, QueryError> {
        crate::debug_log!("[SELECT] SQL: {}", sql);

        self.conn.fetch_all(sql, params).await.map_err(|e| {
            tracing::error!(sql = %sql, error = %e, "query failed");
            QueryError::query_execution(sql, e)
        })
    }

    /// `FOUND_ROWS()` after a `SQL_CALC_FOUND_ROWS` query on this connection
    pub async fn found_rows(&mut self) -> Result<Option<u64>, QueryError> {
        self.conn.found_rows().await.map_err(|e| {
            tracing::error!(error = %e, "FOUND_ROWS() failed");
            QueryError::query_execution("SELECT FOUND_ROWS()", e)
        })
    }

    async fn run(&mut self, statement: &PreparedStatement) -> Result<ExecuteResult, QueryError> {
        crate::debug_log!(
            "[EXECUTE] SQL: {}, params: {}",
            statement.sql,
            statement.values.len()
        );

        self.conn
            .execute(&statement.sql, &statement.values)
            .await
            .map_err(|e| {
                tracing::error!(sql = %statement.sql, error = %e, "statement failed");
                QueryError::query_execution(statement.sql.as_str(), e)
            })
    }
}
