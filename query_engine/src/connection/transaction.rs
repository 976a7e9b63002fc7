//! Transaction support
//!
//! This module provides a scoped transaction over any [`Connection`],
//! allowing multiple operations to be executed atomically.

use crate::connection::Connection;
use crate::errors::QueryError;

/// A transactional context over a borrowed connection
///
/// # Example
/// ```ignore
/// let mut tx = Transaction::begin(&mut connector).await?;
///
/// let mut wallets = RecordStore::new(tx.connection(), "wallets")?;
/// wallets.update(&debit, "id", 1).await?;
/// wallets.update(&credit, "id", 2).await?;
///
/// tx.commit().await?;
/// ```
pub struct Transaction<'c, C: Connection> {
    conn: &'c mut C,
    finished: bool,
}

impl<'c, C: Connection> Transaction<'c, C> {
    /// Begin a new database transaction
    pub async fn begin(conn: &'c mut C) -> Result<Self, QueryError> {
        conn.begin().await?;
        Ok(Self {
            conn,
            finished: false,
        })
    }

    /// Commit the transaction
    pub async fn commit(mut self) -> Result<(), QueryError> {
        self.finished = true;
        self.conn.commit().await?;
        Ok(())
    }

    /// Rollback the transaction
    pub async fn rollback(mut self) -> Result<(), QueryError> {
        self.finished = true;
        self.conn.rollback().await?;
        Ok(())
    }

    /// The connection to run statements on inside the transaction
    pub fn connection(&mut self) -> &mut C {
        &mut *self.conn
    }
}

impl<C: Connection> Drop for Transaction<'_, C> {
    fn drop(&mut self) {
        if !self.finished {
            tracing::warn!("transaction dropped without commit or rollback");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::mock::MockConnection;

    #[tokio::test]
    async fn test_commit_sends_begin_then_commit() {
        let mut conn = MockConnection::with_rows(Vec::new());

        let mut tx = Transaction::begin(&mut conn).await.unwrap();
        tx.connection().execute("DELETE FROM t", &[]).await.unwrap();
        tx.commit().await.unwrap();

        assert_eq!(
            conn.statements,
            vec!["START TRANSACTION", "DELETE FROM t", "COMMIT"]
        );
    }

    #[tokio::test]
    async fn test_rollback() {
        let mut conn = MockConnection::with_rows(Vec::new());

        let tx = Transaction::begin(&mut conn).await.unwrap();
        tx.rollback().await.unwrap();

        assert_eq!(conn.statements, vec!["START TRANSACTION", "ROLLBACK"]);
    }
}
