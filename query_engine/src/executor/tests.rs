use crate::connection::mock::{row, MockConnection};
use crate::errors::QueryError;
use crate::executor::{ExecuteOptions, Lines, QueryExecutor, QueryOutput};
use crate::query_builder::{ComparisonOperator, SelectQuery, SortOrder};
use config::{CountStrategy, FailurePolicy, QueryConfig};
use futures::StreamExt;
use serde_json::json;
use type_mapping::Row;

fn people(n: usize) -> Vec<Row> {
    (1..=n)
        .map(|i| row([("id", json!(i)), ("name", json!(format!("user{}", i)))]))
        .collect()
}

fn users() -> SelectQuery {
    SelectQuery::new()
        .select(["u.id", "u.name"])
        .from("users", "u")
}

/// Answers count queries with `total` and everything else with `rows`
fn counting(total: i64, rows: Vec<Row>) -> MockConnection {
    MockConnection::new(move |sql| {
        if sql.starts_with("SELECT COUNT(") {
            Ok(vec![row([("COUNT(*)", json!(total))])])
        } else {
            Ok(rows.clone())
        }
    })
}

fn config(count_strategy: CountStrategy, on_failure: FailurePolicy) -> QueryConfig {
    QueryConfig::new(10, count_strategy, on_failure)
}

// ========================================
// execute
// ========================================

#[tokio::test]
async fn test_execute_wraps_rows_in_envelope() {
    let mut executor = QueryExecutor::new(MockConnection::with_rows(people(2)));

    let output = executor
        .execute(&users(), ExecuteOptions::new())
        .await
        .unwrap();

    assert!(matches!(&output, QueryOutput::Envelope { data } if data.len() == 2));
    assert_eq!(executor.last_statement(), "SELECT u.id, u.name FROM users AS u");
    assert_eq!(
        executor.get_data(true, Some("data")),
        Some(json!({"id": 1, "name": "user1"}))
    );
}

#[tokio::test]
async fn test_execute_first_raw() {
    let mut executor = QueryExecutor::new(MockConnection::with_rows(people(3)));

    let output = executor
        .execute(&users(), ExecuteOptions::new().first().raw())
        .await
        .unwrap();

    assert_eq!(output, QueryOutput::Row(people(1).remove(0)));
}

#[tokio::test]
async fn test_execute_without_rows_returns_empty_list() {
    let mut executor = QueryExecutor::new(MockConnection::with_rows(Vec::new()));

    let output = executor
        .execute(&users(), ExecuteOptions::new().first())
        .await
        .unwrap();

    assert_eq!(output, QueryOutput::Rows(Vec::new()));
    assert_eq!(executor.get_data(false, None), Some(json!([])));
}

#[tokio::test]
async fn test_execute_counts_rows() {
    let mut executor = QueryExecutor::new(MockConnection::with_rows(people(4)));
    assert_eq!(executor.rows_affected(), None);

    executor
        .execute(&users(), ExecuteOptions::new().count_rows())
        .await
        .unwrap();

    assert_eq!(executor.rows_affected(), Some(4));
}

#[tokio::test]
async fn test_execute_requires_table() {
    let mut executor = QueryExecutor::new(MockConnection::with_rows(Vec::new()));

    let err = executor
        .execute(&SelectQuery::new(), ExecuteOptions::new())
        .await
        .unwrap_err();

    assert!(matches!(err, QueryError::MissingTable));
    assert!(executor.connection_mut().statements.is_empty());
}

// ========================================
// Pagination
// ========================================

#[tokio::test]
async fn test_paginate_with_count_query() {
    let conn = counting(23, people(3));
    let mut executor = QueryExecutor::with_config(
        conn,
        config(CountStrategy::CountQuery, FailurePolicy::Propagate),
    );

    let query = users()
        .filter_eq("u.active", 1)
        .unwrap()
        .order_by("u.id", SortOrder::Asc)
        .page(10, 5);
    let output = executor
        .execute(&query, ExecuteOptions::new().paginate())
        .await
        .unwrap();

    let page = output.as_page().unwrap();
    assert_eq!(page.total(), 23);
    assert_eq!(page.pages(), 5);
    assert_eq!(page.current_page(), 5);
    assert_eq!(page.offset(), 20);
    assert_eq!(page.data().len(), 3);

    assert_eq!(
        executor.connection_mut().statements,
        vec![
            "SELECT COUNT(*) FROM users AS u WHERE u.active = '1'",
            "SELECT u.id, u.name FROM users AS u WHERE u.active = '1' ORDER BY u.id ASC LIMIT 20,5",
        ]
    );
    assert_eq!(executor.get_data(false, Some("currentPage")), Some(json!(5)));
}

#[tokio::test]
async fn test_paginate_with_found_rows() {
    let mut conn = MockConnection::with_rows(people(2));
    conn.found_rows = Some(12);
    let mut executor = QueryExecutor::with_config(
        conn,
        config(CountStrategy::FoundRows, FailurePolicy::Propagate),
    );

    let output = executor
        .execute(&users().page(2, 10), ExecuteOptions::new().paginate())
        .await
        .unwrap();

    let page = output.as_page().unwrap();
    assert_eq!(page.total(), 12);
    assert_eq!(page.pages(), 2);
    assert_eq!(page.offset(), 10);

    assert_eq!(
        executor.connection_mut().statements,
        vec![
            "SELECT SQL_CALC_FOUND_ROWS u.id, u.name FROM users AS u LIMIT 2,10",
            "SELECT FOUND_ROWS()",
            "SELECT u.id, u.name FROM users AS u LIMIT 10,10",
        ]
    );
}

#[tokio::test]
async fn test_paginate_uses_found_rows_by_default() {
    let mut conn = MockConnection::with_rows(people(4));
    conn.found_rows = Some(4);
    let mut executor = QueryExecutor::new(conn);

    let output = executor
        .execute(&users().page(1, 2), ExecuteOptions::new().paginate())
        .await
        .unwrap();

    assert_eq!(output.as_page().unwrap().pages(), 2);
    assert_eq!(
        executor.connection_mut().statements[..2],
        [
            "SELECT SQL_CALC_FOUND_ROWS u.id, u.name FROM users AS u LIMIT 0,2",
            "SELECT FOUND_ROWS()",
        ]
    );
}

#[tokio::test]
async fn test_count_query_counts_distinct_rows() {
    let cities = vec![
        row([("city", json!("Oslo"))]),
        row([("city", json!("Lima"))]),
    ];
    let mut executor = QueryExecutor::with_config(
        counting(3, cities),
        config(CountStrategy::CountQuery, FailurePolicy::Propagate),
    );

    let query = SelectQuery::new()
        .select(["DISTINCT u.city"])
        .from("users", "u")
        .page(1, 2);
    let output = executor
        .execute(&query, ExecuteOptions::new().paginate())
        .await
        .unwrap();

    let page = output.as_page().unwrap();
    assert_eq!(page.total(), 3);
    assert_eq!(page.pages(), 2);
    assert_eq!(
        executor.connection_mut().statements,
        vec![
            "SELECT COUNT(*) FROM (SELECT DISTINCT u.city FROM users AS u) AS page_source",
            "SELECT DISTINCT u.city FROM users AS u LIMIT 0,2",
        ]
    );
}

#[tokio::test]
async fn test_found_rows_falls_back_to_count_query() {
    let conn = counting(7, people(7));
    let mut executor = QueryExecutor::with_config(
        conn,
        config(CountStrategy::FoundRows, FailurePolicy::Propagate),
    );

    let output = executor
        .execute(&users().page(1, 10), ExecuteOptions::new().paginate())
        .await
        .unwrap();

    assert_eq!(output.as_page().unwrap().total(), 7);
    let statements = &executor.connection_mut().statements;
    assert_eq!(statements[1], "SELECT FOUND_ROWS()");
    assert_eq!(statements[2], "SELECT COUNT(*) FROM users AS u");
}

#[tokio::test]
async fn test_paginate_without_limit_returns_default_envelope() {
    let mut executor = QueryExecutor::new(MockConnection::with_rows(people(2)));

    let output = executor
        .execute(&users(), ExecuteOptions::new().paginate())
        .await
        .unwrap();

    assert_eq!(
        serde_json::to_value(&output).unwrap(),
        json!({
            "limitPages": 10,
            "total": 0,
            "pages": 1,
            "offset": 0,
            "currentPage": 1,
            "data": []
        })
    );
    assert!(executor.connection_mut().statements.is_empty());
}

#[tokio::test]
async fn test_paginate_rejects_zero_page_size() {
    let mut executor = QueryExecutor::new(counting(5, people(5)));

    let err = executor
        .execute(&users().page(1, 0), ExecuteOptions::new().paginate())
        .await
        .unwrap_err();

    assert!(matches!(err, QueryError::InvalidPagination(_)));
    assert!(executor.connection_mut().statements.is_empty());
}

// ========================================
// Failure policy
// ========================================

#[tokio::test]
async fn test_failures_propagate_by_default() {
    let mut executor = QueryExecutor::new(MockConnection::failing());

    let err = executor
        .execute(&users(), ExecuteOptions::new())
        .await
        .unwrap_err();

    match err {
        QueryError::QueryExecution { sql, .. } => {
            assert_eq!(sql, "SELECT u.id, u.name FROM users AS u")
        }
        other => panic!("Expected QueryExecution, got {:?}", other),
    }
}

#[tokio::test]
async fn test_recover_policy_returns_empty_results() {
    let mut executor = QueryExecutor::with_config(
        MockConnection::failing(),
        config(CountStrategy::CountQuery, FailurePolicy::Recover),
    );

    let output = executor
        .execute(&users(), ExecuteOptions::new())
        .await
        .unwrap();
    assert_eq!(output, QueryOutput::Rows(Vec::new()));

    let output = executor
        .execute(&users().page(1, 10), ExecuteOptions::new().paginate())
        .await
        .unwrap();
    assert_eq!(output.as_page().unwrap().total(), 0);

    // count always propagates
    assert!(executor.count(&users(), "*").await.is_err());
}

#[tokio::test]
async fn test_recovered_failure_replaces_stored_result() {
    let mut calls = 0;
    let conn = MockConnection::new(move |_| {
        calls += 1;
        if calls == 1 {
            Ok(people(2))
        } else {
            Err(sqlx::Error::Protocol("connection reset".to_string()))
        }
    });
    let mut executor = QueryExecutor::with_config(
        conn,
        config(CountStrategy::CountQuery, FailurePolicy::Recover),
    );

    executor.execute(&users(), ExecuteOptions::new()).await.unwrap();
    assert!(executor.get_data(true, Some("data")).is_some());

    let output = executor.execute(&users(), ExecuteOptions::new()).await.unwrap();
    assert!(output.is_empty());
    assert_eq!(executor.last_result(), Some(&json!([])));
    assert_eq!(executor.get_data(true, Some("data")), None);
}

// ========================================
// count
// ========================================

#[tokio::test]
async fn test_count() {
    let mut executor = QueryExecutor::new(counting(42, Vec::new()));

    let query = users()
        .filter_qualified([("role", "admin")], ComparisonOperator::Eq)
        .unwrap()
        .limit(5, 0);
    let total = executor.count(&query, "u.id").await.unwrap();

    assert_eq!(total, Some(42));
    assert_eq!(
        executor.last_statement(),
        "SELECT COUNT(u.id) FROM users AS u WHERE u.role = 'admin'"
    );
}

#[tokio::test]
async fn test_count_without_row() {
    let mut executor = QueryExecutor::new(MockConnection::with_rows(Vec::new()));
    assert_eq!(executor.count(&users(), "*").await.unwrap(), None);
}

// ========================================
// stream_rows
// ========================================

#[tokio::test]
async fn test_stream_matches_full_fetch() {
    let mut executor = QueryExecutor::new(MockConnection::with_rows(people(5)));

    let fetched = executor
        .execute(&users(), ExecuteOptions::new().raw())
        .await
        .unwrap()
        .into_rows();

    let mut stream = executor
        .stream_rows(&users(), true, false)
        .await
        .unwrap()
        .into_stream()
        .unwrap();

    let mut streamed = Vec::new();
    while let Some(row) = stream.next().await {
        streamed.push(row.unwrap());
    }

    assert_eq!(stream.row_count(), Some(5));
    assert_eq!(streamed, fetched);

    drop(stream);
    assert_eq!(executor.rows_affected(), None);
}

#[tokio::test]
async fn test_stream_without_counting() {
    let mut executor = QueryExecutor::new(MockConnection::with_rows(people(2)));

    let stream = executor
        .stream_rows(&users(), false, false)
        .await
        .unwrap()
        .into_stream()
        .unwrap();

    assert_eq!(stream.row_count(), None);
    assert_eq!(stream.collect_rows().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_stream_paginated_returns_page() {
    let mut executor = QueryExecutor::new(counting(3, people(3)));

    let lines = executor
        .stream_rows(&users().page(1, 2), false, true)
        .await
        .unwrap();

    match lines {
        Lines::Page(page) => {
            assert_eq!(page.pages(), 2);
            assert_eq!(page.data().len(), 3);
        }
        Lines::Stream(_) => panic!("Expected a page"),
    }
}

#[tokio::test]
async fn test_stream_errors_propagate_even_when_recovering() {
    let mut executor = QueryExecutor::with_config(
        MockConnection::failing(),
        config(CountStrategy::CountQuery, FailurePolicy::Recover),
    );

    let result = executor.stream_rows(&users(), false, false).await;
    assert!(matches!(result, Err(QueryError::QueryExecution { .. })));
}
