//! # Basic Usage Example
//!
//! This example walks through the main querykit operations:
//! building a SELECT, paginating it, streaming rows and writing records.
//!
//! Connection settings come from the `DB_*` environment variables
//! (`DB_HOST`, `DB_DATABASE`, `DB_USERNAME`, ...), or a `.env` file.

use querykit::prelude::*;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("querykit basic usage");
    println!("====================");

    // 1. Setup
    let config = DatabaseConfig::from_env()?;
    let querykit = QueryKit::new(&config, QueryConfig::default())?;
    querykit.health_check().await?;
    println!("connected to {}:{}/{}", config.host, config.port, config.database);

    // 2. Records
    let mut products = querykit.records("products")?;
    let mut record = Row::new();
    record.insert("name".to_string(), json!("Desk lamp"));
    record.insert("price".to_string(), json!(24.5));

    match products.insert_unless_exists(&record).await? {
        Some(result) => println!("inserted product #{}", result.last_insert_id),
        None => println!("product already present"),
    }

    // 3. Building a query
    let query = SelectQuery::new()
        .select(["p.id", "p.name", "p.price"])
        .from("products", "p")
        .filter([("p.price", 10)], ComparisonOperator::Gte)?
        .like([("p.name", "lamp")])?
        .order_by("p.price", SortOrder::Desc);
    println!("\n{}", query);

    // 4. Paginated execution
    let mut executor = querykit.executor();
    let output = executor
        .execute(&query.clone().page(1, 5), ExecuteOptions::new().paginate())
        .await?;
    if let Some(page) = output.as_page() {
        println!(
            "page {}/{} ({} rows total)",
            page.current_page(),
            page.pages(),
            page.total()
        );
    }
    println!("{}", serde_json::to_string_pretty(&output)?);

    // 5. Streaming
    if let Lines::Stream(mut rows) = executor.stream_rows(&query, true, false).await? {
        while let Some(row) = rows.next().await {
            let row = row?;
            println!("  {} - {}", row["name"], row["price"]);
        }
        println!("streamed {} rows", rows.row_count().unwrap_or(0));
    }

    querykit.close().await;
    Ok(())
}
