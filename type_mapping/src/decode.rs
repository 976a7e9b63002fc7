//! Row decoding
//!
//! This module converts MySQL result rows into the ordered JSON row
//! representation, one column at a time, dispatching on the column type.

use crate::types::Row;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde_json::Value;
use sqlx::mysql::MySqlRow;
use sqlx::{Column, Row as _, TypeInfo, ValueRef};

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";
const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S%.f";

/// Decode a MySQL row into an ordered column -> value mapping
pub fn decode_row(row: &MySqlRow) -> Result<Row, sqlx::Error> {
    let mut decoded = Row::with_capacity(row.columns().len());

    for column in row.columns() {
        let index = column.ordinal();
        let value = decode_column(row, index, column.type_info().name())?;
        decoded.insert(column.name().to_string(), value);
    }

    Ok(decoded)
}

fn decode_column(row: &MySqlRow, index: usize, type_name: &str) -> Result<Value, sqlx::Error> {
    if row.try_get_raw(index)?.is_null() {
        return Ok(Value::Null);
    }

    match type_name {
        "BOOLEAN" => Ok(Value::Bool(row.try_get::<bool, _>(index)?)),
        "FLOAT" => Ok(Value::from(f64::from(row.try_get::<f32, _>(index)?))),
        "DOUBLE" => Ok(Value::from(row.try_get::<f64, _>(index)?)),
        "DATETIME" | "TIMESTAMP" => {
            let datetime: NaiveDateTime = row.try_get(index)?;
            Ok(Value::String(datetime.format(DATETIME_FORMAT).to_string()))
        }
        "DATE" => {
            let date: NaiveDate = row.try_get(index)?;
            Ok(Value::String(date.format(DATE_FORMAT).to_string()))
        }
        "TIME" => match row.try_get::<NaiveTime, _>(index) {
            Ok(time) => Ok(Value::String(time.format(TIME_FORMAT).to_string())),
            // negative or > 24h intervals
            Err(_) => decode_text(row, index),
        },
        "BINARY" | "VARBINARY" | "TINYBLOB" | "BLOB" | "MEDIUMBLOB" | "LONGBLOB" | "GEOMETRY" => {
            decode_bytes(row, index)
        }
        "DECIMAL" | "JSON" | "ENUM" | "SET" => {
            Ok(Value::String(row.try_get_unchecked::<String, _>(index)?))
        }
        name if name.contains("INT") || name == "YEAR" || name == "BIT" => {
            decode_integer(row, index, name.ends_with("UNSIGNED") || name == "BIT")
        }
        _ => decode_text(row, index),
    }
}

fn decode_integer(row: &MySqlRow, index: usize, unsigned: bool) -> Result<Value, sqlx::Error> {
    if unsigned {
        if let Ok(value) = row.try_get::<u64, _>(index) {
            return Ok(Value::from(value));
        }
    }

    match row.try_get::<i64, _>(index) {
        Ok(value) => Ok(Value::from(value)),
        Err(_) => Ok(Value::from(row.try_get::<u64, _>(index)?)),
    }
}

fn decode_text(row: &MySqlRow, index: usize) -> Result<Value, sqlx::Error> {
    match row.try_get::<String, _>(index) {
        Ok(text) => Ok(Value::String(text)),
        Err(_) => decode_bytes(row, index),
    }
}

fn decode_bytes(row: &MySqlRow, index: usize) -> Result<Value, sqlx::Error> {
    let bytes: Vec<u8> = row.try_get_unchecked(index)?;
    Ok(Value::String(String::from_utf8_lossy(&bytes).into_owned()))
}
