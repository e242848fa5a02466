//! Bind dynamic values to sqlx queries and decode cells back into `Value`.

use crate::row::{Row, TableShape};
use crate::sql::{GenericType, Param, Value};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use sqlx::query::Query;
use sqlx::{ColumnIndex, Database, Decode, Encode, Type};

/// Bind every parameter in order. Nulls are typed after the target column's kind.
pub fn bind_params<'q, DB>(
    mut query: Query<'q, DB, <DB as Database>::Arguments<'q>>,
    params: &[Param],
) -> Query<'q, DB, <DB as Database>::Arguments<'q>>
where
    DB: Database,
    i64: Encode<'q, DB> + Type<DB>,
    f64: Encode<'q, DB> + Type<DB>,
    bool: Encode<'q, DB> + Type<DB>,
    String: Encode<'q, DB> + Type<DB>,
    DateTime<Utc>: Encode<'q, DB> + Type<DB>,
    Option<i64>: Encode<'q, DB>,
    Option<f64>: Encode<'q, DB>,
    Option<bool>: Encode<'q, DB>,
    Option<String>: Encode<'q, DB>,
    Option<DateTime<Utc>>: Encode<'q, DB>,
{
    for p in params {
        query = match &p.value {
            Value::Null => match p.kind {
                GenericType::Integer => query.bind(None::<i64>),
                GenericType::Float => query.bind(None::<f64>),
                GenericType::Boolean => query.bind(None::<bool>),
                GenericType::Timestamp => query.bind(None::<DateTime<Utc>>),
                GenericType::String | GenericType::Unknown => query.bind(None::<String>),
            },
            Value::Integer(n) => query.bind(*n),
            Value::Float(n) => query.bind(*n),
            Value::Boolean(b) => query.bind(*b),
            Value::Timestamp(t) => query.bind(*t),
            Value::String(s) => query.bind(s.clone()),
        };
    }
    query
}

/// Decode one driver row into a `Row` using the discovered shape (same column order).
pub fn decode_row<R>(row: &R, shape: &TableShape, primary_key: &str) -> Row
where
    R: sqlx::Row,
    usize: ColumnIndex<R>,
    for<'r> i16: Decode<'r, R::Database> + Type<R::Database>,
    for<'r> i32: Decode<'r, R::Database> + Type<R::Database>,
    for<'r> i64: Decode<'r, R::Database> + Type<R::Database>,
    for<'r> f32: Decode<'r, R::Database> + Type<R::Database>,
    for<'r> f64: Decode<'r, R::Database> + Type<R::Database>,
    for<'r> bool: Decode<'r, R::Database> + Type<R::Database>,
    for<'r> String: Decode<'r, R::Database> + Type<R::Database>,
    for<'r> uuid::Uuid: Decode<'r, R::Database> + Type<R::Database>,
    for<'r> DateTime<Utc>: Decode<'r, R::Database> + Type<R::Database>,
    for<'r> NaiveDateTime: Decode<'r, R::Database> + Type<R::Database>,
    for<'r> NaiveDate: Decode<'r, R::Database> + Type<R::Database>,
{
    let values = shape
        .columns
        .iter()
        .enumerate()
        .map(|(i, meta)| {
            let value = decode_cell(row, i, meta.generic_type);
            if value.is_none() {
                tracing::debug!(column = %meta.name, native_type = %meta.native_type, "undecodable cell");
            }
            value.unwrap_or(Value::Null)
        })
        .collect();
    Row::from_values(shape, primary_key, values)
}

/// `None`: the driver type is incompatible with `T`. `Some(None)`: SQL NULL.
fn try_cell<'r, R, T>(row: &'r R, index: usize) -> Option<Option<T>>
where
    R: sqlx::Row,
    usize: ColumnIndex<R>,
    T: Decode<'r, R::Database> + Type<R::Database>,
{
    row.try_get::<Option<T>, usize>(index).ok()
}

/// Try the driver types a kind may be stored as, widest first.
fn decode_cell<R>(row: &R, index: usize, kind: GenericType) -> Option<Value>
where
    R: sqlx::Row,
    usize: ColumnIndex<R>,
    for<'r> i16: Decode<'r, R::Database> + Type<R::Database>,
    for<'r> i32: Decode<'r, R::Database> + Type<R::Database>,
    for<'r> i64: Decode<'r, R::Database> + Type<R::Database>,
    for<'r> f32: Decode<'r, R::Database> + Type<R::Database>,
    for<'r> f64: Decode<'r, R::Database> + Type<R::Database>,
    for<'r> bool: Decode<'r, R::Database> + Type<R::Database>,
    for<'r> String: Decode<'r, R::Database> + Type<R::Database>,
    for<'r> uuid::Uuid: Decode<'r, R::Database> + Type<R::Database>,
    for<'r> DateTime<Utc>: Decode<'r, R::Database> + Type<R::Database>,
    for<'r> NaiveDateTime: Decode<'r, R::Database> + Type<R::Database>,
    for<'r> NaiveDate: Decode<'r, R::Database> + Type<R::Database>,
{
    match kind {
        GenericType::Integer => try_cell::<R, i64>(row, index)
            .or_else(|| try_cell::<R, i32>(row, index).map(|v| v.map(i64::from)))
            .or_else(|| try_cell::<R, i16>(row, index).map(|v| v.map(i64::from)))
            .map(|v| v.map(Value::Integer).unwrap_or(Value::Null)),
        GenericType::Float => try_cell::<R, f64>(row, index)
            .or_else(|| try_cell::<R, f32>(row, index).map(|v| v.map(f64::from)))
            .map(|v| v.map(Value::Float).unwrap_or(Value::Null))
            .or_else(|| {
                // numeric is selected as text
                try_cell::<R, String>(row, index).map(|v| match v.and_then(|s| s.parse::<f64>().ok()) {
                    Some(f) => Value::Float(f),
                    None => Value::Null,
                })
            }),
        GenericType::Boolean => try_cell::<R, bool>(row, index)
            .or_else(|| try_cell::<R, i64>(row, index).map(|v| v.map(|n| n != 0)))
            .map(|v| v.map(Value::Boolean).unwrap_or(Value::Null)),
        GenericType::Timestamp => try_cell::<R, DateTime<Utc>>(row, index)
            .or_else(|| try_cell::<R, NaiveDateTime>(row, index).map(|v| v.map(|t| t.and_utc())))
            .or_else(|| {
                try_cell::<R, NaiveDate>(row, index)
                    .map(|v| v.and_then(|d| d.and_hms_opt(0, 0, 0)).map(|t| t.and_utc()))
            })
            .map(|v| v.map(Value::Timestamp).unwrap_or(Value::Null)),
        GenericType::String | GenericType::Unknown => try_cell::<R, String>(row, index)
            .or_else(|| try_cell::<R, uuid::Uuid>(row, index).map(|v| v.map(|u| u.to_string())))
            .map(|v| v.map(Value::String).unwrap_or(Value::Null)),
    }
}
