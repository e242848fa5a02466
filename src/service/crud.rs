//! Generic CRUD execution against any registered table.

use crate::db::{with_connection, Database};
use crate::error::AdminError;
use crate::row::{Column, ColumnMeta, Row, TableShape};
use crate::service::introspect::{self, split_primary_key, with_primary_key};
use crate::sql::{self, bind_params, decode_row, Value};
use sqlx::Executor;

/// Prepare the zero-row discovery SELECT on a concrete connection and read its columns.
macro_rules! discover {
    ($conn:ident, $table:expr, $columns:expr) => {{
        let sql = sql::discover($table, $columns);
        tracing::debug!(sql = %sql, "discover");
        let statement = (&mut *$conn).prepare(&sql).await?;
        introspect::table_shape($table, &statement)
    }};
}

/// Every operation acquires its own connection, discovers the columns it needs, runs one
/// statement and releases the connection, all under the database's statement deadline.
#[derive(Clone, Debug)]
pub struct CrudExecutor {
    db: Database,
}

impl CrudExecutor {
    pub fn new(db: Database) -> Self {
        CrudExecutor { db }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// All rows of the table for the selected columns (`[]` = all), plus the column names.
    /// Row order is whatever the engine returns.
    pub async fn list(
        &self,
        table: &str,
        primary_key: &str,
        select_columns: &[String],
    ) -> Result<(Vec<Row>, Vec<String>), AdminError> {
        let engine = self.db.engine();
        self.db
            .run(async {
                with_connection!(self.db, conn => {
                    let shape = discover!(conn, table, select_columns);
                    let q = sql::select_list(engine, &shape);
                    tracing::debug!(sql = %q.sql, "query");
                    let rows = bind_params(sqlx::query(&q.sql), &q.params)
                        .fetch_all(&mut *conn)
                        .await?;
                    let rows = rows.iter().map(|r| decode_row(r, &shape, primary_key)).collect();
                    Ok::<_, AdminError>((rows, shape.names()))
                })
            })
            .await
    }

    /// One row by primary key. `NotFound` when no row matches.
    pub async fn get_by_id(
        &self,
        table: &str,
        primary_key: &str,
        edit_columns: &[String],
        id: &Value,
    ) -> Result<Row, AdminError> {
        let engine = self.db.engine();
        let (selection, appended) = with_primary_key(edit_columns, primary_key);
        self.db
            .run(async {
                with_connection!(self.db, conn => {
                    let shape = discover!(conn, table, &selection);
                    let (shape, pk) = split_primary_key(shape, primary_key, appended)?;
                    let Some(id) = coerce_id(&pk, id) else {
                        return Err(not_found(table, id));
                    };
                    let q = sql::select_by_id(engine, &shape, &pk, id.clone());
                    tracing::debug!(sql = %q.sql, params = ?q.params, "query");
                    let row = bind_params(sqlx::query(&q.sql), &q.params)
                        .fetch_optional(&mut *conn)
                        .await?;
                    let Some(row) = row else {
                        return Err(not_found(table, &id));
                    };
                    let mut row = decode_row(&row, &shape, primary_key);
                    if appended {
                        // the key matched, so it is the coerced id
                        row.primary_key_value = Some(id);
                    }
                    Ok::<_, AdminError>(row)
                })
            })
            .await
    }

    /// Shape of the table for the given columns with every value null (creation forms).
    pub async fn empty_row(&self, table: &str, primary_key: &str, columns: &[String]) -> Result<Row, AdminError> {
        let shape = self.shape(table, columns).await?;
        Ok(Row::placeholder(&shape, primary_key))
    }

    /// Discover the columns for a selection without reading any rows.
    pub async fn shape(&self, table: &str, columns: &[String]) -> Result<TableShape, AdminError> {
        self.db
            .run(async {
                with_connection!(self.db, conn => {
                    Ok::<_, AdminError>(discover!(conn, table, columns))
                })
            })
            .await
    }

    /// Insert one row from column/value pairs. The primary key is never written; the
    /// generated key is returned.
    pub async fn create(&self, table: &str, primary_key: &str, columns: &[Column]) -> Result<Value, AdminError> {
        let engine = self.db.engine();
        self.db
            .run(async {
                with_connection!(self.db, conn => {
                    let shape = discover!(conn, table, &[]);
                    let (shape, pk) = split_primary_key(shape, primary_key, false)?;
                    let values = typed_values(&shape, primary_key, columns)?;
                    let q = sql::insert(engine, table, &pk, &values);
                    tracing::debug!(sql = %q.sql, params = ?q.params, "query");
                    let row = bind_params(sqlx::query(&q.sql), &q.params)
                        .fetch_one(&mut *conn)
                        .await?;
                    let key_shape = TableShape {
                        table: table.to_string(),
                        columns: vec![pk],
                    };
                    let key = decode_row(&row, &key_shape, primary_key);
                    Ok::<_, AdminError>(key.primary_key_value.unwrap_or(Value::Null))
                })
            })
            .await
    }

    /// Update the given columns of one row in a single statement; the primary key is never
    /// set. `NotFound` when no row has that id.
    pub async fn update_by_id(
        &self,
        table: &str,
        primary_key: &str,
        id: &Value,
        columns: &[Column],
    ) -> Result<(), AdminError> {
        let engine = self.db.engine();
        self.db
            .run(async {
                with_connection!(self.db, conn => {
                    let shape = discover!(conn, table, &[]);
                    let (shape, pk) = split_primary_key(shape, primary_key, false)?;
                    let values = typed_values(&shape, primary_key, columns)?;
                    let Some(id) = coerce_id(&pk, id) else {
                        return Err(not_found(table, id));
                    };
                    let Some(q) = sql::update(engine, table, &pk, id, &values) else {
                        tracing::debug!(table = %table, "update with no columns to set");
                        return Ok(());
                    };
                    tracing::debug!(sql = %q.sql, params = ?q.params, "query");
                    let result = bind_params(sqlx::query(&q.sql), &q.params)
                        .execute(&mut *conn)
                        .await?;
                    if result.rows_affected() == 0 {
                        let id = &q.params[q.params.len() - 1].value;
                        return Err(not_found(table, id));
                    }
                    Ok::<_, AdminError>(())
                })
            })
            .await
    }

    /// Delete one row by id. `NotFound` when no row has that id.
    pub async fn delete_by_id(&self, table: &str, primary_key: &str, id: &Value) -> Result<(), AdminError> {
        let engine = self.db.engine();
        let selection = [primary_key.to_string()];
        self.db
            .run(async {
                with_connection!(self.db, conn => {
                    let shape = discover!(conn, table, &selection);
                    let (_, pk) = split_primary_key(shape, primary_key, false)?;
                    let Some(id) = coerce_id(&pk, id) else {
                        return Err(not_found(table, id));
                    };
                    let q = sql::delete(engine, table, &pk, id);
                    tracing::debug!(sql = %q.sql, params = ?q.params, "query");
                    let result = bind_params(sqlx::query(&q.sql), &q.params)
                        .execute(&mut *conn)
                        .await?;
                    if result.rows_affected() == 0 {
                        return Err(not_found(table, &q.params[0].value));
                    }
                    Ok::<_, AdminError>(())
                })
            })
            .await
    }
}

/// Resolve client-supplied columns against the discovered shape and coerce each value to
/// the column's kind. Unknown column names are rejected; the primary key is dropped.
fn typed_values<'s>(
    shape: &'s TableShape,
    primary_key: &str,
    columns: &[Column],
) -> Result<Vec<(&'s ColumnMeta, Value)>, AdminError> {
    let mut out = Vec::with_capacity(columns.len());
    for column in columns {
        if column.name == primary_key {
            continue;
        }
        let meta = shape.column(&column.name).ok_or_else(|| AdminError::UnknownColumn {
            table: shape.table.clone(),
            column: column.name.clone(),
        })?;
        let value = column
            .value
            .coerce(meta.generic_type)
            .and_then(|v| v.check_native(&meta.native_type).map(|_| v))
            .map_err(|message| AdminError::InvalidValue {
                column: column.name.clone(),
                message,
            })?;
        out.push((meta, value));
    }
    Ok(out)
}

/// An id that cannot be converted to the key's type, or does not fit its native type,
/// cannot match any row.
fn coerce_id(pk: &ColumnMeta, id: &Value) -> Option<Value> {
    match id.coerce(pk.generic_type) {
        Ok(v) if !v.is_null() && v.check_native(&pk.native_type).is_ok() => Some(v),
        _ => None,
    }
}


fn not_found(table: &str, id: &Value) -> AdminError {
    AdminError::NotFound(format!("{} {}", table, id))
}
