//! Runtime schema discovery: a prepared zero-row SELECT reports column names and types.

use crate::error::AdminError;
use crate::row::{ColumnMeta, TableShape};
use crate::sql;
use sqlx::{Column, Statement, TypeInfo};

/// Ordered columns of `table` as reported by a prepared `sql::discover` statement.
/// The statement is never executed; a missing table or column fails at prepare time.
pub fn table_shape<'q, S>(table: &str, statement: &S) -> TableShape
where
    S: Statement<'q>,
{
    let columns = statement
        .columns()
        .iter()
        .map(|c| ColumnMeta::new(c.name(), c.type_info().name()))
        .collect();
    TableShape {
        table: table.to_string(),
        columns,
    }
}

/// Selection to discover so that the primary key's type is always known, even when the
/// caller did not select it. Returns the selection and whether the key was appended.
pub fn with_primary_key(columns: &[String], primary_key: &str) -> (Vec<String>, bool) {
    if sql::is_all_columns(columns) || columns.iter().any(|c| c == primary_key) {
        (columns.to_vec(), false)
    } else {
        let mut out = columns.to_vec();
        out.push(primary_key.to_string());
        (out, true)
    }
}

/// Split the key column off a shape discovered with `with_primary_key`.
pub fn split_primary_key(
    mut shape: TableShape,
    primary_key: &str,
    appended: bool,
) -> Result<(TableShape, ColumnMeta), AdminError> {
    let pk = if appended {
        shape.columns.pop()
    } else {
        shape.column(primary_key).cloned()
    };
    let pk = pk.ok_or_else(|| AdminError::UnknownColumn {
        table: shape.table.clone(),
        column: primary_key.to_string(),
    })?;
    Ok((shape, pk))
}
