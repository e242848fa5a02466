//! Engine-agnostic rows: the shape discovered for a table and the values read from it.

use crate::sql::{to_generic, GenericType, Value};
use serde::Serialize;

/// One column as reported by schema discovery.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ColumnMeta {
    pub name: String,
    /// Type name as reported by the driver (e.g. "INT4", "TEXT", "DATETIME").
    pub native_type: String,
    pub generic_type: GenericType,
}

impl ColumnMeta {
    pub fn new(name: impl Into<String>, native_type: impl Into<String>) -> Self {
        let native_type = native_type.into();
        ColumnMeta {
            name: name.into(),
            generic_type: to_generic(&native_type),
            native_type,
        }
    }
}

/// Ordered column metadata for one table and column selection.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TableShape {
    pub table: String,
    pub columns: Vec<ColumnMeta>,
}

impl TableShape {
    pub fn names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&ColumnMeta> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Column {
    pub name: String,
    pub generic_type: GenericType,
    pub value: Value,
    pub is_primary: bool,
}

impl Column {
    /// Column carrying a value to write; kind is resolved against the discovered schema.
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Column {
            name: name.into(),
            generic_type: GenericType::Unknown,
            value: value.into(),
            is_primary: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Row {
    pub columns: Vec<Column>,
    pub primary_key: String,
    /// `None` only for placeholder rows (creation forms). Set even when the key column
    /// was not selected.
    pub primary_key_value: Option<Value>,
}

impl Row {
    /// Build a row from discovered metadata and the decoded values (same order).
    pub fn from_values(shape: &TableShape, primary_key: &str, values: Vec<Value>) -> Self {
        let mut primary_key_value = None;
        let columns = shape
            .columns
            .iter()
            .zip(values)
            .map(|(meta, value)| {
                let is_primary = meta.name == primary_key;
                if is_primary {
                    primary_key_value = Some(value.clone());
                }
                Column {
                    name: meta.name.clone(),
                    generic_type: meta.generic_type,
                    value,
                    is_primary,
                }
            })
            .collect();
        Row {
            columns,
            primary_key: primary_key.to_string(),
            primary_key_value,
        }
    }

    /// Row with the shape of the table and no values.
    pub fn placeholder(shape: &TableShape, primary_key: &str) -> Self {
        let values = vec![Value::Null; shape.len()];
        let mut row = Row::from_values(shape, primary_key, values);
        row.primary_key_value = None;
        row
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn primary_key_column(&self) -> Option<&Column> {
        self.columns.iter().find(|c| c.is_primary)
    }

    pub fn is_placeholder(&self) -> bool {
        self.primary_key_value.is_none()
    }
}
