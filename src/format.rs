//! Display formatting for cells and column headers, and HTML form helpers.

use crate::config::{Entity, Formatter};
use crate::sql::{GenericType, Value};
use std::collections::HashMap;
use std::fmt;

/// Process-wide formatters keyed by column name, used when an entity has no override.
#[derive(Clone, Default)]
pub struct DefaultFormatters {
    pub values: HashMap<String, Formatter>,
    pub column_names: HashMap<String, Formatter>,
}

impl fmt::Debug for DefaultFormatters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultFormatters")
            .field("values", &self.values.keys().collect::<Vec<_>>())
            .field("column_names", &self.column_names.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl DefaultFormatters {
    /// Entity override, then process default, then the value's own display.
    pub fn value(&self, entity: &Entity, column: &str, value: &Value) -> String {
        match entity
            .display
            .value_formatters
            .get(column)
            .or_else(|| self.values.get(column))
        {
            Some(f) => f(value),
            None => value.to_string(),
        }
    }

    /// Entity override, then process default, then the column name itself.
    pub fn column_name(&self, entity: &Entity, column: &str) -> String {
        match entity
            .display
            .column_name_formatters
            .get(column)
            .or_else(|| self.column_names.get(column))
        {
            Some(f) => f(&Value::String(column.to_string())),
            None => column.to_string(),
        }
    }
}

/// HTML input type for a column kind.
pub fn input_type(kind: GenericType) -> &'static str {
    match kind {
        GenericType::Integer | GenericType::Float => "number",
        GenericType::Boolean => "checkbox",
        GenericType::Timestamp => "datetime-local",
        GenericType::String | GenericType::Unknown => "text",
    }
}

/// Value attribute for a form input; timestamps use the `datetime-local` layout.
pub fn input_value(value: &Value) -> String {
    match value {
        Value::Timestamp(t) => t.format("%Y-%m-%dT%H:%M").to_string(),
        other => other.to_string(),
    }
}
