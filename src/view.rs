//! View models handed to the renderer.

use crate::config::Entity;
use crate::format::{input_type, input_value, DefaultFormatters};
use crate::menu::{entity_url, Menu};
use crate::row::Row;
use crate::sql::{GenericType, Value};
use serde::Serialize;

/// Shared by every page.
#[derive(Clone, Debug, Serialize)]
pub struct BaseContext {
    pub base_url: String,
    pub menus: Vec<Menu>,
}

#[derive(Debug, Serialize)]
pub struct DashboardData {
    #[serde(flatten)]
    pub base: BaseContext,
}

#[derive(Debug, Serialize)]
pub struct ListData {
    pub title: String,
    pub description: String,
    pub entity_name: String,
    /// Raw column names, in discovery order.
    pub columns: Vec<String>,
    /// Formatted column headers, same order as `columns`.
    pub headers: Vec<String>,
    pub rows: Vec<ListRow>,
    pub new_url: String,
    #[serde(flatten)]
    pub base: BaseContext,
}

#[derive(Debug, Serialize)]
pub struct ListRow {
    pub primary_key_value: Option<Value>,
    /// Absent when the key column was not selected.
    pub edit_url: Option<String>,
    pub cells: Vec<Cell>,
}

#[derive(Debug, Serialize)]
pub struct Cell {
    pub column: String,
    pub value: Value,
    pub display: String,
}

#[derive(Debug, Serialize)]
pub struct EditData {
    pub title: String,
    pub description: String,
    pub entity_name: String,
    pub entity_id: Option<String>,
    pub is_edit: bool,
    /// Form target: the edit URL when editing, `.../new` when creating.
    pub action_url: String,
    pub delete_url: Option<String>,
    pub fields: Vec<FormField>,
    pub row: Row,
    #[serde(flatten)]
    pub base: BaseContext,
}

#[derive(Debug, Serialize)]
pub struct FormField {
    pub name: String,
    pub label: String,
    pub generic_type: GenericType,
    pub input_type: &'static str,
    pub value: String,
    pub checked: bool,
    /// Value a template submits in a hidden input ahead of a checkbox so that unticking
    /// it writes `false`; the ticked box comes later and wins.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unchecked_value: Option<&'static str>,
    /// Key columns are shown read-only and never submitted as writable.
    pub readonly: bool,
}

pub fn list_data(
    entity: &Entity,
    formatters: &DefaultFormatters,
    base: BaseContext,
    rows: Vec<Row>,
    columns: Vec<String>,
) -> ListData {
    let url = entity_url(&base.base_url, entity.table_name());
    let headers = columns.iter().map(|c| formatters.column_name(entity, c)).collect();
    let rows = rows
        .into_iter()
        .map(|row| ListRow {
            edit_url: row
                .primary_key_value
                .as_ref()
                .filter(|v| !v.is_null())
                .map(|v| format!("{}/{}", url, v)),
            cells: row
                .columns
                .into_iter()
                .map(|c| Cell {
                    display: formatters.value(entity, &c.name, &c.value),
                    column: c.name,
                    value: c.value,
                })
                .collect(),
            primary_key_value: row.primary_key_value,
        })
        .collect();
    ListData {
        title: entity.display.title_plural.clone(),
        description: entity.display.description.clone(),
        entity_name: entity.table_name().to_string(),
        columns,
        headers,
        rows,
        new_url: format!("{}/new", url),
        base,
    }
}

/// Form for an existing row (`entity_id` set) or a creation form over a placeholder row.
pub fn edit_data(
    entity: &Entity,
    formatters: &DefaultFormatters,
    base: BaseContext,
    row: Row,
    entity_id: Option<String>,
) -> EditData {
    let url = entity_url(&base.base_url, entity.table_name());
    let fields = row
        .columns
        .iter()
        .map(|c| FormField {
            name: c.name.clone(),
            label: formatters.column_name(entity, &c.name),
            generic_type: c.generic_type,
            input_type: input_type(c.generic_type),
            value: input_value(&c.value),
            checked: matches!(c.value, Value::Boolean(true)),
            unchecked_value: (c.generic_type == GenericType::Boolean && !c.is_primary).then_some("false"),
            readonly: c.is_primary,
        })
        .collect();
    let (action_url, delete_url) = match &entity_id {
        Some(id) => (format!("{}/{}", url, id), Some(format!("{}/{}/delete", url, id))),
        None => (format!("{}/new", url), None),
    };
    EditData {
        title: entity.display.title_singular.clone(),
        description: entity.display.description.clone(),
        entity_name: entity.table_name().to_string(),
        is_edit: entity_id.is_some(),
        entity_id,
        action_url,
        delete_url,
        fields,
        row,
        base,
    }
}
