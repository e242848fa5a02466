//! Entity pages: list, creation form, create, edit form, update, delete.

use crate::error::AdminError;
use crate::extractors::Identity;
use crate::menu::entity_url;
use crate::permission::found;
use crate::render::{EDIT, LIST};
use crate::row::Column;
use crate::sql::{is_all_columns, Value};
use crate::state::AppState;
use crate::view::{edit_data, list_data};
use axum::{
    extract::{Path, State},
    response::Response,
    Form,
};
use std::collections::HashMap;

/// Form fields as columns, restricted to the form's column subset (`[]`/`["*"]` = all).
/// A repeated field keeps its last value, so a hidden `false` before a checkbox is
/// overridden when the box is ticked.
fn form_columns(fields: Vec<(String, String)>, allowed: &[String]) -> Vec<Column> {
    let all = is_all_columns(allowed);
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut columns: Vec<Column> = Vec::new();
    for (name, value) in fields {
        if !all && !allowed.contains(&name) {
            tracing::debug!(field = %name, "form field outside the entity's columns ignored");
            continue;
        }
        match index.get(&name) {
            Some(&i) => columns[i].value = Value::from(value),
            None => {
                index.insert(name.clone(), columns.len());
                columns.push(Column::new(name, value));
            }
        }
    }
    columns
}

pub async fn list(
    State(state): State<AppState>,
    Path(entity_name): Path<String>,
) -> Result<Response, AdminError> {
    let admin = &state.admin;
    let entity = admin.entity(&entity_name)?;
    let (rows, columns) = admin
        .executor()
        .list(entity.table_name(), entity.pk(), entity.list_columns())
        .await?;
    let data = list_data(entity, admin.formatters(), admin.base_context(), rows, columns);
    admin.templates().render(LIST, &data)
}

pub async fn new_form(
    State(state): State<AppState>,
    Path(entity_name): Path<String>,
) -> Result<Response, AdminError> {
    let admin = &state.admin;
    let entity = admin.entity(&entity_name)?;
    let row = admin
        .executor()
        .empty_row(entity.table_name(), entity.pk(), entity.creation_columns())
        .await?;
    let data = edit_data(entity, admin.formatters(), admin.base_context(), row, None);
    admin.templates().render(EDIT, &data)
}

pub async fn create(
    State(state): State<AppState>,
    Path(entity_name): Path<String>,
    identity: Identity,
    Form(fields): Form<Vec<(String, String)>>,
) -> Result<Response, AdminError> {
    let admin = &state.admin;
    let entity = admin.entity(&entity_name)?;
    let id = admin
        .executor()
        .create(
            entity.table_name(),
            entity.pk(),
            &form_columns(fields, entity.creation_columns()),
        )
        .await?;
    tracing::info!(entity = %entity_name, id = %id, user = ?identity.0, "row created");
    Ok(found(&entity_url(admin.base_url(), entity.table_name())))
}

pub async fn edit_form(
    State(state): State<AppState>,
    Path((entity_name, id)): Path<(String, String)>,
) -> Result<Response, AdminError> {
    let admin = &state.admin;
    let entity = admin.entity(&entity_name)?;
    let row = admin
        .executor()
        .get_by_id(entity.table_name(), entity.pk(), entity.form_columns(), &Value::from(id.as_str()))
        .await?;
    let data = edit_data(entity, admin.formatters(), admin.base_context(), row, Some(id));
    admin.templates().render(EDIT, &data)
}

pub async fn update(
    State(state): State<AppState>,
    Path((entity_name, id)): Path<(String, String)>,
    identity: Identity,
    Form(fields): Form<Vec<(String, String)>>,
) -> Result<Response, AdminError> {
    let admin = &state.admin;
    let entity = admin.entity(&entity_name)?;
    admin
        .executor()
        .update_by_id(
            entity.table_name(),
            entity.pk(),
            &Value::from(id.as_str()),
            &form_columns(fields, entity.form_columns()),
        )
        .await?;
    tracing::info!(entity = %entity_name, id = %id, user = ?identity.0, "row updated");
    let url = entity_url(admin.base_url(), entity.table_name());
    Ok(found(&format!("{}/{}", url, id)))
}

pub async fn delete(
    State(state): State<AppState>,
    Path((entity_name, id)): Path<(String, String)>,
    identity: Identity,
) -> Result<Response, AdminError> {
    let admin = &state.admin;
    let entity = admin.entity(&entity_name)?;
    admin
        .executor()
        .delete_by_id(entity.table_name(), entity.pk(), &Value::from(id.as_str()))
        .await?;
    tracing::info!(entity = %entity_name, id = %id, user = ?identity.0, "row deleted");
    Ok(found(&entity_url(admin.base_url(), entity.table_name())))
}
