//! Identifier validation. Table and column names are interpolated into SQL (quoted), so
//! only plain identifiers are accepted at registration.

use crate::config::Entity;
use crate::error::AdminError;
use regex::Regex;
use std::sync::OnceLock;

fn identifier_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("static pattern"))
}

pub fn is_identifier(s: &str) -> bool {
    identifier_re().is_match(s)
}

pub fn validate_identifier(s: &str) -> Result<(), AdminError> {
    if is_identifier(s) {
        Ok(())
    } else {
        Err(AdminError::InvalidIdentifier(s.to_string()))
    }
}

/// Table name, primary key, and every listed column must be plain identifiers. `*` is
/// accepted as a column selection.
pub fn validate_entity(entity: &Entity) -> Result<(), AdminError> {
    let schema = &entity.schema;
    validate_identifier(&schema.table_name)?;
    validate_identifier(&schema.primary_key)?;
    for col in schema
        .select_columns
        .iter()
        .chain(&schema.edit_columns)
        .chain(&schema.new_columns)
    {
        if col != "*" {
            validate_identifier(col)?;
        }
    }
    Ok(())
}
