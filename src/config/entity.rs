//! Entity definitions: what table to administer (`EntitySchema`) and how to present it
//! (`EntityDisplay`), joined by table name.

use crate::error::AdminError;
use crate::sql::Value;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Renders a cell value (or a column name, passed as a string value) for display.
pub type Formatter = Arc<dyn Fn(&Value) -> String + Send + Sync>;

/// Persistence side of an entity.
#[derive(Clone, Debug, PartialEq)]
pub struct EntitySchema {
    pub table_name: String,
    pub primary_key: String,
    /// Columns shown in lists. Empty = all.
    pub select_columns: Vec<String>,
    /// Columns shown on the edit form. Empty = all.
    pub edit_columns: Vec<String>,
    /// Columns shown on the creation form. Empty = `edit_columns`, then all.
    pub new_columns: Vec<String>,
}

/// Presentation side of an entity.
#[derive(Clone, Default)]
pub struct EntityDisplay {
    pub title_singular: String,
    pub title_plural: String,
    pub description: String,
    pub fav_icon: String,
    pub order: i32,
    pub value_formatters: HashMap<String, Formatter>,
    pub column_name_formatters: HashMap<String, Formatter>,
}

impl fmt::Debug for EntityDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityDisplay")
            .field("title_singular", &self.title_singular)
            .field("title_plural", &self.title_plural)
            .field("description", &self.description)
            .field("fav_icon", &self.fav_icon)
            .field("order", &self.order)
            .field("value_formatters", &self.value_formatters.keys().collect::<Vec<_>>())
            .field("column_name_formatters", &self.column_name_formatters.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[derive(Clone, Debug)]
pub struct Entity {
    pub schema: EntitySchema,
    pub display: EntityDisplay,
}

impl Entity {
    /// Entity over `table_name` with key `id`, all columns, and the table name as titles.
    pub fn new(table_name: impl Into<String>) -> Self {
        let table_name = table_name.into();
        Entity {
            display: EntityDisplay {
                title_singular: table_name.clone(),
                title_plural: table_name.clone(),
                ..Default::default()
            },
            schema: EntitySchema {
                table_name,
                primary_key: "id".to_string(),
                select_columns: Vec::new(),
                edit_columns: Vec::new(),
                new_columns: Vec::new(),
            },
        }
    }

    pub fn primary_key(mut self, pk: impl Into<String>) -> Self {
        self.schema.primary_key = pk.into();
        self
    }

    pub fn select_columns<I, S>(mut self, cols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.schema.select_columns = cols.into_iter().map(Into::into).collect();
        self
    }

    pub fn edit_columns<I, S>(mut self, cols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.schema.edit_columns = cols.into_iter().map(Into::into).collect();
        self
    }

    pub fn new_columns<I, S>(mut self, cols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.schema.new_columns = cols.into_iter().map(Into::into).collect();
        self
    }

    pub fn titles(mut self, singular: impl Into<String>, plural: impl Into<String>) -> Self {
        self.display.title_singular = singular.into();
        self.display.title_plural = plural.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.display.description = description.into();
        self
    }

    pub fn fav_icon(mut self, icon: impl Into<String>) -> Self {
        self.display.fav_icon = icon.into();
        self
    }

    pub fn order(mut self, order: i32) -> Self {
        self.display.order = order;
        self
    }

    pub fn value_formatter<F>(mut self, column: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Value) -> String + Send + Sync + 'static,
    {
        self.display.value_formatters.insert(column.into(), Arc::new(f));
        self
    }

    pub fn column_name_formatter<F>(mut self, column: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Value) -> String + Send + Sync + 'static,
    {
        self.display.column_name_formatters.insert(column.into(), Arc::new(f));
        self
    }

    pub fn table_name(&self) -> &str {
        &self.schema.table_name
    }

    pub fn pk(&self) -> &str {
        &self.schema.primary_key
    }

    /// Selection for lists; empty means all columns.
    pub fn list_columns(&self) -> &[String] {
        &self.schema.select_columns
    }

    pub fn form_columns(&self) -> &[String] {
        &self.schema.edit_columns
    }

    /// Creation form selection: `new_columns`, else `edit_columns`, else all.
    pub fn creation_columns(&self) -> &[String] {
        if !self.schema.new_columns.is_empty() {
            &self.schema.new_columns
        } else {
            &self.schema.edit_columns
        }
    }
}

/// Serializable entity declaration (no formatters).
#[derive(Clone, Debug, Deserialize)]
pub struct EntityConfig {
    pub table_name: String,
    #[serde(default = "default_primary_key")]
    pub primary_key: String,
    #[serde(default)]
    pub title_singular: Option<String>,
    #[serde(default)]
    pub title_plural: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub fav_icon: String,
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub select_columns: Vec<String>,
    #[serde(default)]
    pub edit_columns: Vec<String>,
    #[serde(default)]
    pub new_columns: Vec<String>,
}

fn default_primary_key() -> String {
    "id".to_string()
}

impl From<EntityConfig> for Entity {
    fn from(c: EntityConfig) -> Self {
        let singular = c.title_singular.unwrap_or_else(|| c.table_name.clone());
        let plural = c.title_plural.unwrap_or_else(|| c.table_name.clone());
        Entity::new(c.table_name)
            .primary_key(c.primary_key)
            .titles(singular, plural)
            .description(c.description)
            .fav_icon(c.fav_icon)
            .order(c.order)
            .select_columns(c.select_columns)
            .edit_columns(c.edit_columns)
            .new_columns(c.new_columns)
    }
}

/// Parse a JSON array of entity declarations.
pub fn parse_entities(json: &str) -> Result<Vec<Entity>, AdminError> {
    let configs: Vec<EntityConfig> =
        serde_json::from_str(json).map_err(|e| AdminError::Config(format!("entities: {}", e)))?;
    Ok(configs.into_iter().map(Entity::from).collect())
}

/// Load entity declarations from a JSON file.
pub fn load_entities_from_path(path: impl AsRef<Path>) -> Result<Vec<Entity>, AdminError> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)
        .map_err(|e| AdminError::Config(format!("{}: {}", path.display(), e)))?;
    parse_entities(&json)
}
