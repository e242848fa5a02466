//! Navigation menu derived from the registry.

use crate::registry::EntityRegistry;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Menu {
    pub order: i32,
    /// Table name of the entity.
    pub identifier: String,
    pub title: String,
    pub url: String,
    pub fav_icon: String,
}

/// One entry per entity, ascending by `order`, ties by table name.
pub fn menus(registry: &EntityRegistry, base_url: &str) -> Vec<Menu> {
    let mut out: Vec<Menu> = registry
        .entities()
        .map(|e| Menu {
            order: e.display.order,
            identifier: e.table_name().to_string(),
            title: e.display.title_plural.clone(),
            url: entity_url(base_url, e.table_name()),
            fav_icon: e.display.fav_icon.clone(),
        })
        .collect();
    out.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.identifier.cmp(&b.identifier)));
    out
}

pub fn entity_url(base_url: &str, table_name: &str) -> String {
    format!("{}/entity/{}", base_url.trim_end_matches('/'), table_name)
}
