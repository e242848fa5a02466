//! In-memory entity registry keyed by table name. Populated at build time, read-only after.

use crate::config::{validate_entity, Entity};
use crate::error::AdminError;
use std::collections::HashMap;

#[derive(Clone, Debug, Default)]
pub struct EntityRegistry {
    entities: HashMap<String, Entity>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an entity. Re-registering a table name overwrites the previous entry.
    pub fn register(&mut self, entity: Entity) -> Result<(), AdminError> {
        validate_entity(&entity)?;
        let name = entity.table_name().to_string();
        if self.entities.insert(name.clone(), entity).is_some() {
            tracing::debug!(entity = %name, "entity re-registered");
        }
        Ok(())
    }

    /// Register in order; later entries win on duplicate names. Stops at the first invalid one.
    pub fn register_all<I>(&mut self, entities: I) -> Result<(), AdminError>
    where
        I: IntoIterator<Item = Entity>,
    {
        for entity in entities {
            self.register(entity)?;
        }
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<&Entity> {
        self.entities.get(name)
    }

    /// `NotFound` for unknown names.
    pub fn require(&self, name: &str) -> Result<&Entity, AdminError> {
        self.lookup(name)
            .ok_or_else(|| AdminError::NotFound(format!("entity {}", name)))
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
