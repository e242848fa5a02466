//! The assembled admin: registry, executor, formatters, access policy and templates,
//! built once and shared behind an `Arc`.

use crate::config::{normalize_base_url, AdminConfig, Entity, DEFAULT_DATABASE_URI};
use crate::db::Database;
use crate::error::AdminError;
use crate::format::DefaultFormatters;
use crate::menu::{self, Menu};
use crate::permission::{AccessPolicy, Action, Authorizer, IdentityFn};
use crate::registry::EntityRegistry;
use crate::render::{Renderer, Templates};
use crate::service::CrudExecutor;
use crate::sql::{Engine, Value};
use crate::view::BaseContext;
use axum::extract::Request;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug)]
pub struct Admin {
    base_url: String,
    registry: EntityRegistry,
    executor: CrudExecutor,
    formatters: DefaultFormatters,
    policy: AccessPolicy,
    templates: Templates,
}

impl Admin {
    pub fn builder() -> AdminBuilder {
        AdminBuilder::default()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn executor(&self) -> &CrudExecutor {
        &self.executor
    }

    pub fn formatters(&self) -> &DefaultFormatters {
        &self.formatters
    }

    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    pub fn templates(&self) -> &Templates {
        &self.templates
    }

    /// Registered entity by table name; `NotFound` otherwise.
    pub fn entity(&self, name: &str) -> Result<&Entity, AdminError> {
        self.registry.require(name)
    }

    /// Recomputed on every call.
    pub fn menus(&self) -> Vec<Menu> {
        menu::menus(&self.registry, &self.base_url)
    }

    pub fn base_context(&self) -> BaseContext {
        BaseContext {
            base_url: self.base_url.clone(),
            menus: self.menus(),
        }
    }
}

/// Collects options; `build` opens the database and freezes everything into an `Admin`.
#[derive(Default)]
pub struct AdminBuilder {
    database_uri: Option<String>,
    engine: Option<Engine>,
    database: Option<Database>,
    base_url: Option<String>,
    entities: Vec<Entity>,
    formatters: DefaultFormatters,
    identity: Option<IdentityFn>,
    authorizer: Option<Authorizer>,
    templates: Templates,
    statement_timeout: Option<Duration>,
    max_connections: Option<u32>,
}

impl AdminBuilder {
    /// Seed database, engine, base URL, deadline and pool size from process config.
    pub fn config(mut self, config: &AdminConfig) -> Self {
        self.database_uri = Some(config.database_uri.clone());
        self.engine = config.engine;
        self.base_url = Some(config.base_url.clone());
        self.statement_timeout = Some(config.statement_timeout());
        self.max_connections = Some(config.max_connections);
        self
    }

    pub fn database_uri(mut self, uri: impl Into<String>) -> Self {
        self.database_uri = Some(uri.into());
        self
    }

    /// Engine identifier; inferred from the URI scheme when not set.
    pub fn engine(mut self, engine: Engine) -> Self {
        self.engine = Some(engine);
        self
    }

    /// Use an already opened database instead of connecting in `build`.
    pub fn database(mut self, db: Database) -> Self {
        self.database = Some(db);
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn entity(mut self, entity: Entity) -> Self {
        self.entities.push(entity);
        self
    }

    pub fn entities<I>(mut self, entities: I) -> Self
    where
        I: IntoIterator<Item = Entity>,
    {
        self.entities.extend(entities);
        self
    }

    pub fn default_formatter<F>(mut self, column: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Value) -> String + Send + Sync + 'static,
    {
        self.formatters.values.insert(column.into(), Arc::new(f));
        self
    }

    pub fn default_column_name_formatter<F>(mut self, column: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Value) -> String + Send + Sync + 'static,
    {
        self.formatters.column_names.insert(column.into(), Arc::new(f));
        self
    }

    pub fn identity<F>(mut self, f: F) -> Self
    where
        F: Fn(&Request) -> Option<String> + Send + Sync + 'static,
    {
        self.identity = Some(Arc::new(f));
        self
    }

    pub fn authorizer<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &str, Action) -> bool + Send + Sync + 'static,
    {
        self.authorizer = Some(Arc::new(f));
        self
    }

    pub fn renderer(mut self, renderer: impl Renderer + 'static) -> Self {
        self.templates.set_default(Arc::new(renderer));
        self
    }

    pub fn template(mut self, name: impl Into<String>, renderer: impl Renderer + 'static) -> Self {
        self.templates.set_override(name, Arc::new(renderer));
        self
    }

    pub fn statement_timeout(mut self, timeout: Duration) -> Self {
        self.statement_timeout = Some(timeout);
        self
    }

    pub fn max_connections(mut self, n: u32) -> Self {
        self.max_connections = Some(n);
        self
    }

    /// Validate and register entities, then open and ping the database. A database that
    /// cannot be reached is a `Connection` error.
    pub async fn build(self) -> Result<Admin, AdminError> {
        let mut registry = EntityRegistry::new();
        registry.register_all(self.entities)?;
        let defaults = AdminConfig::default();
        let timeout = self.statement_timeout.unwrap_or_else(|| defaults.statement_timeout());
        let db = match self.database {
            Some(db) => db,
            None => {
                let uri = self.database_uri.unwrap_or_else(|| DEFAULT_DATABASE_URI.to_string());
                let engine = match self.engine {
                    Some(e) => e,
                    None => Engine::from_uri(&uri)?,
                };
                let max = self.max_connections.unwrap_or(defaults.max_connections);
                Database::connect(&uri, engine, max, timeout).await?
            }
        };
        let base_url = normalize_base_url(self.base_url.as_deref().unwrap_or(&defaults.base_url));
        tracing::info!(
            engine = %db.engine(),
            base_url = %base_url,
            entities = registry.len(),
            "admin ready"
        );
        Ok(Admin {
            base_url,
            registry,
            executor: CrudExecutor::new(db),
            formatters: self.formatters,
            policy: AccessPolicy::new(self.identity, self.authorizer),
            templates: self.templates,
        })
    }
}
