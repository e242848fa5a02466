//! dbadmin SDK: schema-driven admin backend with generic CRUD over arbitrary SQL tables.

pub mod admin;
pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod format;
pub mod handlers;
pub mod menu;
pub mod permission;
pub mod registry;
pub mod render;
pub mod response;
pub mod routes;
pub mod row;
pub mod service;
pub mod sql;
pub mod state;
pub mod view;

pub use admin::{Admin, AdminBuilder};
pub use config::{load_entities_from_path, parse_entities, AdminConfig, Entity, EntityConfig, Formatter};
pub use db::{Database, DbPool};
pub use error::AdminError;
pub use extractors::Identity;
pub use menu::Menu;
pub use permission::{resolve_action, Action, Authorizer, IdentityFn};
pub use registry::EntityRegistry;
pub use render::{JsonRenderer, Renderer};
pub use routes::{admin_router, admin_routes, status_routes};
pub use row::{Column, ColumnMeta, Row, TableShape};
pub use service::CrudExecutor;
pub use sql::{Engine, GenericType, Value};
pub use state::AppState;
