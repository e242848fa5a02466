//! HTTP handlers for the dashboard, login stub, and entity CRUD pages.

pub mod dashboard;
pub mod entity;
pub use dashboard::*;
pub use entity::*;
