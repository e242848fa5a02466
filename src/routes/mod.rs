//! Routers: admin pages under the base URL, plus health/readiness/version.

pub mod common;
pub mod entity;

pub use common::status_routes;
pub use entity::{admin_router, admin_routes};
