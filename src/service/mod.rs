//! CrudExecutor: generic CRUD over discovered table shapes.

mod crud;
pub mod introspect;
pub use crud::CrudExecutor;
