//! Entity definitions, process configuration, and identifier validation.

pub mod entity;
pub mod options;
pub mod validator;

pub use entity::*;
pub use options::*;
pub use validator::*;
