//! Safe SQL builder: identifiers from the registry or discovered schema only, values as parameters.

mod builder;
pub mod engine;
pub mod params;
pub mod types;
pub mod value;

pub use builder::*;
pub use engine::Engine;
pub use params::{bind_params, decode_row};
pub use types::{from_generic, to_generic, GenericType};
pub use value::Value;
