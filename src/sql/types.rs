//! Native column type names to engine-agnostic value kinds.

use crate::sql::Engine;
use serde::{Deserialize, Serialize};

/// Engine-agnostic kind of a column value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenericType {
    Integer,
    Float,
    Boolean,
    Timestamp,
    String,
    Unknown,
}

/// Map a native type name (as reported by the driver, any case) to its generic kind.
/// Unrecognized names map to `Unknown` and are logged.
pub fn to_generic(native_type: &str) -> GenericType {
    let lower = native_type.trim().to_lowercase();
    match lower.as_str() {
        "int" | "int2" | "int4" | "int8" | "smallint" | "integer" | "bigint" | "smallserial"
        | "serial" | "bigserial" | "serial4" | "serial8" => GenericType::Integer,
        "float" | "float4" | "float8" | "decimal" | "numeric" | "real" | "double"
        | "double precision" => GenericType::Float,
        "bool" | "boolean" => GenericType::Boolean,
        "date" | "datetime" | "timestamp" | "timestamptz" | "timestamp with time zone"
        | "timestamp without time zone" => GenericType::Timestamp,
        "text" | "varchar" | "character" | "character varying" | "char" | "bpchar" | "name"
        | "citext" | "uuid" => GenericType::String,
        _ => {
            tracing::warn!(native_type = %native_type, "unknown column type");
            GenericType::Unknown
        }
    }
}

/// Native type for a generic kind. Lossy: used only to synthesize column definitions.
pub fn from_generic(generic: GenericType, engine: Engine) -> &'static str {
    engine.native_type(generic)
}
