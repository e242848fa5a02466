//! Database engine dialects: parameter syntax, identifier quoting, casts.

use crate::error::AdminError;
use crate::sql::types::GenericType;
use crate::row::ColumnMeta;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    Postgres,
    Sqlite,
}

impl Engine {
    /// Infer the engine from a connection URI scheme.
    pub fn from_uri(uri: &str) -> Result<Self, AdminError> {
        let scheme = uri
            .split_once(':')
            .map(|(s, _)| s)
            .ok_or_else(|| AdminError::Config(format!("database uri has no scheme: {}", uri)))?;
        scheme.parse()
    }

    /// Placeholder for the `n`-th (1-based) parameter. Postgres placeholders carry an
    /// explicit cast to the column's native type so text form input binds to any column.
    pub fn placeholder(self, n: usize, native_type: Option<&str>) -> String {
        match self {
            Engine::Postgres => match native_type {
                Some(t) if !t.is_empty() && is_castable(t) => format!("${}::{}", n, t),
                _ => format!("${}", n),
            },
            Engine::Sqlite => "?".to_string(),
        }
    }

    /// Expression used to read a column. Types the driver cannot decode natively are
    /// read as text on Postgres.
    pub fn select_expr(self, column: &ColumnMeta) -> String {
        let q = quoted(&column.name);
        match self {
            Engine::Postgres if reads_as_text(column) => format!("{}::text AS {}", q, q),
            _ => q,
        }
    }

    /// Native type used when synthesizing a column definition.
    pub fn native_type(self, generic: GenericType) -> &'static str {
        match (self, generic) {
            (Engine::Postgres, GenericType::Integer) => "bigint",
            (Engine::Postgres, GenericType::Float) => "double precision",
            (Engine::Postgres, GenericType::Boolean) => "boolean",
            (Engine::Postgres, GenericType::Timestamp) => "timestamp with time zone",
            (Engine::Postgres, GenericType::String | GenericType::Unknown) => "text",
            (Engine::Sqlite, GenericType::Integer) => "INTEGER",
            (Engine::Sqlite, GenericType::Float) => "REAL",
            (Engine::Sqlite, GenericType::Boolean) => "BOOLEAN",
            (Engine::Sqlite, GenericType::Timestamp) => "DATETIME",
            (Engine::Sqlite, GenericType::String | GenericType::Unknown) => "TEXT",
        }
    }
}

impl FromStr for Engine {
    type Err = AdminError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(Engine::Postgres),
            "sqlite" | "sqlite3" => Ok(Engine::Sqlite),
            other => Err(AdminError::Config(format!(
                "unsupported database engine: {} (expected postgres or sqlite)",
                other
            ))),
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Engine::Postgres => f.write_str("postgres"),
            Engine::Sqlite => f.write_str("sqlite"),
        }
    }
}

/// Quote identifier (safe: only from the registry or discovered schema).
pub fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

fn reads_as_text(column: &ColumnMeta) -> bool {
    let native = column.native_type.to_lowercase();
    column.generic_type == GenericType::Unknown || native == "numeric" || native == "decimal"
}

/// Type names reported by the driver are plain words (optionally with `[]`); anything
/// else is bound without a cast.
fn is_castable(native: &str) -> bool {
    native
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '[' || c == ']' || c == ' ')
        && !native.eq_ignore_ascii_case("void")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_from_uri_scheme() {
        assert_eq!(Engine::from_uri("postgres://localhost/app").unwrap(), Engine::Postgres);
        assert_eq!(Engine::from_uri("postgresql://localhost/app").unwrap(), Engine::Postgres);
        assert_eq!(Engine::from_uri("sqlite::memory:").unwrap(), Engine::Sqlite);
        assert!(Engine::from_uri("mysql://localhost/app").is_err());
        assert!(Engine::from_uri("localhost").is_err());
    }

    #[test]
    fn placeholders_follow_engine_syntax() {
        assert_eq!(Engine::Postgres.placeholder(2, Some("INT4")), "$2::INT4");
        assert_eq!(Engine::Postgres.placeholder(1, None), "$1");
        assert_eq!(Engine::Sqlite.placeholder(3, Some("INTEGER")), "?");
    }

    #[test]
    fn postgres_reads_numeric_and_unknown_as_text() {
        let price = ColumnMeta::new("price", "NUMERIC");
        let tags = ColumnMeta::new("tags", "JSONB");
        let name = ColumnMeta::new("name", "TEXT");
        assert_eq!(Engine::Postgres.select_expr(&price), "\"price\"::text AS \"price\"");
        assert_eq!(Engine::Postgres.select_expr(&tags), "\"tags\"::text AS \"tags\"");
        assert_eq!(Engine::Postgres.select_expr(&name), "\"name\"");
        assert_eq!(Engine::Sqlite.select_expr(&price), "\"price\"");
    }

    #[test]
    fn quoting_escapes_embedded_quotes() {
        assert_eq!(quoted("users"), "\"users\"");
        assert_eq!(quoted("we\"ird"), "\"we\"\"ird\"");
    }
}
