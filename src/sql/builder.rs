//! Builds parameterized SELECT, INSERT, UPDATE, DELETE from discovered table shapes.
//! Identifiers come from the entity registry or schema discovery; values are always parameters.

use crate::row::{ColumnMeta, TableShape};
use crate::sql::engine::quoted;
use crate::sql::{from_generic, Engine, GenericType, Value};

/// A bound value together with the kind of the column it targets.
#[derive(Clone, Debug, PartialEq)]
pub struct Param {
    pub value: Value,
    pub kind: GenericType,
}

pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<Param>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    /// Push a value and return its placeholder.
    fn push_param(&mut self, engine: Engine, value: Value, column: &ColumnMeta) -> String {
        let value = match (engine, value) {
            // zoneless columns take the UTC wall time, not a session-zone conversion
            (Engine::Postgres, Value::Timestamp(t)) if is_zoneless(&column.native_type) => {
                Value::String(t.naive_utc().format("%Y-%m-%d %H:%M:%S%.f").to_string())
            }
            (_, value) => value,
        };
        self.params.push(Param {
            value,
            kind: column.generic_type,
        });
        engine.placeholder(self.params.len(), Some(&column.native_type))
    }
}

fn is_zoneless(native: &str) -> bool {
    matches!(
        native.trim().to_lowercase().as_str(),
        "timestamp" | "timestamp without time zone" | "date"
    )
}

/// Empty selection and `["*"]` both mean every column.
pub fn is_all_columns(columns: &[String]) -> bool {
    columns.is_empty() || (columns.len() == 1 && columns[0] == "*")
}

fn column_list(columns: &[String]) -> String {
    if is_all_columns(columns) {
        "*".to_string()
    } else {
        columns.iter().map(|c| quoted(c)).collect::<Vec<_>>().join(", ")
    }
}

fn select_exprs(engine: Engine, shape: &TableShape) -> String {
    shape
        .columns
        .iter()
        .map(|c| engine.select_expr(c))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Zero-row query whose result descriptor carries the column names and types.
pub fn discover(table: &str, columns: &[String]) -> String {
    format!("SELECT {} FROM {} LIMIT 0", column_list(columns), quoted(table))
}

/// SELECT every discovered column. No ORDER BY: row order is whatever the engine returns.
pub fn select_list(engine: Engine, shape: &TableShape) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!("SELECT {} FROM {}", select_exprs(engine, shape), quoted(&shape.table));
    q
}

/// SELECT by primary key, at most one row.
pub fn select_by_id(engine: Engine, shape: &TableShape, pk: &ColumnMeta, id: Value) -> QueryBuf {
    let mut q = QueryBuf::new();
    let ph = q.push_param(engine, id, pk);
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} = {} LIMIT 1",
        select_exprs(engine, shape),
        quoted(&shape.table),
        quoted(&pk.name),
        ph
    );
    q
}

/// INSERT the given values, never the primary key; RETURNING the generated key.
pub fn insert(engine: Engine, table: &str, pk: &ColumnMeta, values: &[(&ColumnMeta, Value)]) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut cols = Vec::new();
    let mut placeholders = Vec::new();
    for (column, value) in values {
        if column.name == pk.name {
            continue;
        }
        placeholders.push(q.push_param(engine, value.clone(), column));
        cols.push(quoted(&column.name));
    }
    q.sql = if cols.is_empty() {
        format!(
            "INSERT INTO {} DEFAULT VALUES RETURNING {}",
            quoted(table),
            engine.select_expr(pk)
        )
    } else {
        format!(
            "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
            quoted(table),
            cols.join(", "),
            placeholders.join(", "),
            engine.select_expr(pk)
        )
    };
    q
}

/// UPDATE by id with one SET entry per value; the primary key is never set.
/// Returns `None` when there is nothing to set.
pub fn update(
    engine: Engine,
    table: &str,
    pk: &ColumnMeta,
    id: Value,
    values: &[(&ColumnMeta, Value)],
) -> Option<QueryBuf> {
    let mut q = QueryBuf::new();
    let mut sets = Vec::new();
    for (column, value) in values {
        if column.name == pk.name {
            continue;
        }
        let ph = q.push_param(engine, value.clone(), column);
        sets.push(format!("{} = {}", quoted(&column.name), ph));
    }
    if sets.is_empty() {
        return None;
    }
    let id_ph = q.push_param(engine, id, pk);
    q.sql = format!(
        "UPDATE {} SET {} WHERE {} = {}",
        quoted(table),
        sets.join(", "),
        quoted(&pk.name),
        id_ph
    );
    Some(q)
}

/// DELETE by id.
pub fn delete(engine: Engine, table: &str, pk: &ColumnMeta, id: Value) -> QueryBuf {
    let mut q = QueryBuf::new();
    let ph = q.push_param(engine, id, pk);
    q.sql = format!("DELETE FROM {} WHERE {} = {}", quoted(table), quoted(&pk.name), ph);
    q
}

/// CREATE TABLE with an auto-generated integer key and one column per (name, kind).
/// Column types come from the lossy generic-to-native mapping.
pub fn create_table(engine: Engine, table: &str, primary_key: &str, columns: &[(&str, GenericType)]) -> String {
    let pk_def = match engine {
        Engine::Postgres => format!("{} bigserial PRIMARY KEY", quoted(primary_key)),
        Engine::Sqlite => format!("{} INTEGER PRIMARY KEY AUTOINCREMENT", quoted(primary_key)),
    };
    let mut defs = vec![pk_def];
    defs.extend(
        columns
            .iter()
            .filter(|(name, _)| *name != primary_key)
            .map(|(name, kind)| format!("{} {}", quoted(name), from_generic(*kind, engine))),
    );
    format!("CREATE TABLE IF NOT EXISTS {} ({})", quoted(table), defs.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(engine: Engine) -> TableShape {
        let (int, text, ts) = match engine {
            Engine::Postgres => ("INT4", "TEXT", "TIMESTAMPTZ"),
            Engine::Sqlite => ("INTEGER", "TEXT", "DATETIME"),
        };
        TableShape {
            table: "users".into(),
            columns: vec![
                ColumnMeta::new("id", int),
                ColumnMeta::new("name", text),
                ColumnMeta::new("created_at", ts),
            ],
        }
    }

    #[test]
    fn discover_uses_star_sentinel() {
        assert_eq!(discover("users", &[]), "SELECT * FROM \"users\" LIMIT 0");
        assert_eq!(discover("users", &["*".to_string()]), "SELECT * FROM \"users\" LIMIT 0");
        assert_eq!(
            discover("users", &["id".to_string(), "name".to_string()]),
            "SELECT \"id\", \"name\" FROM \"users\" LIMIT 0"
        );
    }

    #[test]
    fn select_list_has_no_order_by() {
        let q = select_list(Engine::Sqlite, &shape(Engine::Sqlite));
        assert_eq!(q.sql, "SELECT \"id\", \"name\", \"created_at\" FROM \"users\"");
        assert!(q.params.is_empty());
    }

    #[test]
    fn select_by_id_binds_the_id() {
        let s = shape(Engine::Postgres);
        let q = select_by_id(Engine::Postgres, &s, &s.columns[0], Value::Integer(5));
        assert_eq!(
            q.sql,
            "SELECT \"id\", \"name\", \"created_at\" FROM \"users\" WHERE \"id\" = $1::INT4 LIMIT 1"
        );
        assert_eq!(q.params, vec![Param { value: Value::Integer(5), kind: GenericType::Integer }]);
    }

    #[test]
    fn insert_excludes_primary_key_and_numbers_placeholders() {
        let s = shape(Engine::Postgres);
        let values = vec![
            (&s.columns[0], Value::Integer(99)),
            (&s.columns[1], Value::from("Ada")),
            (&s.columns[2], Value::Null),
        ];
        let q = insert(Engine::Postgres, "users", &s.columns[0], &values);
        assert_eq!(
            q.sql,
            "INSERT INTO \"users\" (\"name\", \"created_at\") VALUES ($1::TEXT, $2::TIMESTAMPTZ) RETURNING \"id\""
        );
        assert_eq!(q.params.len(), 2);
        assert_eq!(q.params[0].value, Value::from("Ada"));
    }

    #[test]
    fn zoneless_postgres_columns_bind_utc_wall_time() {
        let at = chrono::TimeZone::with_ymd_and_hms(&chrono::Utc, 2024, 3, 9, 14, 5, 0).unwrap();
        let logged = ColumnMeta::new("logged_at", "TIMESTAMP");
        let created = ColumnMeta::new("created_at", "TIMESTAMPTZ");
        let values = vec![(&logged, Value::Timestamp(at)), (&created, Value::Timestamp(at))];
        let q = insert(Engine::Postgres, "events", &ColumnMeta::new("id", "INT8"), &values);
        assert_eq!(q.params[0].value, Value::from("2024-03-09 14:05:00"));
        assert_eq!(q.params[0].kind, GenericType::Timestamp);
        assert_eq!(q.params[1].value, Value::Timestamp(at));

        let q = insert(Engine::Sqlite, "events", &ColumnMeta::new("id", "INTEGER"), &values[..1]);
        assert_eq!(q.params[0].value, Value::Timestamp(at));
    }

    #[test]
    fn insert_uses_unnumbered_placeholders_on_sqlite() {
        let s = shape(Engine::Sqlite);
        let values = vec![(&s.columns[1], Value::from("Ada")), (&s.columns[2], Value::Null)];
        let q = insert(Engine::Sqlite, "users", &s.columns[0], &values);
        assert_eq!(
            q.sql,
            "INSERT INTO \"users\" (\"name\", \"created_at\") VALUES (?, ?) RETURNING \"id\""
        );
    }

    #[test]
    fn insert_with_only_the_key_uses_defaults() {
        let s = shape(Engine::Sqlite);
        let values = vec![(&s.columns[0], Value::Integer(1))];
        let q = insert(Engine::Sqlite, "users", &s.columns[0], &values);
        assert_eq!(q.sql, "INSERT INTO \"users\" DEFAULT VALUES RETURNING \"id\"");
        assert!(q.params.is_empty());
    }

    #[test]
    fn update_sets_all_but_the_key_and_binds_id_last() {
        let s = shape(Engine::Postgres);
        let values = vec![(&s.columns[0], Value::Integer(2)), (&s.columns[1], Value::from("Grace"))];
        let q = update(Engine::Postgres, "users", &s.columns[0], Value::Integer(1), &values).unwrap();
        assert_eq!(q.sql, "UPDATE \"users\" SET \"name\" = $1::TEXT WHERE \"id\" = $2::INT4");
        assert_eq!(q.params[1].value, Value::Integer(1));
    }

    #[test]
    fn update_with_nothing_to_set() {
        let s = shape(Engine::Sqlite);
        let values = vec![(&s.columns[0], Value::Integer(2))];
        assert!(update(Engine::Sqlite, "users", &s.columns[0], Value::Integer(1), &values).is_none());
    }

    #[test]
    fn delete_by_id() {
        let s = shape(Engine::Sqlite);
        let q = delete(Engine::Sqlite, "users", &s.columns[0], Value::Integer(3));
        assert_eq!(q.sql, "DELETE FROM \"users\" WHERE \"id\" = ?");
        assert_eq!(q.params.len(), 1);
    }

    #[test]
    fn create_table_from_generic_kinds() {
        let sql = create_table(
            Engine::Sqlite,
            "people",
            "id",
            &[("name", GenericType::String), ("active", GenericType::Boolean)],
        );
        assert_eq!(
            sql,
            "CREATE TABLE IF NOT EXISTS \"people\" (\"id\" INTEGER PRIMARY KEY AUTOINCREMENT, \"name\" TEXT, \"active\" BOOLEAN)"
        );
    }
}
