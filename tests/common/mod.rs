//! Shared fixtures: an in-memory SQLite database with a `users` table.

#![allow(dead_code)]

use dbadmin_sdk::sql::create_table;
use dbadmin_sdk::{Database, Engine, GenericType};
use std::time::Duration;

pub async fn sqlite() -> Database {
    let db = Database::connect("sqlite::memory:", Engine::Sqlite, 1, Duration::from_secs(5))
        .await
        .expect("in-memory sqlite");
    let ddl = create_table(
        Engine::Sqlite,
        "users",
        "id",
        &[
            ("name", GenericType::String),
            ("email", GenericType::String),
            ("age", GenericType::Integer),
            ("score", GenericType::Float),
            ("active", GenericType::Boolean),
            ("created_at", GenericType::Timestamp),
        ],
    );
    db.execute_script(&ddl).await.expect("create users");
    db
}

pub const USER_COLUMNS: usize = 7;
