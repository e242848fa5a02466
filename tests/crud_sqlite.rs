//! CRUD executor against in-memory SQLite.

mod common;

use chrono::{TimeZone, Utc};
use dbadmin_sdk::{AdminError, Column, CrudExecutor, Database, Value};
use std::time::Duration;

async fn executor() -> CrudExecutor {
    CrudExecutor::new(common::sqlite().await)
}

fn all() -> Vec<String> {
    Vec::new()
}

fn cols(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn list_without_selection_returns_every_column() {
    let ex = executor().await;
    ex.create("users", "id", &[Column::new("name", "ann")]).await.unwrap();
    ex.create("users", "id", &[Column::new("name", "bob")]).await.unwrap();

    let (rows, names) = ex.list("users", "id", &all()).await.unwrap();
    assert_eq!(names.len(), common::USER_COLUMNS);
    assert_eq!(names[0], "id");
    assert_eq!(rows.len(), 2);
    for row in &rows {
        assert_eq!(row.columns.len(), names.len());
        assert_eq!(row.columns.iter().filter(|c| c.is_primary).count(), 1);
        assert!(!row.is_placeholder());
    }

    let (_, star) = ex.list("users", "id", &cols(&["*"])).await.unwrap();
    assert_eq!(star, names);
}

#[tokio::test]
async fn list_respects_selection_order() {
    let ex = executor().await;
    ex.create("users", "id", &[Column::new("name", "ann"), Column::new("email", "a@x.io")])
        .await
        .unwrap();
    let (rows, names) = ex.list("users", "id", &cols(&["email", "name"])).await.unwrap();
    assert_eq!(names, cols(&["email", "name"]));
    assert_eq!(rows[0].columns[0].value, Value::from("a@x.io"));
    assert!(rows[0].primary_key_column().is_none());
}

#[tokio::test]
async fn create_then_get_round_trips_values() {
    let ex = executor().await;
    let id = ex
        .create(
            "users",
            "id",
            &[
                Column::new("name", "ann"),
                Column::new("age", "41"),
                Column::new("score", "7.5"),
                Column::new("active", "on"),
                Column::new("created_at", "2024-03-09T14:05"),
            ],
        )
        .await
        .unwrap();
    assert!(matches!(id, Value::Integer(_)));

    let row = ex.get_by_id("users", "id", &all(), &id).await.unwrap();
    assert_eq!(row.primary_key_value, Some(id.clone()));
    assert_eq!(row.column("name").unwrap().value, Value::from("ann"));
    assert_eq!(row.column("age").unwrap().value, Value::Integer(41));
    assert_eq!(row.column("score").unwrap().value, Value::Float(7.5));
    assert_eq!(row.column("active").unwrap().value, Value::Boolean(true));
    assert_eq!(
        row.column("created_at").unwrap().value,
        Value::Timestamp(Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 0).unwrap())
    );
    assert_eq!(row.column("email").unwrap().value, Value::Null);
    assert!(row.column("id").unwrap().is_primary);
}

#[tokio::test]
async fn typed_values_are_written_as_is() {
    let ex = executor().await;
    let at = Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 59).unwrap();
    let id = ex
        .create(
            "users",
            "id",
            &[
                Column::new("age", 30i64),
                Column::new("active", false),
                Column::new("created_at", at),
            ],
        )
        .await
        .unwrap();
    let row = ex.get_by_id("users", "id", &all(), &id).await.unwrap();
    assert_eq!(row.column("age").unwrap().value, Value::Integer(30));
    assert_eq!(row.column("active").unwrap().value, Value::Boolean(false));
    assert_eq!(row.column("created_at").unwrap().value, Value::Timestamp(at));
}

#[tokio::test]
async fn string_id_from_a_path_is_coerced() {
    let ex = executor().await;
    let id = ex.create("users", "id", &[Column::new("name", "ann")]).await.unwrap();
    let path_id = Value::from(id.to_string());
    let row = ex.get_by_id("users", "id", &cols(&["name"]), &path_id).await.unwrap();
    assert_eq!(row.columns.len(), 1);
    assert_eq!(row.column("name").unwrap().value, Value::from("ann"));
    // key not selected, still known
    assert!(!row.is_placeholder());
    assert_eq!(row.primary_key_value, Some(id));
    assert!(row.primary_key_column().is_none());
}

fn assert_send<T: Send>(t: T) -> T {
    t
}

#[tokio::test]
async fn executor_futures_can_be_spawned() {
    let ex = executor().await;
    let id = {
        let ex = ex.clone();
        tokio::spawn(async move { ex.create("users", "id", &[Column::new("name", "ann")]).await })
            .await
            .unwrap()
            .unwrap()
    };
    let found = assert_send(ex.get_by_id("users", "id", &all(), &id)).await.unwrap();
    assert_eq!(found.primary_key_value, Some(id.clone()));
    assert_send(ex.list("users", "id", &all())).await.unwrap();
    assert_send(ex.shape("users", &all())).await.unwrap();
    assert_send(ex.update_by_id("users", "id", &id, &[Column::new("age", "3")]))
        .await
        .unwrap();
    assert_send(ex.delete_by_id("users", "id", &id)).await.unwrap();
}

#[tokio::test]
async fn get_missing_row_is_not_found() {
    let ex = executor().await;
    let err = ex.get_by_id("users", "id", &all(), &Value::Integer(404)).await.unwrap_err();
    assert!(err.is_not_found());
    // cannot be an integer key
    let err = ex.get_by_id("users", "id", &all(), &Value::from("abc")).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn delete_then_get_is_not_found() {
    let ex = executor().await;
    let id = ex.create("users", "id", &[Column::new("name", "ann")]).await.unwrap();
    ex.delete_by_id("users", "id", &id).await.unwrap();
    assert!(ex.get_by_id("users", "id", &all(), &id).await.unwrap_err().is_not_found());
    assert!(ex.delete_by_id("users", "id", &id).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn empty_row_has_shape_and_no_values() {
    let ex = executor().await;
    let row = ex.empty_row("users", "id", &cols(&["id", "name", "email"])).await.unwrap();
    assert_eq!(row.columns.len(), 3);
    assert!(row.is_placeholder());
    assert!(row.columns.iter().all(|c| c.value.is_null()));
    let primary: Vec<&str> = row.columns.iter().filter(|c| c.is_primary).map(|c| c.name.as_str()).collect();
    assert_eq!(primary, vec!["id"]);
}

#[tokio::test]
async fn update_sets_columns_and_never_the_key() {
    let ex = executor().await;
    let id = ex.create("users", "id", &[Column::new("name", "ann")]).await.unwrap();
    ex.update_by_id(
        "users",
        "id",
        &id,
        &[Column::new("id", "999"), Column::new("name", "anna"), Column::new("age", "5")],
    )
    .await
    .unwrap();
    let row = ex.get_by_id("users", "id", &all(), &id).await.unwrap();
    assert_eq!(row.primary_key_value, Some(id));
    assert_eq!(row.column("name").unwrap().value, Value::from("anna"));
    assert_eq!(row.column("age").unwrap().value, Value::Integer(5));
}

#[tokio::test]
async fn update_edge_cases() {
    let ex = executor().await;
    let id = ex.create("users", "id", &[Column::new("name", "ann")]).await.unwrap();

    // nothing to set
    ex.update_by_id("users", "id", &id, &[Column::new("id", "1")]).await.unwrap();

    let err = ex
        .update_by_id("users", "id", &Value::Integer(404), &[Column::new("name", "x")])
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    let err = ex
        .update_by_id("users", "id", &id, &[Column::new("nickname", "x")])
        .await
        .unwrap_err();
    assert!(matches!(err, AdminError::UnknownColumn { ref column, .. } if column == "nickname"));

    let err = ex
        .update_by_id("users", "id", &id, &[Column::new("age", "old")])
        .await
        .unwrap_err();
    assert!(matches!(err, AdminError::InvalidValue { ref column, .. } if column == "age"));
}

#[tokio::test]
async fn create_with_no_columns_uses_defaults() {
    let ex = executor().await;
    let first = ex.create("users", "id", &[]).await.unwrap();
    let second = ex.create("users", "id", &[]).await.unwrap();
    assert_ne!(first, second);
    let row = ex.get_by_id("users", "id", &all(), &second).await.unwrap();
    assert_eq!(row.column("name").unwrap().value, Value::Null);
}

#[tokio::test]
async fn unknown_table_is_a_query_error() {
    let ex = executor().await;
    let err = ex.list("missing", "id", &all()).await.unwrap_err();
    assert!(matches!(err, AdminError::Query(_)));
}

#[tokio::test]
async fn operations_respect_the_deadline() {
    let db = common::sqlite().await;
    let short = Database::from_pool(db.pool().clone(), Duration::from_millis(10));
    let err = short
        .run(async {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok::<_, AdminError>(())
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AdminError::Timeout(_)));
}

#[tokio::test]
async fn unreachable_database_is_a_connection_error() {
    let err = Database::connect(
        "sqlite:///nonexistent-dir/admin.db",
        dbadmin_sdk::Engine::Sqlite,
        1,
        Duration::from_secs(1),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AdminError::Connection(_)));
}
