//! Demo server: mounts the dbadmin-sdk routes over the configured database.
//!
//! Run from repo root: `cargo run -p admin-server`
//! Entities are read from `ADMIN_ENTITIES` (default `admin_server/entities.json`).
//! Set `ADMIN_SEED_DEMO=1` to create the demo tables first.

use dbadmin_sdk::sql::create_table;
use dbadmin_sdk::{
    admin_router, load_entities_from_path, status_routes, Admin, AdminConfig, AppState, Database,
    GenericType, Value,
};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("dbadmin_sdk=info,admin_server=info")),
        )
        .init();

    let config = AdminConfig::from_env()?;
    let entities_path =
        std::env::var("ADMIN_ENTITIES").unwrap_or_else(|_| "admin_server/entities.json".into());
    let entities = load_entities_from_path(&entities_path)?;

    let db = Database::connect(
        &config.database_uri,
        config.resolved_engine()?,
        config.max_connections,
        config.statement_timeout(),
    )
    .await?;
    if std::env::var("ADMIN_SEED_DEMO").map(|v| v == "1").unwrap_or(false) {
        seed_demo(&db).await?;
    }

    let mut builder = Admin::builder()
        .config(&config)
        .database(db)
        .entities(entities)
        .default_formatter("password", |v: &Value| {
            if v.is_null() {
                String::new()
            } else {
                "********".into()
            }
        });
    // without an identity header every request is allowed
    if let Ok(name) = std::env::var("ADMIN_IDENTITY_HEADER") {
        builder = builder.identity(move |req| {
            req.headers()
                .get(name.as_str())
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        });
    }
    let admin = builder.build().await?;

    let state = AppState::new(admin);
    let app = admin_router(state.clone()).merge(status_routes(state));
    let addr = std::env::var("ADMIN_LISTEN").unwrap_or_else(|_| "127.0.0.1:3000".into());
    let listener = TcpListener::bind(&addr).await?;
    let port = listener.local_addr()?.port();
    tracing::info!("admin server listening on http://127.0.0.1:{}{}", port, config.base_url);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn seed_demo(db: &Database) -> Result<(), dbadmin_sdk::AdminError> {
    let engine = db.engine();
    let named = [("name", GenericType::String), ("created_at", GenericType::Timestamp)];
    db.execute_script(&create_table(
        engine,
        "users",
        "id",
        &[
            ("name", GenericType::String),
            ("email", GenericType::String),
            ("password", GenericType::String),
            ("created_at", GenericType::Timestamp),
        ],
    ))
    .await?;
    db.execute_script(&create_table(engine, "organizations", "id", &named)).await?;
    db.execute_script(&create_table(engine, "permissions", "id", &named)).await?;
    tracing::info!("demo tables ready");
    Ok(())
}
