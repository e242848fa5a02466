//! Operational endpoints next to the admin pages: liveness, database readiness, build version.

use crate::sql::Engine;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct Liveness {
    status: &'static str,
    entities: usize,
}

#[derive(Debug, Serialize)]
struct Readiness {
    status: &'static str,
    engine: Engine,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct Build {
    name: &'static str,
    version: &'static str,
}

/// Process is up; reports how many entities are registered.
async fn health(State(state): State<AppState>) -> Json<Liveness> {
    Json(Liveness {
        status: "ok",
        entities: state.admin.registry().len(),
    })
}

/// One `SELECT 1` under the statement deadline. 503 when the pool cannot serve it.
async fn ready(State(state): State<AppState>) -> (StatusCode, Json<Readiness>) {
    let db = state.admin.executor().database();
    match db.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(Readiness {
                status: "ok",
                engine: db.engine(),
                error: None,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, engine = %db.engine(), "database not ready");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(Readiness {
                    status: "unavailable",
                    engine: db.engine(),
                    error: Some(e.to_string()),
                }),
            )
        }
    }
}

async fn version() -> Json<Build> {
    Json(Build {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// GET /health, GET /ready and GET /version at the root, outside the permission gate.
pub fn status_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/version", get(version))
        .with_state(state)
}
