//! Admin routes. Every page except the login stub passes through the permission gate;
//! the router is nested at the configured base URL.

use crate::handlers::{
    create, dashboard, delete as delete_handler, edit_form, list, login, new_form, update,
};
use crate::permission::check_permission;
use crate::state::AppState;
use axum::{middleware, routing::get, Router};
use tower_http::limit::RequestBodyLimitLayer;

/// Form posts are small; larger bodies are rejected before reaching a handler.
const MAX_FORM_BYTES: usize = 1024 * 1024;

/// Routes relative to the base URL (not nested).
pub fn admin_routes(state: AppState) -> Router {
    let gated = Router::new()
        .route("/", get(dashboard))
        .route("/entity/:entity", get(list))
        .route("/entity/:entity/new", get(new_form).post(create))
        .route("/entity/:entity/:id", get(edit_form).post(update))
        .route("/entity/:entity/:id/delete", get(delete_handler))
        .route_layer(middleware::from_fn_with_state(state.clone(), check_permission));
    Router::new()
        .route("/login", get(login))
        .merge(gated)
        .layer(RequestBodyLimitLayer::new(MAX_FORM_BYTES))
        .with_state(state)
}

/// Admin routes mounted at the admin's base URL.
pub fn admin_router(state: AppState) -> Router {
    let base = state.admin.base_url().to_string();
    let routes = admin_routes(state);
    if base.is_empty() {
        routes
    } else {
        Router::new().nest(&base, routes)
    }
}
