//! Dashboard and login stub.

use crate::error::AdminError;
use crate::render::{DASHBOARD, LOGIN};
use crate::state::AppState;
use crate::view::DashboardData;
use axum::{extract::State, response::Response};

pub async fn dashboard(State(state): State<AppState>) -> Result<Response, AdminError> {
    let admin = &state.admin;
    let data = DashboardData {
        base: admin.base_context(),
    };
    admin.templates().render(DASHBOARD, &data)
}

/// Rendered outside the permission gate; the page body is supplied by a template override.
pub async fn login(State(state): State<AppState>) -> Result<Response, AdminError> {
    let admin = &state.admin;
    admin.templates().render(LOGIN, &admin.base_context())
}
