//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdminError {
    /// Unknown entity, or no row matched a lookup by id.
    #[error("not found: {0}")]
    NotFound(String),
    #[error("database connection: {0}")]
    Connection(String),
    #[error("database: {0}")]
    Query(String),
    #[error("permission denied: {action} on {entity}")]
    PermissionDenied { entity: String, action: String },
    #[error("statement exceeded deadline of {0:?}")]
    Timeout(Duration),
    #[error("unknown column '{column}' for table {table}")]
    UnknownColumn { table: String, column: String },
    #[error("invalid value for {column}: {message}")]
    InvalidValue { column: String, message: String },
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),
    #[error("config: {0}")]
    Config(String),
    #[error("render: {0}")]
    Render(String),
}

impl AdminError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, AdminError::NotFound(_))
    }
}

impl From<sqlx::Error> for AdminError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => AdminError::NotFound("row".into()),
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => AdminError::Connection(e.to_string()),
            sqlx::Error::Configuration(_) => AdminError::Config(e.to_string()),
            other => AdminError::Query(other.to_string()),
        }
    }
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AdminError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            AdminError::Connection(_) => (StatusCode::SERVICE_UNAVAILABLE, "connection_error"),
            AdminError::Query(_) => (StatusCode::INTERNAL_SERVER_ERROR, "database_error"),
            AdminError::PermissionDenied { .. } => (StatusCode::FORBIDDEN, "permission_denied"),
            AdminError::Timeout(_) => (StatusCode::GATEWAY_TIMEOUT, "timeout"),
            AdminError::UnknownColumn { .. } => (StatusCode::BAD_REQUEST, "unknown_column"),
            AdminError::InvalidValue { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "invalid_value"),
            AdminError::InvalidIdentifier(_) | AdminError::Config(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "config_error")
            }
            AdminError::Render(_) => (StatusCode::INTERNAL_SERVER_ERROR, "render_error"),
        };
        let details = match &self {
            AdminError::UnknownColumn { column, .. } | AdminError::InvalidValue { column, .. } => {
                Some(serde_json::json!({ "column": column }))
            }
            _ => None,
        };
        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
                details,
            },
        };
        (status, Json(body)).into_response()
    }
}
