//! Rendering seam. Views are handed to a `Renderer` as a template name plus serialized data;
//! the default renders the JSON envelope, and single templates can be overridden.

use crate::error::AdminError;
use crate::response::success_view;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

pub const DASHBOARD: &str = "dashboard";
pub const LIST: &str = "list";
pub const EDIT: &str = "edit";
pub const LOGIN: &str = "login";

pub trait Renderer: Send + Sync {
    fn render(&self, template: &str, data: serde_json::Value) -> Result<Response, AdminError>;
}

/// `{ "data": ..., "meta": { "template": name } }`.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, template: &str, data: serde_json::Value) -> Result<Response, AdminError> {
        Ok(success_view(template, data).into_response())
    }
}

impl<F> Renderer for F
where
    F: Fn(&str, serde_json::Value) -> Result<Response, AdminError> + Send + Sync,
{
    fn render(&self, template: &str, data: serde_json::Value) -> Result<Response, AdminError> {
        self(template, data)
    }
}

/// Default renderer plus per-template overrides.
#[derive(Clone)]
pub struct Templates {
    default: Arc<dyn Renderer>,
    overrides: HashMap<String, Arc<dyn Renderer>>,
}

impl Default for Templates {
    fn default() -> Self {
        Templates {
            default: Arc::new(JsonRenderer),
            overrides: HashMap::new(),
        }
    }
}

impl fmt::Debug for Templates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Templates")
            .field("overrides", &self.overrides.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Templates {
    pub fn set_default(&mut self, renderer: Arc<dyn Renderer>) {
        self.default = renderer;
    }

    pub fn set_override(&mut self, template: impl Into<String>, renderer: Arc<dyn Renderer>) {
        self.overrides.insert(template.into(), renderer);
    }

    pub fn render<T: Serialize>(&self, template: &str, data: &T) -> Result<Response, AdminError> {
        let data = serde_json::to_value(data).map_err(|e| AdminError::Render(e.to_string()))?;
        let renderer = self.overrides.get(template).unwrap_or(&self.default);
        renderer.render(template, data)
    }
}
