//! Permission gate: infer the CRUD action from the request, resolve the caller's identity,
//! and consult the authorization predicate before any handler runs.

use crate::error::AdminError;
use crate::state::AppState;
use axum::{
    extract::{Path, Request, State},
    http::{header, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Read,
    Create,
    Update,
    Delete,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Read => "read",
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolves the caller's identity from the request. `None` or empty means unauthenticated.
pub type IdentityFn = Arc<dyn Fn(&Request) -> Option<String> + Send + Sync>;

/// `(identity, entity, action) -> allowed`.
pub type Authorizer = Arc<dyn Fn(&str, &str, Action) -> bool + Send + Sync>;

/// A final path segment of `delete` wins over the method; otherwise POST with an id is an
/// update and without one a create.
pub fn resolve_action(method: &Method, path: &str, has_id: bool) -> Action {
    let last = path.trim_end_matches('/').rsplit('/').next().unwrap_or("");
    if last == "delete" {
        return Action::Delete;
    }
    match *method {
        Method::POST if has_id => Action::Update,
        Method::POST => Action::Create,
        Method::PUT | Method::PATCH => Action::Update,
        Method::DELETE => Action::Delete,
        _ => Action::Read,
    }
}

/// Identity extracted by the gate, stored in request extensions for handlers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthIdentity(pub String);

#[derive(Debug, PartialEq)]
pub enum Decision {
    /// Proceed; carries the identity when one was resolved.
    Allow(Option<String>),
    /// No identity: send the caller to the login page.
    Login,
    Deny { entity: String, action: Action },
}

#[derive(Clone, Default)]
pub struct AccessPolicy {
    identity: Option<IdentityFn>,
    authorizer: Option<Authorizer>,
}

impl fmt::Debug for AccessPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessPolicy")
            .field("identity", &self.identity.is_some())
            .field("authorizer", &self.authorizer.is_some())
            .finish()
    }
}

impl AccessPolicy {
    pub fn new(identity: Option<IdentityFn>, authorizer: Option<Authorizer>) -> Self {
        AccessPolicy { identity, authorizer }
    }

    /// Without an identity function everything is allowed. Requests that name no entity
    /// only need an identity.
    pub fn decide(&self, request: &Request, entity: Option<&str>, action: Action) -> Decision {
        let Some(identify) = &self.identity else {
            return Decision::Allow(None);
        };
        let identity = match identify(request) {
            Some(id) if !id.trim().is_empty() => id,
            _ => return Decision::Login,
        };
        if let (Some(entity), Some(allowed)) = (entity, &self.authorizer) {
            if !allowed(&identity, entity, action) {
                return Decision::Deny {
                    entity: entity.to_string(),
                    action,
                };
            }
        }
        Decision::Allow(Some(identity))
    }
}

/// axum middleware applied to every admin route. The wrapped handler is not called unless
/// the decision is `Allow`.
pub async fn check_permission(
    State(state): State<AppState>,
    params: Option<Path<HashMap<String, String>>>,
    mut request: Request,
    next: Next,
) -> Response {
    let params = params.map(|Path(p)| p).unwrap_or_default();
    let entity = params.get("entity").map(String::as_str);
    let action = resolve_action(request.method(), request.uri().path(), params.contains_key("id"));
    match state.admin.policy().decide(&request, entity, action) {
        Decision::Allow(identity) => {
            if let Some(id) = identity {
                request.extensions_mut().insert(AuthIdentity(id));
            }
            next.run(request).await
        }
        Decision::Login => {
            let location = format!("{}/login", state.admin.base_url());
            tracing::debug!(path = %request.uri().path(), "no identity, redirecting to login");
            found(&location)
        }
        Decision::Deny { entity, action } => {
            tracing::warn!(entity = %entity, action = %action, "permission denied");
            AdminError::PermissionDenied {
                entity,
                action: action.to_string(),
            }
            .into_response()
        }
    }
}

/// 302 Found with a Location header.
pub fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request() -> Request {
        Request::builder().uri("/admin/entity/users").body(Body::empty()).unwrap()
    }

    #[test]
    fn action_resolution() {
        assert_eq!(resolve_action(&Method::GET, "/admin/entity/users/7/delete", true), Action::Delete);
        assert_eq!(resolve_action(&Method::POST, "/admin/entity/users/7", true), Action::Update);
        assert_eq!(resolve_action(&Method::POST, "/admin/entity/users/new", false), Action::Create);
        assert_eq!(resolve_action(&Method::GET, "/admin/entity/users/7", true), Action::Read);
        assert_eq!(resolve_action(&Method::GET, "/admin/entity/users", false), Action::Read);
        assert_eq!(resolve_action(&Method::PATCH, "/admin/entity/users/7", true), Action::Update);
        assert_eq!(resolve_action(&Method::DELETE, "/admin/entity/users/7", true), Action::Delete);
    }

    #[test]
    fn delete_only_matches_whole_final_segment() {
        assert_eq!(resolve_action(&Method::GET, "/admin/entity/deleted_items", false), Action::Read);
        assert_eq!(resolve_action(&Method::GET, "/admin/entity/users/7/delete/", true), Action::Delete);
    }

    #[test]
    fn no_identity_function_allows_everything() {
        let policy = AccessPolicy::new(None, Some(Arc::new(|_: &str, _: &str, _: Action| false)));
        assert_eq!(policy.decide(&request(), Some("users"), Action::Delete), Decision::Allow(None));
    }

    #[test]
    fn empty_identity_goes_to_login() {
        let policy = AccessPolicy::new(Some(Arc::new(|_: &Request| Some(" ".to_string()))), None);
        assert_eq!(policy.decide(&request(), None, Action::Read), Decision::Login);
        let policy = AccessPolicy::new(Some(Arc::new(|_: &Request| None)), None);
        assert_eq!(policy.decide(&request(), Some("users"), Action::Read), Decision::Login);
    }

    #[test]
    fn predicate_receives_identity_entity_and_action() {
        let policy = AccessPolicy::new(
            Some(Arc::new(|_: &Request| Some("alice".to_string()))),
            Some(Arc::new(|who: &str, entity: &str, action: Action| {
                who == "alice" && entity == "users" && action != Action::Delete
            })),
        );
        assert_eq!(
            policy.decide(&request(), Some("users"), Action::Update),
            Decision::Allow(Some("alice".into()))
        );
        assert_eq!(
            policy.decide(&request(), Some("users"), Action::Delete),
            Decision::Deny {
                entity: "users".into(),
                action: Action::Delete
            }
        );
        // dashboard: identity only
        assert_eq!(
            policy.decide(&request(), None, Action::Delete),
            Decision::Allow(Some("alice".into()))
        );
    }
}
