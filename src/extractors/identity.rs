//! Identity resolved by the permission gate.

use crate::permission::AuthIdentity;
use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};

/// The caller's identity, or `None` when no identity function is configured.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity(pub Option<String>);

#[async_trait]
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .extensions
            .get::<AuthIdentity>()
            .map(|AuthIdentity(id)| id.clone());
        Ok(Identity(value))
    }
}
