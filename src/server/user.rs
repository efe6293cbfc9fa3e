//! Acting-user extraction.
//!
//! Authentication belongs to the host in front of this service; it forwards
//! the authenticated user id in the `X-User-Id` header.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use cineref_common::UserId;

pub const USER_HEADER: &str = "x-user-id";

/// The user a request acts for; `None` when the header is absent or blank.
#[derive(Debug, Clone, Default)]
pub struct ActingUser(pub Option<UserId>);

impl ActingUser {
    pub fn user(&self) -> Option<&UserId> {
        self.0.as_ref()
    }
}

#[axum::async_trait]
impl<S: Send + Sync> FromRequestParts<S> for ActingUser {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .headers
            .get(USER_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(UserId::new);
        Ok(Self(user))
    }
}
