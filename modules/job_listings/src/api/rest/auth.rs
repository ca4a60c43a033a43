//! Owner identity forwarded by the authenticating gateway.

use axum::extract::FromRequestParts;
use axum::http::{request::Parts, HeaderMap};
use uuid::Uuid;

use crate::api::rest::error::{forbidden, unauthorized};
use crate::api::rest::problem::ProblemResponse;

pub const OWNER_ID_HEADER: &str = "x-owner-id";
pub const OWNER_ROLE_HEADER: &str = "x-owner-role";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OwnerRole {
    Employer,
    Candidate,
    Admin,
}

impl OwnerRole {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "employer" => Some(Self::Employer),
            "candidate" => Some(Self::Candidate),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Employer => "employer",
            Self::Candidate => "candidate",
            Self::Admin => "admin",
        }
    }
}

/// Tenant every listing of the request is scoped to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AuthenticatedOwner {
    pub id: Uuid,
    pub role: OwnerRole,
}

impl AuthenticatedOwner {
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());
        let id = header(OWNER_ID_HEADER)?.trim().parse::<Uuid>().ok()?;
        let role = OwnerRole::parse(header(OWNER_ROLE_HEADER)?)?;
        Some(Self { id, role })
    }

    /// Jobs and offers belong to employers only.
    pub fn require_employer(&self, instance: &str) -> Result<(), ProblemResponse> {
        if self.role == OwnerRole::Employer {
            Ok(())
        } else {
            tracing::warn!(owner_id = %self.id, role = self.role.as_str(), "employer listing denied");
            Err(forbidden(
                "This listing is only available to employer accounts",
                instance,
            ))
        }
    }
}

impl<S> FromRequestParts<S> for AuthenticatedOwner
where
    S: Send + Sync,
{
    type Rejection = ProblemResponse;

    #[allow(clippy::manual_async_fn)]
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl core::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        async move {
            Self::from_headers(&parts.headers).ok_or_else(|| {
                tracing::debug!(path = parts.uri.path(), "missing or invalid owner identity");
                unauthorized("A valid owner identity is required", parts.uri.path())
            })
        }
    }
}
