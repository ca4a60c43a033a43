use axum::http::StatusCode;

use crate::api::rest::problem::{Problem, ProblemResponse};
use crate::domain::error::DomainError;

/// Helper to create a ProblemResponse with less boilerplate
pub fn from_parts(
    status: StatusCode,
    code: &str,
    title: &str,
    detail: impl Into<String>,
    instance: &str,
) -> ProblemResponse {
    let problem = Problem::new(status, title, detail)
        .with_type(format!("https://errors.example.com/{}", code))
        .with_code(code)
        .with_instance(instance);
    ProblemResponse(problem)
}

pub fn unauthorized(detail: impl Into<String>, instance: &str) -> ProblemResponse {
    from_parts(
        StatusCode::UNAUTHORIZED,
        "LISTING_UNAUTHENTICATED",
        "Unauthenticated",
        detail,
        instance,
    )
}

pub fn forbidden(detail: impl Into<String>, instance: &str) -> ProblemResponse {
    from_parts(
        StatusCode::FORBIDDEN,
        "LISTING_FORBIDDEN",
        "Forbidden",
        detail,
        instance,
    )
}

/// Map domain error to RFC9457 ProblemResponse.
/// Store details are logged, never sent to the client.
pub fn map_domain_error(e: &DomainError, instance: &str) -> ProblemResponse {
    match e {
        DomainError::NotProvisioned { listing, .. } => {
            tracing::error!(error = %e, "Listing storage not provisioned");
            from_parts(
                StatusCode::SERVICE_UNAVAILABLE,
                "LISTING_NOT_PROVISIONED",
                "Listing not provisioned",
                format!("The {listing} listing has not been set up yet"),
                instance,
            )
        }
        DomainError::StoreUnavailable { listing, .. } => {
            tracing::error!(error = %e, "Listing storage unavailable");
            from_parts(
                StatusCode::SERVICE_UNAVAILABLE,
                "LISTING_STORE_UNAVAILABLE",
                "Listing unavailable",
                format!("The {listing} listing is temporarily unavailable"),
                instance,
            )
        }
    }
}
