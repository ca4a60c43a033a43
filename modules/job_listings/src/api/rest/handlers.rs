use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::Query,
    http::{HeaderMap, Uri},
    response::Json,
    Extension,
};
use tracing::{error, info};

use crate::api::rest::auth::AuthenticatedOwner;
use crate::api::rest::dto::{self, JobListDto, OfferListDto, TransactionListDto};
use crate::api::rest::error::map_domain_error;
use crate::api::rest::problem::ProblemResponse;
use crate::domain::service::Service;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

fn request_id(headers: &HeaderMap) -> Option<&str> {
    headers.get(REQUEST_ID_HEADER).and_then(|v| v.to_str().ok())
}

/// Employer's job postings
pub async fn list_jobs(
    Extension(svc): Extension<Arc<Service>>,
    owner: AuthenticatedOwner,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
    uri: Uri,
) -> Result<Json<JobListDto>, ProblemResponse> {
    let rid = request_id(&headers);
    owner
        .require_employer(uri.path())
        .map_err(|p| p.with_request_id(rid))?;
    let query = svc.query_from_params(owner.id, &params);
    info!(owner_id = %owner.id, ?query, "Listing jobs");

    match svc.list_jobs(query).await {
        Ok(page) => Ok(Json(dto::job_list(page))),
        Err(e) => {
            error!("Failed to list jobs: {}", e);
            Err(map_domain_error(&e, uri.path()).with_request_id(rid))
        }
    }
}

/// Owner's payment history; any authenticated role.
pub async fn list_transactions(
    Extension(svc): Extension<Arc<Service>>,
    owner: AuthenticatedOwner,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
    uri: Uri,
) -> Result<Json<TransactionListDto>, ProblemResponse> {
    let query = svc.query_from_params(owner.id, &params);
    info!(owner_id = %owner.id, ?query, "Listing transactions");

    match svc.list_transactions(query).await {
        Ok(page) => Ok(Json(dto::transaction_list(page))),
        Err(e) => {
            error!("Failed to list transactions: {}", e);
            Err(map_domain_error(&e, uri.path()).with_request_id(request_id(&headers)))
        }
    }
}

/// Offers the employer has sent
pub async fn list_offers(
    Extension(svc): Extension<Arc<Service>>,
    owner: AuthenticatedOwner,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
    uri: Uri,
) -> Result<Json<OfferListDto>, ProblemResponse> {
    let rid = request_id(&headers);
    owner
        .require_employer(uri.path())
        .map_err(|p| p.with_request_id(rid))?;
    let query = svc.query_from_params(owner.id, &params);
    info!(owner_id = %owner.id, ?query, "Listing offers");

    match svc.list_offers(query).await {
        Ok(page) => Ok(Json(dto::offer_list(page))),
        Err(e) => {
            error!("Failed to list offers: {}", e);
            Err(map_domain_error(&e, uri.path()).with_request_id(rid))
        }
    }
}
