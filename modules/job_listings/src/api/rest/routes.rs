use std::sync::Arc;

use axum::{routing::get, Extension, Router};

use crate::api::rest::handlers;
use crate::domain::service::Service;

pub const JOBS_PATH: &str = "/jobs";
pub const TRANSACTIONS_PATH: &str = "/transactions";
pub const OFFERS_PATH: &str = "/offers";

/// Mount the listing endpoints on `router` with `service` available to handlers.
pub fn register_routes(router: Router, service: Arc<Service>) -> Router {
    router
        .route(JOBS_PATH, get(handlers::list_jobs))
        .route(TRANSACTIONS_PATH, get(handlers::list_transactions))
        .route(OFFERS_PATH, get(handlers::list_offers))
        .layer(Extension(service))
}
