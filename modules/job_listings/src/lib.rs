//! Employer dashboard listings: job postings, payment transactions and private offers.
//!
//! Layout:
//! - `contract`: in-process API (models, client trait, errors), no serde
//! - `domain`: service and repository port
//! - `infra::storage`: SeaORM entities, listing descriptors, repository, migrations
//! - `api::rest`: JSON endpoints, owner extraction and Problem responses
//! - `gateways`: local client for the contract

pub mod api;
pub mod config;
pub mod contract;
pub mod domain;
pub mod gateways;
pub mod infra;

use std::sync::Arc;

use sea_orm::DatabaseConnection;

pub use config::JobListingsConfig;
pub use contract::client::JobListingsApi;
pub use domain::service::{Service, ServiceConfig};

/// Wire the SeaORM repository and the domain service for a connection.
pub fn build_service(conn: DatabaseConnection, config: &JobListingsConfig) -> Arc<Service> {
    let repo = Arc::new(infra::storage::sea_orm_repo::SeaOrmListingsRepository::new(conn));
    Arc::new(Service::new(repo, ServiceConfig::from(config)))
}
