use async_trait::async_trait;
use std::sync::Arc;

use crate::contract::{
    client::JobListingsApi,
    error::ListingsError,
    model::{JobPage, ListQuery, OfferPage, TransactionPage},
};
use crate::domain::service::Service;

/// Local implementation of the JobListingsApi trait that delegates to the domain service
pub struct JobListingsLocalClient {
    service: Arc<Service>,
}

impl JobListingsLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl JobListingsApi for JobListingsLocalClient {
    async fn list_jobs(&self, query: ListQuery) -> Result<JobPage, ListingsError> {
        self.service.list_jobs(query).await.map_err(Into::into)
    }

    async fn list_transactions(&self, query: ListQuery) -> Result<TransactionPage, ListingsError> {
        self.service
            .list_transactions(query)
            .await
            .map_err(Into::into)
    }

    async fn list_offers(&self, query: ListQuery) -> Result<OfferPage, ListingsError> {
        self.service.list_offers(query).await.map_err(Into::into)
    }
}
