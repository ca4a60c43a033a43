use std::collections::HashMap;
use std::sync::Arc;

use listing_core::{ListQuery, PageLimits};
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::config::JobListingsConfig;
use crate::contract::model::{JobPage, OfferPage, TransactionPage};
use crate::domain::error::DomainError;
use crate::domain::repo::ListingsRepository;

/// Domain service for the employer dashboard listings.
/// Depends only on the repository port, not on infra types.
#[derive(Clone)]
pub struct Service {
    repo: Arc<dyn ListingsRepository>,
    config: ServiceConfig,
}

/// Configuration for the domain service
#[derive(Debug, Clone, Default)]
pub struct ServiceConfig {
    pub limits: PageLimits,
}

impl From<&JobListingsConfig> for ServiceConfig {
    fn from(cfg: &JobListingsConfig) -> Self {
        Self {
            limits: cfg.limits(),
        }
    }
}

impl Service {
    pub fn new(repo: Arc<dyn ListingsRepository>, config: ServiceConfig) -> Self {
        Self { repo, config }
    }

    pub fn limits(&self) -> PageLimits {
        self.config.limits
    }

    /// Build a normalized query from raw request parameters for `owner_id`.
    pub fn query_from_params(&self, owner_id: Uuid, params: &HashMap<String, String>) -> ListQuery {
        ListQuery::from_params(owner_id, params, self.config.limits)
    }

    /// Queries from in-process callers may carry any page size.
    fn clamp(&self, mut query: ListQuery) -> ListQuery {
        query.page_size = self.config.limits.clamp(Some(query.page_size));
        query
    }

    #[instrument(
        name = "job_listings.service.list_jobs",
        skip(self, query),
        fields(owner_id = %query.owner_id, page = query.page, page_size = query.page_size)
    )]
    pub async fn list_jobs(&self, query: ListQuery) -> Result<JobPage, DomainError> {
        debug!("Listing jobs");
        let query = self.clamp(query);
        let page = self.repo.list_jobs(&query).await.map_err(|e| {
            warn!(error = %e, "job listing failed");
            DomainError::from_listing("jobs", e)
        })?;
        debug!(total = page.total_count, rows = page.rows.len(), "Listed jobs");
        Ok(page)
    }

    #[instrument(
        name = "job_listings.service.list_transactions",
        skip(self, query),
        fields(owner_id = %query.owner_id, page = query.page, page_size = query.page_size)
    )]
    pub async fn list_transactions(&self, query: ListQuery) -> Result<TransactionPage, DomainError> {
        debug!("Listing transactions");
        let query = self.clamp(query);
        let page = self.repo.list_transactions(&query).await.map_err(|e| {
            warn!(error = %e, "transaction listing failed");
            DomainError::from_listing("transactions", e)
        })?;
        debug!(total = page.total_count, rows = page.rows.len(), "Listed transactions");
        Ok(page)
    }

    #[instrument(
        name = "job_listings.service.list_offers",
        skip(self, query),
        fields(owner_id = %query.owner_id, page = query.page, page_size = query.page_size)
    )]
    pub async fn list_offers(&self, query: ListQuery) -> Result<OfferPage, DomainError> {
        debug!("Listing offers");
        let query = self.clamp(query);
        let page = self.repo.list_offers(&query).await.map_err(|e| {
            warn!(error = %e, "offer listing failed");
            DomainError::from_listing("offers", e)
        })?;
        debug!(total = page.total_count, rows = page.rows.len(), "Listed offers");
        Ok(page)
    }
}
