use async_trait::async_trait;
use listing_core::{ListQuery, ListResult, Result};

use crate::contract::model::{JobSummary, OfferSummary, TransactionSummary};

/// Storage port of the listings. Every call is scoped to `query.owner_id`.
#[async_trait]
pub trait ListingsRepository: Send + Sync {
    async fn list_jobs(&self, query: &ListQuery) -> Result<ListResult<JobSummary>>;

    async fn list_transactions(&self, query: &ListQuery)
        -> Result<ListResult<TransactionSummary>>;

    async fn list_offers(&self, query: &ListQuery) -> Result<ListResult<OfferSummary>>;
}
