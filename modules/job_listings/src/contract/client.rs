use async_trait::async_trait;

use crate::contract::{
    error::ListingsError,
    model::{JobPage, ListQuery, OfferPage, TransactionPage},
};

/// Public API trait for the job_listings module that other modules can use.
///
/// `query.owner_id` must already be the authenticated owner; the page size is
/// re-clamped to the module's configured maximum.
#[async_trait]
pub trait JobListingsApi: Send + Sync {
    /// Employer's job postings
    async fn list_jobs(&self, query: ListQuery) -> Result<JobPage, ListingsError>;

    /// Owner's payment history
    async fn list_transactions(&self, query: ListQuery) -> Result<TransactionPage, ListingsError>;

    /// Offers the employer has sent
    async fn list_offers(&self, query: ListQuery) -> Result<OfferPage, ListingsError>;
}
