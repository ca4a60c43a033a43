//! SeaORM-backed repository implementation for the listings port.
//!
//! Generic over `C: ConnectionTrait`, so it can run on a `DatabaseConnection`
//! or inside a transaction. Descriptors are built once per repository.

use listing_core::{ListQuery, ListResult, Result};
use listing_db::{list_page, EntityDescriptor};
use sea_orm::ConnectionTrait;

use crate::contract::model::{JobSummary, OfferSummary, TransactionSummary};
use crate::domain::repo::ListingsRepository;
use crate::infra::storage::descriptors;
use crate::infra::storage::entity::{jobs, offers, transactions};
use crate::infra::storage::mapper::{JobRow, OfferRow, TransactionRow};

pub struct SeaOrmListingsRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    conn: C,
    jobs: EntityDescriptor<jobs::Entity>,
    transactions: EntityDescriptor<transactions::Entity>,
    offers: EntityDescriptor<offers::Entity>,
}

impl<C> SeaOrmListingsRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self {
            conn,
            jobs: descriptors::jobs(),
            transactions: descriptors::transactions(),
            offers: descriptors::offers(),
        }
    }
}

#[async_trait::async_trait]
impl<C> ListingsRepository for SeaOrmListingsRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn list_jobs(&self, query: &ListQuery) -> Result<ListResult<JobSummary>> {
        list_page(&self.conn, &self.jobs, query, |r: JobRow| r.into()).await
    }

    async fn list_transactions(&self, query: &ListQuery) -> Result<ListResult<TransactionSummary>> {
        list_page(&self.conn, &self.transactions, query, |r: TransactionRow| {
            r.into()
        })
        .await
    }

    async fn list_offers(&self, query: &ListQuery) -> Result<ListResult<OfferSummary>> {
        list_page(&self.conn, &self.offers, query, |r: OfferRow| r.into()).await
    }
}
