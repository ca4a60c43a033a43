#![allow(dead_code)]
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use sea_orm::{DatabaseConnection, EntityTrait, IntoActiveModel};
use sea_orm_migration::MigratorTrait;
use uuid::Uuid;

use job_listings::contract::model::{JobSummary, OfferSummary, TransactionSummary};
use job_listings::domain::repo::ListingsRepository;
use job_listings::infra::storage::entity::{applications, jobs, offers, transactions};
use job_listings::infra::storage::migrations::Migrator;
use listing_core::{Error as ListingError, ListQuery, ListResult};
use listing_db::{ConnectOpts, DbHandle};

/// In-memory SQLite with the listing schema applied.
pub async fn migrated_db() -> Result<DbHandle> {
    let db = DbHandle::connect("sqlite::memory:", ConnectOpts::default()).await?;
    Migrator::up(&db.sea(), None).await?;
    Ok(db)
}

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

pub fn job(owner: Uuid, hours: i64, status: &str, title: &str) -> jobs::Model {
    jobs::Model {
        id: Uuid::new_v4(),
        owner_id: owner,
        title: title.to_string(),
        description: format!("{title} description"),
        location: "Remote".to_string(),
        status: status.to_string(),
        created_at: base_time() + Duration::hours(hours),
    }
}

pub fn application(job_id: Uuid, status: &str) -> applications::Model {
    applications::Model {
        id: Uuid::new_v4(),
        job_id,
        candidate_name: "Candidate".to_string(),
        status: status.to_string(),
        created_at: base_time(),
    }
}

pub fn transaction(owner: Uuid, hours: i64, kind: &str, status: &str, amount: i64) -> transactions::Model {
    transactions::Model {
        id: Uuid::new_v4(),
        owner_id: owner,
        kind: kind.to_string(),
        status: status.to_string(),
        amount_cents: amount,
        currency: "USD".to_string(),
        description: format!("{kind} {amount}"),
        reference: format!("REF-{hours:03}"),
        created_at: base_time() + Duration::hours(hours),
    }
}

pub fn offer(owner: Uuid, job_id: Uuid, hours: i64, candidate: &str, amount: i64) -> offers::Model {
    offers::Model {
        id: Uuid::new_v4(),
        owner_id: owner,
        job_id,
        candidate_name: candidate.to_string(),
        status: "pending".to_string(),
        amount_cents: amount,
        message: format!("Offer for {candidate}"),
        created_at: base_time() + Duration::hours(hours),
    }
}

pub async fn insert_jobs(conn: &DatabaseConnection, rows: Vec<jobs::Model>) -> Result<()> {
    if !rows.is_empty() {
        jobs::Entity::insert_many(rows.into_iter().map(IntoActiveModel::into_active_model))
            .exec(conn)
            .await?;
    }
    Ok(())
}

pub async fn insert_applications(
    conn: &DatabaseConnection,
    rows: Vec<applications::Model>,
) -> Result<()> {
    if !rows.is_empty() {
        applications::Entity::insert_many(rows.into_iter().map(IntoActiveModel::into_active_model))
            .exec(conn)
            .await?;
    }
    Ok(())
}

pub async fn insert_transactions(
    conn: &DatabaseConnection,
    rows: Vec<transactions::Model>,
) -> Result<()> {
    if !rows.is_empty() {
        transactions::Entity::insert_many(rows.into_iter().map(IntoActiveModel::into_active_model))
            .exec(conn)
            .await?;
    }
    Ok(())
}

pub async fn insert_offers(conn: &DatabaseConnection, rows: Vec<offers::Model>) -> Result<()> {
    if !rows.is_empty() {
        offers::Entity::insert_many(rows.into_iter().map(IntoActiveModel::into_active_model))
            .exec(conn)
            .await?;
    }
    Ok(())
}

/// Twelve jobs for `owner`: 3 active, 5 paused, 4 closed, one hour apart.
pub fn twelve_jobs(owner: Uuid) -> Vec<jobs::Model> {
    (0..12)
        .map(|n| {
            let status = match n {
                0..=2 => "active",
                3..=7 => "paused",
                _ => "closed",
            };
            job(owner, n, status, &format!("Job {n:02}"))
        })
        .collect()
}

/// Repository returning canned pages, or failing every call with `fail`.
#[derive(Clone, Default)]
pub struct MockListingsRepository {
    pub jobs: Vec<JobSummary>,
    pub fail: Option<ListingError>,
}

impl MockListingsRepository {
    pub fn with_jobs(jobs: Vec<JobSummary>) -> Arc<Self> {
        Arc::new(Self { jobs, fail: None })
    }

    pub fn failing(err: ListingError) -> Arc<Self> {
        Arc::new(Self {
            jobs: Vec::new(),
            fail: Some(err),
        })
    }

    fn check(&self) -> listing_core::Result<()> {
        match &self.fail {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ListingsRepository for MockListingsRepository {
    async fn list_jobs(&self, query: &ListQuery) -> listing_core::Result<ListResult<JobSummary>> {
        self.check()?;
        let rows: Vec<_> = self.jobs.iter().take(query.page_size as usize).cloned().collect();
        Ok(ListResult::new(rows, self.jobs.len() as u64, query.page, query.page_size))
    }

    async fn list_transactions(
        &self,
        query: &ListQuery,
    ) -> listing_core::Result<ListResult<TransactionSummary>> {
        self.check()?;
        Ok(ListResult::empty(query.page, query.page_size))
    }

    async fn list_offers(&self, query: &ListQuery) -> listing_core::Result<ListResult<OfferSummary>> {
        self.check()?;
        Ok(ListResult::empty(query.page, query.page_size))
    }
}

pub fn job_summary(title: &str) -> JobSummary {
    JobSummary {
        id: Uuid::new_v4(),
        title: title.to_string(),
        location: "Remote".to_string(),
        status: "active".to_string(),
        created_at: base_time(),
        application_count: 0,
    }
}
