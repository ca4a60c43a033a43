use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::contract::model::{
    JobPage, ListResult, OfferPage, OfferSummary, JobSummary, TransactionPage, TransactionSummary,
};

/// REST DTO for a job posting row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobDto {
    pub id: Uuid,
    pub title: String,
    pub location: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub application_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionDto {
    pub id: Uuid,
    pub kind: String,
    pub status: String,
    pub amount_cents: i64,
    pub currency: String,
    pub description: String,
    pub reference: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfferDto {
    pub id: Uuid,
    pub job_id: Uuid,
    pub job_title: Option<String>,
    pub candidate_name: String,
    pub status: String,
    pub amount_cents: i64,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Page body: `rows`, `total_count`, `page`, `page_size`, `total_pages`, `aggregates`.
pub type JobListDto = ListResult<JobDto>;
pub type TransactionListDto = ListResult<TransactionDto>;
pub type OfferListDto = ListResult<OfferDto>;

// Conversion implementations between contract models and REST DTOs

impl From<JobSummary> for JobDto {
    fn from(j: JobSummary) -> Self {
        Self {
            id: j.id,
            title: j.title,
            location: j.location,
            status: j.status,
            created_at: j.created_at,
            application_count: j.application_count,
        }
    }
}

impl From<TransactionSummary> for TransactionDto {
    fn from(t: TransactionSummary) -> Self {
        Self {
            id: t.id,
            kind: t.kind,
            status: t.status,
            amount_cents: t.amount_cents,
            currency: t.currency,
            description: t.description,
            reference: t.reference,
            created_at: t.created_at,
        }
    }
}

impl From<OfferSummary> for OfferDto {
    fn from(o: OfferSummary) -> Self {
        Self {
            id: o.id,
            job_id: o.job_id,
            job_title: o.job_title,
            candidate_name: o.candidate_name,
            status: o.status,
            amount_cents: o.amount_cents,
            message: o.message,
            created_at: o.created_at,
        }
    }
}

pub fn job_list(page: JobPage) -> JobListDto {
    page.map_rows(JobDto::from)
}

pub fn transaction_list(page: TransactionPage) -> TransactionListDto {
    page.map_rows(TransactionDto::from)
}

pub fn offer_list(page: OfferPage) -> OfferListDto {
    page.map_rows(OfferDto::from)
}
