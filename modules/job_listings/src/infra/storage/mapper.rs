//! Projections read by the page queries and their conversion into contract models.

use chrono::{DateTime, Utc};
use sea_orm::FromQueryResult;
use uuid::Uuid;

use crate::contract::model::{JobSummary, OfferSummary, TransactionSummary};

/// `jobs.*` plus the derived `application_count`.
#[derive(Debug, Clone, FromQueryResult)]
pub struct JobRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: String,
    pub location: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub application_count: i64,
}

impl From<JobRow> for JobSummary {
    fn from(r: JobRow) -> Self {
        Self {
            id: r.id,
            title: r.title,
            location: r.location,
            status: r.status,
            created_at: r.created_at,
            application_count: r.application_count,
        }
    }
}

#[derive(Debug, Clone, FromQueryResult)]
pub struct TransactionRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub kind: String,
    pub status: String,
    pub amount_cents: i64,
    pub currency: String,
    pub description: String,
    pub reference: String,
    pub created_at: DateTime<Utc>,
}

impl From<TransactionRow> for TransactionSummary {
    fn from(r: TransactionRow) -> Self {
        Self {
            id: r.id,
            kind: r.kind,
            status: r.status,
            amount_cents: r.amount_cents,
            currency: r.currency,
            description: r.description,
            reference: r.reference,
            created_at: r.created_at,
        }
    }
}

/// `offers.*` plus the joined posting title.
#[derive(Debug, Clone, FromQueryResult)]
pub struct OfferRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub job_id: Uuid,
    pub candidate_name: String,
    pub status: String,
    pub amount_cents: i64,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub job_title: Option<String>,
}

impl From<OfferRow> for OfferSummary {
    fn from(r: OfferRow) -> Self {
        Self {
            id: r.id,
            job_id: r.job_id,
            job_title: r.job_title,
            candidate_name: r.candidate_name,
            status: r.status,
            amount_cents: r.amount_cents,
            message: r.message,
            created_at: r.created_at,
        }
    }
}
