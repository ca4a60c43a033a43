use chrono::{DateTime, Utc};
use uuid::Uuid;

pub use listing_core::{Aggregate, ListQuery, ListResult};

pub const JOB_STATUSES: &[&str] = &["active", "paused", "closed", "draft"];
pub const APPLICATION_STATUSES: &[&str] =
    &["applied", "reviewing", "interview", "offered", "rejected", "hired"];
pub const TRANSACTION_STATUSES: &[&str] = &["pending", "completed", "failed", "refunded"];
pub const TRANSACTION_KINDS: &[&str] = &["payment", "refund", "payout"];
pub const OFFER_STATUSES: &[&str] = &["pending", "accepted", "declined", "withdrawn", "expired"];

/// Job posting row of the employer's job list (no serde)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSummary {
    pub id: Uuid,
    pub title: String,
    pub location: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    /// All applications ever received for the posting.
    pub application_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionSummary {
    pub id: Uuid,
    pub kind: String,
    pub status: String,
    pub amount_cents: i64,
    pub currency: String,
    pub description: String,
    pub reference: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfferSummary {
    pub id: Uuid,
    pub job_id: Uuid,
    /// `None` when the posting no longer exists.
    pub job_title: Option<String>,
    pub candidate_name: String,
    pub status: String,
    pub amount_cents: i64,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

pub type JobPage = ListResult<JobSummary>;
pub type TransactionPage = ListResult<TransactionSummary>;
pub type OfferPage = ListResult<OfferSummary>;
