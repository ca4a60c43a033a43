//! What each dashboard listing may filter, sort and aggregate on.

use listing_core::{OrderBy, OrderKey};
use listing_db::{qualified, related_count, AggregateSpec, EntityDescriptor, FieldKind, FilterOp};
use sea_orm::RelationTrait;

use super::entity::{jobs, offers, transactions};
use crate::contract::model::{
    APPLICATION_STATUSES, JOB_STATUSES, OFFER_STATUSES, TRANSACTION_KINDS, TRANSACTION_STATUSES,
};

pub const JOB_SORTS: &[&str] = &["newest", "oldest", "applications", "title"];
pub const TRANSACTION_SORTS: &[&str] = &["newest", "oldest", "amount_high", "amount_low"];
pub const OFFER_SORTS: &[&str] = &["newest", "oldest", "amount_high", "amount_low", "candidate"];

fn newest() -> OrderBy {
    OrderBy(vec![OrderKey::desc("created_at")])
}

fn oldest() -> OrderBy {
    OrderBy(vec![OrderKey::asc("created_at")])
}

pub fn jobs() -> EntityDescriptor<jobs::Entity> {
    use jobs::Column;

    EntityDescriptor::new("jobs", Column::OwnerId, Column::Id)
        .filter(
            "status",
            FilterOp::OneOf {
                col: Column::Status,
                allowed: JOB_STATUSES,
            },
        )
        .filter(
            "search",
            FilterOp::Search {
                exprs: vec![
                    qualified(Column::Title),
                    qualified(Column::Description),
                    qualified(Column::Location),
                ],
            },
        )
        .filter("posted_from", FilterOp::OnOrAfter { col: Column::CreatedAt })
        .filter("posted_to", FilterOp::OnOrBefore { col: Column::CreatedAt })
        .field("created_at", Column::CreatedAt)
        .field("title", Column::Title)
        .derived(
            "application_count",
            related_count("applications", "job_id", Column::Id),
        )
        .sort("newest", newest())
        .sort("oldest", oldest())
        .sort(
            "applications",
            OrderBy(vec![
                OrderKey::desc("application_count"),
                OrderKey::desc("created_at"),
            ]),
        )
        .sort("title", OrderBy(vec![OrderKey::asc("title")]))
        .default_sort("newest")
        .aggregate(AggregateSpec::CountBy {
            name: "status",
            col: Column::Status,
            buckets: JOB_STATUSES,
        })
        .aggregate(AggregateSpec::RelatedCountBy {
            name: "applications_by_status",
            table: "applications",
            fk: "job_id",
            group: "status",
            buckets: APPLICATION_STATUSES,
        })
}

pub fn transactions() -> EntityDescriptor<transactions::Entity> {
    use transactions::Column;

    EntityDescriptor::new("transactions", Column::OwnerId, Column::Id)
        .filter(
            "status",
            FilterOp::OneOf {
                col: Column::Status,
                allowed: TRANSACTION_STATUSES,
            },
        )
        .filter(
            "kind",
            FilterOp::OneOf {
                col: Column::Kind,
                allowed: TRANSACTION_KINDS,
            },
        )
        .filter(
            "search",
            FilterOp::Search {
                exprs: vec![qualified(Column::Description), qualified(Column::Reference)],
            },
        )
        .filter("date_from", FilterOp::OnOrAfter { col: Column::CreatedAt })
        .filter("date_to", FilterOp::OnOrBefore { col: Column::CreatedAt })
        .field("created_at", Column::CreatedAt)
        .field("amount", Column::AmountCents)
        .sort("newest", newest())
        .sort("oldest", oldest())
        .sort(
            "amount_high",
            OrderBy(vec![OrderKey::desc("amount"), OrderKey::desc("created_at")]),
        )
        .sort(
            "amount_low",
            OrderBy(vec![OrderKey::asc("amount"), OrderKey::desc("created_at")]),
        )
        .default_sort("newest")
        .aggregate(AggregateSpec::CountBy {
            name: "status",
            col: Column::Status,
            buckets: TRANSACTION_STATUSES,
        })
        .aggregate(AggregateSpec::CountBy {
            name: "kind",
            col: Column::Kind,
            buckets: TRANSACTION_KINDS,
        })
        .aggregate(AggregateSpec::Sum {
            name: "amount_total",
            col: Column::AmountCents,
        })
}

pub fn offers() -> EntityDescriptor<offers::Entity> {
    use offers::Column;

    EntityDescriptor::new("offers", Column::OwnerId, Column::Id)
        .join(|| offers::Relation::Job.def())
        .filter(
            "status",
            FilterOp::OneOf {
                col: Column::Status,
                allowed: OFFER_STATUSES,
            },
        )
        .filter(
            "job_id",
            FilterOp::Exact {
                col: Column::JobId,
                kind: FieldKind::Uuid,
            },
        )
        .filter(
            "search",
            FilterOp::Search {
                exprs: vec![
                    qualified(jobs::Column::Title),
                    qualified(Column::CandidateName),
                    qualified(Column::Message),
                ],
            },
        )
        .filter("date_from", FilterOp::OnOrAfter { col: Column::CreatedAt })
        .filter("date_to", FilterOp::OnOrBefore { col: Column::CreatedAt })
        .field("created_at", Column::CreatedAt)
        .field("amount", Column::AmountCents)
        .field("candidate", Column::CandidateName)
        .derived("job_title", qualified(jobs::Column::Title))
        .sort("newest", newest())
        .sort("oldest", oldest())
        .sort(
            "amount_high",
            OrderBy(vec![OrderKey::desc("amount"), OrderKey::desc("created_at")]),
        )
        .sort(
            "amount_low",
            OrderBy(vec![OrderKey::asc("amount"), OrderKey::desc("created_at")]),
        )
        .sort(
            "candidate",
            OrderBy(vec![OrderKey::asc("candidate"), OrderKey::desc("created_at")]),
        )
        .default_sort("newest")
        .aggregate(AggregateSpec::CountBy {
            name: "status",
            col: Column::Status,
            buckets: OFFER_STATUSES,
        })
        .aggregate(AggregateSpec::Sum {
            name: "amount_total",
            col: Column::AmountCents,
        })
}
