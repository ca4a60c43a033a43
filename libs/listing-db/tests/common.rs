#![allow(dead_code)]
use anyhow::Result;
use chrono::{DateTime, Duration, TimeZone, Utc};
use sea_orm::{
    ConnectionTrait, DatabaseConnection, EntityTrait, FromQueryResult, IntoActiveModel, Schema,
};
use uuid::Uuid;

use listing_db::{
    qualified, related_count, AggregateSpec, ConnectOpts, DbHandle, EntityDescriptor, FilterOp,
};
use listing_core::{OrderBy, OrderKey};

pub mod posting {
    use sea_orm::entity::prelude::*;

    #[derive(Debug, Clone, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "postings")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub owner_id: Uuid,
        pub status: String,
        pub title: String,
        pub amount_cents: i64,
        pub created_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod bid {
    use sea_orm::entity::prelude::*;

    #[derive(Debug, Clone, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "bids")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub posting_id: Uuid,
        pub status: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct PostingRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub status: String,
    pub title: String,
    pub amount_cents: i64,
    pub created_at: DateTime<Utc>,
    pub bid_count: i64,
}

pub const STATUSES: &[&str] = &["active", "paused", "closed"];
pub const BID_STATUSES: &[&str] = &["new", "rejected"];

pub fn descriptor() -> EntityDescriptor<posting::Entity> {
    use posting::Column;

    EntityDescriptor::new("postings", Column::OwnerId, Column::Id)
        .filter(
            "status",
            FilterOp::OneOf {
                col: Column::Status,
                allowed: STATUSES,
            },
        )
        .filter(
            "search",
            FilterOp::Search {
                exprs: vec![qualified(Column::Title)],
            },
        )
        .filter("from", FilterOp::OnOrAfter { col: Column::CreatedAt })
        .filter("to", FilterOp::OnOrBefore { col: Column::CreatedAt })
        .field("created_at", Column::CreatedAt)
        .field("amount", Column::AmountCents)
        .derived("bid_count", related_count("bids", "posting_id", Column::Id))
        .sort("newest", OrderBy(vec![OrderKey::desc("created_at")]))
        .sort("oldest", OrderBy(vec![OrderKey::asc("created_at")]))
        .sort("amount_high", OrderBy(vec![OrderKey::desc("amount")]))
        .sort("bids", OrderBy(vec![OrderKey::desc("bid_count")]))
        .default_sort("newest")
        .aggregate(AggregateSpec::CountBy {
            name: "status",
            col: Column::Status,
            buckets: STATUSES,
        })
        .aggregate(AggregateSpec::Sum {
            name: "amount_total",
            col: Column::AmountCents,
        })
        .aggregate(AggregateSpec::RelatedCountBy {
            name: "bids_by_status",
            table: "bids",
            fk: "posting_id",
            group: "status",
            buckets: BID_STATUSES,
        })
}

pub async fn connect() -> Result<DbHandle> {
    Ok(DbHandle::connect("sqlite::memory:", ConnectOpts::default()).await?)
}

pub async fn create_schema(conn: &DatabaseConnection) -> Result<()> {
    let backend = conn.get_database_backend();
    let schema = Schema::new(backend);
    conn.execute(backend.build(&schema.create_table_from_entity(posting::Entity)))
        .await?;
    conn.execute(backend.build(&schema.create_table_from_entity(bid::Entity)))
        .await?;
    Ok(())
}

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap()
}

pub fn new_posting(owner: Uuid, n: i64, status: &str, title: &str) -> posting::Model {
    posting::Model {
        id: Uuid::new_v4(),
        owner_id: owner,
        status: status.to_string(),
        title: title.to_string(),
        amount_cents: 100 * (n + 1),
        created_at: base_time() + Duration::hours(n),
    }
}

pub async fn insert_postings(conn: &DatabaseConnection, rows: Vec<posting::Model>) -> Result<()> {
    if rows.is_empty() {
        return Ok(());
    }
    posting::Entity::insert_many(rows.into_iter().map(IntoActiveModel::into_active_model))
        .exec(conn)
        .await?;
    Ok(())
}

pub async fn insert_bids(conn: &DatabaseConnection, posting_id: Uuid, statuses: &[&str]) -> Result<()> {
    if statuses.is_empty() {
        return Ok(());
    }
    let rows = statuses.iter().map(|s| {
        bid::Model {
            id: Uuid::new_v4(),
            posting_id,
            status: s.to_string(),
        }
        .into_active_model()
    });
    bid::Entity::insert_many(rows).exec(conn).await?;
    Ok(())
}

/// Twelve postings for `owner`: 3 active, 5 paused, 4 closed, one hour apart.
pub fn twelve_for(owner: Uuid) -> Vec<posting::Model> {
    (0..12)
        .map(|n| {
            let status = match n {
                0..=2 => "active",
                3..=7 => "paused",
                _ => "closed",
            };
            new_posting(owner, n, status, &format!("Posting {n:02}"))
        })
        .collect()
}
