//! End-to-end listings over migrated in-memory SQLite

mod common;

use anyhow::Result;
use uuid::Uuid;

use common::{
    application, insert_applications, insert_jobs, insert_offers, insert_transactions, job,
    migrated_db, offer, transaction, twelve_jobs,
};
use job_listings::contract::model::{Aggregate, ListQuery};
use job_listings::domain::error::DomainError;
use job_listings::{build_service, JobListingsConfig};
use listing_db::{ConnectOpts, DbHandle};

#[tokio::test]
async fn jobs_paginate_filter_and_aggregate() -> Result<()> {
    let db = migrated_db().await?;
    let conn = db.sea();
    let owner = Uuid::new_v4();
    insert_jobs(&conn, twelve_jobs(owner)).await?;
    insert_jobs(&conn, twelve_jobs(Uuid::new_v4())).await?;
    let svc = build_service(conn, &JobListingsConfig::default());

    let page = svc
        .list_jobs(ListQuery::new(owner).with_page(2).with_page_size(10))
        .await?;
    assert_eq!(page.total_count, 12);
    assert_eq!(page.total_pages, 2);
    let titles: Vec<_> = page.rows.iter().map(|j| j.title.as_str()).collect();
    assert_eq!(titles, vec!["Job 01", "Job 00"]);

    let active = svc
        .list_jobs(ListQuery::new(owner).with_filter("status", "ACTIVE"))
        .await?;
    assert_eq!(active.total_count, 3);
    assert!(active.rows.iter().all(|j| j.status == "active"));

    let status = page.aggregate("status").and_then(Aggregate::counts).unwrap();
    assert_eq!(status["active"], 3);
    assert_eq!(status["paused"], 5);
    assert_eq!(status["closed"], 4);
    assert_eq!(status["draft"], 0);
    Ok(())
}

#[tokio::test]
async fn job_application_counts_drive_sort_and_breakdown() -> Result<()> {
    let db = migrated_db().await?;
    let conn = db.sea();
    let owner = Uuid::new_v4();
    let quiet = job(owner, 0, "active", "Quiet role");
    let popular = job(owner, 1, "active", "Popular role");
    let paused = job(owner, 2, "paused", "Paused role");
    let (popular_id, paused_id) = (popular.id, paused.id);
    insert_jobs(&conn, vec![quiet, popular, paused]).await?;
    insert_applications(
        &conn,
        vec![
            application(popular_id, "applied"),
            application(popular_id, "applied"),
            application(popular_id, "interview"),
            application(paused_id, "rejected"),
        ],
    )
    .await?;
    let svc = build_service(conn, &JobListingsConfig::default());

    let page = svc
        .list_jobs(ListQuery::new(owner).with_sort("applications"))
        .await?;
    let order: Vec<_> = page
        .rows
        .iter()
        .map(|j| (j.title.as_str(), j.application_count))
        .collect();
    assert_eq!(
        order,
        vec![("Popular role", 3), ("Paused role", 1), ("Quiet role", 0)]
    );

    let apps = page
        .aggregate("applications_by_status")
        .and_then(Aggregate::counts)
        .unwrap();
    assert_eq!(apps["applied"], 2);
    assert_eq!(apps["interview"], 1);
    assert_eq!(apps["rejected"], 1);
    assert_eq!(apps["hired"], 0);

    let active = svc
        .list_jobs(ListQuery::new(owner).with_filter("status", "active"))
        .await?;
    let apps = active
        .aggregate("applications_by_status")
        .and_then(Aggregate::counts)
        .unwrap();
    assert_eq!(apps["rejected"], 0);
    assert_eq!(apps["applied"], 2);
    Ok(())
}

#[tokio::test]
async fn transactions_filter_by_kind_and_status() -> Result<()> {
    let db = migrated_db().await?;
    let conn = db.sea();
    let owner = Uuid::new_v4();
    insert_transactions(
        &conn,
        vec![
            transaction(owner, 0, "payment", "completed", 5_000),
            transaction(owner, 1, "payment", "pending", 2_500),
            transaction(owner, 2, "refund", "completed", 1_000),
            transaction(owner, 3, "payout", "failed", 9_000),
            transaction(Uuid::new_v4(), 4, "payment", "completed", 77_000),
        ],
    )
    .await?;
    let svc = build_service(conn, &JobListingsConfig::default());

    let payments = svc
        .list_transactions(
            ListQuery::new(owner)
                .with_filter("kind", "payment")
                .with_filter("status", "completed"),
        )
        .await?;
    assert_eq!(payments.total_count, 1);
    assert_eq!(payments.rows[0].amount_cents, 5_000);

    let all = svc
        .list_transactions(ListQuery::new(owner).with_sort("amount_high"))
        .await?;
    let amounts: Vec<_> = all.rows.iter().map(|t| t.amount_cents).collect();
    assert_eq!(amounts, vec![9_000, 5_000, 2_500, 1_000]);
    assert_eq!(
        all.aggregate("amount_total").and_then(Aggregate::sum),
        Some(17_500)
    );
    let kinds = all.aggregate("kind").and_then(Aggregate::counts).unwrap();
    assert_eq!(kinds["payment"], 2);
    assert_eq!(kinds["refund"], 1);
    assert_eq!(kinds["payout"], 1);

    let by_ref = svc
        .list_transactions(ListQuery::new(owner).with_filter("search", "ref-002"))
        .await?;
    assert_eq!(by_ref.total_count, 1);
    assert_eq!(by_ref.rows[0].kind, "refund");
    Ok(())
}

#[tokio::test]
async fn offers_search_joined_job_title_and_filter_by_job() -> Result<()> {
    let db = migrated_db().await?;
    let conn = db.sea();
    let owner = Uuid::new_v4();
    let rust = job(owner, 0, "active", "Rust engineer");
    let design = job(owner, 1, "active", "Product designer");
    let (rust_id, design_id) = (rust.id, design.id);
    insert_jobs(&conn, vec![rust, design]).await?;
    insert_offers(
        &conn,
        vec![
            offer(owner, rust_id, 0, "Zoe", 120_000),
            offer(owner, rust_id, 1, "Adam", 110_000),
            offer(owner, design_id, 2, "Mia", 90_000),
        ],
    )
    .await?;
    let svc = build_service(conn, &JobListingsConfig::default());

    let rust_offers = svc
        .list_offers(
            ListQuery::new(owner)
                .with_filter("search", "RUST")
                .with_sort("candidate"),
        )
        .await?;
    let names: Vec<_> = rust_offers
        .rows
        .iter()
        .map(|o| o.candidate_name.as_str())
        .collect();
    assert_eq!(names, vec!["Adam", "Zoe"]);
    assert!(rust_offers
        .rows
        .iter()
        .all(|o| o.job_title.as_deref() == Some("Rust engineer")));
    assert_eq!(
        rust_offers.aggregate("amount_total").and_then(Aggregate::sum),
        Some(230_000)
    );

    let design_offers = svc
        .list_offers(ListQuery::new(owner).with_filter("job_id", design_id.to_string()))
        .await?;
    assert_eq!(design_offers.total_count, 1);
    assert_eq!(design_offers.rows[0].candidate_name, "Mia");

    let other = svc.list_offers(ListQuery::new(Uuid::new_v4())).await?;
    assert_eq!(other.total_count, 0);
    Ok(())
}

#[tokio::test]
async fn title_and_candidate_sorts_order_rows() -> Result<()> {
    let db = migrated_db().await?;
    let conn = db.sea();
    let owner = Uuid::new_v4();
    let backend = job(owner, 0, "active", "Backend developer");
    let backend_id = backend.id;
    insert_jobs(
        &conn,
        vec![
            backend,
            job(owner, 1, "active", "Analyst"),
            job(owner, 2, "paused", "Courier"),
        ],
    )
    .await?;
    insert_offers(
        &conn,
        vec![
            offer(owner, backend_id, 0, "Bea", 100),
            offer(owner, backend_id, 1, "Cal", 300),
            offer(owner, backend_id, 2, "Bea", 200),
            offer(owner, backend_id, 3, "Abe", 400),
        ],
    )
    .await?;
    let svc = build_service(conn, &JobListingsConfig::default());

    let newest = svc.list_jobs(ListQuery::new(owner)).await?;
    let titles: Vec<_> = newest.rows.iter().map(|j| j.title.as_str()).collect();
    assert_eq!(titles, vec!["Courier", "Analyst", "Backend developer"]);

    let by_title = svc.list_jobs(ListQuery::new(owner).with_sort("title")).await?;
    let titles: Vec<_> = by_title.rows.iter().map(|j| j.title.as_str()).collect();
    assert_eq!(titles, vec!["Analyst", "Backend developer", "Courier"]);

    // same candidate: newer offer first
    let by_candidate = svc
        .list_offers(ListQuery::new(owner).with_sort("candidate"))
        .await?;
    let rows: Vec<_> = by_candidate
        .rows
        .iter()
        .map(|o| (o.candidate_name.as_str(), o.amount_cents))
        .collect();
    assert_eq!(
        rows,
        vec![("Abe", 400), ("Bea", 200), ("Bea", 100), ("Cal", 300)]
    );
    Ok(())
}

#[tokio::test]
async fn unmigrated_store_is_not_provisioned() -> Result<()> {
    let db = DbHandle::connect("sqlite::memory:", ConnectOpts::default()).await?;
    let svc = build_service(db.sea(), &JobListingsConfig::default());

    let err = svc
        .list_jobs(ListQuery::new(Uuid::new_v4()))
        .await
        .unwrap_err();
    assert!(
        matches!(err, DomainError::NotProvisioned { listing: "jobs", .. }),
        "{err:?}"
    );
    Ok(())
}
