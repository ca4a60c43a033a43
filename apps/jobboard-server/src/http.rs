//! Router assembly: listing routes, `/health` and the HTTP middleware stack.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::{
    body::Body,
    http::{HeaderName, Request},
    response::Json,
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    map_response_body::MapResponseBodyLayer,
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::field::Empty;

use job_listings::Service;
use runtime::ServerConfig;

const REQUEST_BODY_LIMIT: usize = 1024 * 1024;

pub fn request_id_header() -> HeaderName {
    HeaderName::from_static("x-request-id")
}

#[derive(Clone, Default)]
pub struct MakeReqId;

impl MakeRequestId for MakeReqId {
    fn make_request_id<B>(&mut self, _req: &Request<B>) -> Option<RequestId> {
        let id = nanoid::nanoid!();
        Some(RequestId::new(id.parse().ok()?))
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Listing routes and `/health` behind request-id, trace, timeout, CORS and body limit layers.
/// A zero `timeout_sec` disables the timeout.
pub fn build_router(service: Arc<Service>, server: &ServerConfig) -> Router {
    let router = job_listings::api::rest::routes::register_routes(
        Router::new().route("/health", get(health)),
        service,
    );
    let router = if server.timeout_sec > 0 {
        router.layer(TimeoutLayer::new(Duration::from_secs(server.timeout_sec)))
    } else {
        router
    };

    let trace = TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
        let rid = req
            .headers()
            .get(request_id_header())
            .and_then(|v| v.to_str().ok())
            .unwrap_or("n/a");
        tracing::info_span!(
            "http_request",
            method = %req.method(),
            uri = %req.uri().path(),
            version = ?req.version(),
            request_id = %rid,
            status = Empty,
            latency_ms = Empty
        )
    });

    router.layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::new(request_id_header(), MakeReqId))
            .layer(PropagateRequestIdLayer::new(request_id_header()))
            .layer(trace)
            .layer(CorsLayer::permissive())
            .layer(MapResponseBodyLayer::new(Body::new))
            .layer(RequestBodyLimitLayer::new(REQUEST_BODY_LIMIT)),
    )
}

/// Bind and serve until ctrl-c / SIGTERM, then drain in-flight requests.
pub async fn serve(router: Router, server: &ServerConfig) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", server.host, server.port)
        .parse()
        .with_context(|| format!("Invalid bind address '{}:{}'", server.host, server.port))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("HTTP server bound on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "ctrl-c handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("HTTP server shutting down gracefully");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use job_listings::JobListingsConfig;
    use listing_db::{ConnectOpts, DbHandle};
    use tower::ServiceExt;

    async fn router() -> (DbHandle, Router) {
        let db = DbHandle::connect("sqlite::memory:", ConnectOpts::default())
            .await
            .unwrap();
        let svc = job_listings::build_service(db.sea(), &JobListingsConfig::default());
        let router = build_router(svc, &ServerConfig::default());
        (db, router)
    }

    #[tokio::test]
    async fn health_gets_a_generated_request_id() {
        let (_db, app) = router().await;
        let resp = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let rid = resp.headers().get("x-request-id").unwrap().to_str().unwrap();
        assert_eq!(rid.len(), 21);
    }

    #[tokio::test]
    async fn client_request_id_is_propagated_into_problems() {
        let (_db, app) = router().await;
        let req = Request::get("/jobs")
            .header("x-request-id", "abc-123")
            .header("x-owner-id", "0b9c4c5e-8f43-4e4e-9a59-6f1f1f0d1b11")
            .header("x-owner-role", "employer")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        // schema was never migrated
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(resp.headers().get("x-request-id").unwrap(), "abc-123");
    }
}
