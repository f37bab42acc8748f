use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde_json::json;
use smartpack::advisor::PackagingAdvisor;
use smartpack::auth::SessionAuthenticator;
use smartpack::router::api_router;
use smartpack::service::PackagingService;
use smartpack::store::PackagingStore;
use std::sync::atomic::Ordering;
use std::sync::Arc;

/// The `/api/*` surface plus the operational probes.
pub(crate) fn with_api_routes<S, A>(
    service: Arc<PackagingService<S, A>>,
    sessions: Arc<dyn SessionAuthenticator>,
) -> Router
where
    S: PackagingStore + 'static,
    A: PackagingAdvisor + 'static,
{
    api_router(service, sessions)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    if state.readiness.load(Ordering::Relaxed) {
        (StatusCode::OK, Json(json!({ "status": "ready" })))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "initializing" })),
        )
    }
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
