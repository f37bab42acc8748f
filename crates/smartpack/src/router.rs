use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use crate::advisor::PackagingAdvisor;
use crate::auth::{authenticate, SessionAuthenticator};
use crate::catalog::NewProduct;
use crate::dashboard::recent_limit;
use crate::domain::{ProductId, ReportId, UserId};
use crate::error::AppError;
use crate::reports::ReportRequest;
use crate::service::{PackagingService, ServiceError, UploadRequest};
use crate::store::PackagingStore;

/// Shared handler state: the service plus the session resolver.
pub struct ApiState<S, A> {
    pub service: Arc<PackagingService<S, A>>,
    pub sessions: Arc<dyn SessionAuthenticator>,
}

impl<S, A> Clone for ApiState<S, A> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            sessions: Arc::clone(&self.sessions),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OptimizeRequest {
    pub(crate) product_ids: Option<Vec<ProductId>>,
}

impl OptimizeRequest {
    /// An explicit empty list is allowed; only a missing list is rejected.
    fn into_product_ids(self) -> Result<Vec<ProductId>, ServiceError> {
        self.product_ids
            .ok_or_else(|| ServiceError::Validation("Product IDs are required".to_string()))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ExportRequest {
    pub(crate) report_id: ReportId,
    pub(crate) format: String,
}

/// Router exposing the `/api/*` endpoints.
pub fn api_router<S, A>(
    service: Arc<PackagingService<S, A>>,
    sessions: Arc<dyn SessionAuthenticator>,
) -> Router
where
    S: PackagingStore + 'static,
    A: PackagingAdvisor + 'static,
{
    Router::new()
        .route(
            "/api/products",
            get(list_products_handler::<S, A>).post(create_product_handler::<S, A>),
        )
        .route("/api/uploads", post(upload_handler::<S, A>))
        .route("/api/optimize", post(optimize_handler::<S, A>))
        .route("/api/ai-optimize", post(ai_optimize_handler::<S, A>))
        .route("/api/optimizations", get(recent_optimizations_handler::<S, A>))
        .route("/api/dashboard/stats", get(dashboard_stats_handler::<S, A>))
        .route("/api/reports/generate", post(generate_report_handler::<S, A>))
        .route("/api/reports/export", post(export_report_handler::<S, A>))
        .with_state(ApiState { service, sessions })
}

fn session_user<S, A>(state: &ApiState<S, A>, headers: &HeaderMap) -> Result<UserId, AppError> {
    Ok(authenticate(state.sessions.as_ref(), headers)?)
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ServiceError::Validation(rejection.body_text()).into())
}

pub(crate) async fn list_products_handler<S, A>(
    State(state): State<ApiState<S, A>>,
    headers: HeaderMap,
) -> Result<Response, AppError>
where
    S: PackagingStore + 'static,
    A: PackagingAdvisor + 'static,
{
    let user = session_user(&state, &headers)?;
    let products = state.service.list_products(&user)?;
    Ok(Json(json!({ "products": products })).into_response())
}

pub(crate) async fn create_product_handler<S, A>(
    State(state): State<ApiState<S, A>>,
    headers: HeaderMap,
    payload: Result<Json<NewProduct>, JsonRejection>,
) -> Result<Response, AppError>
where
    S: PackagingStore + 'static,
    A: PackagingAdvisor + 'static,
{
    let user = session_user(&state, &headers)?;
    let product = state.service.create_product(&user, json_body(payload)?)?;
    Ok(Json(json!({ "product": product })).into_response())
}

pub(crate) async fn upload_handler<S, A>(
    State(state): State<ApiState<S, A>>,
    headers: HeaderMap,
    payload: Result<Json<UploadRequest>, JsonRejection>,
) -> Result<Response, AppError>
where
    S: PackagingStore + 'static,
    A: PackagingAdvisor + 'static,
{
    let user = session_user(&state, &headers)?;
    let outcome = state.service.import_upload(&user, json_body(payload)?)?;
    Ok(Json(outcome).into_response())
}

pub(crate) async fn optimize_handler<S, A>(
    State(state): State<ApiState<S, A>>,
    headers: HeaderMap,
    payload: Result<Json<OptimizeRequest>, JsonRejection>,
) -> Result<Response, AppError>
where
    S: PackagingStore + 'static,
    A: PackagingAdvisor + 'static,
{
    let user = session_user(&state, &headers)?;
    let product_ids = json_body(payload)?.into_product_ids()?;
    let optimizations = state.service.optimize(&user, &product_ids)?;
    Ok(Json(json!({ "optimizations": optimizations })).into_response())
}

pub(crate) async fn ai_optimize_handler<S, A>(
    State(state): State<ApiState<S, A>>,
    headers: HeaderMap,
    payload: Result<Json<OptimizeRequest>, JsonRejection>,
) -> Result<Response, AppError>
where
    S: PackagingStore + 'static,
    A: PackagingAdvisor + 'static,
{
    let user = session_user(&state, &headers)?;
    let product_ids = json_body(payload)?.into_product_ids()?;
    let outcome = state.service.ai_optimize(&user, &product_ids).await?;
    Ok(Json(outcome).into_response())
}

pub(crate) async fn recent_optimizations_handler<S, A>(
    State(state): State<ApiState<S, A>>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response, AppError>
where
    S: PackagingStore + 'static,
    A: PackagingAdvisor + 'static,
{
    let user = session_user(&state, &headers)?;
    let limit = recent_limit(params.get("limit").map(String::as_str));
    let optimizations = state.service.recent_optimizations(&user, limit)?;
    Ok(Json(json!({ "optimizations": optimizations })).into_response())
}

pub(crate) async fn dashboard_stats_handler<S, A>(
    State(state): State<ApiState<S, A>>,
    headers: HeaderMap,
) -> Result<Response, AppError>
where
    S: PackagingStore + 'static,
    A: PackagingAdvisor + 'static,
{
    let user = session_user(&state, &headers)?;
    let stats = state.service.dashboard_stats(&user)?;
    Ok(Json(json!({ "stats": stats })).into_response())
}

pub(crate) async fn generate_report_handler<S, A>(
    State(state): State<ApiState<S, A>>,
    headers: HeaderMap,
    payload: Result<Json<ReportRequest>, JsonRejection>,
) -> Result<Response, AppError>
where
    S: PackagingStore + 'static,
    A: PackagingAdvisor + 'static,
{
    let user = session_user(&state, &headers)?;
    let request = json_body(payload)?;
    let generated = state
        .service
        .generate_report(&user, request, Utc::now().date_naive())
        .await?;
    Ok(Json(generated).into_response())
}

pub(crate) async fn export_report_handler<S, A>(
    State(state): State<ApiState<S, A>>,
    headers: HeaderMap,
    payload: Result<Json<ExportRequest>, JsonRejection>,
) -> Result<Response, AppError>
where
    S: PackagingStore + 'static,
    A: PackagingAdvisor + 'static,
{
    let user = session_user(&state, &headers)?;
    let request = json_body(payload)?;
    let exported = state
        .service
        .export_report(&user, &request.report_id, &request.format, Utc::now())?;

    let headers = [
        (header::CONTENT_TYPE, exported.content_type.to_string()),
        (header::CONTENT_DISPOSITION, exported.content_disposition()),
    ];
    Ok((headers, exported.body).into_response())
}
