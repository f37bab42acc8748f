use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use serde_json::Value;

use crate::advisor::{
    AdvisorError, AiOptimizationPlan, AiPlanSummary, AiRecommendation, DisabledAdvisor,
    PackagingAdvisor, ProductBrief, RecommendationStatus,
};
use crate::auth::StaticTokenAuthenticator;
use crate::catalog::{NewProduct, NewUpload, Product, UploadRecord};
use crate::domain::{ProductId, ReportId, UploadId, UserId};
use crate::optimization::{Dimensions, NewOptimization, OptimizationRecord};
use crate::reports::{KeyMetrics, NewReport, ReportBrief, ReportContent, ReportRecord, ReportSection};
use crate::router::api_router;
use crate::service::PackagingService;
use crate::store::{CompanyProfile, InMemoryPackagingStore, PackagingStore, StoreError};

pub(super) const TOKEN: &str = "token-alice";
pub(super) const OTHER_TOKEN: &str = "token-bob";

pub(super) fn alice() -> UserId {
    UserId::from("alice")
}

pub(super) fn bob() -> UserId {
    UserId::from("bob")
}

pub(super) fn sessions() -> Arc<StaticTokenAuthenticator> {
    Arc::new(
        StaticTokenAuthenticator::default()
            .with_token(TOKEN, alice())
            .with_token(OTHER_TOKEN, bob()),
    )
}

pub(super) fn widget_box() -> NewProduct {
    NewProduct {
        name: "Widget Box".to_string(),
        category: Some("Electronics".to_string()),
        dimensions_length: Some(30.0),
        dimensions_width: Some(20.0),
        dimensions_height: Some(15.0),
        weight: Some(2.5),
        material: Some("Cardboard".to_string()),
        quantity: Some(12),
        cost_per_unit: Some(10.0),
    }
}

pub(super) fn mailer() -> NewProduct {
    NewProduct {
        name: "Poly Mailer".to_string(),
        category: Some("Apparel".to_string()),
        dimensions_length: Some(35.0),
        dimensions_width: Some(25.0),
        dimensions_height: Some(2.0),
        weight: Some(0.3),
        material: Some("Plastic".to_string()),
        quantity: Some(200),
        cost_per_unit: Some(0.4),
    }
}

pub(super) fn recommendation(product: &Product, savings: f64) -> AiRecommendation {
    let current = Dimensions {
        length: product.dimensions_length.unwrap_or_default(),
        width: product.dimensions_width.unwrap_or_default(),
        height: product.dimensions_height.unwrap_or_default(),
    };
    AiRecommendation {
        product_id: product.id.clone(),
        product_name: product.name.clone(),
        current_dimensions: current,
        optimized_dimensions: current.scaled(0.9),
        current_material: product.material.clone().unwrap_or_default(),
        recommended_material: "Recycled Cardboard".to_string(),
        cost_savings_percentage: savings,
        waste_reduction_percentage: 30.0,
        co2_reduction_kg: 0.6,
        confidence_score: 80.0,
        reasoning: "Void space exceeds 20%.".to_string(),
        status: RecommendationStatus::Optimized,
    }
}

pub(super) fn plan(recommendations: Vec<AiRecommendation>) -> AiOptimizationPlan {
    AiOptimizationPlan {
        summary: AiPlanSummary {
            total_products: recommendations.len() as f64,
            total_cost_savings: 2.5,
            average_waste_reduction: 30.0,
            total_co2_reduction: 0.6 * recommendations.len() as f64,
        },
        recommendations,
    }
}

pub(super) fn report_content() -> ReportContent {
    ReportContent {
        title: "Packaging Sustainability Review".to_string(),
        executive_summary: "Right-sizing cut costs across the catalog.".to_string(),
        key_metrics: KeyMetrics {
            total_products: 2.0,
            total_savings: 1.3,
            avg_waste_reduction: 13.0,
            co2_reduction: 1.17,
        },
        sections: vec![ReportSection {
            title: "Materials".to_string(),
            content: "Cardboard dominates the catalog.".to_string(),
            insights: vec!["Switch to recycled board".to_string()],
        }],
        recommendations: vec!["Adopt three standard box sizes".to_string()],
        conclusion: "Savings are on track.".to_string(),
    }
}

/// Advisor returning canned answers and remembering what it was asked.
#[derive(Default)]
pub(super) struct ScriptedAdvisor {
    pub(super) plan: Option<AiOptimizationPlan>,
    pub(super) report: Option<ReportContent>,
    pub(super) product_requests: Mutex<Vec<Vec<ProductBrief>>>,
    pub(super) report_requests: Mutex<Vec<ReportBrief>>,
}

impl ScriptedAdvisor {
    pub(super) fn with_plan(plan: AiOptimizationPlan) -> Self {
        Self {
            plan: Some(plan),
            ..Self::default()
        }
    }

    pub(super) fn with_report(report: ReportContent) -> Self {
        Self {
            report: Some(report),
            ..Self::default()
        }
    }
}

#[async_trait]
impl PackagingAdvisor for ScriptedAdvisor {
    async fn recommend(
        &self,
        products: &[ProductBrief],
    ) -> Result<AiOptimizationPlan, AdvisorError> {
        self.product_requests
            .lock()
            .expect("advisor mutex poisoned")
            .push(products.to_vec());
        self.plan
            .clone()
            .ok_or_else(|| AdvisorError::Upstream("500 Internal Server Error".to_string()))
    }

    async fn write_report(&self, brief: &ReportBrief) -> Result<ReportContent, AdvisorError> {
        self.report_requests
            .lock()
            .expect("advisor mutex poisoned")
            .push(brief.clone());
        self.report
            .clone()
            .ok_or_else(|| AdvisorError::Upstream("500 Internal Server Error".to_string()))
    }
}

/// Delegates to the in-memory store but refuses optimization and report writes.
#[derive(Default)]
pub(super) struct ReadOnlyStore {
    pub(super) inner: InMemoryPackagingStore,
}

impl PackagingStore for ReadOnlyStore {
    fn insert_products(
        &self,
        user: &UserId,
        products: Vec<NewProduct>,
    ) -> Result<Vec<Product>, StoreError> {
        self.inner.insert_products(user, products)
    }

    fn list_products(&self, user: &UserId) -> Result<Vec<Product>, StoreError> {
        self.inner.list_products(user)
    }

    fn products_by_ids(
        &self,
        user: &UserId,
        ids: &[ProductId],
    ) -> Result<Vec<Product>, StoreError> {
        self.inner.products_by_ids(user, ids)
    }

    fn count_products(&self, user: &UserId) -> Result<usize, StoreError> {
        self.inner.count_products(user)
    }

    fn insert_upload(&self, user: &UserId, upload: NewUpload) -> Result<UploadRecord, StoreError> {
        self.inner.insert_upload(user, upload)
    }

    fn mark_upload_processed(&self, id: &UploadId) -> Result<UploadRecord, StoreError> {
        self.inner.mark_upload_processed(id)
    }

    fn insert_optimizations(
        &self,
        _user: &UserId,
        _optimizations: Vec<NewOptimization>,
    ) -> Result<Vec<OptimizationRecord>, StoreError> {
        Err(StoreError::Unavailable("read only".to_string()))
    }

    fn list_optimizations(
        &self,
        user: &UserId,
        limit: Option<usize>,
    ) -> Result<Vec<OptimizationRecord>, StoreError> {
        self.inner.list_optimizations(user, limit)
    }

    fn insert_report(&self, _user: &UserId, _report: NewReport) -> Result<ReportRecord, StoreError> {
        Err(StoreError::Unavailable("read only".to_string()))
    }

    fn fetch_report(&self, user: &UserId, id: &ReportId) -> Result<Option<ReportRecord>, StoreError> {
        self.inner.fetch_report(user, id)
    }

    fn company_profile(&self, user: &UserId) -> Result<Option<CompanyProfile>, StoreError> {
        self.inner.company_profile(user)
    }
}

pub(super) struct UnavailableStore;

impl PackagingStore for UnavailableStore {
    fn insert_products(
        &self,
        _user: &UserId,
        _products: Vec<NewProduct>,
    ) -> Result<Vec<Product>, StoreError> {
        Err(offline())
    }

    fn list_products(&self, _user: &UserId) -> Result<Vec<Product>, StoreError> {
        Err(offline())
    }

    fn products_by_ids(
        &self,
        _user: &UserId,
        _ids: &[ProductId],
    ) -> Result<Vec<Product>, StoreError> {
        Err(offline())
    }

    fn count_products(&self, _user: &UserId) -> Result<usize, StoreError> {
        Err(offline())
    }

    fn insert_upload(&self, _user: &UserId, _upload: NewUpload) -> Result<UploadRecord, StoreError> {
        Err(offline())
    }

    fn mark_upload_processed(&self, _id: &UploadId) -> Result<UploadRecord, StoreError> {
        Err(offline())
    }

    fn insert_optimizations(
        &self,
        _user: &UserId,
        _optimizations: Vec<NewOptimization>,
    ) -> Result<Vec<OptimizationRecord>, StoreError> {
        Err(offline())
    }

    fn list_optimizations(
        &self,
        _user: &UserId,
        _limit: Option<usize>,
    ) -> Result<Vec<OptimizationRecord>, StoreError> {
        Err(offline())
    }

    fn insert_report(&self, _user: &UserId, _report: NewReport) -> Result<ReportRecord, StoreError> {
        Err(offline())
    }

    fn fetch_report(
        &self,
        _user: &UserId,
        _id: &ReportId,
    ) -> Result<Option<ReportRecord>, StoreError> {
        Err(offline())
    }

    fn company_profile(&self, _user: &UserId) -> Result<Option<CompanyProfile>, StoreError> {
        Err(offline())
    }
}

fn offline() -> StoreError {
    StoreError::Unavailable("database offline".to_string())
}

pub(super) fn build_service<A: PackagingAdvisor + 'static>(
    advisor: A,
) -> (
    PackagingService<InMemoryPackagingStore, A>,
    Arc<InMemoryPackagingStore>,
) {
    let store = Arc::new(InMemoryPackagingStore::new());
    let service = PackagingService::new(store.clone(), Arc::new(advisor));
    (service, store)
}

pub(super) fn disabled_service() -> (
    PackagingService<InMemoryPackagingStore, DisabledAdvisor>,
    Arc<InMemoryPackagingStore>,
) {
    build_service(DisabledAdvisor)
}

pub(super) fn router_with_service<S, A>(service: PackagingService<S, A>) -> axum::Router
where
    S: PackagingStore + 'static,
    A: PackagingAdvisor + 'static,
{
    api_router(Arc::new(service), sessions())
}

pub(super) fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::get(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).expect("request builds")
}

pub(super) fn post_json(uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::post(uri).header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
        .body(Body::from(serde_json::to_vec(body).expect("json body")))
        .expect("request builds")
}

pub(super) async fn read_body(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body")
        .to_vec()
}

pub(super) async fn read_json_body(response: Response) -> Value {
    serde_json::from_slice(&read_body(response).await).expect("json payload")
}
