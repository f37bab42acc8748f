use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::advisor::{
    AdvisorError, AiPlanSummary, AiRecommendation, PackagingAdvisor, ProductBrief,
};
use crate::catalog::{
    is_accepted_upload_type, parse_product_rows, CatalogImportError, NewProduct, NewUpload,
    Product, UploadMethod, UploadRecord,
};
use crate::dashboard::{DashboardStats, RecentOptimization};
use crate::domain::{ProductId, ReportId, UserId};
use crate::optimization::{
    calculate, NewOptimization, OptimizationRecord, OptimizationResult, OptimizationStatus,
};
use crate::reports::{
    export_report, ExportError, ExportFormat, ExportedReport, NewReport, ReportBrief,
    ReportContent, ReportMetrics, ReportRequest, ReportStatus,
};
use crate::store::{PackagingStore, StoreError};

const DEFAULT_COMPANY_NAME: &str = "the company";
const REPORT_SAMPLE_SIZE: usize = 5;

/// Upload body: the file travels as text next to its metadata.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    pub filename: String,
    pub content_type: String,
    #[serde(default)]
    pub upload_method: Option<String>,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportOutcome {
    pub upload: UploadRecord,
    pub products: Vec<Product>,
    pub message: String,
}

/// Stored optimization together with the product it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductOptimization {
    #[serde(flatten)]
    pub record: OptimizationRecord,
    pub product_name: String,
    pub product_category: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AiOptimizationOutcome {
    pub success: bool,
    pub recommendations: Vec<AiRecommendation>,
    pub summary: AiPlanSummary,
    /// `None` when the batch could not be saved.
    pub optimizations: Option<Vec<OptimizationRecord>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedReport {
    pub success: bool,
    pub report: ReportContent,
    pub report_id: Option<ReportId>,
}

/// Composes the store and the AI advisor behind the HTTP handlers.
pub struct PackagingService<S, A> {
    store: Arc<S>,
    advisor: Arc<A>,
}

impl<S, A> PackagingService<S, A>
where
    S: PackagingStore + 'static,
    A: PackagingAdvisor + 'static,
{
    pub fn new(store: Arc<S>, advisor: Arc<A>) -> Self {
        Self { store, advisor }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn create_product(
        &self,
        user: &UserId,
        mut product: NewProduct,
    ) -> Result<Product, ServiceError> {
        product.name = product.name.trim().to_string();
        if product.name.is_empty() {
            return Err(ServiceError::Validation("Product name is required".to_string()));
        }

        let mut created = self.store.insert_products(user, vec![product])?;
        created
            .pop()
            .ok_or_else(|| StoreError::Unavailable("insert returned no product".to_string()).into())
    }

    pub fn list_products(&self, user: &UserId) -> Result<Vec<Product>, ServiceError> {
        Ok(self.store.list_products(user)?)
    }

    /// Record the upload, decode its rows, and store the products it contains.
    pub fn import_upload(
        &self,
        user: &UserId,
        request: UploadRequest,
    ) -> Result<ImportOutcome, ServiceError> {
        if !is_accepted_upload_type(&request.content_type) {
            return Err(ServiceError::Validation(
                "Invalid file type. Please upload CSV or Excel files.".to_string(),
            ));
        }

        let upload = self.store.insert_upload(
            user,
            NewUpload {
                filename: request.filename,
                file_type: request.content_type,
                file_size: request.content.len(),
                upload_method: UploadMethod::parse(request.upload_method.as_deref()),
            },
        )?;

        let drafts = parse_product_rows(Cursor::new(request.content.as_bytes()))?;
        if drafts.is_empty() {
            return Err(ServiceError::Validation(
                "No valid products found in file".to_string(),
            ));
        }

        let products = self.store.insert_products(user, drafts)?;
        let upload = self.store.mark_upload_processed(&upload.id)?;
        info!(
            upload = %upload.id,
            products = products.len(),
            method = ?upload.upload_method,
            "upload processed"
        );

        Ok(ImportOutcome {
            message: format!("Successfully processed {} products", products.len()),
            upload,
            products,
        })
    }

    /// Deterministic optimization. Products whose result cannot be saved are skipped.
    pub fn optimize(
        &self,
        user: &UserId,
        product_ids: &[ProductId],
    ) -> Result<Vec<ProductOptimization>, ServiceError> {
        let products = self.store.products_by_ids(user, product_ids)?;
        let mut optimizations = Vec::with_capacity(products.len());
        for product in products {
            let draft = NewOptimization {
                product_id: product.id.clone(),
                result: calculate(&product.packaging()),
                status: OptimizationStatus::Completed,
            };

            match self.store.insert_optimizations(user, vec![draft]) {
                Ok(saved) => optimizations.extend(saved.into_iter().map(|record| {
                    ProductOptimization {
                        record,
                        product_name: product.name.clone(),
                        product_category: product.category.clone(),
                    }
                })),
                Err(err) => {
                    warn!(product = %product.id, error = %err, "failed to save optimization");
                }
            }
        }

        Ok(optimizations)
    }

    pub async fn ai_optimize(
        &self,
        user: &UserId,
        product_ids: &[ProductId],
    ) -> Result<AiOptimizationOutcome, ServiceError> {
        let products = self.store.products_by_ids(user, product_ids)?;
        if products.is_empty() {
            return Err(ServiceError::NotFound("No products found".to_string()));
        }

        let briefs: Vec<ProductBrief> = products.iter().map(ProductBrief::from).collect();
        let plan = self
            .advisor
            .recommend(&briefs)
            .await
            .map_err(ServiceError::Recommendation)?;

        let costs: HashMap<&ProductId, f64> = briefs
            .iter()
            .map(|brief| (&brief.id, brief.cost_per_unit))
            .collect();
        let mut recommendations = Vec::with_capacity(plan.recommendations.len());
        let mut drafts = Vec::with_capacity(plan.recommendations.len());
        for recommendation in plan.recommendations {
            let Some(&original_cost) = costs.get(&recommendation.product_id) else {
                warn!(
                    product = %recommendation.product_id,
                    "dropping recommendation for a product outside the request"
                );
                continue;
            };
            drafts.push(NewOptimization {
                product_id: recommendation.product_id.clone(),
                result: recommendation_result(&recommendation, original_cost),
                status: OptimizationStatus::Completed,
            });
            recommendations.push(recommendation);
        }

        let optimizations = match self.store.insert_optimizations(user, drafts) {
            Ok(saved) => Some(saved),
            Err(err) => {
                warn!(error = %err, "failed to save AI optimizations");
                None
            }
        };

        Ok(AiOptimizationOutcome {
            success: true,
            recommendations,
            summary: plan.summary,
            optimizations,
        })
    }

    pub fn recent_optimizations(
        &self,
        user: &UserId,
        limit: usize,
    ) -> Result<Vec<RecentOptimization>, ServiceError> {
        let records = self.store.list_optimizations(user, Some(limit))?;
        let ids: Vec<ProductId> = records.iter().map(|r| r.product_id.clone()).collect();
        let products = self.store.products_by_ids(user, &ids)?;
        Ok(RecentOptimization::join(records, &products))
    }

    pub fn dashboard_stats(&self, user: &UserId) -> Result<DashboardStats, ServiceError> {
        let optimizations = self.store.list_optimizations(user, None)?;
        let product_count = self.store.count_products(user)?;
        Ok(DashboardStats::from_records(&optimizations, product_count))
    }

    /// Ask the advisor for a report and persist it. A failed save still returns the content.
    pub async fn generate_report(
        &self,
        user: &UserId,
        request: ReportRequest,
        today: NaiveDate,
    ) -> Result<GeneratedReport, ServiceError> {
        let report_type = request.report_type.trim().to_string();
        if report_type.is_empty() {
            return Err(ServiceError::Validation(
                "Report type is required".to_string(),
            ));
        }

        let products = self.store.list_products(user)?;
        let optimizations = self.store.list_optimizations(user, None)?;
        let company_name = self
            .store
            .company_profile(user)?
            .and_then(|profile| profile.company_name)
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_COMPANY_NAME.to_string());

        let brief = ReportBrief {
            report_type: report_type.clone(),
            company_name,
            date_range: request.date_range.clone(),
            requested_sections: request.sections.clone(),
            metrics: ReportMetrics::from_records(products.len(), &optimizations),
            products: products.into_iter().take(REPORT_SAMPLE_SIZE).collect(),
            optimizations: optimizations.into_iter().take(REPORT_SAMPLE_SIZE).collect(),
        };

        let content = self
            .advisor
            .write_report(&brief)
            .await
            .map_err(ServiceError::ReportGeneration)?;

        let name = request
            .report_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| format!("{report_type} Report - {}", today.format("%Y-%m-%d")));
        let saved = self.store.insert_report(
            user,
            NewReport {
                name,
                report_type,
                content: content.clone(),
                sections: request.sections,
                date_range: request.date_range,
                status: ReportStatus::Completed,
            },
        );
        let report_id = match saved {
            Ok(record) => {
                info!(report = %record.id, "report generated");
                Some(record.id)
            }
            Err(err) => {
                warn!(error = %err, "failed to save report");
                None
            }
        };

        Ok(GeneratedReport {
            success: true,
            report: content,
            report_id,
        })
    }

    pub fn export_report(
        &self,
        user: &UserId,
        report_id: &ReportId,
        format: &str,
        now: DateTime<Utc>,
    ) -> Result<ExportedReport, ServiceError> {
        let report = self
            .store
            .fetch_report(user, report_id)?
            .ok_or_else(|| ServiceError::NotFound("Report not found".to_string()))?;
        let format = ExportFormat::parse(format)
            .ok_or_else(|| ServiceError::Validation("Unsupported format".to_string()))?;

        Ok(export_report(&report, format, now)?)
    }
}

fn recommendation_result(recommendation: &AiRecommendation, original_cost: f64) -> OptimizationResult {
    let fraction = recommendation.cost_savings_percentage / 100.0;
    OptimizationResult {
        original_cost,
        optimized_cost: original_cost * (1.0 - fraction),
        cost_savings: original_cost * fraction,
        waste_reduction_percentage: recommendation.waste_reduction_percentage,
        co2_reduction_kg: recommendation.co2_reduction_kg,
        recommended_material: recommendation.recommended_material.clone(),
        recommended_dimensions: recommendation.optimized_dimensions,
        confidence_score: recommendation.confidence_score / 100.0,
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Import(#[from] CatalogImportError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Failed to generate AI recommendations. Please try again.")]
    Recommendation(#[source] AdvisorError),
    #[error("Failed to generate report. Please try again.")]
    ReportGeneration(#[source] AdvisorError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

impl ServiceError {
    /// The advisor failure behind this error, if any.
    pub fn advisor_error(&self) -> Option<&AdvisorError> {
        match self {
            Self::Recommendation(err) | Self::ReportGeneration(err) => Some(err),
            _ => None,
        }
    }
}
