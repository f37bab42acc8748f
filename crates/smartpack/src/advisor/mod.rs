//! AI-provider boundary.
//!
//! The service talks to a [`PackagingAdvisor`]; the production implementation
//! is [`OpenAiAdvisor`]. Responses are decoded into strict types and range
//! checked before they reach the service.

mod openai;
mod prompt;
mod schema;

pub use openai::OpenAiAdvisor;

use crate::catalog::Product;
use crate::domain::ProductId;
use crate::optimization::Dimensions;
use crate::reports::{ReportBrief, ReportContent};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[async_trait]
pub trait PackagingAdvisor: Send + Sync {
    async fn recommend(
        &self,
        products: &[ProductBrief],
    ) -> Result<AiOptimizationPlan, AdvisorError>;

    async fn write_report(&self, brief: &ReportBrief) -> Result<ReportContent, AdvisorError>;
}

/// Advisor used when no provider credentials are configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledAdvisor;

#[async_trait]
impl PackagingAdvisor for DisabledAdvisor {
    async fn recommend(
        &self,
        _products: &[ProductBrief],
    ) -> Result<AiOptimizationPlan, AdvisorError> {
        Err(AdvisorError::NotConfigured)
    }

    async fn write_report(&self, _brief: &ReportBrief) -> Result<ReportContent, AdvisorError> {
        Err(AdvisorError::NotConfigured)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AdvisorError {
    #[error("AI provider is not configured")]
    NotConfigured,
    #[error("AI provider rejected the credentials")]
    Authentication,
    #[error("AI provider rate limit exceeded")]
    RateLimited,
    #[error("AI provider returned {0}")]
    Upstream(String),
    #[error("AI provider unreachable: {0}")]
    Transport(String),
    #[error("AI provider returned an invalid response: {0}")]
    InvalidResponse(String),
}

/// Product summary sent to the advisor. Missing values are filled with neutral defaults.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductBrief {
    pub id: ProductId,
    pub name: String,
    pub category: Option<String>,
    pub dimensions: Dimensions,
    pub weight: f64,
    pub material: String,
    pub quantity: u32,
    pub cost_per_unit: f64,
}

impl From<&Product> for ProductBrief {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            category: product.category.clone(),
            dimensions: Dimensions {
                length: product.dimensions_length.unwrap_or_default(),
                width: product.dimensions_width.unwrap_or_default(),
                height: product.dimensions_height.unwrap_or_default(),
            },
            weight: product.weight.unwrap_or_default(),
            material: product
                .material
                .clone()
                .unwrap_or_else(|| "Unknown".to_string()),
            quantity: product.quantity.unwrap_or(1),
            cost_per_unit: product.cost_per_unit.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationStatus {
    /// More than 15% savings available.
    Optimized,
    /// Between 5% and 15% savings, or data concerns.
    Warning,
    /// Less than 5% savings available.
    Optimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AiRecommendation {
    pub product_id: ProductId,
    pub product_name: String,
    pub current_dimensions: Dimensions,
    pub optimized_dimensions: Dimensions,
    pub current_material: String,
    pub recommended_material: String,
    pub cost_savings_percentage: f64,
    pub waste_reduction_percentage: f64,
    pub co2_reduction_kg: f64,
    /// 0-100 scale.
    pub confidence_score: f64,
    pub reasoning: String,
    pub status: RecommendationStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AiPlanSummary {
    pub total_products: f64,
    pub total_cost_savings: f64,
    pub average_waste_reduction: f64,
    pub total_co2_reduction: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AiOptimizationPlan {
    pub recommendations: Vec<AiRecommendation>,
    pub summary: AiPlanSummary,
}

impl AiOptimizationPlan {
    pub fn validate(&self) -> Result<(), AdvisorError> {
        for recommendation in &self.recommendations {
            let id = &recommendation.product_id;
            check_percentage(id, "costSavingsPercentage", recommendation.cost_savings_percentage)?;
            check_percentage(
                id,
                "wasteReductionPercentage",
                recommendation.waste_reduction_percentage,
            )?;
            check_percentage(id, "confidenceScore", recommendation.confidence_score)?;
            check_non_negative(id, "co2ReductionKg", recommendation.co2_reduction_kg)?;
            for (field, dims) in [
                ("currentDimensions", &recommendation.current_dimensions),
                ("optimizedDimensions", &recommendation.optimized_dimensions),
            ] {
                for value in [dims.length, dims.width, dims.height] {
                    check_non_negative(id, field, value)?;
                }
            }
        }
        Ok(())
    }
}

fn check_percentage(id: &ProductId, field: &str, value: f64) -> Result<(), AdvisorError> {
    if value.is_finite() && (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(AdvisorError::InvalidResponse(format!(
            "{field} for product {id} must be within 0-100, got {value}"
        )))
    }
}

fn check_non_negative(id: &ProductId, field: &str, value: f64) -> Result<(), AdvisorError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(AdvisorError::InvalidResponse(format!(
            "{field} for product {id} must be non-negative, got {value}"
        )))
    }
}
