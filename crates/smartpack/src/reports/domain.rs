use crate::catalog::Product;
use crate::domain::{ReportId, UserId};
use crate::optimization::OptimizationRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Headline numbers quoted by the report author.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct KeyMetrics {
    pub total_products: f64,
    pub total_savings: f64,
    pub avg_waste_reduction: f64,
    pub co2_reduction: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportSection {
    pub title: String,
    pub content: String,
    pub insights: Vec<String>,
}

/// Report body as produced by the advisor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ReportContent {
    pub title: String,
    pub executive_summary: String,
    pub key_metrics: KeyMetrics,
    pub sections: Vec<ReportSection>,
    pub recommendations: Vec<String>,
    pub conclusion: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    #[serde(default)]
    pub report_type: String,
    #[serde(default)]
    pub date_range: Option<String>,
    #[serde(default)]
    pub sections: Vec<String>,
    #[serde(default)]
    pub report_name: Option<String>,
}

/// Aggregates computed from the user's stored data before the advisor is called.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReportMetrics {
    pub total_products: usize,
    pub total_savings: f64,
    pub avg_waste_reduction: f64,
    pub total_co2_reduction: f64,
}

impl ReportMetrics {
    pub fn from_records(total_products: usize, optimizations: &[OptimizationRecord]) -> Self {
        let total_savings = optimizations
            .iter()
            .map(|record| record.result.cost_savings)
            .sum();
        let total_waste: f64 = optimizations
            .iter()
            .map(|record| record.result.waste_reduction_percentage)
            .sum();
        let total_co2_reduction = optimizations
            .iter()
            .map(|record| record.result.co2_reduction_kg)
            .sum();

        Self {
            total_products,
            total_savings,
            avg_waste_reduction: total_waste / optimizations.len().max(1) as f64,
            total_co2_reduction,
        }
    }
}

/// Everything the advisor needs to write a report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportBrief {
    pub report_type: String,
    pub company_name: String,
    pub date_range: Option<String>,
    pub requested_sections: Vec<String>,
    pub metrics: ReportMetrics,
    pub products: Vec<Product>,
    pub optimizations: Vec<OptimizationRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Completed,
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewReport {
    pub name: String,
    pub report_type: String,
    pub content: ReportContent,
    pub sections: Vec<String>,
    pub date_range: Option<String>,
    pub status: ReportStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRecord {
    pub id: ReportId,
    pub user_id: UserId,
    pub name: String,
    #[serde(rename = "type")]
    pub report_type: String,
    pub content: ReportContent,
    pub sections: Vec<String>,
    pub date_range: Option<String>,
    pub status: ReportStatus,
    pub created_at: DateTime<Utc>,
}
