//! Dashboard aggregates and the recent-activity feed.

use crate::catalog::Product;
use crate::domain::{OptimizationId, ProductId};
use crate::optimization::{OptimizationRecord, OptimizationStatus};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

pub const DEFAULT_RECENT_LIMIT: usize = 10;
pub const UNKNOWN_PRODUCT: &str = "Unknown Product";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_cost_savings: f64,
    pub avg_waste_reduction: f64,
    pub total_co2_reduction: f64,
    pub product_count: usize,
    pub optimization_count: usize,
}

impl DashboardStats {
    /// Only completed optimizations count; pending and failed runs are ignored.
    pub fn from_records(optimizations: &[OptimizationRecord], product_count: usize) -> Self {
        let completed: Vec<&OptimizationRecord> = optimizations
            .iter()
            .filter(|record| record.status == OptimizationStatus::Completed)
            .collect();

        let total_cost_savings: f64 = completed.iter().map(|r| r.result.cost_savings).sum();
        let total_waste: f64 = completed
            .iter()
            .map(|r| r.result.waste_reduction_percentage)
            .sum();
        let total_co2_reduction: f64 = completed.iter().map(|r| r.result.co2_reduction_kg).sum();
        let avg_waste_reduction = if completed.is_empty() {
            0.0
        } else {
            total_waste / completed.len() as f64
        };

        Self {
            total_cost_savings: round2(total_cost_savings),
            avg_waste_reduction: round2(avg_waste_reduction),
            total_co2_reduction: round2(total_co2_reduction),
            product_count,
            optimization_count: completed.len(),
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Row of the "recent optimizations" table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentOptimization {
    pub id: OptimizationId,
    pub product_name: String,
    pub cost_savings: f64,
    pub waste_reduction_percentage: f64,
    pub co2_reduction_kg: f64,
    pub created_at: DateTime<Utc>,
    pub status: OptimizationStatus,
}

impl RecentOptimization {
    /// Joins each record with its product name. Records whose product is gone keep a placeholder.
    pub fn join(records: Vec<OptimizationRecord>, products: &[Product]) -> Vec<Self> {
        let names: HashMap<&ProductId, &str> = products
            .iter()
            .map(|product| (&product.id, product.name.as_str()))
            .collect();

        records
            .into_iter()
            .map(|record| Self {
                product_name: names
                    .get(&record.product_id)
                    .map_or_else(|| UNKNOWN_PRODUCT.to_string(), |name| name.to_string()),
                id: record.id,
                cost_savings: record.result.cost_savings,
                waste_reduction_percentage: record.result.waste_reduction_percentage,
                co2_reduction_kg: record.result.co2_reduction_kg,
                created_at: record.created_at,
                status: record.status,
            })
            .collect()
    }
}

/// Parses the `limit` query value. Missing, unparsable, or zero values use the default.
pub fn recent_limit(raw: Option<&str>) -> usize {
    raw.and_then(|value| value.trim().parse::<usize>().ok())
        .filter(|limit| *limit > 0)
        .unwrap_or(DEFAULT_RECENT_LIMIT)
}
