use super::calculator::OptimizationResult;
use crate::domain::{OptimizationId, ProductId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizationStatus {
    Completed,
    Failed,
}

/// Optimization awaiting persistence.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOptimization {
    pub product_id: ProductId,
    pub result: OptimizationResult,
    pub status: OptimizationStatus,
}

/// Stored optimization; the result fields are flattened to match the table layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationRecord {
    pub id: OptimizationId,
    pub user_id: UserId,
    pub product_id: ProductId,
    #[serde(flatten)]
    pub result: OptimizationResult,
    pub status: OptimizationStatus,
    pub created_at: DateTime<Utc>,
}
