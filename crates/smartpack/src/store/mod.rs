//! Data-access boundary used by the service layer.

mod memory;

pub use memory::InMemoryPackagingStore;

use crate::catalog::{NewProduct, NewUpload, Product, UploadRecord};
use crate::domain::{ProductId, ReportId, UploadId, UserId};
use crate::optimization::{NewOptimization, OptimizationRecord};
use crate::reports::{NewReport, ReportRecord};
use serde::{Deserialize, Serialize};

/// Storage abstraction so the service can be exercised without a database.
///
/// Every read is scoped to the owning user. Listings are newest first.
pub trait PackagingStore: Send + Sync {
    fn insert_products(
        &self,
        user: &UserId,
        products: Vec<NewProduct>,
    ) -> Result<Vec<Product>, StoreError>;
    fn list_products(&self, user: &UserId) -> Result<Vec<Product>, StoreError>;
    fn products_by_ids(
        &self,
        user: &UserId,
        ids: &[ProductId],
    ) -> Result<Vec<Product>, StoreError>;
    fn count_products(&self, user: &UserId) -> Result<usize, StoreError>;

    fn insert_upload(&self, user: &UserId, upload: NewUpload) -> Result<UploadRecord, StoreError>;
    fn mark_upload_processed(&self, id: &UploadId) -> Result<UploadRecord, StoreError>;

    fn insert_optimizations(
        &self,
        user: &UserId,
        optimizations: Vec<NewOptimization>,
    ) -> Result<Vec<OptimizationRecord>, StoreError>;
    fn list_optimizations(
        &self,
        user: &UserId,
        limit: Option<usize>,
    ) -> Result<Vec<OptimizationRecord>, StoreError>;

    fn insert_report(&self, user: &UserId, report: NewReport) -> Result<ReportRecord, StoreError>;
    fn fetch_report(&self, user: &UserId, id: &ReportId) -> Result<Option<ReportRecord>, StoreError>;

    fn company_profile(&self, user: &UserId) -> Result<Option<CompanyProfile>, StoreError>;
}

/// Account level details shown on generated reports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub company_name: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
