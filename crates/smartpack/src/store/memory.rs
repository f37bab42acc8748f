use super::{CompanyProfile, PackagingStore, StoreError};
use crate::catalog::{NewProduct, NewUpload, Product, UploadRecord};
use crate::domain::{OptimizationId, ProductId, ReportId, UploadId, UserId};
use crate::optimization::{NewOptimization, OptimizationRecord};
use crate::reports::{NewReport, ReportRecord};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

/// Process-local store backing the service binary and tests.
///
/// Records are kept in insertion order; listings iterate in reverse so the
/// newest record comes first.
#[derive(Default)]
pub struct InMemoryPackagingStore {
    product_seq: AtomicU64,
    upload_seq: AtomicU64,
    optimization_seq: AtomicU64,
    report_seq: AtomicU64,
    products: Mutex<Vec<Product>>,
    uploads: Mutex<Vec<UploadRecord>>,
    optimizations: Mutex<Vec<OptimizationRecord>>,
    reports: Mutex<Vec<ReportRecord>>,
    profiles: Mutex<HashMap<UserId, CompanyProfile>>,
}

impl InMemoryPackagingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profile(self, user: UserId, profile: CompanyProfile) -> Self {
        if let Ok(mut profiles) = self.profiles.lock() {
            profiles.insert(user, profile);
        }
        self
    }

    pub fn uploads(&self, user: &UserId) -> Result<Vec<UploadRecord>, StoreError> {
        let uploads = lock(&self.uploads)?;
        Ok(uploads
            .iter()
            .rev()
            .filter(|upload| &upload.user_id == user)
            .cloned()
            .collect())
    }

}

/// Ids count per record kind: `prd-000001`, `opt-000001`, ...
fn next_id(sequence: &AtomicU64, prefix: &str) -> String {
    let id = sequence.fetch_add(1, Ordering::Relaxed) + 1;
    format!("{prefix}-{id:06}")
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, StoreError> {
    mutex
        .lock()
        .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))
}

impl PackagingStore for InMemoryPackagingStore {
    fn insert_products(
        &self,
        user: &UserId,
        products: Vec<NewProduct>,
    ) -> Result<Vec<Product>, StoreError> {
        let mut guard = lock(&self.products)?;
        let created_at = Utc::now();
        let inserted: Vec<Product> = products
            .into_iter()
            .map(|draft| Product {
                id: ProductId(next_id(&self.product_seq, "prd")),
                user_id: user.clone(),
                name: draft.name,
                category: draft.category,
                dimensions_length: draft.dimensions_length,
                dimensions_width: draft.dimensions_width,
                dimensions_height: draft.dimensions_height,
                weight: draft.weight,
                material: draft.material,
                quantity: draft.quantity,
                cost_per_unit: draft.cost_per_unit,
                created_at,
            })
            .collect();
        guard.extend(inserted.iter().cloned());
        Ok(inserted)
    }

    fn list_products(&self, user: &UserId) -> Result<Vec<Product>, StoreError> {
        let guard = lock(&self.products)?;
        Ok(guard
            .iter()
            .rev()
            .filter(|product| &product.user_id == user)
            .cloned()
            .collect())
    }

    fn products_by_ids(
        &self,
        user: &UserId,
        ids: &[ProductId],
    ) -> Result<Vec<Product>, StoreError> {
        let guard = lock(&self.products)?;
        Ok(guard
            .iter()
            .filter(|product| &product.user_id == user && ids.contains(&product.id))
            .cloned()
            .collect())
    }

    fn count_products(&self, user: &UserId) -> Result<usize, StoreError> {
        let guard = lock(&self.products)?;
        Ok(guard
            .iter()
            .filter(|product| &product.user_id == user)
            .count())
    }

    fn insert_upload(&self, user: &UserId, upload: NewUpload) -> Result<UploadRecord, StoreError> {
        let record = UploadRecord {
            id: UploadId(next_id(&self.upload_seq, "upl")),
            user_id: user.clone(),
            filename: upload.filename,
            file_type: upload.file_type,
            file_size: upload.file_size,
            upload_method: upload.upload_method,
            processed: false,
            created_at: Utc::now(),
        };
        lock(&self.uploads)?.push(record.clone());
        Ok(record)
    }

    fn mark_upload_processed(&self, id: &UploadId) -> Result<UploadRecord, StoreError> {
        let mut guard = lock(&self.uploads)?;
        let upload = guard
            .iter_mut()
            .find(|upload| &upload.id == id)
            .ok_or(StoreError::NotFound)?;
        upload.processed = true;
        Ok(upload.clone())
    }

    fn insert_optimizations(
        &self,
        user: &UserId,
        optimizations: Vec<NewOptimization>,
    ) -> Result<Vec<OptimizationRecord>, StoreError> {
        let mut guard = lock(&self.optimizations)?;
        let created_at = Utc::now();
        let inserted: Vec<OptimizationRecord> = optimizations
            .into_iter()
            .map(|draft| OptimizationRecord {
                id: OptimizationId(next_id(&self.optimization_seq, "opt")),
                user_id: user.clone(),
                product_id: draft.product_id,
                result: draft.result,
                status: draft.status,
                created_at,
            })
            .collect();
        guard.extend(inserted.iter().cloned());
        Ok(inserted)
    }

    fn list_optimizations(
        &self,
        user: &UserId,
        limit: Option<usize>,
    ) -> Result<Vec<OptimizationRecord>, StoreError> {
        let guard = lock(&self.optimizations)?;
        Ok(guard
            .iter()
            .rev()
            .filter(|record| &record.user_id == user)
            .take(limit.unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }

    fn insert_report(&self, user: &UserId, report: NewReport) -> Result<ReportRecord, StoreError> {
        let record = ReportRecord {
            id: ReportId(next_id(&self.report_seq, "rpt")),
            user_id: user.clone(),
            name: report.name,
            report_type: report.report_type,
            content: report.content,
            sections: report.sections,
            date_range: report.date_range,
            status: report.status,
            created_at: Utc::now(),
        };
        lock(&self.reports)?.push(record.clone());
        Ok(record)
    }

    fn fetch_report(&self, user: &UserId, id: &ReportId) -> Result<Option<ReportRecord>, StoreError> {
        let guard = lock(&self.reports)?;
        Ok(guard
            .iter()
            .find(|report| &report.id == id && &report.user_id == user)
            .cloned())
    }

    fn company_profile(&self, user: &UserId) -> Result<Option<CompanyProfile>, StoreError> {
        Ok(lock(&self.profiles)?.get(user).cloned())
    }
}
