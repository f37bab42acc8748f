//! Product catalog: records, request bodies, and CSV import.

mod domain;
mod import;
mod numeric;

pub use domain::{NewProduct, NewUpload, Product, UploadMethod, UploadRecord};
pub use import::{
    is_accepted_upload_type, parse_product_rows, CatalogImportError, ACCEPTED_UPLOAD_TYPES,
};
