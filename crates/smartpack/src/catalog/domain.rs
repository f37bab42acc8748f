use super::numeric::{lenient_f64, lenient_u32};
use crate::domain::{ProductId, UploadId, UserId};
use crate::optimization::PackagingInput;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Product owned by a single user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub user_id: UserId,
    pub name: String,
    pub category: Option<String>,
    pub dimensions_length: Option<f64>,
    pub dimensions_width: Option<f64>,
    pub dimensions_height: Option<f64>,
    pub weight: Option<f64>,
    pub material: Option<String>,
    pub quantity: Option<u32>,
    pub cost_per_unit: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl Product {
    pub fn packaging(&self) -> PackagingInput {
        packaging_input(
            [
                self.dimensions_length,
                self.dimensions_width,
                self.dimensions_height,
            ],
            self.weight,
            self.material.as_deref(),
            self.cost_per_unit,
        )
    }
}

fn packaging_input(
    [length, width, height]: [Option<f64>; 3],
    weight: Option<f64>,
    material: Option<&str>,
    cost_per_unit: Option<f64>,
) -> PackagingInput {
    PackagingInput {
        dimensions_length: length,
        dimensions_width: width,
        dimensions_height: height,
        weight,
        material: material.map(str::to_string),
        cost_per_unit,
    }
}

/// Product as submitted by a client or decoded from an upload.
///
/// Numeric fields tolerate strings and garbage; unusable values are dropped
/// instead of rejecting the whole body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub dimensions_length: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub dimensions_width: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub dimensions_height: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub weight: Option<f64>,
    #[serde(default)]
    pub material: Option<String>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub quantity: Option<u32>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub cost_per_unit: Option<f64>,
}

impl NewProduct {
    pub fn packaging(&self) -> PackagingInput {
        packaging_input(
            [
                self.dimensions_length,
                self.dimensions_width,
                self.dimensions_height,
            ],
            self.weight,
            self.material.as_deref(),
            self.cost_per_unit,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadMethod {
    #[default]
    File,
    Camera,
}

impl UploadMethod {
    /// Unknown methods are recorded as plain file uploads.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|value| value.trim().to_ascii_lowercase()).as_deref() {
            Some("camera") => Self::Camera,
            _ => Self::File,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewUpload {
    pub filename: String,
    pub file_type: String,
    pub file_size: usize,
    pub upload_method: UploadMethod,
}

/// Audit trail entry for an uploaded product file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadRecord {
    pub id: UploadId,
    pub user_id: UserId,
    pub filename: String,
    pub file_type: String,
    pub file_size: usize,
    pub upload_method: UploadMethod,
    pub processed: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drafts_and_stored_products_feed_the_same_input() {
        let draft = NewProduct {
            name: "Widget Box".to_string(),
            dimensions_length: Some(30.0),
            dimensions_width: Some(20.0),
            dimensions_height: Some(15.0),
            weight: Some(2.5),
            material: Some("Cardboard".to_string()),
            cost_per_unit: Some(10.0),
            ..NewProduct::default()
        };
        let stored = Product {
            id: ProductId::from("prd-000001"),
            user_id: UserId::from("alice"),
            name: draft.name.clone(),
            category: None,
            dimensions_length: draft.dimensions_length,
            dimensions_width: draft.dimensions_width,
            dimensions_height: draft.dimensions_height,
            weight: draft.weight,
            material: draft.material.clone(),
            quantity: None,
            cost_per_unit: draft.cost_per_unit,
            created_at: Utc::now(),
        };

        let input = draft.packaging();
        assert_eq!(input.dimensions_height, Some(15.0));
        assert_eq!(input.material.as_deref(), Some("Cardboard"));
        assert_eq!(input, stored.packaging());
    }
}
