use super::materials::MaterialClass;
use serde::{Deserialize, Serialize};

const BASE_CONFIDENCE: f64 = 0.7;
const CONFIDENCE_STEP: f64 = 0.1;
const MAX_CONFIDENCE: f64 = 1.0;
const MIN_DIMENSION_FRACTION: f64 = 0.05;
const DIMENSION_FRACTION_SPAN: f64 = 0.10;
const GRAMS_PER_KG: f64 = 1000.0;
const CO2_KG_PER_VOLUME_UNIT: f64 = 0.001;

/// Packaging attributes of a single product, as declared by the user.
///
/// Every field is optional: absent values count as zero and only lower the
/// confidence of the resulting recommendation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackagingInput {
    pub dimensions_length: Option<f64>,
    pub dimensions_width: Option<f64>,
    pub dimensions_height: Option<f64>,
    pub weight: Option<f64>,
    pub material: Option<String>,
    pub cost_per_unit: Option<f64>,
}

/// Box dimensions in centimetres.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub length: f64,
    pub width: f64,
    pub height: f64,
}

impl Dimensions {
    pub fn volume(&self) -> f64 {
        self.length * self.width * self.height
    }

    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            length: self.length * factor,
            width: self.width * factor,
            height: self.height * factor,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub original_cost: f64,
    pub optimized_cost: f64,
    pub cost_savings: f64,
    pub waste_reduction_percentage: f64,
    pub co2_reduction_kg: f64,
    pub recommended_material: String,
    pub recommended_dimensions: Dimensions,
    pub confidence_score: f64,
}

/// Compute the packaging recommendation for one product.
pub fn calculate(input: &PackagingInput) -> OptimizationResult {
    let dimensions = Dimensions {
        length: non_negative(input.dimensions_length),
        width: non_negative(input.dimensions_width),
        height: non_negative(input.dimensions_height),
    };
    let weight = non_negative(input.weight);
    let original_cost = non_negative(input.cost_per_unit);
    let material = input
        .material
        .as_deref()
        .filter(|value| !value.trim().is_empty());

    let class = MaterialClass::classify(material);
    let volume = dimensions.volume();
    let dimension_fraction = dimension_fraction(volume, weight);
    let total_fraction = class.savings_fraction() + dimension_fraction;

    let optimized_cost = original_cost * (1.0 - total_fraction);

    OptimizationResult {
        original_cost,
        optimized_cost,
        cost_savings: original_cost - optimized_cost,
        waste_reduction_percentage: total_fraction * 100.0,
        co2_reduction_kg: volume * CO2_KG_PER_VOLUME_UNIT * total_fraction,
        recommended_material: class.recommended_material().to_string(),
        recommended_dimensions: dimensions.scaled(1.0 - dimension_fraction),
        confidence_score: confidence(&dimensions, weight, material.is_some()),
    }
}

// Yields a value in [0.05, 0.15] for any positive volume. A zero weight makes
// the ratio infinite, which clamps to full efficiency.
fn dimension_fraction(volume: f64, weight: f64) -> f64 {
    if volume <= 0.0 {
        return 0.0;
    }

    let efficiency = (volume / (weight * GRAMS_PER_KG)).min(1.0);
    MIN_DIMENSION_FRACTION + DIMENSION_FRACTION_SPAN * (1.0 - efficiency)
}

fn confidence(dimensions: &Dimensions, weight: f64, has_material: bool) -> f64 {
    let bonuses = [
        dimensions.length > 0.0 && dimensions.width > 0.0 && dimensions.height > 0.0,
        weight > 0.0,
        has_material,
    ]
    .into_iter()
    .filter(|present| *present)
    .count();

    (BASE_CONFIDENCE + CONFIDENCE_STEP * bonuses as f64).min(MAX_CONFIDENCE)
}

fn non_negative(value: Option<f64>) -> f64 {
    match value {
        Some(number) if number.is_finite() && number > 0.0 => number,
        _ => 0.0,
    }
}
