//! JSON schemas handed to the provider's structured-output mode.
//!
//! Every property is listed as required and extra properties are rejected,
//! mirroring the `deny_unknown_fields` decoding on the Rust side.

use serde_json::{json, Map, Value};

fn string() -> Value {
    json!({"type": "string"})
}

fn number() -> Value {
    json!({"type": "number"})
}

fn array_of(items: Value) -> Value {
    json!({"type": "array", "items": items})
}

fn object(properties: Vec<(&str, Value)>) -> Value {
    let required: Vec<Value> = properties
        .iter()
        .map(|(name, _)| Value::from(*name))
        .collect();
    let properties: Map<String, Value> = properties
        .into_iter()
        .map(|(name, schema)| (name.to_string(), schema))
        .collect();

    json!({
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": false
    })
}

fn dimensions() -> Value {
    object(vec![
        ("length", number()),
        ("width", number()),
        ("height", number()),
    ])
}

pub(super) fn optimization_plan() -> Value {
    let recommendation = object(vec![
        ("productId", string()),
        ("productName", string()),
        ("currentDimensions", dimensions()),
        ("optimizedDimensions", dimensions()),
        ("currentMaterial", string()),
        ("recommendedMaterial", string()),
        ("costSavingsPercentage", number()),
        ("wasteReductionPercentage", number()),
        ("co2ReductionKg", number()),
        ("confidenceScore", number()),
        ("reasoning", string()),
        (
            "status",
            json!({"type": "string", "enum": ["optimized", "warning", "optimal"]}),
        ),
    ]);
    let summary = object(vec![
        ("totalProducts", number()),
        ("totalCostSavings", number()),
        ("averageWasteReduction", number()),
        ("totalCo2Reduction", number()),
    ]);

    object(vec![
        ("recommendations", array_of(recommendation)),
        ("summary", summary),
    ])
}

pub(super) fn report_content() -> Value {
    let key_metrics = object(vec![
        ("totalProducts", number()),
        ("totalSavings", number()),
        ("avgWasteReduction", number()),
        ("co2Reduction", number()),
    ]);
    let section = object(vec![
        ("title", string()),
        ("content", string()),
        ("insights", array_of(string())),
    ]);

    object(vec![
        ("title", string()),
        ("executiveSummary", string()),
        ("keyMetrics", key_metrics),
        ("sections", array_of(section)),
        ("recommendations", array_of(string())),
        ("conclusion", string()),
    ])
}
