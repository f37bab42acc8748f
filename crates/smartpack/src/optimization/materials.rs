use serde::Serialize;

/// Packaging material families with a known substitution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialClass {
    Plastic,
    Cardboard,
    Metal,
    Other,
}

impl MaterialClass {
    /// Case-insensitive lookup; blank or unknown materials fall into `Other`.
    pub fn classify(material: Option<&str>) -> Self {
        let normalized = material.map(|value| value.trim().to_ascii_lowercase());
        match normalized.as_deref() {
            Some("plastic") => Self::Plastic,
            Some("cardboard") => Self::Cardboard,
            Some("metal") => Self::Metal,
            _ => Self::Other,
        }
    }

    pub const fn savings_fraction(self) -> f64 {
        match self {
            Self::Plastic => 0.15,
            Self::Cardboard => 0.08,
            Self::Metal => 0.12,
            Self::Other => 0.10,
        }
    }

    pub const fn recommended_material(self) -> &'static str {
        match self {
            Self::Plastic => "Recycled Plastic",
            Self::Cardboard => "Optimized Cardboard",
            Self::Metal => "Recycled Aluminum",
            Self::Other => "Eco-Friendly Alternative",
        }
    }
}
