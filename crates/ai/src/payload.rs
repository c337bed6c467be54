//! Typed shapes requested from the generation service. Field names match
//! the JSON the prompts ask for, so a well-behaved response decodes
//! directly; everything is defaulted because the provider routinely omits
//! fields it has nothing to say about.

use serde::{Deserialize, Serialize};

use verdant_core::domain::product::{Measurement, RecycledMaterials};

/// Sustainability indicators extracted from a product description.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SustainabilityIndicators {
    #[serde(default, deserialize_with = "verdant_core::domain::product::units::carbon")]
    pub carbon_footprint: Option<Measurement>,
    #[serde(default, deserialize_with = "verdant_core::domain::product::units::water")]
    pub water_usage: Option<Measurement>,
    #[serde(default)]
    pub recycled_materials: Option<RecycledMaterials>,
    #[serde(default)]
    pub certifications: Vec<String>,
    #[serde(default)]
    pub is_vegan: bool,
    #[serde(default)]
    pub is_organic: bool,
    #[serde(default)]
    pub sustainability_score: Option<f64>,
    #[serde(default)]
    pub sustainability_highlights: Vec<String>,
    #[serde(default)]
    pub sustainability_concerns: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tip {
    pub title: String,
    pub description: String,
}

/// A misleading marketing claim paired with the actual situation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GreenwashingWarning {
    pub claim: String,
    pub reality: String,
}

/// Category-level purchasing guidance.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTips {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub tips: Vec<Tip>,
    #[serde(default)]
    pub greenwashing_warnings: Vec<GreenwashingWarning>,
    #[serde(default)]
    pub disposal_guidance: Option<String>,
    #[serde(default)]
    pub sustainable_alternatives: Vec<String>,
}
