use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductId(pub String);

impl ProductId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A physical measurement with a unit, e.g. `{ value: 2.1, unit: "kg CO2e" }`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub value: f64,
    pub unit: String,
}

/// Deserializers filling in the conventional unit when a payload carries
/// only a bare value. Generation responses and catalog submissions both
/// omit units routinely; a missing unit is not a decode failure.
pub mod units {
    use serde::{Deserialize, Deserializer};

    use super::Measurement;

    pub const CARBON: &str = "kg CO2e";
    pub const WATER: &str = "liters";

    #[derive(Deserialize)]
    struct BareMeasurement {
        value: f64,
        unit: Option<String>,
    }

    fn decode<'de, D>(
        deserializer: D,
        default_unit: &str,
    ) -> Result<Option<Measurement>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<BareMeasurement>::deserialize(deserializer)?;
        Ok(raw.map(|raw| Measurement {
            value: raw.value,
            unit: raw.unit.unwrap_or_else(|| default_unit.to_string()),
        }))
    }

    pub fn carbon<'de, D>(deserializer: D) -> Result<Option<Measurement>, D::Error>
    where
        D: Deserializer<'de>,
    {
        decode(deserializer, CARBON)
    }

    pub fn water<'de, D>(deserializer: D) -> Result<Option<Measurement>, D::Error>
    where
        D: Deserializer<'de>,
    {
        decode(deserializer, WATER)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecycledMaterials {
    pub percentage: f64,
    #[serde(default)]
    pub materials: Vec<String>,
}

/// Environmental and ethical attributes attached to a product.
///
/// Every quantitative subfield is optional: disclosure is voluntary and an
/// absent field contributes nothing to the score. The descriptive fields
/// (country, transport, packaging) are informational only and never scored.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SustainabilityProfile {
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "units::carbon")]
    pub carbon_footprint: Option<Measurement>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "units::water")]
    pub water_usage: Option<Measurement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recycled_materials: Option<RecycledMaterials>,
    #[serde(default)]
    pub certifications: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub production_country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transportation_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub packaging_type: Option<String>,
    #[serde(default)]
    pub is_vegan: bool,
    #[serde(default)]
    pub is_organic: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub brand: String,
    pub category: String,
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sustainability: Option<SustainabilityProfile>,
    /// Derived via the scoring model; null until the first explicit
    /// recompute and stale until the next one after a profile edit.
    #[serde(default)]
    pub sustainability_score: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Score used for ranking; unscored products sort below everything.
    pub fn ranking_score(&self) -> f64 {
        self.sustainability_score.unwrap_or(f64::MIN)
    }
}

#[cfg(test)]
mod tests {
    use super::SustainabilityProfile;

    #[test]
    fn bare_measurements_default_to_the_conventional_units() {
        let profile: SustainabilityProfile = serde_json::from_str(
            r#"{"carbonFootprint": {"value": 2.0}, "waterUsage": {"value": 400}}"#,
        )
        .expect("profile decodes");

        let carbon = profile.carbon_footprint.expect("carbon present");
        assert_eq!(carbon.value, 2.0);
        assert_eq!(carbon.unit, "kg CO2e");

        let water = profile.water_usage.expect("water present");
        assert_eq!(water.unit, "liters");
    }

    #[test]
    fn explicit_units_are_kept() {
        let profile: SustainabilityProfile = serde_json::from_str(
            r#"{"carbonFootprint": {"value": 2.0, "unit": "t CO2e"}}"#,
        )
        .expect("profile decodes");

        assert_eq!(profile.carbon_footprint.expect("carbon present").unit, "t CO2e");
    }
}
