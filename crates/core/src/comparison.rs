//! Pure two-product comparison math.
//!
//! Everything here operates on already-loaded products; fetching and the
//! AI summary decoration are the engine's concern.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::product::{Product, ProductId};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSnapshot {
    pub id: ProductId,
    pub name: String,
    pub brand: String,
    pub sustainability_score: Option<f64>,
    pub price: Decimal,
}

impl From<&Product> for ProductSnapshot {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            brand: product.brand.clone(),
            sustainability_score: product.sustainability_score,
            price: product.price,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreComparison {
    /// product1 minus product2, missing scores counted as zero.
    pub difference: f64,
    pub better: ProductId,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceComparison {
    /// product1 minus product2; the cheaper product wins this metric.
    pub difference: Decimal,
    pub better: ProductId,
}

/// Sustainability score per currency unit. A zero price makes the ratio
/// undefined for that product, reported as `None` rather than aborting
/// the comparison; `better` is awarded only among defined ratios.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueRatioComparison {
    pub product1: Option<f64>,
    pub product2: Option<f64>,
    pub better: Option<ProductId>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasuredComparison {
    pub product1: f64,
    pub product2: f64,
    pub difference: f64,
    pub better: ProductId,
    pub unit: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PercentageComparison {
    pub product1: f64,
    pub product2: f64,
    pub difference: f64,
    pub better: ProductId,
}

/// Certifications are qualitative, so there is no `better` designation,
/// only the set partition. Output order follows product1's (then
/// product2's) declaration order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificationComparison {
    pub product1: Vec<String>,
    pub product2: Vec<String>,
    pub unique_to_product1: Vec<String>,
    pub unique_to_product2: Vec<String>,
    pub shared: Vec<String>,
}

/// Per-submetric block, present only when both products populate the
/// respective profile field.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedComparison {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carbon_footprint: Option<MeasuredComparison>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub water_usage: Option<MeasuredComparison>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recycled_materials: Option<PercentageComparison>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certifications: Option<CertificationComparison>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comparison {
    pub product1: ProductSnapshot,
    pub product2: ProductSnapshot,
    pub sustainability_score: ScoreComparison,
    pub price: PriceComparison,
    pub value_ratio: ValueRatioComparison,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detailed: Option<DetailedComparison>,
    /// Filled in by the comparator; the pure computation leaves it empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_summary: Option<String>,
}

#[derive(Clone, Copy)]
enum Prefer {
    Lower,
    Higher,
}

// Ties deterministically favor the first argument.
fn better_of(id1: &ProductId, id2: &ProductId, value1: f64, value2: f64, prefer: Prefer) -> ProductId {
    let second_wins = match prefer {
        Prefer::Lower => value2 < value1,
        Prefer::Higher => value2 > value1,
    };
    if second_wins { id2.clone() } else { id1.clone() }
}

fn value_ratio(score: Option<f64>, price: Decimal) -> Option<f64> {
    let price = price.to_f64().filter(|value| *value > 0.0)?;
    Some(score.unwrap_or(0.0) / price)
}

fn detailed_comparison(product1: &Product, product2: &Product) -> Option<DetailedComparison> {
    let profile1 = product1.sustainability.as_ref()?;
    let profile2 = product2.sustainability.as_ref()?;
    let mut detailed = DetailedComparison::default();

    if let (Some(carbon1), Some(carbon2)) = (&profile1.carbon_footprint, &profile2.carbon_footprint)
    {
        detailed.carbon_footprint = Some(MeasuredComparison {
            product1: carbon1.value,
            product2: carbon2.value,
            difference: carbon1.value - carbon2.value,
            better: better_of(&product1.id, &product2.id, carbon1.value, carbon2.value, Prefer::Lower),
            unit: carbon1.unit.clone(),
        });
    }

    if let (Some(water1), Some(water2)) = (&profile1.water_usage, &profile2.water_usage) {
        detailed.water_usage = Some(MeasuredComparison {
            product1: water1.value,
            product2: water2.value,
            difference: water1.value - water2.value,
            better: better_of(&product1.id, &product2.id, water1.value, water2.value, Prefer::Lower),
            unit: water1.unit.clone(),
        });
    }

    if let (Some(recycled1), Some(recycled2)) =
        (&profile1.recycled_materials, &profile2.recycled_materials)
    {
        detailed.recycled_materials = Some(PercentageComparison {
            product1: recycled1.percentage,
            product2: recycled2.percentage,
            difference: recycled1.percentage - recycled2.percentage,
            better: better_of(
                &product1.id,
                &product2.id,
                recycled1.percentage,
                recycled2.percentage,
                Prefer::Higher,
            ),
        });
    }

    if !profile1.certifications.is_empty() || !profile2.certifications.is_empty() {
        let certs1 = &profile1.certifications;
        let certs2 = &profile2.certifications;
        detailed.certifications = Some(CertificationComparison {
            product1: certs1.clone(),
            product2: certs2.clone(),
            unique_to_product1: certs1.iter().filter(|c| !certs2.contains(c)).cloned().collect(),
            unique_to_product2: certs2.iter().filter(|c| !certs1.contains(c)).cloned().collect(),
            shared: certs1.iter().filter(|c| certs2.contains(c)).cloned().collect(),
        });
    }

    Some(detailed)
}

/// Compare two products across score, price, value ratio, and the detailed
/// sustainability sub-metrics.
pub fn compare_products(product1: &Product, product2: &Product) -> Comparison {
    let score1 = product1.sustainability_score.unwrap_or(0.0);
    let score2 = product2.sustainability_score.unwrap_or(0.0);

    let ratio1 = value_ratio(product1.sustainability_score, product1.price);
    let ratio2 = value_ratio(product2.sustainability_score, product2.price);
    let ratio_better = match (ratio1, ratio2) {
        (Some(r1), Some(r2)) => {
            Some(better_of(&product1.id, &product2.id, r1, r2, Prefer::Higher))
        }
        (Some(_), None) => Some(product1.id.clone()),
        (None, Some(_)) => Some(product2.id.clone()),
        (None, None) => None,
    };

    Comparison {
        product1: ProductSnapshot::from(product1),
        product2: ProductSnapshot::from(product2),
        sustainability_score: ScoreComparison {
            difference: score1 - score2,
            better: better_of(&product1.id, &product2.id, score1, score2, Prefer::Higher),
        },
        price: PriceComparison {
            difference: product1.price - product2.price,
            better: better_of(
                &product1.id,
                &product2.id,
                product1.price.to_f64().unwrap_or(f64::MAX),
                product2.price.to_f64().unwrap_or(f64::MAX),
                Prefer::Lower,
            ),
        },
        value_ratio: ValueRatioComparison { product1: ratio1, product2: ratio2, better: ratio_better },
        detailed: detailed_comparison(product1, product2),
        ai_summary: None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use chrono::Utc;
    use rust_decimal::Decimal;

    use crate::domain::product::{
        Measurement, Product, ProductId, RecycledMaterials, SustainabilityProfile,
    };

    use super::compare_products;

    fn product(id: &str, score: Option<f64>, price: Decimal, certs: &[&str]) -> Product {
        Product {
            id: ProductId(id.to_string()),
            name: format!("product {id}"),
            description: "test".to_string(),
            brand: "brand".to_string(),
            category: "Home".to_string(),
            price,
            image_url: None,
            sustainability: Some(SustainabilityProfile {
                carbon_footprint: Some(Measurement { value: 4.0, unit: "kg CO2e".to_string() }),
                water_usage: Some(Measurement { value: 120.0, unit: "liters".to_string() }),
                recycled_materials: Some(RecycledMaterials {
                    percentage: 25.0,
                    materials: vec!["Recycled PET".to_string()],
                }),
                certifications: certs.iter().map(|c| c.to_string()).collect(),
                is_vegan: true,
                ..SustainabilityProfile::default()
            }),
            sustainability_score: score,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn higher_score_wins_and_lower_price_wins() {
        let a = product("a", Some(80.0), Decimal::new(2999, 2), &[]);
        let b = product("b", Some(60.0), Decimal::new(999, 2), &[]);
        let comparison = compare_products(&a, &b);

        assert_eq!(comparison.sustainability_score.difference, 20.0);
        assert_eq!(comparison.sustainability_score.better.0, "a");
        assert_eq!(comparison.price.better.0, "b");
    }

    #[test]
    fn equal_scores_designate_the_first_argument() {
        let a = product("a", Some(70.0), Decimal::new(1000, 2), &[]);
        let b = product("b", Some(70.0), Decimal::new(1000, 2), &[]);
        let comparison = compare_products(&a, &b);
        assert_eq!(comparison.sustainability_score.better.0, "a");
    }

    #[test]
    fn zero_price_reports_an_undefined_ratio_instead_of_failing() {
        let a = product("a", Some(80.0), Decimal::ZERO, &[]);
        let b = product("b", Some(40.0), Decimal::new(500, 2), &[]);
        let comparison = compare_products(&a, &b);

        assert_eq!(comparison.value_ratio.product1, None);
        assert_eq!(comparison.value_ratio.product2, Some(40.0 / 5.0));
        assert_eq!(comparison.value_ratio.better.as_ref().map(|id| id.0.as_str()), Some("b"));
    }

    #[test]
    fn certification_partition_covers_both_lists() {
        let a = product("a", Some(70.0), Decimal::TEN, &["GOTS", "Fair Trade", "B Corp"]);
        let b = product("b", Some(60.0), Decimal::TEN, &["B Corp", "Climate Neutral"]);
        let comparison = compare_products(&a, &b);
        let certs = comparison.detailed.and_then(|d| d.certifications).unwrap();

        assert_eq!(certs.unique_to_product1, vec!["GOTS", "Fair Trade"]);
        assert_eq!(certs.unique_to_product2, vec!["Climate Neutral"]);
        assert_eq!(certs.shared, vec!["B Corp"]);

        let rebuilt: BTreeSet<_> =
            certs.unique_to_product1.iter().chain(certs.shared.iter()).collect();
        let original: BTreeSet<_> = certs.product1.iter().collect();
        assert_eq!(rebuilt, original);
        assert!(certs.unique_to_product1.iter().all(|c| !certs.shared.contains(c)));
    }

    #[test]
    fn detailed_block_requires_both_profiles() {
        let a = product("a", Some(70.0), Decimal::TEN, &[]);
        let mut b = product("b", Some(60.0), Decimal::TEN, &[]);
        b.sustainability = None;
        assert!(compare_products(&a, &b).detailed.is_none());
    }

    #[test]
    fn submetric_requires_both_sides_populated() {
        let a = product("a", Some(70.0), Decimal::TEN, &[]);
        let mut b = product("b", Some(60.0), Decimal::TEN, &[]);
        if let Some(profile) = b.sustainability.as_mut() {
            profile.water_usage = None;
        }
        let detailed = compare_products(&a, &b).detailed.unwrap();
        assert!(detailed.water_usage.is_none());
        assert!(detailed.carbon_footprint.is_some());
    }

    #[test]
    fn lower_carbon_and_higher_recycled_content_win_their_submetrics() {
        let mut a = product("a", Some(70.0), Decimal::TEN, &[]);
        let b = product("b", Some(60.0), Decimal::TEN, &[]);
        if let Some(profile) = a.sustainability.as_mut() {
            profile.carbon_footprint = Some(Measurement { value: 1.0, unit: "kg CO2e".to_string() });
            profile.recycled_materials =
                Some(RecycledMaterials { percentage: 90.0, materials: Vec::new() });
        }
        let detailed = compare_products(&a, &b).detailed.unwrap();
        assert_eq!(detailed.carbon_footprint.unwrap().better.0, "a");
        assert_eq!(detailed.recycled_materials.unwrap().better.0, "a");
    }
}
