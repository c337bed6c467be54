//! Deterministic demo catalog used by `verdant seed` and integration tests.
//!
//! Six products across three categories, each category holding a greener
//! and a conventional option so alternative discovery and comparison have
//! meaningful data. Scores are computed through the scoring model at load
//! time rather than hard-coded.

use std::str::FromStr;

use chrono::Utc;
use rust_decimal::Decimal;

use verdant_core::domain::product::{
    Measurement, Product, ProductId, RecycledMaterials, SustainabilityProfile,
};
use verdant_core::scoring::score_profile;

use crate::repositories::{ProductRepository, RepositoryError, SqlProductRepository};
use crate::DbPool;

pub struct SeedCatalog;

#[derive(Clone, Debug)]
pub struct SeedResult {
    pub inserted: usize,
}

#[derive(Clone, Debug)]
pub struct VerificationResult {
    pub all_present: bool,
    pub checks: Vec<(&'static str, bool)>,
}

impl SeedCatalog {
    /// Replace the product table contents with the demo catalog.
    pub async fn load(pool: &DbPool) -> Result<SeedResult, RepositoryError> {
        sqlx::query("DELETE FROM product").execute(pool).await?;

        let repository = SqlProductRepository::new(pool.clone());
        let products = demo_products();
        let inserted = products.len();
        for product in products {
            repository.save(product).await?;
        }

        Ok(SeedResult { inserted })
    }

    pub async fn verify(pool: &DbPool) -> Result<VerificationResult, RepositoryError> {
        let repository = SqlProductRepository::new(pool.clone());
        let all = repository.list_all().await?;

        let checks = vec![
            ("six_products_present", all.len() == 6),
            ("every_product_scored", all.iter().all(|p| p.sustainability_score.is_some())),
            ("clothing_category_present", all.iter().any(|p| p.category == "Clothing")),
            ("home_category_present", all.iter().any(|p| p.category == "Home")),
            ("personal_care_category_present", all.iter().any(|p| p.category == "Personal Care")),
        ];
        let all_present = checks.iter().all(|(_, passed)| *passed);

        Ok(VerificationResult { all_present, checks })
    }
}

fn money(raw: &str) -> Decimal {
    // Literals below are well-formed decimal strings.
    Decimal::from_str(raw).unwrap_or(Decimal::ZERO)
}

fn measurement(value: f64, unit: &str) -> Option<Measurement> {
    Some(Measurement { value, unit: unit.to_string() })
}

struct SeedSpec {
    name: &'static str,
    description: &'static str,
    price: &'static str,
    category: &'static str,
    brand: &'static str,
    image_url: &'static str,
    profile: SustainabilityProfile,
}

fn build(spec: SeedSpec) -> Product {
    let now = Utc::now();
    let score = score_profile(Some(&spec.profile));
    Product {
        id: ProductId::generate(),
        name: spec.name.to_string(),
        description: spec.description.to_string(),
        brand: spec.brand.to_string(),
        category: spec.category.to_string(),
        price: money(spec.price),
        image_url: Some(spec.image_url.to_string()),
        sustainability: Some(spec.profile),
        sustainability_score: Some(score),
        created_at: now,
        updated_at: now,
    }
}

pub fn demo_products() -> Vec<Product> {
    vec![
        build(SeedSpec {
            name: "Organic Cotton T-Shirt",
            description: "Made from 100% organic cotton grown without harmful pesticides. \
                          GOTS certified and produced in a factory running on renewable \
                          energy, using 91% less water than conventional cotton with a \
                          carbon footprint of just 2.1 kg CO2e.",
            price: "24.99",
            category: "Clothing",
            brand: "EcoWear",
            image_url: "https://example.com/tshirt.jpg",
            profile: SustainabilityProfile {
                carbon_footprint: measurement(2.1, "kg CO2e"),
                water_usage: measurement(400.0, "liters"),
                recycled_materials: Some(RecycledMaterials {
                    percentage: 0.0,
                    materials: Vec::new(),
                }),
                certifications: vec!["GOTS".to_string(), "Fair Trade".to_string()],
                production_country: Some("Portugal".to_string()),
                transportation_method: Some("Sea freight".to_string()),
                packaging_type: Some("Recycled paper".to_string()),
                is_vegan: true,
                is_organic: true,
            },
        }),
        build(SeedSpec {
            name: "Standard Cotton T-Shirt",
            description: "Classic cotton t-shirt made from standard cotton. Comfortable \
                          fit and durable quality.",
            price: "15.99",
            category: "Clothing",
            brand: "BasicBrand",
            image_url: "https://example.com/basic-tshirt.jpg",
            profile: SustainabilityProfile {
                carbon_footprint: measurement(5.4, "kg CO2e"),
                water_usage: measurement(2700.0, "liters"),
                recycled_materials: Some(RecycledMaterials {
                    percentage: 0.0,
                    materials: Vec::new(),
                }),
                certifications: Vec::new(),
                production_country: Some("Bangladesh".to_string()),
                transportation_method: Some("Air freight".to_string()),
                packaging_type: Some("Plastic bag".to_string()),
                is_vegan: true,
                is_organic: false,
            },
        }),
        build(SeedSpec {
            name: "Recycled Plastic Water Bottle",
            description: "Durable water bottle made from 100% recycled plastic. BPA-free \
                          and keeps single-use plastic out of landfills and oceans.",
            price: "19.99",
            category: "Home",
            brand: "GreenLife",
            image_url: "https://example.com/bottle.jpg",
            profile: SustainabilityProfile {
                carbon_footprint: measurement(1.2, "kg CO2e"),
                water_usage: measurement(50.0, "liters"),
                recycled_materials: Some(RecycledMaterials {
                    percentage: 100.0,
                    materials: vec!["Recycled PET".to_string()],
                }),
                certifications: vec!["B Corp".to_string()],
                production_country: Some("USA".to_string()),
                transportation_method: Some("Ground shipping".to_string()),
                packaging_type: Some("Minimal recycled cardboard".to_string()),
                is_vegan: true,
                is_organic: false,
            },
        }),
        build(SeedSpec {
            name: "Stainless Steel Water Bottle",
            description: "Premium stainless steel water bottle that keeps drinks cold for \
                          24 hours or hot for 12. Designed to last a lifetime.",
            price: "29.99",
            category: "Home",
            brand: "EcoFlow",
            image_url: "https://example.com/steel-bottle.jpg",
            profile: SustainabilityProfile {
                carbon_footprint: measurement(7.8, "kg CO2e"),
                water_usage: measurement(180.0, "liters"),
                recycled_materials: Some(RecycledMaterials {
                    percentage: 30.0,
                    materials: vec!["Recycled steel".to_string()],
                }),
                certifications: vec!["B Corp".to_string(), "Climate Neutral".to_string()],
                production_country: Some("China".to_string()),
                transportation_method: Some("Sea freight".to_string()),
                packaging_type: Some("Recycled paper".to_string()),
                is_vegan: true,
                is_organic: false,
            },
        }),
        build(SeedSpec {
            name: "Conventional Plastic Water Bottle",
            description: "Standard plastic water bottle for everyday use. Lightweight and \
                          affordable.",
            price: "5.99",
            category: "Home",
            brand: "BasicBrand",
            image_url: "https://example.com/plastic-bottle.jpg",
            profile: SustainabilityProfile {
                carbon_footprint: measurement(4.2, "kg CO2e"),
                water_usage: measurement(100.0, "liters"),
                recycled_materials: Some(RecycledMaterials {
                    percentage: 0.0,
                    materials: Vec::new(),
                }),
                certifications: Vec::new(),
                production_country: Some("China".to_string()),
                transportation_method: Some("Air freight".to_string()),
                packaging_type: Some("Plastic wrap".to_string()),
                is_vegan: true,
                is_organic: false,
            },
        }),
        build(SeedSpec {
            name: "Bamboo Toothbrush Set",
            description: "Pack of 4 toothbrushes with biodegradable bamboo handles and \
                          BPA-free nylon bristles in plastic-free compostable packaging.",
            price: "12.99",
            category: "Personal Care",
            brand: "EcoSmile",
            image_url: "https://example.com/toothbrush.jpg",
            profile: SustainabilityProfile {
                carbon_footprint: measurement(0.5, "kg CO2e"),
                water_usage: measurement(30.0, "liters"),
                recycled_materials: Some(RecycledMaterials {
                    percentage: 0.0,
                    materials: Vec::new(),
                }),
                certifications: vec!["Plastic Free".to_string(), "Compostable".to_string()],
                production_country: Some("Vietnam".to_string()),
                transportation_method: Some("Sea freight".to_string()),
                packaging_type: Some("Compostable paper".to_string()),
                is_vegan: true,
                is_organic: true,
            },
        }),
    ]
}
