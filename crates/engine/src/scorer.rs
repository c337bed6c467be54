//! Explicit score recomputation and persistence.
//!
//! Scores are derived data and go stale when a profile changes; recompute
//! happens only on demand (product creation, the score endpoint, or the
//! `rescore` CLI command), never implicitly on save.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use verdant_core::domain::product::ProductId;
use verdant_core::scoring::{score_profile_with_trace, ScoreTrace};
use verdant_core::ServiceError;
use verdant_db::ProductRepository;

use crate::storage_error;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredProduct {
    pub product_id: ProductId,
    pub sustainability_score: f64,
    pub trace: ScoreTrace,
}

pub struct ScoreService {
    repository: Arc<dyn ProductRepository>,
}

impl ScoreService {
    pub fn new(repository: Arc<dyn ProductRepository>) -> Self {
        Self { repository }
    }

    /// Recompute and persist the score for one product.
    pub async fn recalculate(&self, product_id: &ProductId) -> Result<ScoredProduct, ServiceError> {
        let product = self
            .repository
            .find_by_id(product_id)
            .await
            .map_err(storage_error)?
            .ok_or_else(|| ServiceError::NotFound(product_id.0.clone()))?;

        let trace = score_profile_with_trace(product.sustainability.as_ref());
        self.repository.update_score(product_id, trace.score).await.map_err(storage_error)?;

        info!(product_id = %product_id, score = trace.score, "sustainability score persisted");
        Ok(ScoredProduct {
            product_id: product_id.clone(),
            sustainability_score: trace.score,
            trace,
        })
    }

    /// Recompute every product; returns the number updated.
    pub async fn recalculate_all(&self) -> Result<usize, ServiceError> {
        let products = self.repository.list_all().await.map_err(storage_error)?;
        let mut updated = 0usize;
        for product in &products {
            let score = score_profile_with_trace(product.sustainability.as_ref()).score;
            self.repository.update_score(&product.id, score).await.map_err(storage_error)?;
            updated += 1;
        }
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;
    use rust_decimal::Decimal;

    use verdant_core::domain::product::{Measurement, Product, ProductId, SustainabilityProfile};
    use verdant_core::{ServiceError, BASELINE_SCORE};
    use verdant_db::{InMemoryProductRepository, ProductRepository};

    use super::ScoreService;

    fn product(id: &str, profile: Option<SustainabilityProfile>) -> Product {
        Product {
            id: ProductId(id.to_string()),
            name: id.to_string(),
            description: "test".to_string(),
            brand: "brand".to_string(),
            category: "Home".to_string(),
            price: Decimal::TEN,
            image_url: None,
            sustainability: profile,
            sustainability_score: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn recalculate_persists_the_derived_score() {
        let profile = SustainabilityProfile {
            carbon_footprint: Some(Measurement { value: 2.0, unit: "kg CO2e".to_string() }),
            is_organic: true,
            ..SustainabilityProfile::default()
        };
        let repository =
            Arc::new(InMemoryProductRepository::with_products(vec![product("a", Some(profile))]).await);
        let service = ScoreService::new(repository.clone());

        let scored =
            service.recalculate(&ProductId("a".to_string())).await.expect("recalculate");
        assert_eq!(scored.sustainability_score, 70.0);

        let stored = repository
            .find_by_id(&ProductId("a".to_string()))
            .await
            .expect("lookup")
            .expect("present");
        assert_eq!(stored.sustainability_score, Some(70.0));
    }

    #[tokio::test]
    async fn product_without_a_profile_scores_the_baseline() {
        let repository =
            Arc::new(InMemoryProductRepository::with_products(vec![product("a", None)]).await);
        let service = ScoreService::new(repository);

        let scored =
            service.recalculate(&ProductId("a".to_string())).await.expect("recalculate");
        assert_eq!(scored.sustainability_score, BASELINE_SCORE);
        assert!(scored.trace.steps.is_empty());
    }

    #[tokio::test]
    async fn missing_product_is_not_found() {
        let repository = Arc::new(InMemoryProductRepository::default());
        let service = ScoreService::new(repository);
        let result = service.recalculate(&ProductId("ghost".to_string())).await;
        assert_eq!(result, Err(ServiceError::NotFound("ghost".to_string())));
    }

    #[tokio::test]
    async fn recalculate_all_touches_every_product() {
        let repository = Arc::new(
            InMemoryProductRepository::with_products(vec![product("a", None), product("b", None)])
                .await,
        );
        let service = ScoreService::new(repository.clone());

        let updated = service.recalculate_all().await.expect("recalculate all");
        assert_eq!(updated, 2);

        for id in ["a", "b"] {
            let stored = repository
                .find_by_id(&ProductId(id.to_string()))
                .await
                .expect("lookup")
                .expect("present");
            assert_eq!(stored.sustainability_score, Some(BASELINE_SCORE));
        }
    }
}
