//! Two-product comparison orchestration: concurrent fetches, pure metric
//! assembly, and best-effort AI summary decoration.

use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use verdant_ai::{AiBridge, ComparisonPrompt, PromptProduct};
use verdant_core::comparison::{compare_products, Comparison};
use verdant_core::domain::product::{Product, ProductId};
use verdant_core::ServiceError;
use verdant_db::ProductRepository;

use crate::storage_error;

/// Substituted whenever the summary call fails, times out, or returns
/// garbage; the comparison itself always succeeds past the fetch stage.
pub const FALLBACK_SUMMARY: &str = "AI-powered comparison currently unavailable.";

const DEFAULT_SUMMARY_TIMEOUT: Duration = Duration::from_secs(10);

pub struct Comparator {
    repository: Arc<dyn ProductRepository>,
    bridge: Arc<AiBridge>,
    summary_timeout: Duration,
}

impl Comparator {
    pub fn new(repository: Arc<dyn ProductRepository>, bridge: Arc<AiBridge>) -> Self {
        Self { repository, bridge, summary_timeout: DEFAULT_SUMMARY_TIMEOUT }
    }

    pub fn with_summary_timeout(mut self, timeout: Duration) -> Self {
        self.summary_timeout = timeout;
        self
    }

    pub async fn compare(
        &self,
        product1_id: &ProductId,
        product2_id: &ProductId,
    ) -> Result<Comparison, ServiceError> {
        // Independent point reads, no ordering between them.
        let (first, second) = tokio::join!(
            self.repository.find_by_id(product1_id),
            self.repository.find_by_id(product2_id),
        );

        let (product1, product2) = match (
            first.map_err(storage_error)?,
            second.map_err(storage_error)?,
        ) {
            (Some(product1), Some(product2)) => (product1, product2),
            // Deliberately combined: the caller is not told which id failed.
            _ => return Err(ServiceError::NotFound("one or both products not found".to_string())),
        };

        let mut comparison = compare_products(&product1, &product2);
        comparison.ai_summary = Some(self.summarize(&product1, &product2).await);
        Ok(comparison)
    }

    async fn summarize(&self, product1: &Product, product2: &Product) -> String {
        let prompt = ComparisonPrompt {
            product1: prompt_product(product1),
            product2: prompt_product(product2),
        };

        match tokio::time::timeout(self.summary_timeout, self.bridge.comparison_summary(&prompt))
            .await
        {
            Ok(Ok(summary)) => summary,
            Ok(Err(error)) => {
                warn!(error = %error, "comparison summary generation failed, using fallback");
                FALLBACK_SUMMARY.to_string()
            }
            Err(_) => {
                warn!(
                    timeout_secs = self.summary_timeout.as_secs_f64(),
                    "comparison summary timed out, using fallback"
                );
                FALLBACK_SUMMARY.to_string()
            }
        }
    }
}

fn prompt_product(product: &Product) -> PromptProduct {
    let profile = product.sustainability.as_ref();
    PromptProduct {
        name: product.name.clone(),
        brand: product.brand.clone(),
        sustainability_score: product.sustainability_score,
        price: product.price,
        carbon_footprint: profile
            .and_then(|p| p.carbon_footprint.as_ref())
            .map(|carbon| (carbon.value, carbon.unit.clone())),
        recycled_percentage: profile
            .and_then(|p| p.recycled_materials.as_ref())
            .map(|recycled| recycled.percentage),
    }
}
