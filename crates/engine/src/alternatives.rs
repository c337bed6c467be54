//! Greener-substitute discovery within a product's category.

use std::sync::Arc;

use tracing::debug;

use verdant_core::domain::product::{Product, ProductId};
use verdant_core::ServiceError;
use verdant_db::{CategoryRankQuery, ProductRepository};

use crate::storage_error;

pub struct AlternativeFinder {
    repository: Arc<dyn ProductRepository>,
}

impl AlternativeFinder {
    pub fn new(repository: Arc<dyn ProductRepository>) -> Self {
        Self { repository }
    }

    /// Rank up to `limit` substitutes for the referenced product.
    ///
    /// Strictly higher-scoring same-category products come first; if they
    /// do not fill the limit, the best remaining same-category products
    /// follow as a fallback. An empty category yields an empty list, not
    /// an error.
    pub async fn find(
        &self,
        product_id: &ProductId,
        limit: u32,
    ) -> Result<Vec<Product>, ServiceError> {
        let reference = self
            .repository
            .find_by_id(product_id)
            .await
            .map_err(storage_error)?
            .ok_or_else(|| ServiceError::NotFound(product_id.0.clone()))?;

        // A never-scored reference ranks below everything, so any scored
        // product in the category counts as strictly better.
        let reference_score = reference.ranking_score();

        let mut alternatives = self
            .repository
            .list_category_ranked(CategoryRankQuery {
                category: reference.category.clone(),
                exclude: vec![reference.id.clone()],
                min_score_exclusive: Some(reference_score),
                limit,
            })
            .await
            .map_err(storage_error)?;

        if (alternatives.len() as u32) < limit {
            let mut exclude = vec![reference.id.clone()];
            exclude.extend(alternatives.iter().map(|product| product.id.clone()));

            let fallback = self
                .repository
                .list_category_ranked(CategoryRankQuery {
                    category: reference.category.clone(),
                    exclude,
                    min_score_exclusive: None,
                    limit: limit - alternatives.len() as u32,
                })
                .await
                .map_err(storage_error)?;

            debug!(
                product_id = %product_id,
                primary = alternatives.len(),
                fallback = fallback.len(),
                "filled alternatives from category fallback"
            );
            alternatives.extend(fallback);
        }

        Ok(alternatives)
    }
}
