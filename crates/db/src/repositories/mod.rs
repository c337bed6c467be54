use async_trait::async_trait;
use thiserror::Error;

use verdant_core::domain::product::{Product, ProductId};

pub mod memory;
pub mod product;

pub use memory::InMemoryProductRepository;
pub use product::SqlProductRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
}

/// Filtered category ranking used by alternative discovery: same-category
/// products, minus an exclusion set, optionally above a score threshold,
/// ordered by descending score (unscored products last).
#[derive(Clone, Debug, Default)]
pub struct CategoryRankQuery {
    pub category: String,
    pub exclude: Vec<ProductId>,
    /// Exclusive lower bound; products must score strictly above it.
    pub min_score_exclusive: Option<f64>,
    pub limit: u32,
}

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError>;
    async fn save(&self, product: Product) -> Result<(), RepositoryError>;
    async fn list_category_ranked(
        &self,
        query: CategoryRankQuery,
    ) -> Result<Vec<Product>, RepositoryError>;
    async fn update_score(&self, id: &ProductId, score: f64) -> Result<(), RepositoryError>;
    async fn list_all(&self) -> Result<Vec<Product>, RepositoryError>;
}
