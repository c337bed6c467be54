use std::collections::HashMap;

use tokio::sync::RwLock;

use verdant_core::domain::product::{Product, ProductId};

use super::{CategoryRankQuery, ProductRepository, RepositoryError};

/// Map-backed repository with the same ranking semantics as the SQL one,
/// used by engine unit tests and the seed verification path.
#[derive(Default)]
pub struct InMemoryProductRepository {
    products: RwLock<HashMap<String, Product>>,
}

impl InMemoryProductRepository {
    pub async fn with_products(products: Vec<Product>) -> Self {
        let repository = Self::default();
        {
            let mut map = repository.products.write().await;
            for product in products {
                map.insert(product.id.0.clone(), product);
            }
        }
        repository
    }
}

#[async_trait::async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError> {
        let products = self.products.read().await;
        Ok(products.get(&id.0).cloned())
    }

    async fn save(&self, product: Product) -> Result<(), RepositoryError> {
        let mut products = self.products.write().await;
        products.insert(product.id.0.clone(), product);
        Ok(())
    }

    async fn list_category_ranked(
        &self,
        query: CategoryRankQuery,
    ) -> Result<Vec<Product>, RepositoryError> {
        let products = self.products.read().await;
        let mut matches: Vec<Product> = products
            .values()
            .filter(|product| product.category == query.category)
            .filter(|product| !query.exclude.contains(&product.id))
            .filter(|product| match query.min_score_exclusive {
                // The SQL threshold filter also drops unscored rows.
                Some(min) => product.sustainability_score.is_some_and(|score| score > min),
                None => true,
            })
            .cloned()
            .collect();

        matches.sort_by(|a, b| {
            b.ranking_score()
                .partial_cmp(&a.ranking_score())
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.id.0.cmp(&b.id.0))
        });
        matches.truncate(query.limit as usize);
        Ok(matches)
    }

    async fn update_score(&self, id: &ProductId, score: f64) -> Result<(), RepositoryError> {
        let mut products = self.products.write().await;
        if let Some(product) = products.get_mut(&id.0) {
            product.sustainability_score = Some(score);
            product.updated_at = chrono::Utc::now();
        }
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Product>, RepositoryError> {
        let products = self.products.read().await;
        let mut all: Vec<Product> = products.values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.0.cmp(&b.id.0)));
        Ok(all)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rust_decimal::Decimal;

    use verdant_core::domain::product::{Product, ProductId};

    use super::{CategoryRankQuery, InMemoryProductRepository, ProductRepository};

    fn product(id: &str, category: &str, score: Option<f64>) -> Product {
        Product {
            id: ProductId(id.to_string()),
            name: id.to_string(),
            description: "test".to_string(),
            brand: "brand".to_string(),
            category: category.to_string(),
            price: Decimal::TEN,
            image_url: None,
            sustainability: None,
            sustainability_score: score,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn ranked_query_filters_and_orders() {
        let repository = InMemoryProductRepository::with_products(vec![
            product("a", "Home", Some(90.0)),
            product("b", "Home", Some(70.0)),
            product("c", "Home", None),
            product("d", "Clothing", Some(99.0)),
        ])
        .await;

        let ranked = repository
            .list_category_ranked(CategoryRankQuery {
                category: "Home".to_string(),
                exclude: vec![ProductId("b".to_string())],
                min_score_exclusive: Some(50.0),
                limit: 10,
            })
            .await
            .expect("query succeeds");

        assert_eq!(ranked.iter().map(|p| p.id.0.as_str()).collect::<Vec<_>>(), vec!["a"]);
    }

    #[tokio::test]
    async fn unscored_products_rank_last_without_a_threshold() {
        let repository = InMemoryProductRepository::with_products(vec![
            product("a", "Home", None),
            product("b", "Home", Some(10.0)),
        ])
        .await;

        let ranked = repository
            .list_category_ranked(CategoryRankQuery {
                category: "Home".to_string(),
                limit: 10,
                ..CategoryRankQuery::default()
            })
            .await
            .expect("query succeeds");

        assert_eq!(ranked.iter().map(|p| p.id.0.as_str()).collect::<Vec<_>>(), vec!["b", "a"]);
    }

    #[tokio::test]
    async fn update_score_persists() {
        let repository =
            InMemoryProductRepository::with_products(vec![product("a", "Home", None)]).await;
        repository.update_score(&ProductId("a".to_string()), 62.5).await.expect("update");

        let stored = repository
            .find_by_id(&ProductId("a".to_string()))
            .await
            .expect("lookup")
            .expect("present");
        assert_eq!(stored.sustainability_score, Some(62.5));
    }
}
