use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row};

use verdant_core::domain::product::{Product, ProductId, SustainabilityProfile};

use super::{CategoryRankQuery, ProductRepository, RepositoryError};
use crate::DbPool;

const PRODUCT_COLUMNS: &str = "id, name, description, brand, category, price, image_url, \
                               sustainability, sustainability_score, created_at, updated_at";

pub struct SqlProductRepository {
    pool: DbPool,
}

impl SqlProductRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn decode_product(row: &SqliteRow) -> Result<Product, RepositoryError> {
    let id: String = row.get("id");
    let price_raw: String = row.get("price");
    let price = Decimal::from_str(&price_raw)
        .map_err(|error| RepositoryError::Decode(format!("price for `{id}`: {error}")))?;

    let sustainability: Option<SustainabilityProfile> = row
        .get::<Option<String>, _>("sustainability")
        .map(|raw| serde_json::from_str(&raw))
        .transpose()
        .map_err(|error| RepositoryError::Decode(format!("sustainability for `{id}`: {error}")))?;

    let created_at = decode_timestamp(&id, "created_at", row.get("created_at"))?;
    let updated_at = decode_timestamp(&id, "updated_at", row.get("updated_at"))?;

    Ok(Product {
        id: ProductId(id),
        name: row.get("name"),
        description: row.get("description"),
        brand: row.get("brand"),
        category: row.get("category"),
        price,
        image_url: row.get("image_url"),
        sustainability,
        sustainability_score: row.get("sustainability_score"),
        created_at,
        updated_at,
    })
}

fn decode_timestamp(
    id: &str,
    column: &str,
    raw: String,
) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(&raw)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|error| RepositoryError::Decode(format!("{column} for `{id}`: {error}")))
}

fn encode_profile(profile: &Option<SustainabilityProfile>) -> Result<Option<String>, RepositoryError> {
    profile
        .as_ref()
        .map(serde_json::to_string)
        .transpose()
        .map_err(|error| RepositoryError::Decode(format!("sustainability profile: {error}")))
}

#[async_trait::async_trait]
impl ProductRepository for SqlProductRepository {
    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query(&format!("SELECT {PRODUCT_COLUMNS} FROM product WHERE id = ?"))
            .bind(&id.0)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(decode_product).transpose()
    }

    async fn save(&self, product: Product) -> Result<(), RepositoryError> {
        let sustainability = encode_profile(&product.sustainability)?;

        sqlx::query(
            "INSERT INTO product (id, name, description, brand, category, price, image_url, \
             sustainability, sustainability_score, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) \
             ON CONFLICT(id) DO UPDATE SET \
             name = excluded.name, description = excluded.description, \
             brand = excluded.brand, category = excluded.category, \
             price = excluded.price, image_url = excluded.image_url, \
             sustainability = excluded.sustainability, \
             sustainability_score = excluded.sustainability_score, \
             updated_at = excluded.updated_at",
        )
        .bind(&product.id.0)
        .bind(&product.name)
        .bind(&product.description)
        .bind(&product.brand)
        .bind(&product.category)
        .bind(product.price.to_string())
        .bind(&product.image_url)
        .bind(sustainability)
        .bind(product.sustainability_score)
        .bind(product.created_at.to_rfc3339())
        .bind(product.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_category_ranked(
        &self,
        query: CategoryRankQuery,
    ) -> Result<Vec<Product>, RepositoryError> {
        let mut builder: QueryBuilder<'_, sqlx::Sqlite> =
            QueryBuilder::new(format!("SELECT {PRODUCT_COLUMNS} FROM product WHERE category = "));
        builder.push_bind(&query.category);

        if !query.exclude.is_empty() {
            builder.push(" AND id NOT IN (");
            let mut separated = builder.separated(", ");
            for excluded in &query.exclude {
                separated.push_bind(&excluded.0);
            }
            builder.push(")");
        }

        if let Some(min_score) = query.min_score_exclusive {
            builder.push(" AND sustainability_score > ");
            builder.push_bind(min_score);
        }

        // SQLite sorts NULL below every value in DESC order, so unscored
        // products land at the tail.
        builder.push(" ORDER BY sustainability_score DESC LIMIT ");
        builder.push_bind(i64::from(query.limit));

        let rows = builder.build().fetch_all(&self.pool).await?;
        rows.iter().map(decode_product).collect()
    }

    async fn update_score(&self, id: &ProductId, score: f64) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE product SET sustainability_score = ?, updated_at = ? WHERE id = ?")
            .bind(score)
            .bind(Utc::now().to_rfc3339())
            .bind(&id.0)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows =
            sqlx::query(&format!("SELECT {PRODUCT_COLUMNS} FROM product ORDER BY created_at"))
                .fetch_all(&self.pool)
                .await?;
        rows.iter().map(decode_product).collect()
    }
}
