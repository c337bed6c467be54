//! JSON API routes.
//!
//! Endpoints:
//! - `GET  /api/products`                                       — list catalog
//! - `POST /api/products`                                       — create (scores at creation)
//! - `GET  /api/products/{product_id}`                          — fetch one
//! - `GET  /api/recommendations/alternatives/{product_id}`     — greener substitutes
//! - `GET  /api/recommendations/compare/{product1_id}/{product2_id}` — two-product comparison
//! - `GET  /api/recommendations/tips/{category}`                — category tips (AI)
//! - `POST /api/recommendations/analyze`                        — description analysis (AI)
//! - `POST /api/recommendations/score/{product_id}`             — recompute + persist score

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use verdant_ai::{AiBridge, BridgeError, CategoryTips, SustainabilityIndicators};
use verdant_core::comparison::Comparison;
use verdant_core::domain::product::{Product, ProductId, SustainabilityProfile};
use verdant_core::scoring::score_profile;
use verdant_core::ServiceError;
use verdant_db::ProductRepository;
use verdant_engine::{AlternativeFinder, Comparator, ScoreService, ScoredProduct};

const DEFAULT_ALTERNATIVES_LIMIT: u32 = 5;
const MAX_ALTERNATIVES_LIMIT: u32 = 50;

#[derive(Clone)]
pub struct ApiState {
    repository: Arc<dyn ProductRepository>,
    finder: Arc<AlternativeFinder>,
    comparator: Arc<Comparator>,
    scorer: Arc<ScoreService>,
    bridge: Arc<AiBridge>,
}

impl ApiState {
    pub fn new(
        repository: Arc<dyn ProductRepository>,
        finder: Arc<AlternativeFinder>,
        comparator: Arc<Comparator>,
        scorer: Arc<ScoreService>,
        bridge: Arc<AiBridge>,
    ) -> Self {
        Self { repository, finder, comparator, scorer, bridge }
    }
}

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
}

#[derive(Debug, Deserialize)]
pub struct AlternativesQuery {
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub name: String,
    pub description: String,
    pub brand: String,
    pub category: String,
    pub price: Decimal,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub sustainability: Option<SustainabilityProfile>,
}

type ApiResult<T> = Result<T, (StatusCode, Json<ApiError>)>;

fn service_error(error: ServiceError) -> (StatusCode, Json<ApiError>) {
    let status = match &error {
        ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
        ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
        ServiceError::Upstream(_) | ServiceError::Parse(_) => StatusCode::BAD_GATEWAY,
        ServiceError::Storage(_) => StatusCode::SERVICE_UNAVAILABLE,
    };
    (status, Json(ApiError { error: error.to_string() }))
}

fn bridge_error(error: BridgeError) -> (StatusCode, Json<ApiError>) {
    (StatusCode::BAD_GATEWAY, Json(ApiError { error: error.to_string() }))
}

fn storage_error(error: verdant_db::RepositoryError) -> (StatusCode, Json<ApiError>) {
    service_error(ServiceError::Storage(error.to_string()))
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/api/products", get(list_products).post(create_product))
        .route("/api/products/{product_id}", get(get_product))
        .route("/api/recommendations/alternatives/{product_id}", get(get_alternatives))
        .route(
            "/api/recommendations/compare/{product1_id}/{product2_id}",
            get(compare_products),
        )
        .route("/api/recommendations/tips/{category}", get(get_tips))
        .route("/api/recommendations/analyze", post(analyze_description))
        .route("/api/recommendations/score/{product_id}", post(calculate_score))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn list_products(State(state): State<ApiState>) -> ApiResult<Json<Vec<Product>>> {
    let products = state.repository.list_all().await.map_err(storage_error)?;
    Ok(Json(products))
}

async fn get_product(
    State(state): State<ApiState>,
    Path(product_id): Path<String>,
) -> ApiResult<Json<Product>> {
    let product = state
        .repository
        .find_by_id(&ProductId(product_id.clone()))
        .await
        .map_err(storage_error)?
        .ok_or_else(|| service_error(ServiceError::NotFound(product_id)))?;
    Ok(Json(product))
}

async fn create_product(
    State(state): State<ApiState>,
    Json(request): Json<CreateProductRequest>,
) -> ApiResult<(StatusCode, Json<Product>)> {
    if request.name.trim().is_empty() || request.category.trim().is_empty() {
        return Err(service_error(ServiceError::Validation(
            "name and category are required".to_string(),
        )));
    }
    if request.price < Decimal::ZERO {
        return Err(service_error(ServiceError::Validation(
            "price must not be negative".to_string(),
        )));
    }

    let now = Utc::now();
    let score = score_profile(request.sustainability.as_ref());
    let product = Product {
        id: ProductId::generate(),
        name: request.name,
        description: request.description,
        brand: request.brand,
        category: request.category,
        price: request.price,
        image_url: request.image_url,
        sustainability: request.sustainability,
        sustainability_score: Some(score),
        created_at: now,
        updated_at: now,
    };

    state.repository.save(product.clone()).await.map_err(storage_error)?;
    info!(product_id = %product.id, score, "product created");
    Ok((StatusCode::CREATED, Json(product)))
}

async fn get_alternatives(
    State(state): State<ApiState>,
    Path(product_id): Path<String>,
    Query(query): Query<AlternativesQuery>,
) -> ApiResult<Json<Vec<Product>>> {
    let limit =
        query.limit.unwrap_or(DEFAULT_ALTERNATIVES_LIMIT).min(MAX_ALTERNATIVES_LIMIT);
    let alternatives =
        state.finder.find(&ProductId(product_id), limit).await.map_err(service_error)?;
    Ok(Json(alternatives))
}

async fn compare_products(
    State(state): State<ApiState>,
    Path((product1_id, product2_id)): Path<(String, String)>,
) -> ApiResult<Json<Comparison>> {
    let comparison = state
        .comparator
        .compare(&ProductId(product1_id), &ProductId(product2_id))
        .await
        .map_err(service_error)?;
    Ok(Json(comparison))
}

async fn get_tips(
    State(state): State<ApiState>,
    Path(category): Path<String>,
) -> ApiResult<Json<CategoryTips>> {
    if category.trim().is_empty() {
        return Err(service_error(ServiceError::Validation("category is required".to_string())));
    }
    let tips = state.bridge.category_tips(&category).await.map_err(bridge_error)?;
    Ok(Json(tips))
}

async fn analyze_description(
    State(state): State<ApiState>,
    Json(request): Json<AnalyzeRequest>,
) -> ApiResult<Json<SustainabilityIndicators>> {
    let description = request
        .description
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .ok_or_else(|| {
            service_error(ServiceError::Validation("product description is required".to_string()))
        })?;

    let indicators =
        state.bridge.analyze_description(description).await.map_err(bridge_error)?;
    Ok(Json(indicators))
}

async fn calculate_score(
    State(state): State<ApiState>,
    Path(product_id): Path<String>,
) -> ApiResult<Json<ScoredProduct>> {
    let scored =
        state.scorer.recalculate(&ProductId(product_id)).await.map_err(service_error)?;
    Ok(Json(scored))
}
