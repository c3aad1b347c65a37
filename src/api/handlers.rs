//! API Handlers
//!
//! HTTP request handlers for the catalog and cache endpoints.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};

use crate::cache::CacheService;
use crate::catalog::{CatalogTtls, InMemoryProductRepository, Product, ProductService};
use crate::config::Config;
use crate::error::Result;
use crate::models::{
    ApiResponse, FlushResponse, HealthResponse, InvalidateResponse, ListProductsParams,
    ProductListResponse, SearchParams, StatsResponse, UpdateStockRequest,
};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub products: ProductService,
}

impl AppState {
    pub fn new(products: ProductService) -> Self {
        Self { products }
    }

    /// Wires the cache, the seeded catalog and the configured TTLs together.
    pub fn from_config(config: &Config) -> Self {
        let cache = CacheService::from_config(config);
        let repository = Arc::new(InMemoryProductRepository::seeded());
        Self::new(ProductService::with_ttls(
            cache,
            repository,
            CatalogTtls::from(config),
        ))
    }

    pub fn cache(&self) -> &CacheService {
        self.products.cache()
    }
}

/// Handler for GET /api/products
pub async fn list_products_handler(
    State(state): State<AppState>,
    Query(params): Query<ListProductsParams>,
) -> Result<Json<ProductListResponse>> {
    let page = state.products.get_products(params.into_query()).await?;
    Ok(Json(page.into()))
}

/// Handler for GET /api/products/search
pub async fn search_products_handler(
    State(state): State<AppState>,
    params: std::result::Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<Product>>>> {
    let Query(params) = params?;
    let products = state
        .products
        .search_products(&params.q, params.options())
        .await?;
    Ok(Json(ApiResponse::ok(products)))
}

/// Handler for GET /api/products/:id
pub async fn get_product_handler(
    State(state): State<AppState>,
    id: std::result::Result<Path<i64>, PathRejection>,
) -> Result<Json<ApiResponse<Product>>> {
    let Path(id) = id?;
    let product = state.products.get_product_by_id(id).await?;
    Ok(Json(ApiResponse::ok(product)))
}

/// Handler for PUT /api/products/:id/stock
pub async fn update_stock_handler(
    State(state): State<AppState>,
    id: std::result::Result<Path<i64>, PathRejection>,
    req: std::result::Result<Json<UpdateStockRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Product>>> {
    let Path(id) = id?;
    let Json(req) = req?;
    let product = state
        .products
        .update_product_stock(id, req.quantity)
        .await?;
    Ok(Json(ApiResponse::ok(product)))
}

/// Handler for GET /api/cache/stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(state.cache().stats().into())
}

/// Handler for DELETE /api/cache
pub async fn flush_handler(State(state): State<AppState>) -> Json<FlushResponse> {
    Json(FlushResponse {
        removed: state.cache().flush(),
    })
}

/// Handler for DELETE /api/cache/:pattern
pub async fn invalidate_handler(
    State(state): State<AppState>,
    Path(pattern): Path<String>,
) -> Json<InvalidateResponse> {
    let removed = state.cache().invalidate_pattern(&pattern);
    Json(InvalidateResponse { pattern, removed })
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
