//! API Routes
//!
//! Configures the Axum router with all catalog endpoints.

use axum::{
    routing::{delete, get, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    flush_handler, get_product_handler, health_handler, invalidate_handler,
    list_products_handler, search_products_handler, stats_handler, update_stock_handler,
    AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route("/products", get(list_products_handler))
        .route("/products/search", get(search_products_handler))
        .route("/products/:id", get(get_product_handler))
        .route("/products/:id/stock", put(update_stock_handler))
        .route("/cache/stats", get(stats_handler))
        .route("/cache", delete(flush_handler))
        .route("/cache/:pattern", delete(invalidate_handler));

    Router::new()
        .nest("/api", api)
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
