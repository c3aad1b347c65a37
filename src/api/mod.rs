//! API Module
//!
//! HTTP handlers and routing for the catalog REST API.
//!
//! # Endpoints
//! - `GET /api/products` - Paginated, filterable product listing
//! - `GET /api/products/search` - Free-text product search
//! - `GET /api/products/:id` - Single product
//! - `PUT /api/products/:id/stock` - Update stock, invalidating cached reads
//! - `GET /api/cache/stats` - Cache statistics
//! - `DELETE /api/cache` - Drop every cached entry
//! - `DELETE /api/cache/:pattern` - Drop entries whose key contains `pattern`
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
