//! Request and Response models for the catalog HTTP API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{ListProductsParams, SearchParams, UpdateStockRequest};
pub use responses::{
    ApiResponse, ErrorResponse, FlushResponse, HealthResponse, InvalidateResponse,
    ProductListResponse, StatsResponse,
};
