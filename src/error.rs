//! Error types for the catalog service
//!
//! Provides unified error handling using thiserror.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Problems inside the cache layer.
///
/// Read paths never surface these; they degrade to a miss instead.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Value could not be converted to or from its cached form
    #[error("Cache serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Store lock is poisoned
    #[error("Cache store unavailable during {0}")]
    Unavailable(&'static str),
}

/// Convenience Result type for cache operations.
pub type CacheResult<T> = std::result::Result<T, CacheError>;

// == Repository Error Enum ==
/// Failures reported by a product repository.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RepositoryError {
    /// No product with this id
    #[error("Product {0} does not exist")]
    NotFound(i64),

    /// Backing storage failed
    #[error("Repository unavailable: {0}")]
    Unavailable(String),
}

// == Catalog Error Enum ==
/// Errors returned by catalog operations and HTTP handlers.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    /// Product not found or inactive
    #[error("Product not found: {0}")]
    ProductNotFound(i64),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Repository failure
    #[error(transparent)]
    Repository(RepositoryError),
}

impl From<RepositoryError> for CatalogError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(id) => CatalogError::ProductNotFound(id),
            other => CatalogError::Repository(other),
        }
    }
}

// Extractor rejections answer with the same JSON error body as handlers
impl From<PathRejection> for CatalogError {
    fn from(rejection: PathRejection) -> Self {
        CatalogError::InvalidRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for CatalogError {
    fn from(rejection: QueryRejection) -> Self {
        CatalogError::InvalidRequest(rejection.body_text())
    }
}

impl From<JsonRejection> for CatalogError {
    fn from(rejection: JsonRejection) -> Self {
        CatalogError::InvalidRequest(rejection.body_text())
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let status = match &self {
            CatalogError::ProductNotFound(_) => StatusCode::NOT_FOUND,
            CatalogError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CatalogError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
