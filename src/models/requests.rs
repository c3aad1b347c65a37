//! Request DTOs for the catalog HTTP API
//!
//! Defines the structure of query strings and request bodies.

use serde::Deserialize;

use crate::catalog::{ProductListQuery, SearchOptions, SortBy};

/// Query string of `GET /api/products`.
///
/// Page and limit arrive as raw strings so that junk like `page=abc` falls
/// back to the default instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListProductsParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub category: Option<String>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
}

impl ListProductsParams {
    /// Converts the raw parameters into a normalized listing query.
    pub fn into_query(self) -> ProductListQuery {
        let defaults = ProductListQuery::default();
        ProductListQuery {
            page: parse_positive(self.page.as_deref()).unwrap_or(defaults.page),
            limit: parse_positive(self.limit.as_deref()).unwrap_or(defaults.limit),
            category: self.category,
            search: self.search,
            sort_by: self
                .sort_by
                .as_deref()
                .map(SortBy::parse_lossy)
                .unwrap_or_default(),
        }
        .normalized()
    }
}

fn parse_positive(raw: Option<&str>) -> Option<u32> {
    raw.and_then(|v| v.trim().parse::<u32>().ok())
        .filter(|v| *v > 0)
}

/// Query string of `GET /api/products/search`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    pub skip: Option<u32>,
    pub take: Option<u32>,
}

impl SearchParams {
    pub fn options(&self) -> SearchOptions {
        SearchOptions {
            skip: self.skip,
            take: self.take,
        }
    }
}

/// Body of `PUT /api/products/:id/stock`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStockRequest {
    pub quantity: i32,
}
