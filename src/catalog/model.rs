//! Catalog Model
//!
//! Product records and the query shapes the catalog is read with.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default page size for product listings
pub const DEFAULT_PAGE_LIMIT: u32 = 12;

// == Category ==
/// The slice of a category embedded in every product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

// == Product ==
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub stock: i32,
    pub images: Vec<String>,
    pub is_active: bool,
    pub category: CategorySummary,
    pub created_at: DateTime<Utc>,
}

// == Sort Order ==
/// Ordering for product listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortBy {
    /// Name ascending
    #[default]
    Name,
    /// Price ascending
    Price,
    /// Price descending
    PriceDesc,
    /// Most recently created first
    Newest,
}

impl SortBy {
    /// Parses a sort name, falling back to `Name` for anything unknown.
    pub fn parse_lossy(value: &str) -> Self {
        match value {
            "price" => SortBy::Price,
            "price-desc" => SortBy::PriceDesc,
            "newest" => SortBy::Newest,
            _ => SortBy::Name,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::Name => "name",
            SortBy::Price => "price",
            SortBy::PriceDesc => "price-desc",
            SortBy::Newest => "newest",
        }
    }
}

// == Listing Query ==
/// Parameters of a paginated, filterable product listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProductListQuery {
    pub page: u32,
    pub limit: u32,
    pub category: Option<String>,
    pub search: Option<String>,
    pub sort_by: SortBy,
}

impl Default for ProductListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_LIMIT,
            category: None,
            search: None,
            sort_by: SortBy::Name,
        }
    }
}

impl ProductListQuery {
    /// Clamps page and limit to at least 1 and treats empty filters as absent.
    pub fn normalized(mut self) -> Self {
        self.page = self.page.max(1);
        self.limit = self.limit.max(1);
        self.category = self.category.filter(|c| !c.is_empty());
        self.search = self.search.filter(|s| !s.is_empty());
        self
    }

    /// Number of records before this page.
    pub fn skip(&self) -> usize {
        (self.page.saturating_sub(1) as usize) * self.limit as usize
    }

    pub fn filter(&self) -> ProductFilter {
        ProductFilter {
            category: self.category.clone(),
            search: self.search.clone(),
        }
    }
}

/// Row filter shared by listing and counting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    /// Category slug
    pub category: Option<String>,
    /// Case-insensitive text matched against name and description
    pub search: Option<String>,
}

// == Search Options ==
/// Paging applied to free-text search results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchOptions {
    pub skip: Option<u32>,
    pub take: Option<u32>,
}

// == Listing Result ==
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub pages: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    pub fn new(page: u32, limit: u32, total: u64) -> Self {
        let limit_wide = u64::from(limit.max(1));
        Self {
            page,
            limit,
            total,
            pages: total.div_ceil(limit_wide),
            has_next: u64::from(page) * limit_wide < total,
            has_prev: page > 1,
        }
    }
}

/// One page of products plus its pagination metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPage {
    pub data: Vec<Product>,
    pub pagination: Pagination,
}
