//! Catalog Module
//!
//! Product catalog reads and writes, with cached reads.

pub mod keys;
pub mod model;
pub mod repository;
pub mod service;

pub use model::{
    CategorySummary, Pagination, Product, ProductFilter, ProductListQuery, ProductPage,
    SearchOptions, SortBy,
};
pub use repository::{seed_catalog, InMemoryProductRepository, ProductRepository};
pub use service::{CatalogTtls, ProductService};
