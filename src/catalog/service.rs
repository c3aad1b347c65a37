//! Product Service
//!
//! Catalog reads go through the cache; stock writes invalidate what they
//! make stale.

use std::sync::Arc;

use tracing::info;

use super::keys::{product_key, products_list_key, products_search_key, PRODUCTS_PREFIX};
use super::model::{Pagination, Product, ProductListQuery, ProductPage, SearchOptions};
use super::repository::ProductRepository;
use crate::cache::CacheService;
use crate::config::Config;
use crate::error::{CatalogError, Result};

/// TTLs applied to catalog cache entries, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogTtls {
    /// Listings and searches
    pub listing: u64,
    /// Single product lookups
    pub product: u64,
}

impl Default for CatalogTtls {
    fn default() -> Self {
        Self {
            listing: 300,
            product: 600,
        }
    }
}

impl From<&Config> for CatalogTtls {
    fn from(config: &Config) -> Self {
        Self {
            listing: config.cache_default_ttl,
            product: config.cache_product_ttl,
        }
    }
}

// == Product Service ==
#[derive(Clone)]
pub struct ProductService {
    cache: CacheService,
    repository: Arc<dyn ProductRepository>,
    ttls: CatalogTtls,
}

impl ProductService {
    pub fn new(cache: CacheService, repository: Arc<dyn ProductRepository>) -> Self {
        Self::with_ttls(cache, repository, CatalogTtls::default())
    }

    pub fn with_ttls(
        cache: CacheService,
        repository: Arc<dyn ProductRepository>,
        ttls: CatalogTtls,
    ) -> Self {
        Self {
            cache,
            repository,
            ttls,
        }
    }

    pub fn cache(&self) -> &CacheService {
        &self.cache
    }

    // == Listing ==
    /// One page of active products, filtered and sorted per `query`.
    pub async fn get_products(&self, query: ProductListQuery) -> Result<ProductPage> {
        let query = query.normalized();
        let key = products_list_key(&query);

        self.cache
            .get_or_set(
                &key,
                move || async move {
                    let filter = query.filter();
                    let (data, total) = tokio::try_join!(
                        self.repository.find_active_products(
                            &filter,
                            query.skip(),
                            query.limit as usize,
                            query.sort_by,
                        ),
                        self.repository.count_active(&filter),
                    )?;

                    Ok::<_, CatalogError>(ProductPage {
                        data,
                        pagination: Pagination::new(query.page, query.limit, total),
                    })
                },
                self.ttls.listing,
            )
            .await
    }

    // == Single Product ==
    /// A product by id. Missing products are reported, never cached.
    pub async fn get_product_by_id(&self, id: i64) -> Result<Product> {
        self.cache
            .get_or_set(
                &product_key(id),
                move || async move {
                    self.repository
                        .find_by_id(id)
                        .await?
                        .ok_or(CatalogError::ProductNotFound(id))
                },
                self.ttls.product,
            )
            .await
    }

    // == Search ==
    pub async fn search_products(
        &self,
        query: &str,
        options: SearchOptions,
    ) -> Result<Vec<Product>> {
        self.cache
            .get_or_set(
                &products_search_key(query, &options),
                move || async move {
                    Ok::<_, CatalogError>(self.repository.search_products(query, &options).await?)
                },
                self.ttls.listing,
            )
            .await
    }

    // == Stock Update ==
    /// Writes the new stock level, then drops every cached read it affects.
    ///
    /// Nothing is invalidated when the write fails.
    pub async fn update_product_stock(&self, id: i64, quantity: i32) -> Result<Product> {
        if quantity < 0 {
            return Err(CatalogError::InvalidRequest(format!(
                "Stock quantity cannot be negative (got {})",
                quantity
            )));
        }

        let product = self.repository.update_stock(id, quantity).await?;

        let removed = self.cache.invalidate_pattern(&product_key(id))
            + self.cache.invalidate_pattern(PRODUCTS_PREFIX);
        info!(
            "Stock for product {} set to {}, invalidated {} cached reads",
            id, quantity, removed
        );

        Ok(product)
    }
}
