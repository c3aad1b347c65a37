//! Product repository: the storage collaborator behind catalog reads.
//!
//! The cache never talks to a repository directly; `ProductService` hands
//! repository calls to the cache as compute closures.

use std::cmp::Ordering;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use tokio::sync::RwLock;

use super::model::{CategorySummary, Product, ProductFilter, SearchOptions, SortBy};
use crate::error::RepositoryError;

type RepoResult<T> = std::result::Result<T, RepositoryError>;

#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Active products matching `filter`, ordered by `sort`, paged by skip/take.
    async fn find_active_products(
        &self,
        filter: &ProductFilter,
        skip: usize,
        take: usize,
        sort: SortBy,
    ) -> RepoResult<Vec<Product>>;

    /// Number of active products matching `filter`.
    async fn count_active(&self, filter: &ProductFilter) -> RepoResult<u64>;

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Product>>;

    /// Active products whose name or description contains `query`,
    /// ignoring case. An empty query matches nothing.
    async fn search_products(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> RepoResult<Vec<Product>>;

    async fn update_stock(&self, id: i64, quantity: i32) -> RepoResult<Product>;
}

// == In-Memory Repository ==
/// Repository over a product list held in memory.
#[derive(Debug, Default)]
pub struct InMemoryProductRepository {
    products: RwLock<Vec<Product>>,
}

impl InMemoryProductRepository {
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products: RwLock::new(products),
        }
    }

    /// Repository preloaded with the storefront's demo catalog.
    pub fn seeded() -> Self {
        Self::new(seed_catalog())
    }
}

fn matches_filter(product: &Product, filter: &ProductFilter) -> bool {
    product.is_active
        && filter
            .category
            .as_deref()
            .map_or(true, |slug| product.category.slug == slug)
        && filter
            .search
            .as_deref()
            .map_or(true, |text| matches_text(product, &text.to_lowercase()))
}

fn matches_text(product: &Product, needle_lower: &str) -> bool {
    product.name.to_lowercase().contains(needle_lower)
        || product
            .description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(needle_lower))
}

fn compare(sort: SortBy, a: &Product, b: &Product) -> Ordering {
    let primary = match sort {
        SortBy::Name => a.name.cmp(&b.name),
        SortBy::Price => a.price.total_cmp(&b.price),
        SortBy::PriceDesc => b.price.total_cmp(&a.price),
        SortBy::Newest => b.created_at.cmp(&a.created_at),
    };
    primary.then(a.id.cmp(&b.id))
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn find_active_products(
        &self,
        filter: &ProductFilter,
        skip: usize,
        take: usize,
        sort: SortBy,
    ) -> RepoResult<Vec<Product>> {
        let products = self.products.read().await;
        let mut matching: Vec<&Product> = products
            .iter()
            .filter(|p| matches_filter(p, filter))
            .collect();
        matching.sort_by(|a, b| compare(sort, a, b));

        Ok(matching
            .into_iter()
            .skip(skip)
            .take(take)
            .cloned()
            .collect())
    }

    async fn count_active(&self, filter: &ProductFilter) -> RepoResult<u64> {
        let products = self.products.read().await;
        Ok(products.iter().filter(|p| matches_filter(p, filter)).count() as u64)
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Product>> {
        let products = self.products.read().await;
        Ok(products.iter().find(|p| p.id == id).cloned())
    }

    async fn search_products(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> RepoResult<Vec<Product>> {
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let needle = query.to_lowercase();
        let products = self.products.read().await;
        let skip = options.skip.unwrap_or(0) as usize;
        let take = options.take.map_or(usize::MAX, |t| t as usize);

        Ok(products
            .iter()
            .filter(|p| p.is_active && matches_text(p, &needle))
            .skip(skip)
            .take(take)
            .cloned()
            .collect())
    }

    async fn update_stock(&self, id: i64, quantity: i32) -> RepoResult<Product> {
        let mut products = self.products.write().await;
        let product = products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(RepositoryError::NotFound(id))?;

        product.stock = quantity;
        Ok(product.clone())
    }
}

// == Seed Data ==
/// Demo catalog: five categories of automotive fluids and their products.
pub fn seed_catalog() -> Vec<Product> {
    let engine_oils = category(1, "Engine Oils", "engine-oils");
    let transmission_oils = category(2, "Transmission Oils", "transmission-oils");
    let additives = category(3, "Oil Additives", "additives");
    let fuel_additives = category(4, "Fuel Additives", "fuel-additives");
    let coolants = category(5, "Coolants", "coolants");

    vec![
        product(
            1,
            "Bardahl Synthetic 5W-30",
            "Fully synthetic motor oil for modern engines",
            34.99,
            50,
            "synthetic-oil.jpg",
            engine_oils.clone(),
        ),
        product(
            2,
            "Bardahl High Mileage 10W-40",
            "Formula for high-mileage vehicles",
            29.99,
            35,
            "high-mileage-oil.jpg",
            engine_oils,
        ),
        product(
            3,
            "Bardahl Universal Coolant",
            "Universal engine coolant",
            18.99,
            80,
            "coolant.jpg",
            coolants,
        ),
        product(
            4,
            "Bardahl Fuel System Cleaner",
            "Cleans injectors and the fuel system",
            14.99,
            120,
            "fuel-cleaner.jpg",
            fuel_additives,
        ),
        product(
            5,
            "Bardahl Full Metal",
            "Anti-friction oil additive",
            24.99,
            60,
            "full-metal.jpg",
            additives,
        ),
        product(
            6,
            "Bardahl Gear Oil 75W-90",
            "Synthetic gear oil for manual transmissions",
            22.49,
            40,
            "gear-oil.jpg",
            transmission_oils,
        ),
    ]
}

fn category(id: i64, name: &str, slug: &str) -> CategorySummary {
    CategorySummary {
        id,
        name: name.to_string(),
        slug: slug.to_string(),
    }
}

fn product(
    id: i64,
    name: &str,
    description: &str,
    price: f64,
    stock: i32,
    image: &str,
    category: CategorySummary,
) -> Product {
    Product {
        id,
        name: name.to_string(),
        description: Some(description.to_string()),
        price,
        stock,
        images: vec![image.to_string()],
        is_active: true,
        category,
        // Seed rows are spaced a day apart so "newest" has a stable order
        created_at: Utc
            .timestamp_opt(1_700_000_000 + id * 86_400, 0)
            .single()
            .unwrap_or_default(),
    }
}
