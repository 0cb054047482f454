//! Product catalog access
//!
//! The assistant never writes to the catalog. It only needs a keyword
//! search that returns matching products in the store's default order.

pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::Result;

pub use memory::InMemoryCatalog;

/// A product record as exported by the storefront
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Two-decimal money value; only ever shown rounded to cents
    pub price: f64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Case-insensitive substring match on name or description.
    /// `keyword` must already be lowercased.
    pub fn matches_keyword(&self, keyword: &str) -> bool {
        self.name.to_lowercase().contains(keyword)
            || self.description.to_lowercase().contains(keyword)
    }
}

/// Read-only keyword search over the product catalog
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Every product whose name or description contains any of `keywords`
    /// (case-insensitive), each product once, in the catalog's default order.
    async fn search(&self, keywords: &[String]) -> Result<Vec<Product>>;

    /// Number of products in the catalog
    async fn count(&self) -> Result<usize>;
}
