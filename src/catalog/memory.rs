//! In-memory catalog loaded from a JSON product export

use async_trait::async_trait;
use std::cmp::Reverse;
use std::fs;
use std::path::Path;

use super::{Catalog, Product};
use crate::errors::{ChatError, Result};

/// Product list held in memory, kept in storefront order (newest first)
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    products: Vec<Product>,
}

impl InMemoryCatalog {
    /// Build a catalog from records in any order
    pub fn new(mut products: Vec<Product>) -> Self {
        // Stable sort: equal timestamps keep their export order, undated records go last
        products.sort_by_key(|p| Reverse(p.created_at));
        Self { products }
    }

    /// Load a JSON array of products
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            ChatError::CatalogUnavailable(format!("Failed to read {}: {}", path.display(), e))
        })?;

        Self::from_json(&contents)
    }

    /// Parse a JSON array of products
    pub fn from_json(json: &str) -> Result<Self> {
        let products: Vec<Product> = serde_json::from_str(json)
            .map_err(|e| ChatError::CatalogUnavailable(format!("Invalid product export: {}", e)))?;

        Ok(Self::new(products))
    }

    /// Products in default order
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[async_trait]
impl Catalog for InMemoryCatalog {
    async fn search(&self, keywords: &[String]) -> Result<Vec<Product>> {
        let keywords: Vec<String> = keywords
            .iter()
            .map(|k| k.to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();

        if keywords.is_empty() {
            return Ok(Vec::new());
        }

        Ok(self
            .products
            .iter()
            .filter(|p| keywords.iter().any(|k| p.matches_keyword(k)))
            .cloned()
            .collect())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.products.len())
    }
}
