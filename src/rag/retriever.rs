//! Keyword retrieval over the product catalog

use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

use crate::catalog::{Catalog, Product};
use crate::errors::Result;

/// Most documents ever handed to the grader for one question
pub const MAX_DOCUMENTS: usize = 5;

/// Render one product as retrieval text
pub fn render_product(product: &Product) -> String {
    format!(
        "Product Name: {}\nDescription: {}\nPrice: ${:.2}",
        product.name, product.description, product.price
    )
}

/// Split a question into whitespace-separated keywords
pub fn keywords(question: &str) -> Vec<String> {
    question.split_whitespace().map(str::to_string).collect()
}

/// Retrieves candidate documents for a question
pub struct Retriever {
    catalog: Arc<dyn Catalog>,
}

impl Retriever {
    pub fn new(catalog: Arc<dyn Catalog>) -> Self {
        Self { catalog }
    }

    pub fn max_documents(&self) -> usize {
        MAX_DOCUMENTS
    }

    /// Matching products rendered as documents, in catalog order, at most
    /// [`MAX_DOCUMENTS`] of them. No match is a normal, empty result.
    pub async fn retrieve(&self, question: &str) -> Result<Vec<String>> {
        let keywords = keywords(question);
        if keywords.is_empty() {
            debug!("question has no keywords");
            return Ok(Vec::new());
        }

        let products = self.catalog.search(&keywords).await?;

        let mut seen = HashSet::new();
        let documents: Vec<String> = products
            .iter()
            .filter(|p| seen.insert(p.id))
            .take(MAX_DOCUMENTS)
            .map(render_product)
            .collect();

        info!(
            keywords = keywords.len(),
            matches = products.len(),
            documents = documents.len(),
            "retrieved documents"
        );

        Ok(documents)
    }
}
