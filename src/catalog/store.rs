use std::sync::Arc;

use serde_json::Value;

use super::error::Result;
use super::models::{ListQuery, Product};
use super::source::ProductSource;

/// Read access to the product dataset plus acknowledgment-only writes
#[derive(Clone)]
pub struct Catalog {
    source: Arc<dyn ProductSource>,
}

impl Catalog {
    pub fn new(source: Arc<dyn ProductSource>) -> Self {
        Self { source }
    }

    /// Filter by tag title, then slice `[offset, offset + limit)`.
    ///
    /// Out-of-range bounds yield a shorter or empty page, never an error.
    pub async fn list(&self, query: &ListQuery) -> Result<Vec<Product>> {
        let products = self.source.load().await?;

        let page = products
            .iter()
            .filter(|product| match query.tag.as_deref() {
                Some(tag) => product.has_tag(tag),
                None => true,
            })
            .skip(query.offset)
            .take(query.limit)
            .cloned()
            .collect();

        Ok(page)
    }

    /// First product whose identifier is exactly `id`
    pub async fn get(&self, id: &str) -> Result<Option<Product>> {
        let products = self.source.load().await?;
        Ok(products.iter().find(|product| product.has_id(id)).cloned())
    }

    /// Acknowledges an update; the dataset is not modified.
    pub async fn update(&self, id: &str, data: &Value) -> Result<bool> {
        tracing::info!(product_id = %id, data = %data, "Product would be updated");
        Ok(true)
    }

    /// Acknowledges a delete; the dataset is not modified.
    pub async fn delete(&self, id: &str) -> Result<bool> {
        tracing::info!(product_id = %id, "Product would be deleted");
        Ok(true)
    }
}
