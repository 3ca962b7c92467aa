//! Data access for the product catalog.
//!
//! The dataset is a single JSON array of product objects. Reads go through a
//! [`ProductSource`]; writes are acknowledged but never applied.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use product_catalog::catalog::{Catalog, FileSource, ListQuery};
//!
//! let catalog = Catalog::new(Arc::new(FileSource::new("data/full-products.json")));
//! let page = catalog.list(&ListQuery::default()).await?;
//! ```

pub mod error;
pub mod models;
pub mod source;
pub mod store;

pub use error::{CatalogError, Result};
pub use models::{DEFAULT_LIMIT, ListQuery, Product};
pub use source::{CachedFileSource, DEFAULT_CACHE_REFRESH, FileSource, ProductSource, parse_dataset};
pub use store::Catalog;
