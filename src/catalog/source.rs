//! Byte sources for the product dataset.
//!
//! [`FileSource`] re-reads the file on every call. [`CachedFileSource`] keeps
//! the last parsed snapshot and re-reads when the file's modification time
//! or length changes, or once the snapshot is older than its refresh interval.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::error::{CatalogError, Result};
use super::models::Product;

/// Anything that can produce the full, ordered product dataset
#[async_trait]
pub trait ProductSource: Send + Sync {
    async fn load(&self) -> Result<Arc<Vec<Product>>>;
}

/// Parses raw dataset bytes into products.
///
/// The document must be a JSON array whose elements are all objects.
pub fn parse_dataset(path: &Path, bytes: &[u8]) -> Result<Vec<Product>> {
    let value: Value = serde_json::from_slice(bytes).map_err(|source| CatalogError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let Value::Array(items) = value else {
        return Err(CatalogError::NotAnArray {
            path: path.to_path_buf(),
        });
    };

    items
        .into_iter()
        .map(|item| match item {
            Value::Object(fields) => Ok(Product::new(fields)),
            _ => Err(CatalogError::NotAnArray {
                path: path.to_path_buf(),
            }),
        })
        .collect()
}

async fn read_file(path: &Path) -> Result<Vec<u8>> {
    tokio::fs::read(path).await.map_err(|source| CatalogError::Read {
        path: path.to_path_buf(),
        source,
    })
}

#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ProductSource for FileSource {
    async fn load(&self) -> Result<Arc<Vec<Product>>> {
        let bytes = read_file(&self.path).await?;
        let products = parse_dataset(&self.path, &bytes)?;
        tracing::debug!(path = %self.path.display(), count = products.len(), "Product data loaded");
        Ok(Arc::new(products))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FileStamp {
    modified: Option<SystemTime>,
    len: u64,
}

impl From<&std::fs::Metadata> for FileStamp {
    fn from(meta: &std::fs::Metadata) -> Self {
        Self {
            modified: meta.modified().ok(),
            len: meta.len(),
        }
    }
}

/// Upper bound on how long an unchanged-looking snapshot is trusted
pub const DEFAULT_CACHE_REFRESH: Duration = Duration::from_secs(5);

#[derive(Debug)]
struct Snapshot {
    stamp: FileStamp,
    loaded_at: Instant,
    products: Arc<Vec<Product>>,
}

/// Read-through cache over a dataset file.
///
/// Readers share one immutable snapshot; a stale snapshot is replaced wholesale
/// under the write lock, so callers never observe a half-updated dataset.
/// A same-length rewrite inside the filesystem's timestamp granularity keeps
/// the old stamp, so snapshots also expire after `refresh`.
#[derive(Debug)]
pub struct CachedFileSource {
    path: PathBuf,
    refresh: Duration,
    snapshot: RwLock<Option<Snapshot>>,
}

impl CachedFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_refresh(path, DEFAULT_CACHE_REFRESH)
    }

    pub fn with_refresh(path: impl Into<PathBuf>, refresh: Duration) -> Self {
        Self {
            path: path.into(),
            refresh,
            snapshot: RwLock::new(None),
        }
    }

    async fn stamp(&self) -> Result<FileStamp> {
        let meta = tokio::fs::metadata(&self.path)
            .await
            .map_err(|source| CatalogError::Read {
                path: self.path.clone(),
                source,
            })?;
        Ok(FileStamp::from(&meta))
    }
}

#[async_trait]
impl ProductSource for CachedFileSource {
    async fn load(&self) -> Result<Arc<Vec<Product>>> {
        let stamp = self.stamp().await?;

        if let Some(current) = self.snapshot.read().await.as_ref() {
            if current.stamp == stamp && current.loaded_at.elapsed() < self.refresh {
                return Ok(Arc::clone(&current.products));
            }
        }

        let bytes = read_file(&self.path).await?;
        let products = Arc::new(parse_dataset(&self.path, &bytes)?);
        tracing::info!(path = %self.path.display(), count = products.len(), "Product cache refreshed");

        *self.snapshot.write().await = Some(Snapshot {
            stamp,
            loaded_at: Instant::now(),
            products: Arc::clone(&products),
        });

        Ok(products)
    }
}
