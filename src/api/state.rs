use std::sync::Arc;
use std::time::Duration;

use crate::catalog::{CachedFileSource, Catalog, FileSource, ProductSource};
use crate::config::Config;
use crate::observability::RequestMetrics;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub catalog: Catalog,
    pub metrics: Arc<RequestMetrics>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let path = config.catalog.data_file.clone();
        let source: Arc<dyn ProductSource> = if config.catalog.cache {
            Arc::new(CachedFileSource::with_refresh(
                path,
                Duration::from_secs(config.catalog.cache_refresh_secs),
            ))
        } else {
            Arc::new(FileSource::new(path))
        };

        Self::with_catalog(config, Catalog::new(source))
    }

    pub fn with_catalog(config: Config, catalog: Catalog) -> Self {
        Self {
            config: Arc::new(config),
            catalog,
            metrics: Arc::new(RequestMetrics::new()),
        }
    }
}
