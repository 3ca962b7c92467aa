//! Configuration management for the catalog service
//!
//! This module provides a layered configuration system that loads settings from:
//! 1. Default values (embedded in structs)
//! 2. TOML configuration file
//! 3. Environment variables (highest priority)
//!
//! # Usage
//!
//! ```no_run
//! use product_catalog::config::Config;
//!
//! let config = Config::load().expect("Failed to load configuration");
//! println!("Server listening on: {}", config.bind_addr());
//! ```
//!
//! # Environment Variables
//!
//! Configuration can be overridden using environment variables with the pattern:
//! `CATALOG__<section>__<key>`
//!
//! Examples:
//! - `CATALOG__SERVER__HOST=127.0.0.1`
//! - `CATALOG__CATALOG__DATA_FILE=/srv/products.json`
//! - `CATALOG__CATALOG__CACHE=true`
//!
//! `PORT` is honoured on its own and wins over every other source.
//!
//! # Configuration File
//!
//! By default, the configuration is loaded from `config/catalog.toml`.
//! This can be overridden using the `CATALOG_CONFIG` environment variable.

mod models;
mod sources;
mod validation;

pub use models::{AssetsConfig, CatalogConfig, Config, ServerConfig};
pub use sources::apply_port_override;
pub use validation::ValidationError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] ValidationError),

    #[error("PORT must be a valid port number, got '{0}'")]
    InvalidPort(String),
}

impl Config {
    /// Load configuration from all sources (file + environment)
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file is malformed, `PORT` is
    /// not a number, or validation fails.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(None)
    }

    /// Same as [`Config::load`] but with an explicit file taking precedence
    /// over `CATALOG_CONFIG`
    pub fn load_with(path: Option<std::path::PathBuf>) -> Result<Self, ConfigError> {
        let config = sources::load(path)?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific path, ignoring `PORT`
    ///
    /// Useful for testing with custom configuration files.
    pub fn load_from_path(path: std::path::PathBuf) -> Result<Self, ConfigError> {
        let config = sources::load_from_sources(path)?;
        validation::validate(&config)?;
        Ok(config)
    }
}
