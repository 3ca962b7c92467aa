use super::models::Config;
use config::{ConfigError, Environment, File};
use std::env;
use std::path::PathBuf;

const CONFIG_ENV_VAR: &str = "CATALOG_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/catalog.toml";
const ENV_PREFIX: &str = "CATALOG";
const ENV_SEPARATOR: &str = "__";
const PORT_ENV_VAR: &str = "PORT";

/// Load configuration from multiple sources with priority:
/// 1. Defaults (embedded in structs)
/// 2. TOML file (if exists)
/// 3. Environment variables from .env file (via dotenvy)
/// 4. System environment variables, `PORT` last (highest priority)
pub fn load(config_path: Option<PathBuf>) -> Result<Config, super::ConfigError> {
    // Load .env file if it exists (ignore errors if file doesn't exist)
    let _ = dotenvy::dotenv();

    let config_path = config_path
        .or_else(|| env::var(CONFIG_ENV_VAR).ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    let mut config = load_from_sources(config_path)?;
    apply_port_override(&mut config, env::var(PORT_ENV_VAR).ok())?;

    Ok(config)
}

/// Apply the conventional `PORT` variable on top of everything else
pub fn apply_port_override(
    config: &mut Config,
    port: Option<String>,
) -> Result<(), super::ConfigError> {
    let Some(raw) = port.filter(|value| !value.trim().is_empty()) else {
        return Ok(());
    };

    config.server.port = raw
        .trim()
        .parse()
        .map_err(|_| super::ConfigError::InvalidPort(raw.clone()))?;

    Ok(())
}

/// Load configuration from a specific path and environment
/// Useful for testing with custom config files
pub fn load_from_sources(config_path: PathBuf) -> Result<Config, ConfigError> {
    let mut builder = config::Config::builder();

    if config_path.exists() {
        tracing::info!("Loading configuration from: {}", config_path.display());
        builder = builder.add_source(File::from(config_path).required(false));
    } else {
        tracing::warn!(
            "Configuration file not found at {}, using defaults and environment overrides",
            config_path.display()
        );
    }

    // CATALOG__SERVER__PORT -> server.port
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator(ENV_SEPARATOR)
            .try_parsing(true),
    );

    let config = builder.build()?;
    config.try_deserialize()
}
