use super::models::Config;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("server.max_body_bytes must be positive")]
    ZeroBodyLimit,

    #[error("catalog.data_file must not be empty")]
    MissingDataFile,

    #[error("assets.index_file must not be empty")]
    MissingIndexFile,
}

/// Validate the entire configuration
pub fn validate(config: &Config) -> Result<(), ValidationError> {
    if config.server.max_body_bytes == 0 {
        return Err(ValidationError::ZeroBodyLimit);
    }

    if config.catalog.data_file.as_os_str().is_empty() {
        return Err(ValidationError::MissingDataFile);
    }

    if config.assets.index_file.as_os_str().is_empty() {
        return Err(ValidationError::MissingIndexFile);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_defaults_are_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_zero_body_limit() {
        let mut config = Config::default();
        config.server.max_body_bytes = 0;

        assert!(matches!(validate(&config), Err(ValidationError::ZeroBodyLimit)));
    }

    #[test]
    fn test_empty_paths() {
        let mut config = Config::default();
        config.catalog.data_file = PathBuf::new();
        assert!(matches!(validate(&config), Err(ValidationError::MissingDataFile)));

        let mut config = Config::default();
        config.assets.index_file = PathBuf::new();
        assert!(matches!(validate(&config), Err(ValidationError::MissingIndexFile)));
    }
}
