//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use url::Url;

use crate::config::schema::GatewayConfig;

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: GatewayConfig = toml::from_str(&content)?;

    validate_config(&config)?;

    Ok(config)
}

/// Validate a configuration, whether loaded or built in code.
pub fn validate_config(config: &GatewayConfig) -> Result<(), ConfigError> {
    if config.listener.bind_address.is_empty() {
        return Err(ConfigError::Validation(
            "listener.bind_address must not be empty".to_string(),
        ));
    }

    for (name, raw) in [
        ("backends.sports_url", &config.backends.sports_url),
        ("backends.recipes_url", &config.backends.recipes_url),
    ] {
        Url::parse(raw)
            .map_err(|e| ConfigError::Validation(format!("{name} is not a valid URL: {e}")))?;
    }

    if config.admission.max_concurrent_requests == 0 {
        return Err(ConfigError::Validation(
            "admission.max_concurrent_requests must be at least 1".to_string(),
        ));
    }

    if config.timeouts.upstream_ms == 0 {
        return Err(ConfigError::Validation(
            "timeouts.upstream_ms must be at least 1".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        validate_config(&GatewayConfig::default()).unwrap();
    }

    #[test]
    fn rejects_zero_admission_limit() {
        let mut config = GatewayConfig::default();
        config.admission.max_concurrent_requests = 0;
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn rejects_malformed_backend_url() {
        let mut config = GatewayConfig::default();
        config.backends.recipes_url = "not a url".to_string();
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::Validation(_))
        ));
    }
}
