//! Configuration Loader - File Loading and Validation
//!
//! Handles loading `config.toml`, validating all parameters, and
//! providing clear error messages for misconfiguration.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use super::AppConfig;

/// Load and validate configuration from a TOML file.
///
/// # Errors
/// Returns detailed error if:
/// - File doesn't exist or can't be read
/// - TOML parsing fails
/// - Validation rules are violated
pub fn load_config(path: &str) -> Result<AppConfig> {
    let path = Path::new(path);

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: AppConfig =
        toml::from_str(&content).with_context(|| "Failed to parse config.toml")?;

    validate_config(&config)?;

    info!(
        service = %config.service.name,
        data_dir = %config.persistence.data_dir,
        metrics = config.metrics.enabled,
        "Configuration loaded successfully"
    );

    Ok(config)
}

/// Validate all configuration parameters.
fn validate_config(config: &AppConfig) -> Result<()> {
    anyhow::ensure!(
        !config.service.name.trim().is_empty(),
        "Service name must not be empty"
    );

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    anyhow::ensure!(
        valid_levels.contains(&config.service.log_level.as_str()),
        "Unknown log level: {}",
        config.service.log_level
    );

    anyhow::ensure!(
        !config.persistence.data_dir.trim().is_empty(),
        "Persistence data_dir must not be empty"
    );

    if config.metrics.enabled {
        anyhow::ensure!(
            !config.metrics.bind_address.trim().is_empty(),
            "Metrics bind_address must not be empty"
        );
        anyhow::ensure!(
            config.metrics.health_port != 0,
            "Health port must be non-zero"
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_nonexistent_file() {
        let result = load_config("nonexistent.toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_minimal_config_with_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [service]
            name = "auction-ledger"

            [persistence]
            data_dir = "data"
            "#,
        )
        .unwrap();

        assert_eq!(config.service.log_level, "info");
        assert!(config.metrics.enabled);
        assert_eq!(config.metrics.health_port, 8080);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_bad_log_level_rejected() {
        let config: AppConfig = toml::from_str(
            r#"
            [service]
            name = "auction-ledger"
            log_level = "loud"

            [persistence]
            data_dir = "data"
            "#,
        )
        .unwrap();

        assert!(validate_config(&config).is_err());
    }
}
