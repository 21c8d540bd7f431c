//! Configuration loading from disk.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::MasterSlaveServersConfig;
use crate::config::validation::{validate_servers, ValidationError};

/// Error type for configuration loading and freezing.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<MasterSlaveServersConfig, ConfigError> {
    let config: MasterSlaveServersConfig = toml::from_str(content)?;
    validate_servers(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<MasterSlaveServersConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config = parse_config(&content)?;

    tracing::info!(
        path = %path.display(),
        slaves = config.slave_addresses.len(),
        read_mode = %config.master_slave.read_mode(),
        load_balancer = config.master_slave.load_balancer().name(),
        "Configuration loaded"
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReadMode;

    #[test]
    fn test_parse_full_file() {
        let config = parse_config(
            r#"
            master_address = "127.0.0.1:6379"
            slave_addresses = ["127.0.0.1:6380", "127.0.0.1:6381"]
            database = 1

            [master_slave]
            read_mode = "MASTER_SLAVE"
            master_connection_pool_size = 100
            slave_subscription_connection_pool_size = 25

            [master_slave.load_balancer]
            type = "weighted_round_robin"
            weights = { "127.0.0.1:6380" = 4 }
            "#,
        )
        .unwrap();

        let ms = &config.master_slave;
        assert_eq!(config.database, 1);
        assert_eq!(ms.read_mode(), ReadMode::MasterSlave);
        assert_eq!(ms.master_connection_pool_size(), 100);
        assert_eq!(ms.slave_subscription_connection_pool_size(), 25);
        // Unset fields keep their defaults
        assert_eq!(ms.slave_connection_pool_size(), 64);
        assert_eq!(ms.load_balancer().name(), "weighted_round_robin");
    }

    #[test]
    fn test_minimal_file_uses_defaults() {
        let config = parse_config(r#"master_address = "127.0.0.1:6379""#).unwrap();
        assert!(config.slave_addresses.is_empty());
        assert_eq!(config.master_slave.read_mode(), ReadMode::Slave);
        assert_eq!(config.master_slave.load_balancer().name(), "round_robin");
    }

    #[test]
    fn test_bad_weight_address_is_parse_error() {
        let err = parse_config(
            r#"
            master_address = "127.0.0.1:6379"
            [master_slave.load_balancer]
            type = "weighted_round_robin"
            weights = { "nowhere" = 2 }
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_zero_weight_is_validation_error() {
        let err = parse_config(
            r#"
            master_address = "127.0.0.1:6379"
            [master_slave.load_balancer]
            type = "weighted_round_robin"
            weights = { "127.0.0.1:6380" = 0 }
            "#,
        )
        .unwrap_err();
        match err {
            ConfigError::Validation(errors) => assert_eq!(
                errors,
                vec![ValidationError::ZeroWeight("127.0.0.1:6380".into())]
            ),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_unknown_read_mode_is_parse_error() {
        let err = parse_config(
            r#"
            master_address = "127.0.0.1:6379"
            [master_slave]
            read_mode = "REPLICA"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_validation_error_lists_everything() {
        let err = parse_config(
            r#"
            [master_slave]
            slave_connection_pool_size = 2
            "#,
        )
        .unwrap_err();
        match err {
            ConfigError::Validation(errors) => assert_eq!(errors.len(), 2),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_config(Path::new("/nonexistent/masterslave.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
