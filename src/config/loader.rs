//! Configuration loading from disk.

use std::fs;
use std::path::Path;
use url::Url;

use crate::config::schema::{AppConfig, NetworkConfig};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// A single semantic problem found in an otherwise parseable config.
#[derive(Debug)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: AppConfig = toml::from_str(&content).map_err(ConfigError::Parse)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Load from an explicit path, or fall back to the built-in defaults.
pub fn load_or_default(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    match path {
        Some(p) => load_config(p),
        None => Ok(AppConfig::default()),
    }
}

/// Semantic validation. Collects every problem rather than stopping at
/// the first one.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.token.decimals > 36 {
        errors.push(ValidationError {
            field: "token.decimals".to_string(),
            message: format!("{} is out of range", config.token.decimals),
        });
    }

    validate_network("networks.mainnet", &config.networks.mainnet, &mut errors);
    validate_network("networks.sepolia", &config.networks.sepolia, &mut errors);

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

fn validate_network(prefix: &str, network: &NetworkConfig, errors: &mut Vec<ValidationError>) {
    match Url::parse(&network.endpoint) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(ValidationError {
            field: format!("{}.endpoint", prefix),
            message: format!("unsupported scheme '{}'", url.scheme()),
        }),
        Err(e) => errors.push(ValidationError {
            field: format!("{}.endpoint", prefix),
            message: e.to_string(),
        }),
    }

    if network.chain_id == 0 {
        errors.push(ValidationError {
            field: format!("{}.chain_id", prefix),
            message: "chain id must be non-zero".to_string(),
        });
    }
}
