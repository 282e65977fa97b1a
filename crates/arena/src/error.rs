//! Error types.

use thiserror::Error;

/// Errors that can occur while loading or writing the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to access config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize default config: {0}")]
    Serialize(#[from] toml::ser::Error),
}
