//! Configuration error types

use crate::error::AppoError;
use std::path::PathBuf;
use thiserror::Error;

pub type ConfigResult<T> = std::result::Result<T, ConfigurationError>;

#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("Configuration directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    #[error("Failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

impl ConfigurationError {
    pub fn invalid_value(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}

impl From<ConfigurationError> for AppoError {
    fn from(err: ConfigurationError) -> Self {
        AppoError::Configuration(err.to_string())
    }
}
