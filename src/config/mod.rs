//! # Configuration
//!
//! Layered configuration for the orchestration core. Values come from compiled
//! defaults, an optional `appo-config.yaml`, an optional environment-specific
//! `appo-config.<env>.yaml`, and finally `APPO__*` environment variables.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use appo_core::config::ConfigManager;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = ConfigManager::load()?;
//! let base_path = &manager.config().package.base_path;
//! println!("packages are stored under {}", base_path.display());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod loader;

use crate::constants::package::{
    DEFAULT_DESCRIPTOR_MARKER, DEFAULT_EXTENSION, DEFAULT_MAX_DESCRIPTOR_BYTES,
    MAX_DESCRIPTOR_BYTES_CEILING,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use error::{ConfigResult, ConfigurationError};
pub use loader::ConfigManager;

/// Root configuration structure mirroring appo-config.yaml
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AppoConfig {
    /// Environment name the configuration was resolved for
    pub environment: String,

    /// Application package storage and descriptor lookup
    pub package: PackageConfig,

    /// Log output settings
    pub logging: LoggingConfig,
}

/// Where packages live and how their descriptor is located
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PackageConfig {
    /// Directory holding `<app_instance_id>/<app_package_id><extension>`
    pub base_path: PathBuf,

    /// Archive file extension, including the leading dot
    pub extension: String,

    /// Substring an archive entry path must contain to be treated as the descriptor
    pub descriptor_marker: String,

    /// Largest descriptor body accepted, in bytes
    pub max_descriptor_bytes: u64,
}

impl Default for PackageConfig {
    fn default() -> Self {
        Self {
            base_path: PathBuf::from("/usr/app/packages"),
            extension: DEFAULT_EXTENSION.to_string(),
            descriptor_marker: DEFAULT_DESCRIPTOR_MARKER.to_string(),
            max_descriptor_bytes: DEFAULT_MAX_DESCRIPTOR_BYTES,
        }
    }
}

impl PackageConfig {
    /// Path of the archive for one application instance
    ///
    /// Identifiers must already be validated; see
    /// [`crate::validation::validate_identifier`].
    pub fn package_path(&self, app_instance_id: &str, app_package_id: &str) -> PathBuf {
        self.base_path
            .join(app_instance_id)
            .join(format!("{app_package_id}{}", self.extension))
    }

    pub fn with_base_path(mut self, base_path: impl AsRef<Path>) -> Self {
        self.base_path = base_path.as_ref().to_path_buf();
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive overriding the environment default (e.g. `appo_core=trace`)
    pub level: Option<String>,

    /// Emit console output as JSON
    pub json: bool,

    /// Directory for a JSON log file; no file output when unset
    pub directory: Option<PathBuf>,
}

impl AppoConfig {
    /// Reject settings that would make every decomposition fail or misbehave
    pub fn validate(&self) -> ConfigResult<()> {
        if self.package.descriptor_marker.trim().is_empty() {
            return Err(ConfigurationError::invalid_value(
                "package.descriptor_marker",
                "",
                "descriptor marker must not be empty",
            ));
        }

        if self.package.extension.is_empty() {
            return Err(ConfigurationError::invalid_value(
                "package.extension",
                "",
                "package extension must not be empty",
            ));
        }

        if self.package.max_descriptor_bytes == 0 {
            return Err(ConfigurationError::invalid_value(
                "package.max_descriptor_bytes",
                "0",
                "descriptor size limit must be greater than zero",
            ));
        }

        if self.package.max_descriptor_bytes > MAX_DESCRIPTOR_BYTES_CEILING {
            return Err(ConfigurationError::invalid_value(
                "package.max_descriptor_bytes",
                self.package.max_descriptor_bytes.to_string(),
                format!("descriptor size limit must not exceed {MAX_DESCRIPTOR_BYTES_CEILING} bytes"),
            ));
        }

        Ok(())
    }
}
