//! Configuration Loader
//!
//! Environment-aware configuration loading. Handles file discovery,
//! environment detection, and layering of environment variable overrides.

use super::error::{ConfigResult, ConfigurationError};
use super::AppoConfig;
use crate::constants::env::{CONFIG_PREFIX, ENVIRONMENT, FALLBACK_ENVIRONMENT};
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

const CONFIG_FILE_STEM: &str = "appo-config";

/// Holds the resolved configuration together with where it was loaded from
#[derive(Debug)]
pub struct ConfigManager {
    config: AppoConfig,
    environment: String,
    config_directory: PathBuf,
}

impl ConfigManager {
    /// Load configuration with environment auto-detection
    pub fn load() -> ConfigResult<Arc<ConfigManager>> {
        Self::load_from_directory(None)
    }

    /// Load configuration from a specific directory
    pub fn load_from_directory(config_dir: Option<PathBuf>) -> ConfigResult<Arc<ConfigManager>> {
        let environment = Self::detect_environment();
        Self::load_from_directory_with_env(config_dir, &environment)
    }

    /// Load configuration from a specific directory with explicit environment
    /// This is useful for testing without modifying global environment variables
    pub fn load_from_directory_with_env(
        config_dir: Option<PathBuf>,
        environment: &str,
    ) -> ConfigResult<Arc<ConfigManager>> {
        let config_directory = match config_dir {
            Some(dir) if !dir.is_dir() => return Err(ConfigurationError::DirectoryNotFound(dir)),
            Some(dir) => dir,
            None => PathBuf::from("config"),
        };

        debug!(
            environment = %environment,
            directory = %config_directory.display(),
            "Loading configuration"
        );

        let mut config = Self::build_config(&config_directory, environment)?;
        config.environment = environment.to_string();
        config.validate()?;

        info!(
            environment = %environment,
            package_base_path = %config.package.base_path.display(),
            descriptor_marker = %config.package.descriptor_marker,
            "Configuration loaded successfully"
        );

        Ok(Arc::new(ConfigManager {
            config,
            environment: environment.to_string(),
            config_directory,
        }))
    }

    /// Build a manager around an already constructed configuration
    pub fn from_config(config: AppoConfig) -> ConfigResult<Arc<ConfigManager>> {
        config.validate()?;
        let environment = if config.environment.is_empty() {
            Self::detect_environment()
        } else {
            config.environment.clone()
        };

        Ok(Arc::new(ConfigManager {
            config,
            environment,
            config_directory: PathBuf::from("config"),
        }))
    }

    /// Get the loaded configuration
    pub fn config(&self) -> &AppoConfig {
        &self.config
    }

    /// Get the current environment
    pub fn environment(&self) -> &str {
        &self.environment
    }

    /// Get the configuration directory
    pub fn config_directory(&self) -> &Path {
        &self.config_directory
    }

    /// Detect current environment: APPO_ENV || APP_ENV || 'development'
    pub fn detect_environment() -> String {
        env::var(ENVIRONMENT)
            .or_else(|_| env::var(FALLBACK_ENVIRONMENT))
            .unwrap_or_else(|_| "development".to_string())
            .to_lowercase()
    }

    /// Layer defaults, the base file, the environment file and env variables
    fn build_config(config_directory: &Path, environment: &str) -> ConfigResult<AppoConfig> {
        let base_file = config_directory.join(format!("{CONFIG_FILE_STEM}.yaml"));
        let env_file = config_directory.join(format!("{CONFIG_FILE_STEM}.{environment}.yaml"));

        for file in [&base_file, &env_file] {
            if file.exists() {
                debug!(file = %file.display(), "Found configuration file");
            }
        }

        let settings = config::Config::builder()
            .add_source(config::Config::try_from(&AppoConfig::default())?)
            .add_source(config::File::from(base_file).required(false))
            .add_source(config::File::from(env_file).required(false))
            .add_source(
                config::Environment::with_prefix(CONFIG_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
