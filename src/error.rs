//! # Error Types
//!
//! Structured errors for package decomposition and stage execution. Every
//! variant carries a stable error code that the stage runner writes into the
//! orchestration context when a stage fails.

use thiserror::Error;

/// Errors raised while running a pipeline stage
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AppoError {
    /// Package archive is missing, unreadable, or corrupt mid-stream
    #[error("Failed to read application package {path}: {message}")]
    ArchiveRead { path: String, message: String },

    /// Descriptor body is not a syntactically valid document
    #[error("Failed to load main service template yaml: {message}")]
    DescriptorParse { message: String },

    /// A declared dependency has no active instance on the target host
    #[error("dependency app {service_name} not deployed")]
    DependencyUnsatisfied { service_name: String },

    /// A required workflow variable is absent from the context
    #[error("Missing workflow variable: {name}")]
    MissingVariable { name: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Instance registry error: {0}")]
    Registry(String),

    #[error("Context error: {0}")]
    Context(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl AppoError {
    pub fn archive_read(path: impl Into<String>, message: impl ToString) -> Self {
        Self::ArchiveRead {
            path: path.into(),
            message: message.to_string(),
        }
    }

    pub fn descriptor_parse(message: impl ToString) -> Self {
        Self::DescriptorParse {
            message: message.to_string(),
        }
    }

    pub fn missing_variable(name: impl Into<String>) -> Self {
        Self::MissingVariable { name: name.into() }
    }

    /// Stable code for reporting and context outcome writes
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ArchiveRead { .. } => "ARCHIVE_READ_ERROR",
            Self::DescriptorParse { .. } => "DESCRIPTOR_PARSE_ERROR",
            Self::DependencyUnsatisfied { .. } => "DEPENDENCY_UNSATISFIED",
            Self::MissingVariable { .. } => "MISSING_VARIABLE",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::Registry(_) => "REGISTRY_ERROR",
            Self::Context(_) => "CONTEXT_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
        }
    }
}

impl From<serde_json::Error> for AppoError {
    fn from(err: serde_json::Error) -> Self {
        Self::Context(format!("JSON serialization failed: {err}"))
    }
}

pub type Result<T> = std::result::Result<T, AppoError>;
