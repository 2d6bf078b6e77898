#![allow(clippy::doc_markdown)] // Allow technical terms like MainServiceTemplate in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Appo Core
//!
//! Package decomposition and dependency-resolution engine for edge application
//! orchestration.
//!
//! ## Overview
//!
//! Before an application is instantiated on an edge host, its package archive
//! is opened, the deployment descriptor is located and parsed, and every
//! service the application depends on is checked against the instances
//! already running on that host. Results travel to later pipeline stages in a
//! per-workflow [`OrchestrationContext`].
//!
//! ## Module Organization
//!
//! - [`package`] - Archive scanning, descriptor parsing and the rule model
//! - [`orchestration`] - Context, stage contract, runner, resolver and stages
//! - [`registry`] - Instance registry boundary and an in-memory implementation
//! - [`models`] - Instance records and dependency links
//! - [`config`] - Layered configuration
//! - [`logging`] - Structured tracing setup
//! - [`error`] - Structured error handling
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use appo_core::config::ConfigManager;
//! use appo_core::orchestration::{DecomposePackageStage, OrchestrationContext, StageRunner};
//! use appo_core::registry::InMemoryInstanceRegistry;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = ConfigManager::load()?;
//! let registry = Arc::new(InMemoryInstanceRegistry::new());
//! let stage = DecomposePackageStage::from_config(manager.config(), registry);
//!
//! let mut context = OrchestrationContext::from_variables(
//!     "workflow-1",
//!     [
//!         ("tenant_id", "tenant-1"),
//!         ("app_instance_id", "instance-1"),
//!         ("app_package_id", "package-1"),
//!         ("app_id", "app-1"),
//!         ("mec_host", "10.0.0.1"),
//!         ("app_name", "face-recognition"),
//!     ],
//! );
//!
//! let result = StageRunner::new(Arc::new(stage)).run(&mut context).await;
//! println!("decomposition: {}", result.outcome.status);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod models;
pub mod orchestration;
pub mod package;
pub mod registry;
pub mod utils;
pub mod validation;

pub use config::{AppoConfig, ConfigManager, LoggingConfig, PackageConfig};
pub use error::{AppoError, Result};
pub use logging::init_structured_logging;
pub use models::{DependencyLink, InstanceRecord, OperationalStatus};
pub use orchestration::{
    DecomposePackageStage, DependencyResolver, InputParametersStage, OrchestrationContext,
    PipelineStage, StageOutcome, StageRunner, StageStatus,
};
pub use package::{ArchiveDescriptorLocator, RequiredService, RuleDocumentParser, RuleModel};
pub use registry::{InMemoryInstanceRegistry, InstanceRegistry};
