//! # Structured Logging Module
//!
//! Environment-aware structured logging to the console and, optionally, to a
//! JSON log file for following individual workflow instances through stages.

use crate::config::LoggingConfig;
use crate::constants::env::LOG_FILTER;
use chrono::Utc;
use std::process;
use std::sync::OnceLock;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

static LOGGER_INITIALIZED: OnceLock<Option<WorkerGuard>> = OnceLock::new();

/// Initialize structured logging with environment-specific configuration
///
/// Safe to call more than once; only the first call installs a subscriber.
pub fn init_structured_logging(environment: &str, config: &LoggingConfig) {
    LOGGER_INITIALIZED.get_or_init(|| {
        let filter = get_log_filter(environment, config.level.as_deref());

        let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();

        if config.json {
            layers.push(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .json()
                    .with_filter(EnvFilter::new(&filter))
                    .boxed(),
            );
        } else {
            layers.push(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_ansi(true)
                    .with_filter(EnvFilter::new(&filter))
                    .boxed(),
            );
        }

        let guard = config.directory.as_ref().map(|log_dir| {
            let file_name = format!(
                "{}.{}.{}.log",
                environment,
                process::id(),
                Utc::now().format("%Y%m%d_%H%M%S")
            );
            let appender = tracing_appender::rolling::never(log_dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            layers.push(
                fmt::layer()
                    .with_writer(writer)
                    .with_target(true)
                    .with_ansi(false)
                    .json()
                    .with_filter(EnvFilter::new(&filter))
                    .boxed(),
            );
            guard
        });

        // A subscriber may already be installed by an embedding process
        if tracing_subscriber::registry().with(layers).try_init().is_err() {
            tracing::debug!("Global tracing subscriber already initialized");
        }

        tracing::info!(
            pid = process::id(),
            environment = %environment,
            filter = %filter,
            "Structured logging initialized"
        );

        guard
    });
}

/// Resolve the filter directive: APPO_LOG, then configuration, then environment default
fn get_log_filter(environment: &str, configured: Option<&str>) -> String {
    std::env::var(LOG_FILTER)
        .ok()
        .or_else(|| configured.map(str::to_string))
        .unwrap_or_else(|| get_log_level(environment).to_string())
}

/// Get log level based on environment
fn get_log_level(environment: &str) -> &'static str {
    match environment {
        "production" => "info",
        _ => "debug",
    }
}

/// Log structured data for pipeline stage operations
pub fn log_stage_operation(
    operation: &str,
    stage: &str,
    workflow_instance_id: &str,
    status: &str,
    details: Option<&str>,
) {
    tracing::info!(
        operation = %operation,
        stage = %stage,
        workflow_instance_id = %workflow_instance_id,
        status = %status,
        details = details,
        timestamp = %Utc::now().to_rfc3339(),
        "STAGE_OPERATION"
    );
}

/// Log structured data for instance registry lookups
pub fn log_registry_operation(
    operation: &str,
    tenant_id: &str,
    host_id: &str,
    record_count: usize,
) {
    tracing::debug!(
        operation = %operation,
        tenant_id = %tenant_id,
        host_id = %host_id,
        record_count = record_count,
        "REGISTRY_OPERATION"
    );
}

/// Log error with full context
pub fn log_error(component: &str, operation: &str, error: &str, context: Option<&str>) {
    tracing::error!(
        component = %component,
        operation = %operation,
        error = %error,
        context = context,
        timestamp = %Utc::now().to_rfc3339(),
        "ERROR"
    );
}
