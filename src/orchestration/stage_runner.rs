//! # Stage Runner
//!
//! Coordinates one stage invocation: times it, converts the stage's result
//! into a [`StageOutcome`], writes that outcome into the context, and emits
//! the structured stage log lines. Scheduling and retry belong to the caller.

use crate::logging::{log_error, log_stage_operation};
use crate::orchestration::context::OrchestrationContext;
use crate::orchestration::stage::{PipelineStage, StageOutcome};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info, instrument};

/// Runs a [`PipelineStage`] and records its outcome in the context
pub struct StageRunner {
    /// Stage implementation
    stage: Arc<dyn PipelineStage>,

    /// Whether to attach timing metadata to results
    enable_metrics: bool,
}

/// Result of a single stage execution
#[derive(Debug, Clone)]
pub struct StageExecutionResult {
    /// Outcome that was written to the context
    pub outcome: StageOutcome,

    /// Execution duration
    pub duration: Duration,

    /// Additional metadata about the execution
    pub metadata: HashMap<String, Value>,
}

impl StageExecutionResult {
    pub fn is_success(&self) -> bool {
        self.outcome.is_success()
    }
}

impl StageRunner {
    pub fn new(stage: Arc<dyn PipelineStage>) -> Self {
        Self {
            stage,
            enable_metrics: true,
        }
    }

    /// Enable or disable execution metadata collection
    pub fn with_metrics(mut self, enable: bool) -> Self {
        self.enable_metrics = enable;
        self
    }

    pub fn stage_name(&self) -> &'static str {
        self.stage.stage_name()
    }

    /// Execute the stage against `context`
    ///
    /// Never fails: a stage error becomes a failure outcome in the context.
    #[instrument(
        skip(self, context),
        fields(stage = self.stage.stage_name(), workflow_instance_id = %context.workflow_instance_id())
    )]
    pub async fn run(&self, context: &mut OrchestrationContext) -> StageExecutionResult {
        let stage_name = self.stage.stage_name();
        let workflow_instance_id = context.workflow_instance_id().to_string();
        let start_time = Instant::now();

        log_stage_operation("start", stage_name, &workflow_instance_id, "running", None);

        let result = self.stage.process(context).await;
        let duration = start_time.elapsed();

        let (outcome, error_type) = match result {
            Ok(message) => {
                info!(
                    duration_ms = duration.as_millis(),
                    "Stage execution completed successfully"
                );
                (StageOutcome::success(message), None)
            }
            Err(err) => {
                error!(
                    error = %err,
                    error_code = err.error_code(),
                    duration_ms = duration.as_millis(),
                    "Stage execution failed"
                );
                log_error(
                    stage_name,
                    "process",
                    &err.to_string(),
                    Some(&workflow_instance_id),
                );
                (StageOutcome::from(&err), Some(format!("{err:?}")))
            }
        };

        outcome.write_to(context);
        log_stage_operation(
            "complete",
            stage_name,
            &workflow_instance_id,
            outcome.status.as_str(),
            Some(&outcome.message),
        );

        let metadata = self.create_metadata(stage_name, duration, error_type);
        StageExecutionResult {
            outcome,
            duration,
            metadata,
        }
    }

    fn create_metadata(
        &self,
        stage_name: &str,
        duration: Duration,
        error_type: Option<String>,
    ) -> HashMap<String, Value> {
        let mut metadata = HashMap::new();

        if self.enable_metrics {
            metadata.insert(
                "execution_time_ms".to_string(),
                Value::from(duration.as_millis() as u64),
            );
            metadata.insert("stage_name".to_string(), Value::from(stage_name));
            if let Some(error_type) = error_type {
                metadata.insert("error_type".to_string(), Value::from(error_type));
            }
        }

        metadata
    }
}
