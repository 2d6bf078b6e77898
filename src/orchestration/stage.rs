//! # Pipeline Stage Contract
//!
//! A pipeline stage reads its inputs from the orchestration context, does its
//! work, writes its outputs back, and reports success or failure. The external
//! scheduler invokes each stage once per workflow instance and owns any retry.

use crate::constants::{outcome, variables};
use crate::error::{AppoError, Result};
use crate::orchestration::context::OrchestrationContext;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Trait implemented by every pipeline stage
///
/// Stages return `Err` for fatal conditions; [`StageRunner`] converts both
/// branches into an outcome written to the context, so nothing escapes the
/// stage boundary.
///
/// [`StageRunner`]: crate::orchestration::StageRunner
#[async_trait]
pub trait PipelineStage: Send + Sync {
    /// Perform the stage's work against `context`
    ///
    /// # Returns
    ///
    /// * `Ok(message)` - Human-readable success message
    /// * `Err` - The condition that failed the stage
    async fn process(&self, context: &mut OrchestrationContext) -> Result<String>;

    /// Get the stage name for identification
    ///
    /// This is used for logging and result metadata.
    /// Default implementation returns the type name.
    fn stage_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Terminal status of one stage invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    Success,
    Failure,
}

impl StageStatus {
    /// Value written to the `process_flow_result` variable
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => outcome::SUCCESS,
            Self::Failure => outcome::ERROR,
        }
    }
}

impl fmt::Display for StageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StageStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            outcome::SUCCESS => Ok(Self::Success),
            outcome::ERROR => Ok(Self::Failure),
            _ => Err(format!("Invalid stage status: {s}")),
        }
    }
}

/// Status/message pair every stage leaves behind in the context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageOutcome {
    pub status: StageStatus,
    pub message: String,
    pub error_code: Option<String>,
}

impl StageOutcome {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: StageStatus::Success,
            message: message.into(),
            error_code: None,
        }
    }

    pub fn failure(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: StageStatus::Failure,
            message: message.into(),
            error_code: Some(error_code.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == StageStatus::Success
    }

    /// Write the outcome variables, clearing a stale error code on success
    pub fn write_to(&self, context: &mut OrchestrationContext) {
        context.set(variables::PROCESS_FLOW_RESULT, self.status.as_str());
        context.set(variables::PROCESS_FLOW_MESSAGE, self.message.as_str());
        match &self.error_code {
            Some(code) => context.set(variables::PROCESS_FLOW_ERROR_CODE, code.as_str()),
            None => {
                context.remove(variables::PROCESS_FLOW_ERROR_CODE);
            }
        }
    }

    /// Read back the outcome last written to `context`
    pub fn read_from(context: &OrchestrationContext) -> Option<Self> {
        let status = context
            .get_str(variables::PROCESS_FLOW_RESULT)?
            .parse()
            .ok()?;
        Some(Self {
            status,
            message: context
                .get_str(variables::PROCESS_FLOW_MESSAGE)
                .unwrap_or_default()
                .to_string(),
            error_code: context
                .get_str(variables::PROCESS_FLOW_ERROR_CODE)
                .map(str::to_string),
        })
    }
}

impl From<&AppoError> for StageOutcome {
    fn from(error: &AppoError) -> Self {
        Self::failure(error.error_code(), error.to_string())
    }
}
