//! # Input Parameters Stage
//!
//! First stage of every workflow. Reads `requestAction` and makes sure each
//! input that action needs is present in the context, writing `null` for
//! absent ones so later stages always find a defined key.

use crate::constants::{stages, variables};
use crate::error::Result;
use crate::orchestration::context::OrchestrationContext;
use crate::orchestration::stage::PipelineStage;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

/// Lifecycle action requested by the workflow's caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestAction {
    CreateAppInstance,
    InstantiateAppInstance,
    TerminateAppInstance,
    QueryAppInstance,
    QueryCapabilities,
    #[serde(rename = "QueryKPI")]
    QueryKpi,
}

impl RequestAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreateAppInstance => "CreateAppInstance",
            Self::InstantiateAppInstance => "InstantiateAppInstance",
            Self::TerminateAppInstance => "TerminateAppInstance",
            Self::QueryAppInstance => "QueryAppInstance",
            Self::QueryCapabilities => "QueryCapabilities",
            Self::QueryKpi => "QueryKPI",
        }
    }

    /// Context variables the action reads, in logging order
    pub fn required_inputs(&self) -> &'static [&'static str] {
        match self {
            Self::CreateAppInstance => &[
                variables::ACCESS_TOKEN,
                variables::TENANT_ID,
                variables::APP_PACKAGE_ID,
                variables::MEC_HOST,
                variables::APP_DESCR,
                variables::APP_ID,
                variables::APP_NAME,
                variables::APP_INSTANCE_ID,
                variables::HW_CAPABILITIES,
            ],
            Self::InstantiateAppInstance | Self::TerminateAppInstance | Self::QueryAppInstance => &[
                variables::ACCESS_TOKEN,
                variables::TENANT_ID,
                variables::APP_INSTANCE_ID,
            ],
            Self::QueryCapabilities | Self::QueryKpi => &[
                variables::ACCESS_TOKEN,
                variables::TENANT_ID,
                variables::MEC_HOST,
                variables::MEP_CAPABILITY_ID,
            ],
        }
    }
}

impl fmt::Display for RequestAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestAction {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "CreateAppInstance" => Ok(Self::CreateAppInstance),
            "InstantiateAppInstance" => Ok(Self::InstantiateAppInstance),
            "TerminateAppInstance" => Ok(Self::TerminateAppInstance),
            "QueryAppInstance" => Ok(Self::QueryAppInstance),
            "QueryCapabilities" => Ok(Self::QueryCapabilities),
            "QueryKPI" => Ok(Self::QueryKpi),
            _ => Err(format!("Unknown request action: {s}")),
        }
    }
}

/// Normalises per-action workflow inputs
#[derive(Debug, Clone, Copy, Default)]
pub struct InputParametersStage;

impl InputParametersStage {
    pub fn new() -> Self {
        Self
    }

    /// Define every input `action` reads; returns the names that were absent
    pub fn apply(&self, action: RequestAction, context: &mut OrchestrationContext) -> Vec<&'static str> {
        let mut absent = Vec::new();
        for &name in action.required_inputs() {
            if !context.contains(name) {
                context.set(name, Value::Null);
                absent.push(name);
            }
        }
        absent
    }

    /// Loggable rendering of the inputs; the access token is never included
    fn describe_inputs(action: RequestAction, context: &OrchestrationContext) -> String {
        action
            .required_inputs()
            .iter()
            .filter(|&&name| name != variables::ACCESS_TOKEN)
            .map(|&name| format!("{name}: {}", context.get_str(name).unwrap_or("null")))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[async_trait]
impl PipelineStage for InputParametersStage {
    async fn process(&self, context: &mut OrchestrationContext) -> Result<String> {
        let raw_action = context.require_str(variables::REQUEST_ACTION)?.to_string();

        let action = match raw_action.parse::<RequestAction>() {
            Ok(action) => action,
            Err(_) => {
                debug!(request_action = %raw_action, "No input parameters for request action");
                return Ok(format!("No input parameters for {raw_action}"));
            }
        };

        let absent = self.apply(action, context);
        info!(
            request_action = %action,
            absent = ?absent,
            "{}",
            Self::describe_inputs(action, context)
        );

        Ok(format!("Input parameters set for {action}"))
    }

    fn stage_name(&self) -> &'static str {
        stages::INPUT_PARAMETERS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppoError;

    #[tokio::test]
    async fn test_absent_inputs_become_null() {
        let mut context = OrchestrationContext::from_variables(
            "wf",
            [
                ("requestAction", "InstantiateAppInstance"),
                ("tenant_id", "t1"),
            ],
        );

        InputParametersStage::new().process(&mut context).await.unwrap();

        assert_eq!(context.get(variables::ACCESS_TOKEN), Some(&Value::Null));
        assert_eq!(context.get(variables::APP_INSTANCE_ID), Some(&Value::Null));
        assert_eq!(context.get_str(variables::TENANT_ID), Some("t1"));
        assert!(!context.contains(variables::MEC_HOST));
    }

    #[tokio::test]
    async fn test_unknown_action_is_noop() {
        let mut context =
            OrchestrationContext::from_variables("wf", [("requestAction", "RebootHost")]);

        let message = InputParametersStage::new().process(&mut context).await.unwrap();

        assert!(message.contains("RebootHost"));
        assert_eq!(context.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_action_is_error() {
        let mut context = OrchestrationContext::new("wf");
        let err = InputParametersStage::new()
            .process(&mut context)
            .await
            .unwrap_err();
        assert_eq!(err, AppoError::missing_variable("requestAction"));
    }

    #[test]
    fn test_access_token_not_described() {
        let context = OrchestrationContext::from_variables(
            "wf",
            [("access_token", "secret-token"), ("tenant_id", "t1")],
        );
        let text = InputParametersStage::describe_inputs(RequestAction::QueryKpi, &context);
        assert!(!text.contains("secret-token"));
        assert!(text.contains("tenant_id: t1"));
    }

    #[test]
    fn test_action_names_round_trip() {
        for name in ["CreateAppInstance", "QueryKPI", "TerminateAppInstance"] {
            let action: RequestAction = name.parse().unwrap();
            assert_eq!(action.to_string(), name);
        }
        assert_eq!(
            RequestAction::CreateAppInstance.required_inputs().len(),
            9
        );
    }
}
