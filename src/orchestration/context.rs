//! # Orchestration Context
//!
//! Ordered workflow variables for one workflow instance. The scheduler creates
//! the context when the instance starts, hands it to each stage in turn by
//! mutable reference, and discards it when the instance completes. Stages
//! only read and write entries.

use crate::error::{AppoError, Result};
use crate::validation::validate_context_value;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Workflow variables of a single workflow instance, in insertion order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrchestrationContext {
    workflow_instance_id: String,
    created_at: DateTime<Utc>,
    variables: IndexMap<String, Value>,
}

impl OrchestrationContext {
    pub fn new(workflow_instance_id: impl Into<String>) -> Self {
        Self {
            workflow_instance_id: workflow_instance_id.into(),
            created_at: Utc::now(),
            variables: IndexMap::new(),
        }
    }

    /// Context pre-populated with scheduler inputs
    pub fn from_variables<K, V, I>(workflow_instance_id: impl Into<String>, variables: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut context = Self::new(workflow_instance_id);
        for (name, value) in variables {
            context.set(name, value);
        }
        context
    }

    pub fn workflow_instance_id(&self) -> &str {
        &self.workflow_instance_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    /// String value of a variable; `None` when absent, null, or not a string
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.variables.get(name).and_then(Value::as_str)
    }

    /// String value of a variable that the calling stage cannot work without
    pub fn require_str(&self, name: &str) -> Result<&str> {
        self.get_str(name)
            .ok_or_else(|| AppoError::missing_variable(name))
    }

    /// Decode a variable written with [`set_json`](Self::set_json)
    pub fn get_json<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>> {
        match self.variables.get(name) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(text)) => Ok(Some(serde_json::from_str(text)?)),
            Some(other) => Ok(Some(serde_json::from_value(other.clone())?)),
        }
    }

    /// Set a variable, replacing any previous value in place
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.variables.insert(name.into(), value.into());
    }

    /// Store `value` as serialized JSON text
    pub fn set_json<T: Serialize>(&mut self, name: &str, value: &T) -> Result<()> {
        let encoded = Self::encode_json(name, value)?;
        self.set(name, encoded);
        Ok(())
    }

    /// Serialize and validate a value without storing it
    ///
    /// Lets a stage prepare several outputs and commit them only when all of
    /// them encoded successfully.
    pub fn encode_json<T: Serialize>(name: &str, value: &T) -> Result<Value> {
        let structured = serde_json::to_value(value)?;
        validate_context_value(name, &structured)?;
        Ok(Value::String(serde_json::to_string(&structured)?))
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.variables.shift_remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Variables in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.variables.iter().map(|(name, value)| (name.as_str(), value))
    }
}
