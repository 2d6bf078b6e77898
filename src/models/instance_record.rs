use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of an application instance as reported by the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationalStatus {
    /// Instance record exists, nothing deployed yet
    Created,
    /// Deployment to the host is in progress
    Instantiating,
    /// Instance is running on its host
    Instantiated,
    #[serde(rename = "Instantiation failed")]
    InstantiationFailed,
    Terminating,
    Terminated,
    #[serde(rename = "Terminate failed")]
    TerminateFailed,
    /// Any status string this crate does not recognise
    #[serde(other)]
    Unknown,
}

impl OperationalStatus {
    /// Only running instances can satisfy another application's dependency
    pub fn satisfies_dependencies(&self) -> bool {
        matches!(self, Self::Instantiated)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminated)
    }
}

impl fmt::Display for OperationalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => write!(f, "Created"),
            Self::Instantiating => write!(f, "Instantiating"),
            Self::Instantiated => write!(f, "Instantiated"),
            Self::InstantiationFailed => write!(f, "Instantiation failed"),
            Self::Terminating => write!(f, "Terminating"),
            Self::Terminated => write!(f, "Terminated"),
            Self::TerminateFailed => write!(f, "Terminate failed"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

impl std::str::FromStr for OperationalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Created" => Ok(Self::Created),
            "Instantiating" => Ok(Self::Instantiating),
            "Instantiated" => Ok(Self::Instantiated),
            "Instantiation failed" => Ok(Self::InstantiationFailed),
            "Terminating" => Ok(Self::Terminating),
            "Terminated" => Ok(Self::Terminated),
            "Terminate failed" => Ok(Self::TerminateFailed),
            _ => Err(format!("Invalid operational status: {s}")),
        }
    }
}

/// Read-only view of one application instance owned by the instance registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceRecord {
    pub app_instance_id: String,
    pub app_id: String,
    pub operational_status: OperationalStatus,
    pub host_id: String,
}

impl InstanceRecord {
    pub fn new(
        app_instance_id: impl Into<String>,
        app_id: impl Into<String>,
        operational_status: OperationalStatus,
        host_id: impl Into<String>,
    ) -> Self {
        Self {
            app_instance_id: app_instance_id.into(),
            app_id: app_id.into(),
            operational_status,
            host_id: host_id.into(),
        }
    }

    pub fn is_instantiated(&self) -> bool {
        self.operational_status.satisfies_dependencies()
    }
}
