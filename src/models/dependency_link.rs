use serde::{Deserialize, Serialize};

/// One satisfied dependency: `dependent_instance_id` relies on `dependency_instance_id`
///
/// Serialized field names match what downstream stages read from the
/// `app_required` variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyLink {
    #[serde(rename = "tenant")]
    pub tenant_id: String,

    #[serde(rename = "appInstanceId")]
    pub dependent_instance_id: String,

    #[serde(rename = "dependencyAppInstanceId")]
    pub dependency_instance_id: String,
}

impl DependencyLink {
    pub fn new(
        tenant_id: impl Into<String>,
        dependent_instance_id: impl Into<String>,
        dependency_instance_id: impl Into<String>,
    ) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            dependent_instance_id: dependent_instance_id.into(),
            dependency_instance_id: dependency_instance_id.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_field_names() {
        let link = DependencyLink::new("tenant-1", "inst-a", "inst-b");
        let json = serde_json::to_value(&link).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "tenant": "tenant-1",
                "appInstanceId": "inst-a",
                "dependencyAppInstanceId": "inst-b"
            })
        );
    }
}
