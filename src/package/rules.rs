//! Typed deployment rule model projected from a descriptor's properties block.
//!
//! Field names follow the descriptor's camelCase keys, and the same names are
//! used when the model is serialized into the orchestration context.

use crate::utils::serde::{
    deserialize_lenient_string, deserialize_optional_bool, deserialize_optional_numeric,
    deserialize_optional_string,
};
use serde::{Deserialize, Serialize};

/// Deployment rules for one application
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleModel {
    #[serde(
        rename = "appTrafficRule",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub app_traffic_rule: Option<Vec<TrafficRule>>,

    #[serde(rename = "appDNSRule", default, skip_serializing_if = "Option::is_none")]
    pub app_dns_rule: Option<Vec<DnsRule>>,

    /// Always overwritten from workflow input before the model leaves the stage
    #[serde(rename = "appName", default, skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,

    #[serde(
        rename = "appSupportMp1",
        default,
        deserialize_with = "deserialize_optional_bool",
        skip_serializing_if = "Option::is_none"
    )]
    pub app_support_mp1: Option<bool>,

    #[serde(
        rename = "appServiceRequired",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub app_service_required: Option<Vec<RequiredService>>,
}

impl RuleModel {
    /// Declared dependencies in declaration order
    pub fn required_services(&self) -> &[RequiredService] {
        self.app_service_required.as_deref().unwrap_or_default()
    }

    /// Whether the model carries any traffic or DNS rule worth publishing
    pub fn has_rules(&self) -> bool {
        self.app_traffic_rule
            .as_ref()
            .is_some_and(|rules| !rules.is_empty())
            || self
                .app_dns_rule
                .as_ref()
                .is_some_and(|rules| !rules.is_empty())
    }

    /// Drop the dependency list once it has been published separately
    pub fn clear_required_services(&mut self) {
        self.app_service_required = None;
    }
}

/// One declared service dependency
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredService {
    #[serde(rename = "appId", default, deserialize_with = "deserialize_lenient_string")]
    pub app_id: String,

    #[serde(rename = "serName", default, deserialize_with = "deserialize_lenient_string")]
    pub service_name: String,

    #[serde(
        rename = "packageId",
        default,
        deserialize_with = "deserialize_optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub package_id: Option<String>,

    #[serde(
        default,
        deserialize_with = "deserialize_optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub version: Option<String>,
}

impl RequiredService {
    pub fn new(
        app_id: impl Into<String>,
        service_name: impl Into<String>,
        package_id: Option<&str>,
    ) -> Self {
        Self {
            app_id: app_id.into(),
            service_name: service_name.into(),
            package_id: package_id.map(str::to_string),
            version: None,
        }
    }

    /// Services without a package are provided by the platform and never checked
    pub fn is_platform_capability(&self) -> bool {
        self.package_id
            .as_deref()
            .map_or(true, |id| id.trim().is_empty())
    }
}

/// Traffic steering rule applied on the edge host
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficRule {
    #[serde(
        default,
        deserialize_with = "deserialize_optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub traffic_rule_id: Option<String>,

    #[serde(
        default,
        deserialize_with = "deserialize_optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub filter_type: Option<String>,

    #[serde(
        default,
        deserialize_with = "deserialize_optional_numeric",
        skip_serializing_if = "Option::is_none"
    )]
    pub priority: Option<i64>,

    #[serde(
        default,
        deserialize_with = "deserialize_optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub action: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub traffic_filter: Vec<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dst_interface: Vec<serde_json::Value>,
}

/// DNS record the platform should publish for the application
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsRule {
    #[serde(
        default,
        deserialize_with = "deserialize_optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub dns_rule_id: Option<String>,

    #[serde(
        default,
        deserialize_with = "deserialize_optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub domain_name: Option<String>,

    #[serde(
        default,
        deserialize_with = "deserialize_optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub ip_address_type: Option<String>,

    #[serde(
        default,
        deserialize_with = "deserialize_optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub ip_address: Option<String>,

    #[serde(
        default,
        deserialize_with = "deserialize_optional_numeric",
        skip_serializing_if = "Option::is_none"
    )]
    pub ttl: Option<i64>,
}
