//! # Rule Document Parser
//!
//! Parses the descriptor body and walks `topology_template → node_templates →
//! app_configuration → properties`. A syntactically broken document is an
//! error; a document that simply lacks one of those sections is not, and
//! yields no rules.

use crate::constants::descriptor_keys::RULES_PATH;
use crate::error::{AppoError, Result};
use crate::package::rules::RuleModel;
use serde_yaml::Value;
use tracing::{debug, warn};

/// Result of walking a key path through the descriptor
#[derive(Debug, Clone, PartialEq)]
pub enum DescriptorLookup<'a> {
    /// Every key resolved to a mapping; holds the innermost one
    Found(&'a Value),

    /// The walk stopped at `key`, which is absent, null, or not a mapping
    Missing { key: &'static str },
}

impl DescriptorLookup<'_> {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

/// Walk `path` from `root`, short-circuiting at the first unusable level
pub fn lookup_path<'a>(root: &'a Value, path: &[&'static str]) -> DescriptorLookup<'a> {
    let mut current = root;
    for &key in path {
        match current.get(key) {
            Some(next @ Value::Mapping(_)) => current = next,
            _ => return DescriptorLookup::Missing { key },
        }
    }
    DescriptorLookup::Found(current)
}

/// Parses descriptor bodies into [`RuleModel`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleDocumentParser;

impl RuleDocumentParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse the raw body into a generic document
    pub fn parse_document(&self, body: &[u8]) -> Result<Value> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }

        serde_yaml::from_slice(body).map_err(|e| {
            warn!(error = %e, "Descriptor is not a valid YAML document");
            AppoError::descriptor_parse(e)
        })
    }

    /// Parse the body and project its rule properties
    ///
    /// Returns `Ok(None)` when any section along the rule path is absent.
    pub fn parse_rules(&self, body: &[u8]) -> Result<Option<RuleModel>> {
        let document = self.parse_document(body)?;
        self.project_rules(&document)
    }

    /// Project an already parsed document into a rule model
    pub fn project_rules(&self, document: &Value) -> Result<Option<RuleModel>> {
        let properties = match lookup_path(document, &RULES_PATH) {
            DescriptorLookup::Found(properties) => properties,
            DescriptorLookup::Missing { key } => {
                warn!(section = key, "Section missing in main service template yaml");
                return Ok(None);
            }
        };

        let model: RuleModel = serde_yaml::from_value(properties.clone())
            .map_err(|e| AppoError::descriptor_parse(format!("invalid properties block: {e}")))?;

        debug!(
            required_services = model.required_services().len(),
            has_rules = model.has_rules(),
            "Projected descriptor properties"
        );

        Ok(Some(model))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_DESCRIPTOR: &str = r#"
tosca_definitions_version: tosca_simple_profile_yaml_1_2
topology_template:
  node_templates:
    app_configuration:
      type: tosca.nodes.nfv.app.configuration
      properties:
        appDNSRule:
          - dnsRuleId: dns1
            domainName: face.mec
            ipAddressType: IP_V4
            ipAddress: 10.0.0.9
            ttl: 86400
        appServiceRequired:
          - serName: storage
            appId: app-storage
            packageId: pkg-storage
"#;

    #[test]
    fn test_full_path_projects_rules() {
        let parser = RuleDocumentParser::new();
        let model = parser
            .parse_rules(FULL_DESCRIPTOR.as_bytes())
            .unwrap()
            .unwrap();

        assert!(model.has_rules());
        assert_eq!(model.required_services().len(), 1);
        let dns = model.app_dns_rule.unwrap();
        assert_eq!(dns[0].domain_name.as_deref(), Some("face.mec"));
        assert_eq!(dns[0].ttl, Some(86400));
    }

    #[test]
    fn test_each_missing_level_yields_no_rules() {
        let parser = RuleDocumentParser::new();
        let cases = [
            ("other: 1", "topology_template"),
            ("topology_template:\n  inputs: {}", "node_templates"),
            (
                "topology_template:\n  node_templates:\n    vdu: {}",
                "app_configuration",
            ),
            (
                "topology_template:\n  node_templates:\n    app_configuration:\n      type: x",
                "properties",
            ),
        ];

        for (doc, missing) in cases {
            let value = parser.parse_document(doc.as_bytes()).unwrap();
            assert_eq!(
                lookup_path(&value, &RULES_PATH),
                DescriptorLookup::Missing { key: missing },
                "document: {doc}"
            );
            assert!(parser.parse_rules(doc.as_bytes()).unwrap().is_none());
        }
    }

    #[test]
    fn test_null_and_scalar_sections_count_as_missing() {
        let parser = RuleDocumentParser::new();
        let null_props =
            "topology_template:\n  node_templates:\n    app_configuration:\n      properties:\n";
        assert!(parser.parse_rules(null_props.as_bytes()).unwrap().is_none());

        let scalar_nodes = "topology_template:\n  node_templates: none";
        assert!(parser.parse_rules(scalar_nodes.as_bytes()).unwrap().is_none());
    }

    #[test]
    fn test_empty_document_yields_no_rules() {
        let parser = RuleDocumentParser::new();
        assert!(parser.parse_rules(b"").unwrap().is_none());
    }

    #[test]
    fn test_malformed_syntax_is_fatal() {
        let parser = RuleDocumentParser::new();
        let err = parser
            .parse_rules(b"topology_template: [unclosed\n  node_templates: {")
            .unwrap_err();
        assert!(matches!(err, AppoError::DescriptorParse { .. }));
    }

    #[test]
    fn test_wrongly_shaped_properties_are_fatal() {
        let parser = RuleDocumentParser::new();
        let doc = "topology_template:\n  node_templates:\n    app_configuration:\n      properties:\n        appServiceRequired: not-a-list\n";
        let err = parser.parse_rules(doc.as_bytes()).unwrap_err();
        assert_eq!(err.error_code(), "DESCRIPTOR_PARSE_ERROR");
    }

    #[test]
    fn test_unquoted_dependency_scalars_are_accepted() {
        let parser = RuleDocumentParser::new();
        let doc = "topology_template:\n  node_templates:\n    app_configuration:\n      properties:\n        appServiceRequired:\n          - serName: mp1\n            appId:\n            version: 1.0\n          - serName: ocr\n            appId: app-ocr\n            packageId: 20210101\n";
        let model = parser.parse_rules(doc.as_bytes()).unwrap().unwrap();
        let services = model.required_services();

        assert_eq!(services.len(), 2);
        assert!(services[0].is_platform_capability());
        assert_eq!(services[0].version.as_deref(), Some("1.0"));
        assert_eq!(services[1].package_id.as_deref(), Some("20210101"));
        assert!(!services[1].is_platform_capability());
    }
}
