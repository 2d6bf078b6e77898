//! # Decompose Package Stage
//!
//! Locates the descriptor inside an application package, projects its
//! deployment rules, checks that every declared dependency is instantiated on
//! the target host, and publishes the dependency links and rules to the
//! context.
//!
//! Outputs are encoded before any of them is written, so a failing invocation
//! leaves `app_required` and `app_rules` untouched.

use crate::config::{AppoConfig, PackageConfig};
use crate::constants::{stages, variables};
use crate::error::{AppoError, Result};
use crate::models::InstanceRecord;
use crate::orchestration::context::OrchestrationContext;
use crate::orchestration::dependency_resolver::DependencyResolver;
use crate::orchestration::stage::PipelineStage;
use crate::package::{ArchiveDescriptorLocator, RuleDocumentParser, RuleModel};
use crate::registry::InstanceRegistry;
use crate::validation::validate_identifier;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Message reported when decomposition completes
pub const DECOMPOSE_SUCCESS_MESSAGE: &str = "Success";

/// States one decomposition passes through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecompositionState {
    Start,
    Located,
    NotFound,
    Parsed,
    SectionsPresent,
    SectionsAbsent,
    DependenciesResolved,
    RulesWritten,
    RulesSkipped,
}

impl DecompositionState {
    /// Whether the invocation ends in this state
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::NotFound | Self::SectionsAbsent | Self::RulesWritten | Self::RulesSkipped
        )
    }
}

impl fmt::Display for DecompositionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Start => "start",
            Self::Located => "located",
            Self::NotFound => "not_found",
            Self::Parsed => "parsed",
            Self::SectionsPresent => "sections_present",
            Self::SectionsAbsent => "sections_absent",
            Self::DependenciesResolved => "dependencies_resolved",
            Self::RulesWritten => "rules_written",
            Self::RulesSkipped => "rules_skipped",
        };
        f.write_str(name)
    }
}

/// What a successful decomposition did
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecompositionReport {
    /// States visited, in order, ending in a terminal state
    pub trail: Vec<DecompositionState>,

    /// Number of dependency links written to `app_required`
    pub dependency_count: usize,

    /// Whether `app_rules` was written
    pub rules_written: bool,
}

impl DecompositionReport {
    pub fn final_state(&self) -> Option<DecompositionState> {
        self.trail.last().copied()
    }

    fn trail_text(&self) -> String {
        self.trail
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}

/// Result of the blocking archive scan and parse
enum DescriptorScan {
    NotFound,
    SectionsAbsent,
    Rules(RuleModel),
}

/// Workflow inputs the stage reads
struct DecomposeInputs {
    tenant_id: String,
    app_instance_id: String,
    app_package_id: String,
    app_id: Option<String>,
    mec_host: String,
    app_name: Option<String>,
}

impl DecomposeInputs {
    fn read(context: &OrchestrationContext) -> Result<Self> {
        let inputs = Self {
            tenant_id: context.require_str(variables::TENANT_ID)?.to_string(),
            app_instance_id: context.require_str(variables::APP_INSTANCE_ID)?.to_string(),
            app_package_id: context.require_str(variables::APP_PACKAGE_ID)?.to_string(),
            app_id: context.get_str(variables::APP_ID).map(str::to_string),
            mec_host: context.require_str(variables::MEC_HOST)?.to_string(),
            app_name: context.get_str(variables::APP_NAME).map(str::to_string),
        };

        validate_identifier(variables::APP_INSTANCE_ID, &inputs.app_instance_id)?;
        validate_identifier(variables::APP_PACKAGE_ID, &inputs.app_package_id)?;
        Ok(inputs)
    }
}

/// Stage that decomposes an application package before instantiation
pub struct DecomposePackageStage {
    package: PackageConfig,
    locator: ArchiveDescriptorLocator,
    parser: RuleDocumentParser,
    resolver: DependencyResolver,
    registry: Arc<dyn InstanceRegistry>,
}

impl DecomposePackageStage {
    pub fn new(package: PackageConfig, registry: Arc<dyn InstanceRegistry>) -> Self {
        let locator = ArchiveDescriptorLocator::new(
            package.descriptor_marker.clone(),
            package.max_descriptor_bytes,
        );
        Self {
            package,
            locator,
            parser: RuleDocumentParser::new(),
            resolver: DependencyResolver::new(),
            registry,
        }
    }

    pub fn from_config(config: &AppoConfig, registry: Arc<dyn InstanceRegistry>) -> Self {
        Self::new(config.package.clone(), registry)
    }

    pub fn package_config(&self) -> &PackageConfig {
        &self.package
    }

    /// Run the decomposition against `context`
    ///
    /// Writes `app_required` whenever dependency resolution ran, and
    /// `app_rules` only when the package carries traffic or DNS rules.
    #[instrument(skip(self, context), fields(workflow_instance_id = %context.workflow_instance_id()))]
    pub async fn decompose(&self, context: &mut OrchestrationContext) -> Result<DecompositionReport> {
        let mut report = DecompositionReport {
            trail: vec![DecompositionState::Start],
            dependency_count: 0,
            rules_written: false,
        };

        let inputs = DecomposeInputs::read(context)?;
        info!(
            tenant_id = %inputs.tenant_id,
            app_instance_id = %inputs.app_instance_id,
            app_package_id = %inputs.app_package_id,
            app_id = ?inputs.app_id,
            mec_host = %inputs.mec_host,
            "Decompose application package"
        );

        let path = self
            .package
            .package_path(&inputs.app_instance_id, &inputs.app_package_id);

        let mut model = match self.scan(path).await {
            Ok(DescriptorScan::NotFound) => {
                report.trail.push(DecompositionState::NotFound);
                info!("Package has no descriptor entry; no rules to apply");
                return Ok(report);
            }
            Ok(DescriptorScan::SectionsAbsent) => {
                report.trail.extend([
                    DecompositionState::Located,
                    DecompositionState::Parsed,
                    DecompositionState::SectionsAbsent,
                ]);
                return Ok(report);
            }
            Ok(DescriptorScan::Rules(model)) => {
                report.trail.extend([
                    DecompositionState::Located,
                    DecompositionState::Parsed,
                    DecompositionState::SectionsPresent,
                ]);
                model
            }
            Err(err) => {
                warn!(error = %err, "Package decomposition failed");
                return Err(err);
            }
        };

        info!(app_id = ?inputs.app_id, "Checking application dependencies");
        let candidates = self.candidates_for(&model, &inputs).await?;
        let links = self
            .resolver
            .resolve(
                model.required_services(),
                &candidates,
                &inputs.tenant_id,
                &inputs.app_instance_id,
            )
            .inspect_err(|err| {
                warn!(error = %err, "Dependency check failed");
            })?;
        report.trail.push(DecompositionState::DependenciesResolved);

        model.app_name = inputs.app_name;
        model.clear_required_services();

        let encoded_links = OrchestrationContext::encode_json(variables::APP_REQUIRED, &links)?;
        let encoded_rules = if model.has_rules() {
            Some(OrchestrationContext::encode_json(variables::APP_RULES, &model)?)
        } else {
            None
        };

        context.set(variables::APP_REQUIRED, encoded_links);
        report.dependency_count = links.len();

        match encoded_rules {
            Some(rules) => {
                debug!(rules = %rules, "Set app rules");
                context.set(variables::APP_RULES, rules);
                report.rules_written = true;
                report.trail.push(DecompositionState::RulesWritten);
            }
            None => {
                debug!("Descriptor has no traffic or DNS rules");
                report.trail.push(DecompositionState::RulesSkipped);
            }
        }

        Ok(report)
    }

    /// Locate and parse the descriptor off the async runtime
    async fn scan(&self, path: PathBuf) -> Result<DescriptorScan> {
        let locator = self.locator.clone();
        let parser = self.parser;
        let source = path.display().to_string();

        tokio::task::spawn_blocking(move || -> Result<DescriptorScan> {
            let Some(descriptor) = locator.locate_in_file(&path)? else {
                return Ok(DescriptorScan::NotFound);
            };

            Ok(match parser.parse_rules(&descriptor.body)? {
                Some(model) => DescriptorScan::Rules(model),
                None => DescriptorScan::SectionsAbsent,
            })
        })
        .await
        .map_err(|e| AppoError::archive_read(source, format!("archive scan task failed: {e}")))?
    }

    /// Registry snapshot for the host, fetched only when something needs checking
    async fn candidates_for(
        &self,
        model: &RuleModel,
        inputs: &DecomposeInputs,
    ) -> Result<Vec<InstanceRecord>> {
        if model
            .required_services()
            .iter()
            .all(|service| service.is_platform_capability())
        {
            return Ok(Vec::new());
        }

        let candidates = self
            .registry
            .list_instances(&inputs.tenant_id, &inputs.mec_host)
            .await?;
        debug!(
            mec_host = %inputs.mec_host,
            count = candidates.len(),
            "Fetched instances on host"
        );
        Ok(candidates)
    }
}

#[async_trait]
impl PipelineStage for DecomposePackageStage {
    async fn process(&self, context: &mut OrchestrationContext) -> Result<String> {
        let report = self.decompose(context).await?;
        info!(
            trail = %report.trail_text(),
            dependencies = report.dependency_count,
            rules_written = report.rules_written,
            "Package decomposition completed"
        );
        Ok(DECOMPOSE_SUCCESS_MESSAGE.to_string())
    }

    fn stage_name(&self) -> &'static str {
        stages::DECOMPOSE_PACKAGE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OperationalStatus;
    use crate::registry::InMemoryInstanceRegistry;
    use std::fs::File;
    use std::io::Write;
    use std::path::Path;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    const DESCRIPTOR: &str = r#"
topology_template:
  node_templates:
    app_configuration:
      properties:
        appName: name-from-package
        appTrafficRule:
          - trafficRuleId: rule1
            filterType: FLOW
            priority: "1"
            action: DROP
        appServiceRequired:
          - serName: storage
            appId: app-storage
            packageId: pkg-storage
          - serName: mp1
            appId: mep
"#;

    fn write_package(base: &Path, entries: &[(&str, &str)]) {
        let dir = base.join("inst-1");
        std::fs::create_dir_all(&dir).unwrap();
        let file = File::create(dir.join("pkg-1.csar")).unwrap();
        let mut writer = ZipWriter::new(file);
        for (name, body) in entries {
            writer.start_file(*name, SimpleFileOptions::default()).unwrap();
            writer.write_all(body.as_bytes()).unwrap();
        }
        writer.finish().unwrap();
    }

    fn context() -> OrchestrationContext {
        OrchestrationContext::from_variables(
            "wf-1",
            [
                ("tenant_id", "tenant-1"),
                ("app_instance_id", "inst-1"),
                ("app_package_id", "pkg-1"),
                ("app_id", "app-1"),
                ("mec_host", "10.0.0.1"),
                ("app_name", "name-from-input"),
            ],
        )
    }

    fn stage(base: &Path, registry: Arc<InMemoryInstanceRegistry>) -> DecomposePackageStage {
        DecomposePackageStage::new(PackageConfig::default().with_base_path(base), registry)
    }

    #[tokio::test]
    async fn test_rules_and_links_written_with_input_app_name() {
        let dir = TempDir::new().unwrap();
        write_package(dir.path(), &[("APPD/Definitions/MainServiceTemplate.yaml", DESCRIPTOR)]);
        let registry = Arc::new(InMemoryInstanceRegistry::new());
        registry.insert(
            "tenant-1",
            InstanceRecord::new("inst-storage", "app-storage", OperationalStatus::Instantiated, "10.0.0.1"),
        );

        let mut ctx = context();
        let report = stage(dir.path(), registry).decompose(&mut ctx).await.unwrap();

        assert_eq!(report.final_state(), Some(DecompositionState::RulesWritten));
        assert_eq!(report.dependency_count, 1);

        let rules: serde_json::Value = ctx.get_json(variables::APP_RULES).unwrap().unwrap();
        assert_eq!(rules["appName"], "name-from-input");
        assert!(rules.get("appServiceRequired").is_none());
        assert_eq!(rules["appTrafficRule"][0]["priority"], 1);
    }

    #[tokio::test]
    async fn test_missing_package_file_fails() {
        let dir = TempDir::new().unwrap();
        let registry = Arc::new(InMemoryInstanceRegistry::new());
        let mut ctx = context();

        let err = stage(dir.path(), registry).decompose(&mut ctx).await.unwrap_err();
        assert_eq!(err.error_code(), "ARCHIVE_READ_ERROR");
        assert!(!ctx.contains(variables::APP_REQUIRED));
    }

    #[tokio::test]
    async fn test_path_traversal_identifier_rejected() {
        let dir = TempDir::new().unwrap();
        let registry = Arc::new(InMemoryInstanceRegistry::new());
        let mut ctx = context();
        ctx.set("app_package_id", "../../etc/passwd");

        let err = stage(dir.path(), registry).decompose(&mut ctx).await.unwrap_err();
        assert!(matches!(err, AppoError::InvalidInput(_)));
    }

    #[test]
    fn test_terminal_states() {
        assert!(DecompositionState::NotFound.is_terminal());
        assert!(DecompositionState::RulesSkipped.is_terminal());
        assert!(!DecompositionState::Parsed.is_terminal());
        assert_eq!(DecompositionState::SectionsAbsent.to_string(), "sections_absent");
    }

    #[tokio::test]
    async fn test_app_id_is_optional() {
        let dir = TempDir::new().unwrap();
        write_package(dir.path(), &[("APPD/Definitions/MainServiceTemplate.yaml", DESCRIPTOR)]);
        let registry = Arc::new(InMemoryInstanceRegistry::new());
        registry.insert(
            "tenant-1",
            InstanceRecord::new("inst-storage", "app-storage", OperationalStatus::Instantiated, "10.0.0.1"),
        );
        let mut ctx = OrchestrationContext::from_variables(
            "wf-2",
            [
                ("tenant_id", "tenant-1"),
                ("app_instance_id", "inst-1"),
                ("app_package_id", "pkg-1"),
                ("mec_host", "10.0.0.1"),
            ],
        );

        let report = stage(dir.path(), registry).decompose(&mut ctx).await.unwrap();
        assert_eq!(report.final_state(), Some(DecompositionState::RulesWritten));
    }
}
