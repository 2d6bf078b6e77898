//! Fixture builders for package decomposition tests
//! Packages are real zip archives written into a temporary base directory.

#![allow(dead_code)] // Not every test binary uses every builder

use appo_core::config::PackageConfig;
use appo_core::error::{AppoError, Result};
use appo_core::models::{InstanceRecord, OperationalStatus};
use appo_core::orchestration::OrchestrationContext;
use appo_core::registry::{InMemoryInstanceRegistry, InstanceRegistry};
use async_trait::async_trait;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

pub const TENANT: &str = "tenant-1";
pub const HOST: &str = "192.168.1.10";
pub const APP_INSTANCE: &str = "inst-main";
pub const APP_PACKAGE: &str = "pkg-main";
pub const DESCRIPTOR_ENTRY: &str = "APPD/Definitions/MainServiceTemplate.yaml";

/// Temporary package store laid out as `<instance>/<package>.csar`
pub struct PackageFixture {
    dir: TempDir,
}

impl PackageFixture {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp package dir"),
        }
    }

    pub fn package_config(&self) -> PackageConfig {
        PackageConfig::default().with_base_path(self.dir.path())
    }

    pub fn archive_path(&self, instance: &str, package: &str) -> PathBuf {
        self.package_config().package_path(instance, package)
    }

    /// Write a zip archive with `entries` for the default instance and package
    pub fn write_archive(&self, entries: &[(&str, &str)]) -> PathBuf {
        self.write_archive_for(APP_INSTANCE, APP_PACKAGE, entries)
    }

    pub fn write_archive_for(
        &self,
        instance: &str,
        package: &str,
        entries: &[(&str, &str)],
    ) -> PathBuf {
        let path = self.archive_path(instance, package);
        std::fs::create_dir_all(path.parent().expect("archive has parent")).unwrap();

        let mut writer = ZipWriter::new(File::create(&path).unwrap());
        for (name, body) in entries {
            writer
                .start_file(*name, SimpleFileOptions::default())
                .unwrap();
            writer.write_all(body.as_bytes()).unwrap();
        }
        writer.finish().unwrap();
        path
    }

    /// Write arbitrary bytes where the default archive is expected
    pub fn write_raw(&self, bytes: &[u8]) -> PathBuf {
        let path = self.archive_path(APP_INSTANCE, APP_PACKAGE);
        std::fs::create_dir_all(path.parent().expect("archive has parent")).unwrap();
        std::fs::write(&path, bytes).unwrap();
        path
    }
}

/// Descriptor with `properties_yaml` nested under the rule path
///
/// `properties_yaml` is indented to sit under `properties:`.
pub fn descriptor_with(properties_yaml: &str) -> String {
    let mut doc = String::from(
        "tosca_definitions_version: tosca_simple_profile_yaml_1_2\n\
         topology_template:\n  node_templates:\n    app_configuration:\n      \
         type: tosca.nodes.nfv.app.configuration\n      properties:\n",
    );
    for line in properties_yaml.lines().filter(|line| !line.trim().is_empty()) {
        doc.push_str("        ");
        doc.push_str(line);
        doc.push('\n');
    }
    doc
}

/// Context carrying every input the decomposition stage reads
pub fn workflow_context() -> OrchestrationContext {
    OrchestrationContext::from_variables(
        "wf-test",
        [
            ("tenant_id", TENANT),
            ("app_instance_id", APP_INSTANCE),
            ("app_package_id", APP_PACKAGE),
            ("app_id", "app-main"),
            ("mec_host", HOST),
            ("app_name", "face-recognition"),
        ],
    )
}

/// Registry holding `(app_instance_id, app_id, status)` records on [`HOST`]
pub fn seeded_registry(records: &[(&str, &str, OperationalStatus)]) -> Arc<InMemoryInstanceRegistry> {
    let registry = Arc::new(InMemoryInstanceRegistry::new());
    for (instance, app, status) in records {
        registry.insert(TENANT, InstanceRecord::new(*instance, *app, *status, HOST));
    }
    registry
}

/// Registry that counts lookups and always fails
#[derive(Debug, Default)]
pub struct UnavailableRegistry {
    pub calls: AtomicUsize,
}

impl UnavailableRegistry {
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InstanceRegistry for UnavailableRegistry {
    async fn list_instances(&self, _tenant_id: &str, _host_id: &str) -> Result<Vec<InstanceRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(AppoError::Registry("instance registry unavailable".to_string()))
    }
}
