//! # Dependency Resolver
//!
//! Checks an application's declared service dependencies against the
//! instances currently running on the target host.
//!
//! Resolution is all-or-nothing: links are accumulated in a local buffer and
//! handed back only when every checked dependency was satisfied. The first
//! unsatisfied dependency discards the buffer.

use crate::error::{AppoError, Result};
use crate::models::{DependencyLink, InstanceRecord};
use crate::package::RequiredService;
use std::collections::HashMap;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, Default)]
pub struct DependencyResolver;

impl DependencyResolver {
    pub fn new() -> Self {
        Self
    }

    /// Resolve `required` against `candidates` in declaration order
    ///
    /// Only `Instantiated` candidates count. When several share an `app_id`,
    /// the last one in `candidates` wins. Platform capabilities (no package
    /// id) are skipped and produce no link.
    pub fn resolve(
        &self,
        required: &[RequiredService],
        candidates: &[InstanceRecord],
        tenant_id: &str,
        dependent_instance_id: &str,
    ) -> Result<Vec<DependencyLink>> {
        let active_by_app: HashMap<&str, &InstanceRecord> = candidates
            .iter()
            .filter(|record| record.is_instantiated())
            .map(|record| (record.app_id.as_str(), record))
            .collect();

        debug!(
            candidates = candidates.len(),
            active_apps = active_by_app.len(),
            required = required.len(),
            "Resolving application dependencies"
        );

        let mut links = Vec::new();
        for service in required {
            if service.is_platform_capability() {
                debug!(service = %service.service_name, "Skipping platform capability");
                continue;
            }

            let Some(instance) = active_by_app.get(service.app_id.as_str()) else {
                warn!(
                    service = %service.service_name,
                    app_id = %service.app_id,
                    "Dependency has no instantiated instance on host"
                );
                return Err(AppoError::DependencyUnsatisfied {
                    service_name: service.service_name.clone(),
                });
            };

            links.push(DependencyLink::new(
                tenant_id,
                dependent_instance_id,
                instance.app_instance_id.as_str(),
            ));
        }

        Ok(links)
    }
}
