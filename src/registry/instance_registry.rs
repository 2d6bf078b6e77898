use crate::error::Result;
use crate::logging::log_registry_operation;
use crate::models::InstanceRecord;
use async_trait::async_trait;
use parking_lot::RwLock;

/// Source of instance records for dependency checks
///
/// Implementations return a snapshot: records created after the call are not
/// visible to the caller, and no lock is held once the call returns.
#[async_trait]
pub trait InstanceRegistry: Send + Sync {
    /// All instances of `tenant_id` on `host_id`, in registry order
    async fn list_instances(&self, tenant_id: &str, host_id: &str) -> Result<Vec<InstanceRecord>>;
}

#[derive(Debug, Clone)]
struct TenantRecord {
    tenant_id: String,
    record: InstanceRecord,
}

/// Thread-safe in-memory registry, preserving insertion order
#[derive(Debug, Default)]
pub struct InMemoryInstanceRegistry {
    records: RwLock<Vec<TenantRecord>>,
}

impl InMemoryInstanceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record, or replace the one with the same tenant and instance id
    pub fn insert(&self, tenant_id: impl Into<String>, record: InstanceRecord) {
        let tenant_id = tenant_id.into();
        let mut records = self.records.write();

        match records.iter_mut().find(|existing| {
            existing.tenant_id == tenant_id
                && existing.record.app_instance_id == record.app_instance_id
        }) {
            Some(existing) => existing.record = record,
            None => records.push(TenantRecord { tenant_id, record }),
        }
    }

    /// Remove a record, returning it if present
    pub fn remove(&self, tenant_id: &str, app_instance_id: &str) -> Option<InstanceRecord> {
        let mut records = self.records.write();
        let position = records.iter().position(|existing| {
            existing.tenant_id == tenant_id && existing.record.app_instance_id == app_instance_id
        })?;
        Some(records.remove(position).record)
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[async_trait]
impl InstanceRegistry for InMemoryInstanceRegistry {
    async fn list_instances(&self, tenant_id: &str, host_id: &str) -> Result<Vec<InstanceRecord>> {
        let snapshot: Vec<InstanceRecord> = self
            .records
            .read()
            .iter()
            .filter(|entry| entry.tenant_id == tenant_id && entry.record.host_id == host_id)
            .map(|entry| entry.record.clone())
            .collect();

        log_registry_operation("list_instances", tenant_id, host_id, snapshot.len());
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OperationalStatus;

    fn record(instance: &str, app: &str, host: &str) -> InstanceRecord {
        InstanceRecord::new(instance, app, OperationalStatus::Instantiated, host)
    }

    #[tokio::test]
    async fn test_snapshot_filters_by_tenant_and_host() {
        let registry = InMemoryInstanceRegistry::new();
        registry.insert("t1", record("i1", "a1", "h1"));
        registry.insert("t1", record("i2", "a2", "h2"));
        registry.insert("t2", record("i3", "a3", "h1"));

        let snapshot = registry.list_instances("t1", "h1").await.unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].app_instance_id, "i1");
    }

    #[tokio::test]
    async fn test_insert_replaces_and_preserves_order() {
        let registry = InMemoryInstanceRegistry::new();
        registry.insert("t1", record("i1", "a1", "h1"));
        registry.insert("t1", record("i2", "a2", "h1"));
        registry.insert(
            "t1",
            InstanceRecord::new("i1", "a1", OperationalStatus::Terminated, "h1"),
        );

        let snapshot = registry.list_instances("t1", "h1").await.unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(snapshot[0].app_instance_id, "i1");
        assert_eq!(snapshot[0].operational_status, OperationalStatus::Terminated);
        assert_eq!(snapshot[1].app_instance_id, "i2");
    }

    #[tokio::test]
    async fn test_snapshot_is_detached_from_later_writes() {
        let registry = InMemoryInstanceRegistry::new();
        registry.insert("t1", record("i1", "a1", "h1"));

        let snapshot = registry.list_instances("t1", "h1").await.unwrap();
        registry.insert("t1", record("i2", "a2", "h1"));
        assert!(registry.remove("t1", "i1").is_some());

        assert_eq!(snapshot.len(), 1);
        assert_eq!(registry.list_instances("t1", "h1").await.unwrap().len(), 1);
    }
}
