//! # Instance Registry
//!
//! Read-only access to application instance records. The registry is owned by
//! an external persistence layer; this crate only takes point-in-time
//! snapshots of the instances on one host.
//!
//! ## Usage
//!
//! ```rust
//! use appo_core::models::{InstanceRecord, OperationalStatus};
//! use appo_core::registry::{InMemoryInstanceRegistry, InstanceRegistry};
//!
//! # #[tokio::main]
//! # async fn main() -> appo_core::Result<()> {
//! let registry = InMemoryInstanceRegistry::new();
//! registry.insert(
//!     "tenant-1",
//!     InstanceRecord::new("inst-9", "app-x", OperationalStatus::Instantiated, "10.1.1.1"),
//! );
//!
//! let snapshot = registry.list_instances("tenant-1", "10.1.1.1").await?;
//! assert_eq!(snapshot.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod instance_registry;

pub use instance_registry::{InMemoryInstanceRegistry, InstanceRegistry};
