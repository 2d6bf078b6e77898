//! # Domain Models
//!
//! Records exchanged with the instance registry and produced by dependency
//! resolution.

pub mod dependency_link;
pub mod instance_record;

pub use dependency_link::DependencyLink;
pub use instance_record::{InstanceRecord, OperationalStatus};
