//! # Application Package Decomposition
//!
//! Locates the main service template inside a package archive and turns its
//! deployment properties into a typed [`RuleModel`].
//!
//! ```rust,no_run
//! use appo_core::package::{ArchiveDescriptorLocator, RuleDocumentParser};
//! use std::path::Path;
//!
//! # fn main() -> appo_core::Result<()> {
//! let locator = ArchiveDescriptorLocator::new("/MainServiceTemplate.yaml", 4 * 1024 * 1024);
//! if let Some(descriptor) = locator.locate_in_file(Path::new("/packages/i1/p1.csar"))? {
//!     let rules = RuleDocumentParser::new().parse_rules(&descriptor.body)?;
//!     println!("rules present: {}", rules.is_some());
//! }
//! # Ok(())
//! # }
//! ```

pub mod archive;
pub mod descriptor;
pub mod rules;

pub use archive::{ArchiveDescriptorLocator, LocatedDescriptor};
pub use descriptor::{lookup_path, DescriptorLookup, RuleDocumentParser};
pub use rules::{DnsRule, RequiredService, RuleModel, TrafficRule};
