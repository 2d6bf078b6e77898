//! # Archive Descriptor Locator
//!
//! Walks a package archive in entry order and returns the body of the first
//! entry whose path contains the descriptor marker. Only the first match is
//! used; later matching entries are never inspected.

use crate::error::{AppoError, Result};
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use tracing::{debug, info};
use zip::ZipArchive;

/// Descriptor entry found inside a package archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedDescriptor {
    /// Full entry path inside the archive
    pub entry_name: String,

    /// Raw descriptor body
    pub body: Vec<u8>,
}

/// Finds the descriptor entry inside a package archive
#[derive(Debug, Clone)]
pub struct ArchiveDescriptorLocator {
    marker: String,
    max_descriptor_bytes: u64,
}

impl ArchiveDescriptorLocator {
    pub fn new(marker: impl Into<String>, max_descriptor_bytes: u64) -> Self {
        Self {
            marker: marker.into(),
            max_descriptor_bytes,
        }
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Open the archive at `path` and locate its descriptor
    ///
    /// The file handle is released before this returns on every path.
    pub fn locate_in_file(&self, path: &Path) -> Result<Option<LocatedDescriptor>> {
        let source = path.display().to_string();
        let file = File::open(path).map_err(|e| AppoError::archive_read(&source, e))?;
        self.locate(&source, BufReader::new(file))
    }

    /// Scan `reader` for the descriptor; `source` labels errors
    pub fn locate<R: Read + Seek>(
        &self,
        source: &str,
        reader: R,
    ) -> Result<Option<LocatedDescriptor>> {
        let mut archive =
            ZipArchive::new(reader).map_err(|e| AppoError::archive_read(source, e))?;

        debug!(
            source = %source,
            entries = archive.len(),
            marker = %self.marker,
            "Scanning package archive"
        );

        for index in 0..archive.len() {
            let entry = archive
                .by_index(index)
                .map_err(|e| AppoError::archive_read(source, e))?;

            if !entry.name().contains(&self.marker) {
                continue;
            }

            let entry_name = entry.name().to_string();
            let body = self.read_bounded(source, &entry_name, entry)?;

            info!(
                source = %source,
                entry = %entry_name,
                bytes = body.len(),
                "Located descriptor entry"
            );

            return Ok(Some(LocatedDescriptor { entry_name, body }));
        }

        Ok(None)
    }

    fn read_bounded<R: Read>(&self, source: &str, entry_name: &str, entry: R) -> Result<Vec<u8>> {
        let mut body = Vec::new();
        entry
            .take(self.max_descriptor_bytes.saturating_add(1))
            .read_to_end(&mut body)
            .map_err(|e| AppoError::archive_read(source, format!("{entry_name}: {e}")))?;

        if body.len() as u64 > self.max_descriptor_bytes {
            return Err(AppoError::archive_read(
                source,
                format!(
                    "{entry_name} exceeds descriptor size limit of {} bytes",
                    self.max_descriptor_bytes
                ),
            ));
        }

        Ok(body)
    }
}
