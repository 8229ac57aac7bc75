//! Best-effort adapter for WAV, AIFF, AAC, WMA and anything else discovered.

use std::path::Path;

use tracing::debug;

use super::error::MetadataError;
use super::lofty_io;
use super::traits::MetadataAdapter;
use super::types::{ContainerFormat, TagPatch, TagSnapshot};

/// Uses whatever tag type lofty considers primary for the file.
///
/// Reads never fail on parse errors; an unreadable file is treated as having
/// no tags.
#[derive(Debug, Default, Clone)]
pub struct GenericAdapter;

impl GenericAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl MetadataAdapter for GenericAdapter {
    fn name(&self) -> &str {
        "generic"
    }

    fn format(&self) -> ContainerFormat {
        ContainerFormat::Unknown
    }

    fn read(&self, path: &Path) -> Result<TagSnapshot, MetadataError> {
        match lofty_io::read_snapshot(path, &[]) {
            Ok(snapshot) => Ok(snapshot),
            Err(MetadataError::Io(e)) => Err(MetadataError::Io(e)),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "No readable tags");
                Ok(TagSnapshot::default())
            }
        }
    }

    fn write(&self, path: &Path, patch: &TagPatch) -> Result<(), MetadataError> {
        lofty_io::write_atomic(path, None, patch)
    }
}
