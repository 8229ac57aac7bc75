//! Adapter lookup by container format.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use super::error::MetadataError;
use super::flac::FlacAdapter;
use super::generic::GenericAdapter;
use super::mp3::Mp3Adapter;
use super::mp4::Mp4Adapter;
use super::ogg::OggAdapter;
use super::traits::MetadataAdapter;
use super::types::ContainerFormat;

/// Maps each [`ContainerFormat`] to the adapter that handles it.
#[derive(Clone, Default)]
pub struct AdapterRegistry {
    adapters: HashMap<ContainerFormat, Arc<dyn MetadataAdapter>>,
}

impl AdapterRegistry {
    /// An empty registry. Every lookup fails until adapters are registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// All built-in adapters, including the generic fallback for `Unknown`.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(Mp3Adapter::new()));
        registry.register(Arc::new(Mp4Adapter::new()));
        registry.register(Arc::new(FlacAdapter::new()));
        registry.register(Arc::new(OggAdapter::new()));
        registry.register(Arc::new(GenericAdapter::new()));
        registry
    }

    /// Registers `adapter` for its format, replacing any previous one.
    pub fn register(&mut self, adapter: Arc<dyn MetadataAdapter>) {
        self.adapters.insert(adapter.format(), adapter);
    }

    pub fn get(&self, format: ContainerFormat) -> Option<Arc<dyn MetadataAdapter>> {
        self.adapters.get(&format).cloned()
    }

    /// Adapter for the format detected from `path`.
    pub fn for_path(&self, path: &Path) -> Result<Arc<dyn MetadataAdapter>, MetadataError> {
        self.get(ContainerFormat::from_path(path))
            .ok_or_else(|| MetadataError::unsupported(path))
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}

impl std::fmt::Debug for AdapterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.adapters.values().map(|a| a.name().to_string()).collect();
        names.sort();
        f.debug_struct("AdapterRegistry").field("adapters", &names).finish()
    }
}
