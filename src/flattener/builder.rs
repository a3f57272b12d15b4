// src/flattener/builder.rs
use super::Flattener;
use burnin_core::{Compositor, FlattenConfig, FlattenError};
use burnin_resource::{DataUriResourceProvider, FilesystemResourceProvider};
use burnin_traits::ResourceProvider;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A builder for creating a [`Flattener`].
///
/// Inline `data:` URIs are always decoded. Other references go to the
/// provider set with [`with_resource_provider`](Self::with_resource_provider),
/// or to a resource directory if one was given.
#[derive(Debug, Default)]
pub struct FlattenerBuilder {
    config: FlattenConfig,
    resource_dir: Option<PathBuf>,
    provider: Option<Box<dyn ResourceProvider>>,
}

impl FlattenerBuilder {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_config(mut self, config: FlattenConfig) -> Self {
        self.config = config;
        self
    }

    /// Loads tuning values from a JSON file. Missing keys keep their defaults.
    pub fn with_config_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, FlattenError> {
        self.config = FlattenConfig::from_json_file(path)?;
        Ok(self)
    }

    /// Resolves non-inline image references relative to `dir`.
    pub fn with_resource_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.resource_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Resolves non-inline image references through `provider`.
    /// Takes precedence over a resource directory.
    pub fn with_resource_provider(mut self, provider: impl ResourceProvider + 'static) -> Self {
        self.provider = Some(Box::new(provider));
        self
    }

    pub fn build(self) -> Flattener {
        let fallback = self.provider.or_else(|| {
            self.resource_dir
                .map(|dir| Box::new(FilesystemResourceProvider::new(dir)) as Box<dyn ResourceProvider>)
        });
        let provider = match fallback {
            Some(fallback) => DataUriResourceProvider::with_fallback(fallback),
            None => DataUriResourceProvider::new(),
        };
        Flattener::from_compositor(Compositor::new(self.config, Arc::new(provider)))
    }
}
