//! The resource-loader seam.
//!
//! Image annotations store a reference (a storage key, a relative path or a
//! `data:` URI). Turning that reference into bytes is owned by whoever
//! embeds the engine, behind [`ResourceProvider`].

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{Arc, RwLock};
use thiserror::Error;

/// Error type for resource loading operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResourceError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Failed to load resource '{path}': {message}")]
    LoadFailed { path: String, message: String },

    #[error("Malformed resource reference: {0}")]
    InvalidReference(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for ResourceError {
    fn from(err: std::io::Error) -> Self {
        ResourceError::Io(err.to_string())
    }
}

/// Shared resource data type (reference-counted bytes).
pub type SharedResourceData = Arc<Vec<u8>>;

/// Loads raw payload bytes for a stored resource reference.
///
/// Implementations must not panic on bad references; every failure is a
/// [`ResourceError`] so the caller can skip the one annotation that needed it.
pub trait ResourceProvider: Send + Sync + Debug {
    /// Load a resource by its reference.
    fn load(&self, reference: &str) -> Result<SharedResourceData, ResourceError>;

    /// Check if a resource exists.
    fn exists(&self, reference: &str) -> bool;

    /// Returns a human-readable name for this provider (for logging/debugging).
    fn name(&self) -> &'static str;
}

/// A resource provider backed by a pre-populated map.
///
/// Useful when the editing layer already holds the payloads in memory.
#[derive(Debug, Default)]
pub struct InMemoryResourceProvider {
    resources: RwLock<HashMap<String, SharedResourceData>>,
}

impl InMemoryResourceProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a resource to the in-memory store.
    ///
    /// # Errors
    ///
    /// Returns `ResourceError::LoadFailed` if the internal lock is poisoned.
    pub fn add(&self, reference: impl Into<String>, data: Vec<u8>) -> Result<(), ResourceError> {
        let reference = reference.into();
        let mut resources = self.resources.write().map_err(|_| ResourceError::LoadFailed {
            path: reference.clone(),
            message: "resource store lock poisoned".to_string(),
        })?;
        resources.insert(reference, Arc::new(data));
        Ok(())
    }

    /// Remove a resource from the store.
    ///
    /// Returns `None` if the lock is poisoned or the resource doesn't exist.
    pub fn remove(&self, reference: &str) -> Option<SharedResourceData> {
        self.resources.write().ok()?.remove(reference)
    }

    /// Returns 0 if the lock is poisoned.
    pub fn len(&self) -> usize {
        self.resources.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ResourceProvider for InMemoryResourceProvider {
    fn load(&self, reference: &str) -> Result<SharedResourceData, ResourceError> {
        let resources = self.resources.read().map_err(|_| ResourceError::LoadFailed {
            path: reference.to_string(),
            message: "resource store lock poisoned".to_string(),
        })?;
        resources
            .get(reference)
            .cloned()
            .ok_or_else(|| ResourceError::NotFound(reference.to_string()))
    }

    fn exists(&self, reference: &str) -> bool {
        self.resources
            .read()
            .map(|r| r.contains_key(reference))
            .unwrap_or(false)
    }

    fn name(&self) -> &'static str {
        "InMemoryResourceProvider"
    }
}
