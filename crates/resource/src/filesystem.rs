//! Filesystem-based resource provider.
//!
//! Annotation payload references are resolved relative to a base directory.
//! Resolved paths must stay inside that directory.

use burnin_traits::{ResourceError, ResourceProvider, SharedResourceData};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

/// Loads annotation payloads from a directory on disk.
#[derive(Debug)]
pub struct FilesystemResourceProvider {
    base_path: PathBuf,
    canonical_base: Option<PathBuf>,
}

impl FilesystemResourceProvider {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        let base = base_path.as_ref().to_path_buf();
        // May fail if the directory doesn't exist yet; checked again per load.
        let canonical = base.canonicalize().ok();
        Self {
            base_path: base,
            canonical_base: canonical,
        }
    }

    pub fn base(&self) -> &Path {
        &self.base_path
    }

    /// Returns `None` for absolute references and anything that would escape
    /// the base directory.
    fn resolve_path_safe(&self, reference: &str) -> Option<PathBuf> {
        let relative = Path::new(reference);
        if relative.is_absolute() {
            return None;
        }

        let full_path = self.base_path.join(relative);

        if let Ok(canonical) = full_path.canonicalize()
            && let Some(ref base) = self.canonical_base
        {
            return canonical.starts_with(base).then_some(canonical);
        }

        if relative.components().any(|c| matches!(c, Component::ParentDir)) {
            return None;
        }

        Some(full_path)
    }
}

impl ResourceProvider for FilesystemResourceProvider {
    fn load(&self, reference: &str) -> Result<SharedResourceData, ResourceError> {
        let full_path = self.resolve_path_safe(reference).ok_or_else(|| {
            ResourceError::NotFound(format!("{} (outside resource directory)", reference))
        })?;

        std::fs::read(&full_path).map(Arc::new).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ResourceError::NotFound(reference.to_string())
            } else {
                ResourceError::LoadFailed {
                    path: reference.to_string(),
                    message: e.to_string(),
                }
            }
        })
    }

    fn exists(&self, reference: &str) -> bool {
        self.resolve_path_safe(reference)
            .map(|p| p.is_file())
            .unwrap_or(false)
    }

    fn name(&self) -> &'static str {
        "FilesystemResourceProvider"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_filesystem_provider_load_existing_file() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("logo.png"), b"png-bytes").unwrap();

        let provider = FilesystemResourceProvider::new(dir.path());
        let data = provider.load("logo.png").unwrap();
        assert_eq!(&*data, b"png-bytes");
        assert!(provider.exists("logo.png"));
    }

    #[test]
    fn test_filesystem_provider_not_found() {
        let dir = tempdir().unwrap();
        let provider = FilesystemResourceProvider::new(dir.path());

        let result = provider.load("missing.jpg");
        assert!(matches!(result, Err(ResourceError::NotFound(_))));
        assert!(!provider.exists("missing.jpg"));
    }

    #[test]
    fn test_filesystem_provider_blocks_traversal_and_absolute_paths() {
        let dir = tempdir().unwrap();
        let provider = FilesystemResourceProvider::new(dir.path());

        assert!(provider.load("../../../etc/passwd").is_err());
        assert!(provider.load("/etc/passwd").is_err());
        assert!(!provider.exists("foo/../../bar"));
    }

    #[test]
    fn test_filesystem_provider_allows_nested_paths() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("signatures");
        fs::create_dir(&nested).unwrap();
        fs::write(nested.join("alice.png"), b"sig").unwrap();

        let provider = FilesystemResourceProvider::new(dir.path());
        assert_eq!(&*provider.load("signatures/alice.png").unwrap(), b"sig");
    }

    #[test]
    fn test_directory_is_not_a_resource() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("images")).unwrap();

        let provider = FilesystemResourceProvider::new(dir.path());
        assert!(!provider.exists("images"));
        assert!(provider.load("images").is_err());
    }
}
