//! Inline `data:` URI payloads.
//!
//! Editors commonly store pasted images and drawn signatures inline as
//! `data:image/png;base64,...`. This provider decodes those and hands any
//! other reference to a fallback provider.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use burnin_traits::{ResourceError, ResourceProvider, SharedResourceData};
use std::sync::Arc;

/// A parsed `data:[<mediatype>][;base64],<data>` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri<'a> {
    pub media_type: &'a str,
    pub is_base64: bool,
    pub data: &'a str,
}

impl<'a> DataUri<'a> {
    /// Splits a data URI into its parts. Returns `None` if `uri` is not one.
    pub fn parse(uri: &'a str) -> Option<Self> {
        let rest = uri.strip_prefix("data:")?;
        let (header, data) = rest.split_once(',')?;
        let (media_type, is_base64) = match header.strip_suffix(";base64") {
            Some(media_type) => (media_type, true),
            None => (header, false),
        };
        Some(Self { media_type, is_base64, data })
    }

    pub fn decode(&self) -> Result<Vec<u8>, ResourceError> {
        if self.is_base64 {
            // Some encoders wrap long payloads; whitespace is not significant.
            let compact: String = self.data.chars().filter(|c| !c.is_ascii_whitespace()).collect();
            STANDARD
                .decode(compact.as_bytes())
                .map_err(|e| ResourceError::InvalidReference(format!("bad base64 payload: {}", e)))
        } else {
            Ok(self.data.as_bytes().to_vec())
        }
    }
}

/// Decodes `data:` URIs and delegates other references to `fallback`.
#[derive(Debug, Default)]
pub struct DataUriResourceProvider {
    fallback: Option<Box<dyn ResourceProvider>>,
}

impl DataUriResourceProvider {
    pub fn new() -> Self {
        Self { fallback: None }
    }

    pub fn with_fallback(fallback: Box<dyn ResourceProvider>) -> Self {
        Self {
            fallback: Some(fallback),
        }
    }
}

impl ResourceProvider for DataUriResourceProvider {
    fn load(&self, reference: &str) -> Result<SharedResourceData, ResourceError> {
        if reference.starts_with("data:") {
            let uri = DataUri::parse(reference).ok_or_else(|| {
                ResourceError::InvalidReference("data URI without a ',' separator".to_string())
            })?;
            return uri.decode().map(Arc::new);
        }

        match &self.fallback {
            Some(fallback) => {
                log::trace!("Delegating '{}' to {}", reference, fallback.name());
                fallback.load(reference)
            }
            None => Err(ResourceError::NotFound(reference.to_string())),
        }
    }

    fn exists(&self, reference: &str) -> bool {
        if reference.starts_with("data:") {
            return DataUri::parse(reference).is_some();
        }
        self.fallback
            .as_ref()
            .is_some_and(|fallback| fallback.exists(reference))
    }

    fn name(&self) -> &'static str {
        "DataUriResourceProvider"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burnin_traits::InMemoryResourceProvider;

    #[test]
    fn test_parse_data_uri() {
        let uri = DataUri::parse("data:image/png;base64,iVBORw0KGgo=").unwrap();
        assert_eq!(uri.media_type, "image/png");
        assert!(uri.is_base64);
        assert_eq!(uri.data, "iVBORw0KGgo=");

        assert!(DataUri::parse("images/logo.png").is_none());
        assert!(DataUri::parse("data:image/png;base64").is_none());
    }

    #[test]
    fn test_decode_base64_payload() {
        let provider = DataUriResourceProvider::new();
        let data = provider.load("data:image/png;base64,iVBORw0KGgo=").unwrap();
        assert_eq!(&data[..4], b"\x89PNG");
    }

    #[test]
    fn test_decode_ignores_line_wrapping() {
        let provider = DataUriResourceProvider::new();
        let data = provider.load("data:image/png;base64,iVBO\nRw0K\r\nGgo=").unwrap();
        assert_eq!(&data[..4], b"\x89PNG");
    }

    #[test]
    fn test_bad_base64_is_invalid_reference() {
        let provider = DataUriResourceProvider::new();
        let result = provider.load("data:image/png;base64,@@@@");
        assert!(matches!(result, Err(ResourceError::InvalidReference(_))));
    }

    #[test]
    fn test_non_data_reference_without_fallback_is_not_found() {
        let provider = DataUriResourceProvider::new();
        assert!(matches!(provider.load("logo.png"), Err(ResourceError::NotFound(_))));
        assert!(!provider.exists("logo.png"));
    }

    #[test]
    fn test_non_data_reference_uses_fallback() {
        let memory = InMemoryResourceProvider::new();
        memory.add("logo.png", b"bytes".to_vec()).unwrap();
        let provider = DataUriResourceProvider::with_fallback(Box::new(memory));

        assert_eq!(&*provider.load("logo.png").unwrap(), b"bytes");
        assert!(provider.exists("logo.png"));
    }
}
