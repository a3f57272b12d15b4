//! Newtype wrappers for semantic IDs and URIs
//!
//! These keep annotation identifiers and resource references from being
//! mixed up with each other or with arbitrary strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

/// The identity of an annotation, as assigned by the editing layer.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationId(Arc<str>);

impl AnnotationId {
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The id given to an annotation stored without one.
    pub fn synthesized(page_number: u32, index: usize) -> Self {
        Self(format!("p{}-{}", page_number, index).into())
    }
}

impl From<String> for AnnotationId {
    fn from(s: String) -> Self {
        Self(s.into())
    }
}

impl From<&str> for AnnotationId {
    fn from(s: &str) -> Self {
        Self(s.into())
    }
}

impl AsRef<str> for AnnotationId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AnnotationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A reference to a raster payload (path, key, or `data:` URI).
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceUri(Arc<str>);

impl ResourceUri {
    pub fn new(uri: impl Into<Arc<str>>) -> Self {
        Self(uri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_data_uri(&self) -> bool {
        self.0.starts_with("data:")
    }
}

impl From<String> for ResourceUri {
    fn from(s: String) -> Self {
        Self(s.into())
    }
}

impl From<&str> for ResourceUri {
    fn from(s: &str) -> Self {
        Self(s.into())
    }
}

impl AsRef<str> for ResourceUri {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Data URIs can be megabytes long; keep log lines readable.
        if self.is_data_uri() && self.0.len() > 48 {
            let head: String = self.0.chars().take(48).collect();
            write!(f, "{}...", head)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_annotation_id_creation() {
        let id1 = AnnotationId::new("ann-1");
        let id2 = AnnotationId::from("ann-1");
        let id3 = AnnotationId::from(String::from("ann-1"));

        assert_eq!(id1, id2);
        assert_eq!(id2, id3);
        assert_eq!(id1.as_str(), "ann-1");
    }

    #[test]
    fn test_synthesized_annotation_id() {
        assert_eq!(AnnotationId::synthesized(3, 7).as_str(), "p3-7");
    }

    #[test]
    fn test_resource_uri_data_uri_detection() {
        assert!(ResourceUri::new("data:image/png;base64,AAAA").is_data_uri());
        assert!(!ResourceUri::new("images/logo.png").is_data_uri());
    }

    #[test]
    fn test_resource_uri_display_truncates_data_uris() {
        let long = format!("data:image/png;base64,{}", "A".repeat(200));
        let shown = ResourceUri::new(long).to_string();
        assert!(shown.ends_with("..."));
        assert!(shown.len() < 60);
    }

    #[test]
    fn test_ids_roundtrip_as_plain_json_strings() {
        let id: AnnotationId = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(id.as_str(), "abc");
    }
}
