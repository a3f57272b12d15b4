use crate::error::AnnotationError;
use burnin_model::{Annotation, AnnotationKind, PageEntry, RejectedAnnotation};
use burnin_types::AnnotationId;
use serde::Serialize;
use std::fmt;

/// A record of one annotation that was skipped during a save.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub page_number: u32,
    /// Position of the annotation within its page's list.
    pub index: usize,
    pub annotation_id: AnnotationId,
    pub annotation_type: &'static str,
    pub reason: String,
}

impl Diagnostic {
    pub fn new(page_number: u32, index: usize, annotation: &Annotation, error: &AnnotationError) -> Self {
        Self {
            page_number,
            index,
            annotation_id: annotation.resolved_id(page_number, index),
            annotation_type: annotation.kind.type_name(),
            reason: error.to_string(),
        }
    }

    /// A diagnostic for an entry that never made it into the model.
    pub fn rejected(page_number: u32, entry: &RejectedAnnotation) -> Self {
        Self {
            page_number,
            index: entry.index,
            annotation_id: entry
                .id
                .clone()
                .unwrap_or_else(|| AnnotationId::synthesized(page_number, entry.index)),
            annotation_type: entry
                .type_tag
                .as_deref()
                .and_then(AnnotationKind::lookup_type_name)
                .unwrap_or("unknown"),
            reason: AnnotationError::Malformed(entry.reason.clone()).to_string(),
        }
    }

    /// A diagnostic for any page entry; rejected entries keep their own reason.
    pub fn for_entry(page_number: u32, index: usize, entry: PageEntry<'_>, error: &AnnotationError) -> Self {
        match entry {
            PageEntry::Valid(annotation) => Self::new(page_number, index, annotation, error),
            PageEntry::Rejected(rejected) => Self::rejected(page_number, rejected),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "page {} #{} ({} '{}'): {}",
            self.page_number, self.index, self.annotation_type, self.annotation_id, self.reason
        )
    }
}
