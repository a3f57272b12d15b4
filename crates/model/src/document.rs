use crate::{Annotation, ModelError};
use burnin_types::AnnotationId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// An annotation entry that could not be read into an [`Annotation`].
///
/// Kept alongside the readable ones so a single bad entry costs only itself.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedAnnotation {
    /// Position of the entry within its page's list.
    pub index: usize,
    pub id: Option<AnnotationId>,
    /// The raw `type` tag, when the entry carried one.
    pub type_tag: Option<String>,
    pub reason: String,
}

/// One slot of a page's annotation list, in paint order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PageEntry<'a> {
    Valid(&'a Annotation),
    Rejected(&'a RejectedAnnotation),
}

/// The annotations of a single page, in paint order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawPage")]
pub struct AnnotatedPage {
    /// 1-based page number.
    pub page_number: u32,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    #[serde(skip)]
    rejected: Vec<RejectedAnnotation>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPage {
    page_number: u32,
    #[serde(default)]
    annotations: Vec<serde_json::Value>,
}

impl From<RawPage> for AnnotatedPage {
    fn from(raw: RawPage) -> Self {
        Self::from_values(raw.page_number, raw.annotations)
    }
}

impl AnnotatedPage {
    pub fn new(page_number: u32, annotations: Vec<Annotation>) -> Self {
        Self {
            page_number,
            annotations,
            rejected: Vec::new(),
        }
    }

    /// Reads each entry on its own; unreadable ones are kept as rejected.
    pub fn from_values(page_number: u32, values: Vec<serde_json::Value>) -> Self {
        let mut annotations = Vec::with_capacity(values.len());
        let mut rejected = Vec::new();

        for (index, value) in values.into_iter().enumerate() {
            let id = value.get("id").and_then(|v| v.as_str()).map(AnnotationId::from);
            let type_tag = value.get("type").and_then(|v| v.as_str()).map(str::to_string);
            match serde_json::from_value::<Annotation>(value) {
                Ok(annotation) => annotations.push(annotation),
                Err(e) => rejected.push(RejectedAnnotation {
                    index,
                    id,
                    type_tag,
                    reason: e.to_string(),
                }),
            }
        }

        Self {
            page_number,
            annotations,
            rejected,
        }
    }

    pub fn rejected(&self) -> &[RejectedAnnotation] {
        &self.rejected
    }

    /// Number of entries, readable or not.
    pub fn len(&self) -> usize {
        self.annotations.len() + self.rejected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every entry with its original position, readable ones and rejected ones
    /// interleaved as they appeared.
    pub fn entries(&self) -> impl Iterator<Item = (usize, PageEntry<'_>)> + '_ {
        let mut valid = self.annotations.iter();
        let mut rejected = self.rejected.iter().peekable();
        (0..self.len()).filter_map(move |index| {
            if rejected.peek().is_some_and(|r| r.index == index) {
                rejected.next().map(|r| (index, PageEntry::Rejected(r)))
            } else {
                valid
                    .next()
                    .map(|a| (index, PageEntry::Valid(a)))
                    .or_else(|| rejected.next().map(|r| (index, PageEntry::Rejected(r))))
            }
        })
    }
}

/// The full annotation model for one document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatedDocument {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub pages: Vec<AnnotatedPage>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl AnnotatedDocument {
    pub fn new(id: impl Into<String>, pages: Vec<AnnotatedPage>) -> Self {
        Self {
            id: id.into(),
            pages,
            metadata: BTreeMap::new(),
        }
    }

    /// Builds a document from annotations keyed by 1-based page number.
    pub fn from_page_map(pages: BTreeMap<u32, Vec<Annotation>>) -> Self {
        Self {
            id: String::new(),
            pages: pages
                .into_iter()
                .map(|(page_number, annotations)| AnnotatedPage::new(page_number, annotations))
                .collect(),
            metadata: BTreeMap::new(),
        }
    }

    /// Parses either a full document or a bare `{ "<pageNumber>": [...] }` map.
    ///
    /// An object whose keys are all page numbers is read as the page map;
    /// anything else is read as the document form. Individual annotations
    /// that fail to parse do not fail the document; see
    /// [`AnnotatedPage::rejected`].
    pub fn from_json_str(json: &str) -> Result<Self, ModelError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let is_page_map = value
            .as_object()
            .is_some_and(|obj| !obj.is_empty() && obj.keys().all(|k| k.trim().parse::<u32>().is_ok()));

        if is_page_map {
            let pages: BTreeMap<u32, Vec<serde_json::Value>> = serde_json::from_value(value)?;
            Ok(Self {
                id: String::new(),
                pages: pages
                    .into_iter()
                    .map(|(page_number, values)| AnnotatedPage::from_values(page_number, values))
                    .collect(),
                metadata: BTreeMap::new(),
            })
        } else {
            Ok(serde_json::from_value(value)?)
        }
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ModelError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Total number of annotation entries across all pages, rejected ones included.
    pub fn annotation_count(&self) -> usize {
        self.pages.iter().map(AnnotatedPage::len).sum()
    }

    /// Pages ordered by page number. Pages listed more than once keep their
    /// relative order, so their annotations paint in the order given.
    pub fn pages_in_order(&self) -> Vec<&AnnotatedPage> {
        let mut pages: Vec<&AnnotatedPage> = self.pages.iter().collect();
        pages.sort_by_key(|p| p.page_number);
        pages
    }
}
