//! The flattening loop.
//!
//! For each page in document order and each annotation in stored order, the
//! compositor sanitizes, embeds (for images) and renders the annotation, then
//! appends the page's drawing operations in one batch. A failing annotation
//! is reported as a [`Diagnostic`] and the loop moves on.

use crate::config::FlattenConfig;
use crate::diagnostics::Diagnostic;
use crate::embedder::ImageEmbedder;
use crate::error::{AnnotationError, FlattenError};
use crate::fonts::FontSet;
use crate::renderer::AnnotationRenderer;
use burnin_model::{AnnotatedDocument, Annotation, AnnotationKind, PageEntry};
use burnin_render_core::{DrawOp, OutputDocument, PageInfo};
use burnin_traits::ResourceProvider;
use serde::Serialize;
use std::sync::Arc;

/// Serialized output plus the annotations that could not be drawn.
#[derive(Debug, Clone)]
pub struct FlattenOutput {
    pub bytes: Vec<u8>,
    pub diagnostics: Vec<Diagnostic>,
}

/// The drawing operations a save would append to one page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PagePlan {
    pub page_number: u32,
    pub ops: Vec<DrawOp>,
}

/// The result of a dry run: what would be drawn, and what would be skipped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlattenPlan {
    pub pages: Vec<PagePlan>,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone)]
pub struct Compositor {
    config: FlattenConfig,
    provider: Arc<dyn ResourceProvider>,
}

impl Compositor {
    pub fn new(config: FlattenConfig, provider: Arc<dyn ResourceProvider>) -> Self {
        Self { config, provider }
    }

    pub fn config(&self) -> &FlattenConfig {
        &self.config
    }

    /// Burns `annotations` into `doc` and serializes the result.
    pub fn flatten<D: OutputDocument>(
        &self,
        mut doc: D,
        annotations: &AnnotatedDocument,
    ) -> Result<FlattenOutput, FlattenError> {
        let diagnostics = self.compose(&mut doc, annotations)?;
        let bytes = doc.serialize().map_err(FlattenError::Serialize)?;

        log::info!(
            "Flattened {} annotation(s) into {} bytes, {} skipped",
            annotations.annotation_count().saturating_sub(diagnostics.len()),
            bytes.len(),
            diagnostics.len()
        );
        Ok(FlattenOutput { bytes, diagnostics })
    }

    /// Draws every annotation onto `doc` without serializing it.
    pub fn compose<D: OutputDocument>(
        &self,
        doc: &mut D,
        annotations: &AnnotatedDocument,
    ) -> Result<Vec<Diagnostic>, FlattenError> {
        self.run(doc, annotations, |doc, page_index, page_number, ops| {
            doc.append_ops(page_index, &ops)
                .map_err(|source| FlattenError::PageWrite { page_number, source })
        })
    }

    /// Computes the per-page drawing operations without appending them.
    ///
    /// Fonts and images are still embedded into `doc` so the returned handles
    /// are valid for it.
    pub fn plan<D: OutputDocument>(
        &self,
        doc: &mut D,
        annotations: &AnnotatedDocument,
    ) -> Result<FlattenPlan, FlattenError> {
        let mut pages = Vec::new();
        let diagnostics = self.run(doc, annotations, |_, _, page_number, ops| {
            pages.push(PagePlan { page_number, ops });
            Ok(())
        })?;
        Ok(FlattenPlan { pages, diagnostics })
    }

    fn run<D, F>(
        &self,
        doc: &mut D,
        annotations: &AnnotatedDocument,
        mut emit: F,
    ) -> Result<Vec<Diagnostic>, FlattenError>
    where
        D: OutputDocument,
        F: FnMut(&mut D, usize, u32, Vec<DrawOp>) -> Result<(), FlattenError>,
    {
        let fonts = FontSet::embed_all(doc)?;
        let renderer = AnnotationRenderer::new(&self.config.render, &fonts);
        let mut embedder = ImageEmbedder::new(self.config.embed.clone(), Arc::clone(&self.provider));
        let mut diagnostics = Vec::new();
        let page_count = doc.page_count();

        for page in annotations.pages_in_order() {
            let page_number = page.page_number;
            let page_index = page_number
                .checked_sub(1)
                .map(|i| i as usize)
                .filter(|&i| i < page_count);

            let page_info = match page_index {
                Some(i) => doc
                    .page_info(i)
                    .map(|info| (i, info))
                    .map_err(|source| AnnotationError::PageUnreadable { page_number, source }),
                None => Err(AnnotationError::PageOutOfRange { page_number, page_count }),
            };

            let (page_index, info) = match page_info {
                Ok(found) => found,
                Err(err) => {
                    for (index, entry) in page.entries() {
                        let diagnostic = Diagnostic::for_entry(page_number, index, entry, &err);
                        log::warn!("Skipping annotation: {}", diagnostic);
                        diagnostics.push(diagnostic);
                    }
                    continue;
                }
            };

            log::debug!(
                "Page {}: {} annotation(s), {}x{}",
                page_number,
                page.len(),
                info.size.width,
                info.size.height
            );

            let mut page_ops = Vec::new();
            for (index, entry) in page.entries() {
                let annotation = match entry {
                    PageEntry::Valid(annotation) => annotation,
                    PageEntry::Rejected(rejected) => {
                        let diagnostic = Diagnostic::rejected(page_number, rejected);
                        log::warn!("Skipping annotation: {}", diagnostic);
                        diagnostics.push(diagnostic);
                        continue;
                    }
                };
                match self.render_one(doc, &renderer, &mut embedder, annotation, info) {
                    Ok(ops) => page_ops.extend(ops),
                    Err(err) => {
                        let diagnostic = Diagnostic::new(page_number, index, annotation, &err);
                        log::warn!("Skipping annotation: {}", diagnostic);
                        diagnostics.push(diagnostic);
                    }
                }
            }

            if !page_ops.is_empty() {
                emit(doc, page_index, page_number, page_ops)?;
            }
        }

        Ok(diagnostics)
    }

    fn render_one<D: OutputDocument>(
        &self,
        doc: &mut D,
        renderer: &AnnotationRenderer<'_>,
        embedder: &mut ImageEmbedder,
        annotation: &Annotation,
        info: PageInfo,
    ) -> Result<Vec<DrawOp>, AnnotationError> {
        let image = match &annotation.kind {
            AnnotationKind::Image {
                resource_ref,
                encoding_hint,
            } => Some(embedder.embed(doc, resource_ref, encoding_hint.as_deref())?),
            _ => None,
        };
        renderer.render(annotation, info.size, image.as_ref())
    }
}
