//! An in-memory `OutputDocument` that records what would be drawn.
//!
//! Lets the compositor run without a PDF backend, so callers can inspect the
//! exact drawing operations an annotation produced.

use crate::error::RenderError;
use crate::ops::{DrawOp, EncodedImage, FontHandle, ImageHandle, PageInfo};
use crate::traits::OutputDocument;
use burnin_style::FontVariant;
use burnin_types::PageSize;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordedPage {
    pub info: PageInfo,
    pub ops: Vec<DrawOp>,
}

#[derive(Debug, Default, Serialize)]
pub struct RecordingDocument {
    pages: Vec<RecordedPage>,
    fonts: Vec<FontHandle>,
    images: Vec<EncodedImage>,
    #[serde(skip)]
    fail_font_embedding: bool,
    #[serde(skip)]
    unreadable_page: Option<usize>,
}

impl RecordingDocument {
    pub fn new(page_sizes: impl IntoIterator<Item = PageSize>) -> Self {
        Self {
            pages: page_sizes
                .into_iter()
                .map(|size| RecordedPage {
                    info: PageInfo::new(size),
                    ops: Vec::new(),
                })
                .collect(),
            ..Default::default()
        }
    }

    /// Makes every `embed_font` call fail, to exercise the fatal path.
    pub fn with_failing_fonts(mut self) -> Self {
        self.fail_font_embedding = true;
        self
    }

    /// Makes `page_info` fail for one page that otherwise exists.
    pub fn with_unreadable_page(mut self, page_index: usize) -> Self {
        self.unreadable_page = Some(page_index);
        self
    }

    pub fn pages(&self) -> &[RecordedPage] {
        &self.pages
    }

    pub fn ops(&self, page_index: usize) -> &[DrawOp] {
        self.pages.get(page_index).map(|p| p.ops.as_slice()).unwrap_or(&[])
    }

    pub fn fonts(&self) -> &[FontHandle] {
        &self.fonts
    }

    pub fn images(&self) -> &[EncodedImage] {
        &self.images
    }

    fn page_mut(&mut self, page_index: usize) -> Result<&mut RecordedPage, RenderError> {
        let page_count = self.pages.len();
        self.pages.get_mut(page_index).ok_or(RenderError::PageOutOfRange {
            index: page_index,
            page_count,
        })
    }
}

impl OutputDocument for RecordingDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_info(&self, page_index: usize) -> Result<PageInfo, RenderError> {
        if self.unreadable_page == Some(page_index) {
            return Err(RenderError::Pdf(format!("page {} has a broken MediaBox", page_index + 1)));
        }
        self.pages
            .get(page_index)
            .map(|p| p.info)
            .ok_or(RenderError::PageOutOfRange {
                index: page_index,
                page_count: self.pages.len(),
            })
    }

    fn embed_font(&mut self, variant: FontVariant) -> Result<FontHandle, RenderError> {
        if self.fail_font_embedding {
            return Err(RenderError::FontEmbed {
                font: variant.base_font().to_string(),
                message: "font embedding disabled".to_string(),
            });
        }
        if let Some(existing) = self.fonts.iter().find(|f| f.variant == variant) {
            return Ok(existing.clone());
        }
        let handle = FontHandle {
            variant,
            resource_name: format!("F{}", self.fonts.len() + 1),
        };
        self.fonts.push(handle.clone());
        Ok(handle)
    }

    fn embed_image(&mut self, image: &EncodedImage) -> Result<ImageHandle, RenderError> {
        let id = self.images.len();
        self.images.push(image.clone());
        Ok(ImageHandle {
            id,
            resource_name: format!("Im{}", id + 1),
            width: image.width,
            height: image.height,
        })
    }

    fn append_ops(&mut self, page_index: usize, ops: &[DrawOp]) -> Result<(), RenderError> {
        self.page_mut(page_index)?.ops.extend_from_slice(ops);
        Ok(())
    }

    /// Serializes the recorded pages as JSON.
    fn serialize(self) -> Result<Vec<u8>, RenderError> {
        Ok(serde_json::to_vec_pretty(&self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::{Paint, Stroke};
    use burnin_types::{Rect, Rgb};

    fn rect_op() -> DrawOp {
        DrawOp::Rectangle {
            rect: Rect::new(0.0, 0.0, 10.0, 10.0),
            paint: Paint::stroke(Stroke::new(Rgb::BLACK, 2.0)),
            opacity: 1.0,
        }
    }

    #[test]
    fn test_append_ops_keeps_order() {
        let mut doc = RecordingDocument::new([PageSize::letter()]);
        doc.append_ops(0, &[rect_op()]).unwrap();
        doc.append_ops(0, &[rect_op(), rect_op()]).unwrap();
        assert_eq!(doc.ops(0).len(), 3);
    }

    #[test]
    fn test_append_ops_out_of_range() {
        let mut doc = RecordingDocument::new([PageSize::letter()]);
        let err = doc.append_ops(3, &[rect_op()]).unwrap_err();
        assert!(matches!(err, RenderError::PageOutOfRange { index: 3, page_count: 1 }));
    }

    #[test]
    fn test_embed_font_is_deduplicated() {
        let mut doc = RecordingDocument::new([PageSize::letter()]);
        let a = doc.embed_font(FontVariant::Bold).unwrap();
        let b = doc.embed_font(FontVariant::Bold).unwrap();
        let c = doc.embed_font(FontVariant::Regular).unwrap();
        assert_eq!(a, b);
        assert_ne!(a.resource_name, c.resource_name);
        assert_eq!(doc.fonts().len(), 2);
    }

    #[test]
    fn test_failing_fonts() {
        let mut doc = RecordingDocument::new([PageSize::letter()]).with_failing_fonts();
        assert!(matches!(
            doc.embed_font(FontVariant::Regular),
            Err(RenderError::FontEmbed { .. })
        ));
    }

    #[test]
    fn test_serialize_emits_json() {
        let mut doc = RecordingDocument::new([PageSize::new(200.0, 100.0)]);
        doc.append_ops(0, &[rect_op()]).unwrap();
        let bytes = doc.serialize().unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["pages"][0]["info"]["size"]["width"], 200.0);
        assert_eq!(json["pages"][0]["ops"][0]["op"], "rectangle");
    }
}
