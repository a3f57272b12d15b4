use crate::error::RenderError;
use crate::ops::{DrawOp, EncodedImage, FontHandle, ImageHandle, PageInfo};
use burnin_style::FontVariant;

/// A trait for output documents, abstracting the PDF-writing primitives.
///
/// Pages are addressed by zero-based index. Operations appended to a page
/// paint above everything already on it, in the order given.
pub trait OutputDocument {
    fn page_count(&self) -> usize;

    fn page_info(&self, page_index: usize) -> Result<PageInfo, RenderError>;

    /// Registers one of the preloaded text faces. Embedding the same variant
    /// twice returns the same handle.
    fn embed_font(&mut self, variant: FontVariant) -> Result<FontHandle, RenderError>;

    fn embed_image(&mut self, image: &EncodedImage) -> Result<ImageHandle, RenderError>;

    /// Paints `ops` on top of the existing content of a page.
    fn append_ops(&mut self, page_index: usize, ops: &[DrawOp]) -> Result<(), RenderError>;

    /// Consumes the document and produces the output bytes.
    fn serialize(self) -> Result<Vec<u8>, RenderError>
    where
        Self: Sized;
}
