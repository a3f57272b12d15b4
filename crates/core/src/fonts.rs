use crate::error::FlattenError;
use burnin_render_core::{FontHandle, OutputDocument};
use burnin_style::FontVariant;

/// Handles for the four preloaded text faces, embedded once per save.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSet {
    regular: FontHandle,
    bold: FontHandle,
    italic: FontHandle,
    bold_italic: FontHandle,
}

impl FontSet {
    /// Embeds every variant into `doc`. Any failure is fatal for the save.
    pub fn embed_all<D: OutputDocument>(doc: &mut D) -> Result<Self, FlattenError> {
        let mut embed = |variant: FontVariant| {
            doc.embed_font(variant).map_err(|source| FlattenError::FontEmbed {
                font: variant.base_font(),
                source,
            })
        };

        Ok(Self {
            regular: embed(FontVariant::Regular)?,
            bold: embed(FontVariant::Bold)?,
            italic: embed(FontVariant::Italic)?,
            bold_italic: embed(FontVariant::BoldItalic)?,
        })
    }

    pub fn get(&self, variant: FontVariant) -> &FontHandle {
        match variant {
            FontVariant::Regular => &self.regular,
            FontVariant::Bold => &self.bold,
            FontVariant::Italic => &self.italic,
            FontVariant::BoldItalic => &self.bold_italic,
        }
    }
}
