//! PDF output backend using lopdf.
//!
//! This crate loads an existing PDF and implements `OutputDocument` over it:
//! drawing operations are encoded into a new content stream per page and
//! overlaid on the original content, with the fonts, images and opacity
//! states they reference merged into the page resources.

mod content;
mod document;

pub use content::to_win_ansi;
pub use document::LopdfDocument;
