use crate::metrics;
use serde::{Deserialize, Serialize};

/// One of the four preloaded text faces.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum FontVariant {
    #[default]
    Regular,
    Bold,
    Italic,
    BoldItalic,
}

impl FontVariant {
    pub const ALL: [FontVariant; 4] = [
        FontVariant::Regular,
        FontVariant::Bold,
        FontVariant::Italic,
        FontVariant::BoldItalic,
    ];

    /// Picks a variant from free-form `fontWeight` / `fontStyle` values.
    ///
    /// `bold`, `bolder` and numeric weights of 600 or more count as bold;
    /// `italic` and `oblique` count as italic. Anything else is regular.
    pub fn select(weight: Option<&str>, style: Option<&str>) -> Self {
        match (is_bold(weight), is_italic(style)) {
            (true, true) => FontVariant::BoldItalic,
            (true, false) => FontVariant::Bold,
            (false, true) => FontVariant::Italic,
            (false, false) => FontVariant::Regular,
        }
    }

    /// The standard-14 PostScript name backing this variant.
    pub fn base_font(&self) -> &'static str {
        match self {
            FontVariant::Regular => "Helvetica",
            FontVariant::Bold => "Helvetica-Bold",
            FontVariant::Italic => "Helvetica-Oblique",
            FontVariant::BoldItalic => "Helvetica-BoldOblique",
        }
    }

    pub fn is_bold(&self) -> bool {
        matches!(self, FontVariant::Bold | FontVariant::BoldItalic)
    }

    /// Advance width of `text` at `size`, in output units.
    pub fn width_of_text_at_size(&self, text: &str, size: f32) -> f32 {
        let widths = if self.is_bold() {
            &metrics::HELVETICA_BOLD_WIDTHS
        } else {
            &metrics::HELVETICA_WIDTHS
        };
        let units: u32 = text.chars().map(|c| metrics::glyph_width(widths, c) as u32).sum();
        units as f32 * size / 1000.0
    }

    /// Ascender-to-descender height at `size`.
    pub fn height_at_size(&self, size: f32) -> f32 {
        (metrics::HELVETICA_ASCENDER - metrics::HELVETICA_DESCENDER) as f32 * size / 1000.0
    }
}

fn is_bold(weight: Option<&str>) -> bool {
    let Some(weight) = weight.map(str::trim) else {
        return false;
    };
    match weight.to_ascii_lowercase().as_str() {
        "bold" | "bolder" => true,
        other => other.parse::<u16>().map(|n| n >= 600).unwrap_or(false),
    }
}

fn is_italic(style: Option<&str>) -> bool {
    matches!(
        style.map(|s| s.trim().to_ascii_lowercase()).as_deref(),
        Some("italic") | Some("oblique")
    )
}
