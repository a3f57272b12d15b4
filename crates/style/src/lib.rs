//! Style resolution for annotation rendering.
//!
//! Every resolver here is total: malformed input degrades to a safe default
//! (black, full opacity, the regular font) instead of failing.

pub mod color;
pub mod font;
pub mod metrics;
pub mod opacity;

pub use color::parse_color;
pub use font::FontVariant;
pub use opacity::{resolve_opacity, DEFAULT_OPACITY};
