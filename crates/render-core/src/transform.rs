//! Normalized (percent, top-left, y-down) to output space (points,
//! bottom-left, y-up).
//!
//! Every function here is pure: the same inputs always give the same output.

use burnin_types::{NormalizedPoint, NormalizedRect, PageSize, Point, Rect};

/// Ascent approximation used to place a text baseline below the box top.
pub const DEFAULT_ASCENT_RATIO: f32 = 0.8;

/// Flips a y coordinate measured from the top into one measured from the bottom.
pub fn flip_y(y_from_top: f32, page_height: f32) -> f32 {
    page_height - y_from_top
}

/// Maps a normalized box to an absolute rectangle anchored at its bottom-left corner.
pub fn box_to_rect(bounds: &NormalizedRect, page: PageSize) -> Rect {
    Rect {
        x: bounds.x / 100.0 * page.width,
        y: flip_y((bounds.y + bounds.height) / 100.0 * page.height, page.height),
        width: bounds.width / 100.0 * page.width,
        height: bounds.height / 100.0 * page.height,
    }
}

/// Maps a bare normalized point (a freehand or line vertex).
pub fn point_to_abs(point: &NormalizedPoint, page: PageSize) -> Point {
    Point {
        x: point.x / 100.0 * page.width,
        y: flip_y(point.y / 100.0 * page.height, page.height),
    }
}

/// Baseline y for a text run whose box top sits at normalized `y`.
pub fn text_baseline(y: f32, font_size: f32, ascent_ratio: f32, page: PageSize) -> f32 {
    flip_y(y / 100.0 * page.height, page.height) - font_size * ascent_ratio
}
