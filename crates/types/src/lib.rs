pub mod color;
pub mod geometry;
pub mod ids;

pub use color::Rgb;
pub use geometry::{NormalizedPoint, NormalizedRect, PageSize, Point, Rect};
pub use ids::{AnnotationId, ResourceUri};
