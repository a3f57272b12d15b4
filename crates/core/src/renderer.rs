//! Per-type annotation rendering.
//!
//! [`AnnotationRenderer::render`] is a pure function of the annotation, the
//! page size and (for images) an already-embedded image handle. It returns
//! the drawing operations for one annotation in paint order.

use crate::config::RenderConfig;
use crate::error::AnnotationError;
use crate::fonts::FontSet;
use burnin_model::{Annotation, AnnotationKind, ShapeKind};
use burnin_render_core::transform::{box_to_rect, point_to_abs, text_baseline};
use burnin_render_core::{DrawOp, ImageHandle, Paint, Stroke};
use burnin_style::color::parse_optional_color;
use burnin_style::{DEFAULT_OPACITY, FontVariant, parse_color, resolve_opacity};
use burnin_types::{NormalizedPoint, NormalizedRect, PageSize, Point, Rect, Rgb};

pub struct AnnotationRenderer<'a> {
    config: &'a RenderConfig,
    fonts: &'a FontSet,
}

/// Resolved inputs shared by every variant.
struct Frame {
    rect: Rect,
    color: Rgb,
    opacity: f32,
}

fn sanitize_rect(bounds: NormalizedRect, what: &str) -> Result<NormalizedRect, AnnotationError> {
    if !bounds.is_finite() {
        return Err(AnnotationError::InvalidGeometry(format!(
            "{} has non-finite coordinates",
            what
        )));
    }
    Ok(bounds.clamped())
}

fn sanitize_points(points: &[NormalizedPoint]) -> Result<Vec<NormalizedPoint>, AnnotationError> {
    points
        .iter()
        .map(|p| {
            if p.is_finite() {
                Ok(NormalizedPoint::new(p.x.clamp(0.0, 100.0), p.y.clamp(0.0, 100.0)))
            } else {
                Err(AnnotationError::InvalidGeometry(
                    "stroke has a non-finite point".to_string(),
                ))
            }
        })
        .collect()
}

/// A width that is usable as-is, or `None` to fall back to the default.
fn valid_width(width: Option<f32>) -> Option<f32> {
    width.filter(|w| w.is_finite() && *w >= 0.0)
}

impl<'a> AnnotationRenderer<'a> {
    pub fn new(config: &'a RenderConfig, fonts: &'a FontSet) -> Self {
        Self { config, fonts }
    }

    pub fn render(
        &self,
        annotation: &Annotation,
        page: PageSize,
        image: Option<&ImageHandle>,
    ) -> Result<Vec<DrawOp>, AnnotationError> {
        let bounds = sanitize_rect(annotation.bounds(), "bounding box")?;
        let frame = Frame {
            rect: box_to_rect(&bounds, page),
            color: parse_color(&annotation.color),
            opacity: resolve_opacity(annotation.opacity, DEFAULT_OPACITY),
        };

        match &annotation.kind {
            AnnotationKind::Text {
                content,
                font_size,
                font_weight,
                font_style,
            } => Ok(self.text(
                &frame,
                bounds,
                page,
                content,
                *font_size,
                FontVariant::select(font_weight.as_deref(), font_style.as_deref()),
            )),
            AnnotationKind::Image { .. } => {
                let image = image.ok_or(AnnotationError::MissingImage)?;
                Ok(vec![DrawOp::Image {
                    image: image.clone(),
                    rect: frame.rect,
                    opacity: frame.opacity,
                }])
            }
            AnnotationKind::Shape {
                shape,
                stroke_color,
                stroke_width,
                fill_color,
            } => Ok(self.shape(
                &frame,
                *shape,
                stroke_color.as_deref(),
                *stroke_width,
                fill_color.as_deref(),
            )),
            AnnotationKind::Highlight { sub_rects } => {
                let opacity = resolve_opacity(annotation.opacity, self.config.highlight_opacity);
                self.marked_areas(&frame, sub_rects, page, opacity)
            }
            AnnotationKind::Redact { sub_rects } => self.marked_areas(&frame, sub_rects, page, 1.0),
            AnnotationKind::Stamp {
                stamp_type,
                custom_text,
            } => Ok(self.stamp(&frame, stamp_type, custom_text.as_deref())),
            AnnotationKind::Freehand {
                points,
                stroke_width,
            } => self.polyline(&frame, "freehand", points, *stroke_width, page),
            AnnotationKind::Signature {
                points,
                stroke_width,
            } => self.polyline(&frame, "signature", points, *stroke_width, page),
            AnnotationKind::Note { .. } => Ok(self.note(&frame)),
        }
    }

    fn text(
        &self,
        frame: &Frame,
        bounds: NormalizedRect,
        page: PageSize,
        content: &str,
        font_size: Option<f32>,
        variant: FontVariant,
    ) -> Vec<DrawOp> {
        if content.trim().is_empty() {
            return Vec::new();
        }
        let size = font_size
            .filter(|s| s.is_finite() && *s > 0.0)
            .unwrap_or(self.config.default_font_size);
        let baseline = text_baseline(bounds.y, size, self.config.text_ascent_ratio, page);

        vec![DrawOp::Text {
            text: content.to_string(),
            origin: Point::new(frame.rect.x, baseline),
            font: self.fonts.get(variant).clone(),
            size,
            color: frame.color,
            opacity: frame.opacity,
        }]
    }

    /// Outline stroke for shapes: `strokeColor`, else the annotation color.
    /// A `transparent` stroke or a zero width means no outline.
    fn outline(&self, frame: &Frame, stroke_color: Option<&str>, stroke_width: Option<f32>) -> Option<Stroke> {
        let color = match stroke_color.map(str::trim) {
            Some(s) if s.eq_ignore_ascii_case("transparent") => return None,
            Some(s) if !s.is_empty() => parse_color(s),
            _ => frame.color,
        };
        let width = valid_width(stroke_width).unwrap_or(self.config.default_stroke_width);
        (width > 0.0).then(|| Stroke::new(color, width))
    }

    fn shape(
        &self,
        frame: &Frame,
        shape: ShapeKind,
        stroke_color: Option<&str>,
        stroke_width: Option<f32>,
        fill_color: Option<&str>,
    ) -> Vec<DrawOp> {
        let rect = frame.rect;
        let stroke = self.outline(frame, stroke_color, stroke_width);

        match shape {
            ShapeKind::Rectangle | ShapeKind::Circle => {
                let paint = Paint {
                    fill: parse_optional_color(fill_color),
                    stroke,
                };
                if paint.is_empty() {
                    return Vec::new();
                }
                if shape == ShapeKind::Rectangle {
                    vec![DrawOp::Rectangle {
                        rect,
                        paint,
                        opacity: frame.opacity,
                    }]
                } else {
                    vec![DrawOp::Ellipse {
                        center: rect.center(),
                        x_radius: rect.width / 2.0,
                        y_radius: rect.height / 2.0,
                        paint,
                        opacity: frame.opacity,
                    }]
                }
            }
            ShapeKind::Line | ShapeKind::Arrow => {
                let Some(stroke) = stroke else {
                    return Vec::new();
                };
                let end = rect.bottom_right();
                let mut ops = vec![DrawOp::Line {
                    from: rect.top_left(),
                    to: end,
                    stroke,
                    opacity: frame.opacity,
                }];
                if shape == ShapeKind::Arrow {
                    let radius = self.config.arrow_head_radius;
                    ops.push(DrawOp::Ellipse {
                        center: end,
                        x_radius: radius,
                        y_radius: radius,
                        paint: Paint::fill(stroke.color),
                        opacity: frame.opacity,
                    });
                }
                ops
            }
        }
    }

    /// Highlight and redact: fill each sub-rectangle, or the whole box if there are none.
    fn marked_areas(
        &self,
        frame: &Frame,
        sub_rects: &[NormalizedRect],
        page: PageSize,
        opacity: f32,
    ) -> Result<Vec<DrawOp>, AnnotationError> {
        let rects = if sub_rects.is_empty() {
            vec![frame.rect]
        } else {
            sub_rects
                .iter()
                .map(|r| sanitize_rect(*r, "sub-rectangle").map(|r| box_to_rect(&r, page)))
                .collect::<Result<Vec<_>, _>>()?
        };

        Ok(rects
            .into_iter()
            .map(|rect| DrawOp::Rectangle {
                rect,
                paint: Paint::fill(frame.color),
                opacity,
            })
            .collect())
    }

    fn stamp(&self, frame: &Frame, stamp_type: &str, custom_text: Option<&str>) -> Vec<DrawOp> {
        let rect = frame.rect;
        let mut ops = vec![DrawOp::Rectangle {
            rect,
            paint: Paint::stroke(Stroke::new(frame.color, self.config.stamp_border_width)),
            opacity: frame.opacity,
        }];

        let label = match custom_text.map(str::trim) {
            Some(text) if !text.is_empty() => text.to_string(),
            _ => stamp_type.trim().to_uppercase(),
        };
        let size = self.config.stamp_max_font_size.min(0.5 * rect.height);
        if label.is_empty() || size <= 0.0 {
            return ops;
        }

        let variant = FontVariant::Bold;
        let text_width = variant.width_of_text_at_size(&label, size);
        let text_height = variant.height_at_size(size);
        ops.push(DrawOp::Text {
            origin: Point::new(
                rect.x + (rect.width - text_width) / 2.0,
                rect.y + (rect.height - text_height) / 2.0,
            ),
            text: label,
            font: self.fonts.get(variant).clone(),
            size,
            color: frame.color,
            opacity: frame.opacity,
        });
        ops
    }

    fn polyline(
        &self,
        frame: &Frame,
        kind: &'static str,
        points: &[NormalizedPoint],
        stroke_width: Option<f32>,
        page: PageSize,
    ) -> Result<Vec<DrawOp>, AnnotationError> {
        if points.len() < 2 {
            return Err(AnnotationError::TooFewPoints {
                kind,
                count: points.len(),
            });
        }
        let points = sanitize_points(points)?;
        let width = valid_width(stroke_width).unwrap_or(self.config.default_stroke_width);
        let stroke = Stroke::new(frame.color, width).round();

        Ok(points
            .windows(2)
            .map(|pair| DrawOp::Line {
                from: point_to_abs(&pair[0], page),
                to: point_to_abs(&pair[1], page),
                stroke,
                opacity: frame.opacity,
            })
            .collect())
    }

    /// Fixed-size marker square hanging from the top-left corner of the box.
    fn note(&self, frame: &Frame) -> Vec<DrawOp> {
        let size = self.config.note_marker_size;
        vec![DrawOp::Rectangle {
            rect: Rect::new(frame.rect.x, frame.rect.top() - size, size, size),
            paint: Paint::fill(frame.color),
            opacity: frame.opacity,
        }]
    }
}
