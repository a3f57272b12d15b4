use burnin_types::{AnnotationId, NormalizedPoint, NormalizedRect, ResourceUri};
use serde::{Deserialize, Serialize};

/// A user-placed markup object.
///
/// Geometry is in percent of the page, origin top-left, y down. The
/// variant-specific payload lives in [`AnnotationKind`], tagged by `type`
/// in the JSON form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<AnnotationId>,
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default)]
    pub width: f32,
    #[serde(default)]
    pub height: f32,
    #[serde(default)]
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f32>,
    #[serde(flatten)]
    pub kind: AnnotationKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Rectangle,
    Circle,
    Line,
    Arrow,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AnnotationKind {
    #[serde(rename_all = "camelCase")]
    Text {
        #[serde(default)]
        content: String,
        #[serde(default)]
        font_size: Option<f32>,
        #[serde(default)]
        font_weight: Option<String>,
        #[serde(default)]
        font_style: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Image {
        resource_ref: ResourceUri,
        #[serde(default)]
        encoding_hint: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Shape {
        shape: ShapeKind,
        #[serde(default)]
        stroke_color: Option<String>,
        #[serde(default)]
        stroke_width: Option<f32>,
        #[serde(default)]
        fill_color: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Highlight {
        #[serde(default)]
        sub_rects: Vec<NormalizedRect>,
    },
    #[serde(rename_all = "camelCase")]
    Redact {
        #[serde(default)]
        sub_rects: Vec<NormalizedRect>,
    },
    #[serde(rename_all = "camelCase")]
    Stamp {
        #[serde(default)]
        stamp_type: String,
        #[serde(default)]
        custom_text: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Freehand {
        #[serde(default)]
        points: Vec<NormalizedPoint>,
        #[serde(default)]
        stroke_width: Option<f32>,
    },
    #[serde(rename_all = "camelCase")]
    Signature {
        #[serde(default)]
        points: Vec<NormalizedPoint>,
        #[serde(default)]
        stroke_width: Option<f32>,
    },
    Note {
        #[serde(default)]
        content: Option<String>,
    },
}

impl AnnotationKind {
    const TYPE_NAMES: [&'static str; 9] = [
        "text", "image", "shape", "highlight", "redact", "stamp", "freehand", "signature", "note",
    ];

    /// The static tag for a `type` string, if it names a known variant.
    pub fn lookup_type_name(tag: &str) -> Option<&'static str> {
        Self::TYPE_NAMES.iter().copied().find(|known| *known == tag)
    }

    /// The lowercase `type` tag, for logs and diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            AnnotationKind::Text { .. } => "text",
            AnnotationKind::Image { .. } => "image",
            AnnotationKind::Shape { .. } => "shape",
            AnnotationKind::Highlight { .. } => "highlight",
            AnnotationKind::Redact { .. } => "redact",
            AnnotationKind::Stamp { .. } => "stamp",
            AnnotationKind::Freehand { .. } => "freehand",
            AnnotationKind::Signature { .. } => "signature",
            AnnotationKind::Note { .. } => "note",
        }
    }
}

impl Annotation {
    pub fn new(kind: AnnotationKind, bounds: NormalizedRect) -> Self {
        Self {
            id: None,
            x: bounds.x,
            y: bounds.y,
            width: bounds.width,
            height: bounds.height,
            color: String::new(),
            opacity: None,
            kind,
        }
    }

    pub fn with_id(mut self, id: impl Into<AnnotationId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = Some(opacity);
        self
    }

    pub fn bounds(&self) -> NormalizedRect {
        NormalizedRect::new(self.x, self.y, self.width, self.height)
    }

    /// The stored id, or `p{page}-{index}` when the editing layer gave none.
    pub fn resolved_id(&self, page_number: u32, index: usize) -> AnnotationId {
        self.id
            .clone()
            .unwrap_or_else(|| AnnotationId::synthesized(page_number, index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_text_annotation() {
        let ann: Annotation = serde_json::from_value(json!({
            "id": "t1",
            "type": "text",
            "x": 10, "y": 20, "width": 30, "height": 5,
            "color": "#ff0000",
            "content": "Hello",
            "fontSize": 14,
            "fontWeight": "bold"
        }))
        .unwrap();

        assert_eq!(ann.id.as_ref().map(|i| i.as_str()), Some("t1"));
        assert_eq!(ann.bounds(), NormalizedRect::new(10.0, 20.0, 30.0, 5.0));
        assert_eq!(ann.opacity, None);
        match ann.kind {
            AnnotationKind::Text { content, font_size, font_weight, font_style } => {
                assert_eq!(content, "Hello");
                assert_eq!(font_size, Some(14.0));
                assert_eq!(font_weight.as_deref(), Some("bold"));
                assert_eq!(font_style, None);
            }
            other => panic!("expected text, got {:?}", other),
        }
    }

    #[test]
    fn test_deserialize_shape_and_freehand() {
        let shape: Annotation = serde_json::from_value(json!({
            "type": "shape", "shape": "arrow",
            "x": 0, "y": 0, "width": 10, "height": 10,
            "strokeColor": "#00f", "strokeWidth": 4, "fillColor": "transparent"
        }))
        .unwrap();
        assert!(matches!(
            shape.kind,
            AnnotationKind::Shape { shape: ShapeKind::Arrow, stroke_width: Some(w), .. } if w == 4.0
        ));

        let freehand: Annotation = serde_json::from_value(json!({
            "type": "freehand",
            "x": 0, "y": 0, "width": 100, "height": 100,
            "points": [{"x": 0, "y": 0}, {"x": 50.5, "y": 50}]
        }))
        .unwrap();
        match freehand.kind {
            AnnotationKind::Freehand { points, stroke_width } => {
                assert_eq!(points.len(), 2);
                assert_eq!(points[1], NormalizedPoint::new(50.5, 50.0));
                assert_eq!(stroke_width, None);
            }
            other => panic!("expected freehand, got {:?}", other),
        }
    }

    #[test]
    fn test_deserialize_highlight_with_sub_rects() {
        let ann: Annotation = serde_json::from_value(json!({
            "type": "highlight",
            "x": 10, "y": 10, "width": 50, "height": 6,
            "color": "#ff0", "opacity": 0.3,
            "subRects": [
                {"x": 10, "y": 10, "width": 50, "height": 3},
                {"x": 10, "y": 13, "width": 20, "height": 3}
            ]
        }))
        .unwrap();
        assert_eq!(ann.opacity, Some(0.3));
        match ann.kind {
            AnnotationKind::Highlight { sub_rects } => assert_eq!(sub_rects.len(), 2),
            other => panic!("expected highlight, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let result: Result<Annotation, _> = serde_json::from_value(json!({
            "type": "hologram", "x": 0, "y": 0, "width": 1, "height": 1
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_resolved_id_falls_back_to_position() {
        let ann = Annotation::new(AnnotationKind::Note { content: None }, NormalizedRect::default());
        assert_eq!(ann.resolved_id(2, 5).as_str(), "p2-5");
        assert_eq!(ann.with_id("n1").resolved_id(2, 5).as_str(), "n1");
    }

    #[test]
    fn test_type_name() {
        let ann = Annotation::new(
            AnnotationKind::Stamp { stamp_type: "approved".into(), custom_text: None },
            NormalizedRect::default(),
        );
        assert_eq!(ann.kind.type_name(), "stamp");
    }
}
