use burnin_style::FontVariant;
use burnin_types::{PageSize, Point, Rect, Rgb};
use serde::Serialize;

/// Size and rotation of an existing page, as read from the source document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageInfo {
    pub size: PageSize,
    /// Page `/Rotate` in degrees. Read but not applied when drawing.
    pub rotation: i32,
}

impl PageInfo {
    pub fn new(size: PageSize) -> Self {
        Self { size, rotation: 0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

impl LineCap {
    /// The operand of the PDF `J` operator.
    pub fn pdf_code(&self) -> i64 {
        match self {
            LineCap::Butt => 0,
            LineCap::Round => 1,
            LineCap::Square => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Stroke {
    pub color: Rgb,
    pub width: f32,
    pub cap: LineCap,
}

impl Stroke {
    pub fn new(color: Rgb, width: f32) -> Self {
        Self {
            color,
            width,
            cap: LineCap::Butt,
        }
    }

    pub fn round(mut self) -> Self {
        self.cap = LineCap::Round;
        self
    }
}

/// How a closed path is painted. Both parts may be present.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Paint {
    pub fill: Option<Rgb>,
    pub stroke: Option<Stroke>,
}

impl Paint {
    pub fn fill(color: Rgb) -> Self {
        Self {
            fill: Some(color),
            stroke: None,
        }
    }

    pub fn stroke(stroke: Stroke) -> Self {
        Self {
            fill: None,
            stroke: Some(stroke),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fill.is_none() && self.stroke.is_none()
    }
}

/// A font registered with an output document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FontHandle {
    pub variant: FontVariant,
    /// Page-resource name the backend will bind the font under.
    pub resource_name: String,
}

/// An image registered with an output document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ImageHandle {
    pub id: usize,
    pub resource_name: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ImageEncoding {
    /// JPEG bytes passed through untouched.
    Dct,
    /// Zlib-compressed raw samples.
    Flate,
}

impl ImageEncoding {
    pub fn filter_name(&self) -> &'static str {
        match self {
            ImageEncoding::Dct => "DCTDecode",
            ImageEncoding::Flate => "FlateDecode",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ImageColorSpace {
    DeviceGray,
    DeviceRgb,
    DeviceCmyk,
}

impl ImageColorSpace {
    pub fn pdf_name(&self) -> &'static str {
        match self {
            ImageColorSpace::DeviceGray => "DeviceGray",
            ImageColorSpace::DeviceRgb => "DeviceRGB",
            ImageColorSpace::DeviceCmyk => "DeviceCMYK",
        }
    }
}

/// An image already encoded into a form a PDF image XObject can carry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EncodedImage {
    pub width: u32,
    pub height: u32,
    pub color_space: ImageColorSpace,
    pub bits_per_component: u8,
    pub encoding: ImageEncoding,
    #[serde(skip)]
    pub data: Vec<u8>,
    /// Flate-compressed 8-bit alpha channel, same dimensions as the image.
    #[serde(skip)]
    pub soft_mask: Option<Vec<u8>>,
}

/// A single backend-neutral drawing operation in output space.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum DrawOp {
    Text {
        text: String,
        origin: Point,
        font: FontHandle,
        size: f32,
        color: Rgb,
        opacity: f32,
    },
    Rectangle {
        rect: Rect,
        paint: Paint,
        opacity: f32,
    },
    Ellipse {
        center: Point,
        x_radius: f32,
        y_radius: f32,
        paint: Paint,
        opacity: f32,
    },
    Line {
        from: Point,
        to: Point,
        stroke: Stroke,
        opacity: f32,
    },
    Image {
        image: ImageHandle,
        rect: Rect,
        opacity: f32,
    },
}

impl DrawOp {
    pub fn opacity(&self) -> f32 {
        match self {
            DrawOp::Text { opacity, .. }
            | DrawOp::Rectangle { opacity, .. }
            | DrawOp::Ellipse { opacity, .. }
            | DrawOp::Line { opacity, .. }
            | DrawOp::Image { opacity, .. } => *opacity,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            DrawOp::Text { .. } => "text",
            DrawOp::Rectangle { .. } => "rectangle",
            DrawOp::Ellipse { .. } => "ellipse",
            DrawOp::Line { .. } => "line",
            DrawOp::Image { .. } => "image",
        }
    }
}
