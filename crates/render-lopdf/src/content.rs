//! Content-stream building blocks for drawing operations.

use burnin_render_core::{Paint, Stroke};
use burnin_types::{Point, Rect, Rgb};
use lopdf::content::Operation;
use lopdf::{Object, StringFormat};

/// Control-point distance for approximating a quarter ellipse with one cubic Bézier.
const KAPPA: f32 = 0.552_284_8;

pub(crate) fn fill_color(color: Rgb) -> Operation {
    Operation::new("rg", vec![color.r.into(), color.g.into(), color.b.into()])
}

pub(crate) fn stroke_color(color: Rgb) -> Operation {
    Operation::new("RG", vec![color.r.into(), color.g.into(), color.b.into()])
}

/// Color, width and cap for a stroke.
pub(crate) fn stroke_state(stroke: &Stroke) -> Vec<Operation> {
    vec![
        stroke_color(stroke.color),
        Operation::new("w", vec![stroke.width.into()]),
        Operation::new("J", vec![stroke.cap.pdf_code().into()]),
    ]
}

/// Sets up colors for `paint` and returns the painting operator for a
/// closed path, or `None` if nothing would be painted.
pub(crate) fn paint_state(paint: &Paint, ops: &mut Vec<Operation>) -> Option<&'static str> {
    if let Some(fill) = paint.fill {
        ops.push(fill_color(fill));
    }
    if let Some(stroke) = &paint.stroke {
        ops.extend(stroke_state(stroke));
    }
    match (paint.fill.is_some(), paint.stroke.is_some()) {
        (true, true) => Some("B"),
        (true, false) => Some("f"),
        (false, true) => Some("S"),
        (false, false) => None,
    }
}

pub(crate) fn rect_path(rect: &Rect) -> Operation {
    Operation::new(
        "re",
        vec![rect.x.into(), rect.y.into(), rect.width.into(), rect.height.into()],
    )
}

/// A closed ellipse path from four cubic Bézier arcs.
pub(crate) fn ellipse_path(center: Point, rx: f32, ry: f32) -> Vec<Operation> {
    let (cx, cy) = (center.x, center.y);
    let (ox, oy) = (rx * KAPPA, ry * KAPPA);

    let curve = |x1: f32, y1: f32, x2: f32, y2: f32, x3: f32, y3: f32| {
        Operation::new(
            "c",
            vec![x1.into(), y1.into(), x2.into(), y2.into(), x3.into(), y3.into()],
        )
    };

    vec![
        Operation::new("m", vec![(cx + rx).into(), cy.into()]),
        curve(cx + rx, cy + oy, cx + ox, cy + ry, cx, cy + ry),
        curve(cx - ox, cy + ry, cx - rx, cy + oy, cx - rx, cy),
        curve(cx - rx, cy - oy, cx - ox, cy - ry, cx, cy - ry),
        curve(cx + ox, cy - ry, cx + rx, cy - oy, cx + rx, cy),
        Operation::new("h", vec![]),
    ]
}

pub(crate) fn line_path(from: Point, to: Point) -> Vec<Operation> {
    vec![
        Operation::new("m", vec![from.x.into(), from.y.into()]),
        Operation::new("l", vec![to.x.into(), to.y.into()]),
    ]
}

pub(crate) fn text_run(font_name: &str, size: f32, origin: Point, text: &str) -> Vec<Operation> {
    vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec![Object::Name(font_name.as_bytes().to_vec()), size.into()]),
        Operation::new("Td", vec![origin.x.into(), origin.y.into()]),
        Operation::new(
            "Tj",
            vec![Object::String(to_win_ansi(text), StringFormat::Literal)],
        ),
        Operation::new("ET", vec![]),
    ]
}

/// Paints an image XObject into `rect` by scaling the unit square.
pub(crate) fn image_placement(name: &str, rect: &Rect) -> Vec<Operation> {
    vec![
        Operation::new(
            "cm",
            vec![
                rect.width.into(),
                0.into(),
                0.into(),
                rect.height.into(),
                rect.x.into(),
                rect.y.into(),
            ],
        ),
        Operation::new("Do", vec![Object::Name(name.as_bytes().to_vec())]),
    ]
}

/// Encodes text for a standard font with `WinAnsiEncoding`.
///
/// Latin-1 maps straight through; the typographic punctuation WinAnsi keeps
/// in 0x80..0x9F is remapped; anything else becomes `?`.
pub fn to_win_ansi(s: &str) -> Vec<u8> {
    s.chars()
        .map(|c| match c {
            '€' => 0x80,
            '‚' => 0x82,
            '„' => 0x84,
            '…' => 0x85,
            '†' => 0x86,
            '‡' => 0x87,
            '‰' => 0x89,
            '‹' => 0x8B,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '™' => 0x99,
            '›' => 0x9B,
            c if (c as u32) < 0x80 || (0xA0..=0xFF).contains(&(c as u32)) => c as u8,
            _ => b'?',
        })
        .collect()
}
