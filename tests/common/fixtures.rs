#![allow(dead_code)]

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use burnin::AnnotatedDocument;
use image::{DynamicImage, ImageBuffer, Rgb, Rgba};
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, StringFormat, dictionary};
use serde_json::Value;
use std::io::Cursor;

/// Builds a PDF with one page per entry of `sizes`.
///
/// Each page carries a line of text so tests can check the original content
/// survives. Fonts and the first page size live on the page tree node; pages
/// whose size differs get their own MediaBox.
pub fn pdf_with_pages(sizes: &[(f32, f32)]) -> Vec<u8> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });
    let (tree_w, tree_h) = sizes.first().copied().unwrap_or((612.0, 792.0));

    let mut kids = vec![];
    for (i, &(w, h)) in sizes.iter().enumerate() {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![20.into(), 20.into()]),
                Operation::new(
                    "Tj",
                    vec![Object::String(format!("Original {}", i + 1).into_bytes(), StringFormat::Literal)],
                ),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let mut page = dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        };
        if (w, h) != (tree_w, tree_h) {
            page.set("MediaBox", vec![0.into(), 0.into(), Object::Real(w), Object::Real(h)]);
        }
        kids.push(doc.add_object(page).into());
    }

    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => sizes.len() as i64,
        "MediaBox" => vec![0.into(), 0.into(), Object::Real(tree_w), Object::Real(tree_h)],
        "Resources" => resources_id,
    };
    doc.objects.insert(pages_id, pages_dict.into());

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

pub fn letter_pdf(pages: usize) -> Vec<u8> {
    pdf_with_pages(&vec![(612.0, 792.0); pages])
}

pub fn square_pdf(side: f32) -> Vec<u8> {
    pdf_with_pages(&[(side, side)])
}

pub fn png_bytes(width: u32, height: u32, alpha: u8) -> Vec<u8> {
    let img = ImageBuffer::from_pixel(width, height, Rgba([30u8, 120, 220, alpha]));
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(img)
        .write_to(&mut out, image::ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = ImageBuffer::from_pixel(width, height, Rgb([220u8, 40, 40]));
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut out, image::ImageFormat::Jpeg)
        .unwrap();
    out.into_inner()
}

pub fn png_data_uri(alpha: u8) -> String {
    format!("data:image/png;base64,{}", STANDARD.encode(png_bytes(4, 4, alpha)))
}

/// Parses an annotation model from a `json!` value.
pub fn model(value: Value) -> AnnotatedDocument {
    AnnotatedDocument::from_json_str(&value.to_string()).unwrap()
}
