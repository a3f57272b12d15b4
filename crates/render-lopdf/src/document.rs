use crate::content;
use burnin_pdf_composer::{
    ComposerError, PageResources, find_inherited, merge_page_resources, overlay_content, resolve,
    used_resource_names,
};
use burnin_render_core::{
    DrawOp, EncodedImage, FontHandle, ImageHandle, OutputDocument, PageInfo, RenderError,
};
use burnin_style::FontVariant;
use burnin_types::{PageSize, Point};
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId, Stream, dictionary};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Geometry of one page as read from the source document.
#[derive(Debug, Clone, Copy)]
struct PageGeometry {
    info: PageInfo,
    /// Lower-left corner of the MediaBox. Overlays are translated by this.
    origin: Point,
}

/// An existing PDF opened for drawing on top of its pages.
pub struct LopdfDocument {
    doc: Document,
    page_ids: Vec<ObjectId>,
    pages: Vec<PageGeometry>,
    fonts: HashMap<FontVariant, (FontHandle, ObjectId)>,
    images: Vec<(ImageHandle, ObjectId)>,
    /// Opacity (as bits) to `(resource name, ExtGState object)`.
    graphics_states: HashMap<u32, (String, ObjectId)>,
    /// Resource names already bound on some page, including those from an
    /// earlier flattening of the same file.
    taken_names: HashSet<String>,
}

fn composer_error(err: ComposerError) -> RenderError {
    RenderError::Pdf(err.to_string())
}

impl LopdfDocument {
    pub fn load(bytes: &[u8]) -> Result<Self, RenderError> {
        let doc = Document::load_mem(bytes)?;
        Self::from_document(doc)
    }

    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self, RenderError> {
        let bytes = std::fs::read(path)?;
        Self::load(&bytes)
    }

    pub fn from_document(doc: Document) -> Result<Self, RenderError> {
        let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();
        let pages = page_ids
            .iter()
            .map(|&id| read_geometry(&doc, id))
            .collect::<Result<Vec<_>, _>>()?;

        let mut taken_names = HashSet::new();
        for &id in &page_ids {
            match used_resource_names(&doc, id) {
                Ok(names) => taken_names.extend(names),
                Err(e) => log::warn!("Could not read resources of page {:?}: {}", id, e),
            }
        }

        log::debug!(
            "Opened PDF with {} page(s), {} resource name(s) in use",
            page_ids.len(),
            taken_names.len()
        );

        Ok(Self {
            doc,
            page_ids,
            pages,
            fonts: HashMap::new(),
            images: Vec::new(),
            graphics_states: HashMap::new(),
            taken_names,
        })
    }

    /// The first `{prefix}{n}` not bound anywhere in the document, reserved.
    fn fresh_name(&mut self, prefix: &str) -> String {
        let mut n = 1;
        loop {
            let name = format!("{}{}", prefix, n);
            if self.taken_names.insert(name.clone()) {
                return name;
            }
            n += 1;
        }
    }

    /// The underlying lopdf document.
    pub fn document(&self) -> &Document {
        &self.doc
    }

    fn page_id(&self, page_index: usize) -> Result<ObjectId, RenderError> {
        self.page_ids
            .get(page_index)
            .copied()
            .ok_or(RenderError::PageOutOfRange {
                index: page_index,
                page_count: self.page_ids.len(),
            })
    }

    /// Returns the `gs` resource name for `opacity`, creating it on first use.
    fn graphics_state(&mut self, opacity: f32) -> (String, ObjectId) {
        let key = opacity.to_bits();
        if let Some(existing) = self.graphics_states.get(&key) {
            return existing.clone();
        }
        let name = self.fresh_name("BurnGS");
        let id = self.doc.add_object(dictionary! {
            "Type" => "ExtGState",
            "CA" => opacity,
            "ca" => opacity,
        });
        self.graphics_states.insert(key, (name.clone(), id));
        (name, id)
    }

    fn font_resource(&self, handle: &FontHandle) -> Result<ObjectId, RenderError> {
        match self.fonts.get(&handle.variant) {
            Some((known, id)) if known.resource_name == handle.resource_name => Ok(*id),
            _ => Err(RenderError::UnknownHandle(handle.resource_name.clone())),
        }
    }

    fn image_resource(&self, handle: &ImageHandle) -> Result<ObjectId, RenderError> {
        match self.images.get(handle.id) {
            Some((known, id)) if known.resource_name == handle.resource_name => Ok(*id),
            _ => Err(RenderError::UnknownHandle(handle.resource_name.clone())),
        }
    }

    /// Encodes `op` into `out`, recording the resources it needs.
    fn encode_op(
        &mut self,
        op: &DrawOp,
        out: &mut Vec<Operation>,
        resources: &mut PageResources,
    ) -> Result<(), RenderError> {
        let mut body = Vec::new();

        match op {
            DrawOp::Text { text, origin, font, size, color, .. } => {
                if text.is_empty() {
                    return Ok(());
                }
                let font_id = self.font_resource(font)?;
                resources.add("Font", font.resource_name.clone(), font_id);
                body.push(content::fill_color(*color));
                body.extend(content::text_run(&font.resource_name, *size, *origin, text));
            }
            DrawOp::Rectangle { rect, paint, .. } => {
                let Some(paint_op) = content::paint_state(paint, &mut body) else {
                    return Ok(());
                };
                body.push(content::rect_path(rect));
                body.push(Operation::new(paint_op, vec![]));
            }
            DrawOp::Ellipse { center, x_radius, y_radius, paint, .. } => {
                let Some(paint_op) = content::paint_state(paint, &mut body) else {
                    return Ok(());
                };
                body.extend(content::ellipse_path(*center, *x_radius, *y_radius));
                body.push(Operation::new(paint_op, vec![]));
            }
            DrawOp::Line { from, to, stroke, .. } => {
                body.extend(content::stroke_state(stroke));
                body.extend(content::line_path(*from, *to));
                body.push(Operation::new("S", vec![]));
            }
            DrawOp::Image { image, rect, .. } => {
                let image_id = self.image_resource(image)?;
                resources.add("XObject", image.resource_name.clone(), image_id);
                body.extend(content::image_placement(&image.resource_name, rect));
            }
        }

        out.push(Operation::new("q", vec![]));
        let opacity = op.opacity().clamp(0.0, 1.0);
        if opacity < 1.0 {
            let (name, id) = self.graphics_state(opacity);
            resources.add("ExtGState", name.clone(), id);
            out.push(Operation::new("gs", vec![Object::Name(name.into_bytes())]));
        }
        out.extend(body);
        out.push(Operation::new("Q", vec![]));
        Ok(())
    }
}

fn read_geometry(doc: &Document, page_id: ObjectId) -> Result<PageGeometry, RenderError> {
    let media_box = find_inherited(doc, page_id, b"MediaBox")
        .map_err(composer_error)?
        .and_then(|obj| parse_box(doc, &obj));

    let (size, origin) = match media_box {
        Some([x1, y1, x2, y2]) if (x2 - x1).abs() > 0.0 && (y2 - y1).abs() > 0.0 => (
            PageSize::new((x2 - x1).abs(), (y2 - y1).abs()),
            Point::new(x1.min(x2), y1.min(y2)),
        ),
        _ => {
            log::warn!("Page {:?} has no usable MediaBox, assuming US Letter", page_id);
            (PageSize::letter(), Point::default())
        }
    };

    let rotation = find_inherited(doc, page_id, b"Rotate")
        .map_err(composer_error)?
        .and_then(|obj| resolve(doc, &obj).ok().and_then(|o| o.as_i64().ok()))
        .map(|deg| deg.rem_euclid(360) as i32)
        .unwrap_or(0);

    Ok(PageGeometry {
        info: PageInfo { size, rotation },
        origin,
    })
}

fn parse_box(doc: &Document, obj: &Object) -> Option<[f32; 4]> {
    let array = resolve(doc, obj).ok()?.as_array().ok()?;
    if array.len() != 4 {
        return None;
    }
    let mut values = [0.0f32; 4];
    for (slot, item) in values.iter_mut().zip(array) {
        *slot = resolve(doc, item).ok()?.as_float().ok()?;
    }
    values.iter().all(|v| v.is_finite()).then_some(values)
}

impl OutputDocument for LopdfDocument {
    fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    fn page_info(&self, page_index: usize) -> Result<PageInfo, RenderError> {
        self.pages
            .get(page_index)
            .map(|g| g.info)
            .ok_or(RenderError::PageOutOfRange {
                index: page_index,
                page_count: self.pages.len(),
            })
    }

    fn embed_font(&mut self, variant: FontVariant) -> Result<FontHandle, RenderError> {
        if let Some((handle, _)) = self.fonts.get(&variant) {
            return Ok(handle.clone());
        }
        let font_id = self.doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => variant.base_font(),
            "Encoding" => "WinAnsiEncoding",
        });
        let handle = FontHandle {
            variant,
            resource_name: self.fresh_name("BurnF"),
        };
        self.fonts.insert(variant, (handle.clone(), font_id));
        Ok(handle)
    }

    fn embed_image(&mut self, image: &EncodedImage) -> Result<ImageHandle, RenderError> {
        if image.width == 0 || image.height == 0 {
            return Err(RenderError::ImageEmbed(format!(
                "image has zero size ({}x{})",
                image.width, image.height
            )));
        }

        let mut dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => image.width as i64,
            "Height" => image.height as i64,
            "ColorSpace" => image.color_space.pdf_name(),
            "BitsPerComponent" => image.bits_per_component as i64,
            "Filter" => image.encoding.filter_name(),
        };

        if let Some(alpha) = &image.soft_mask {
            let mask = Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => image.width as i64,
                    "Height" => image.height as i64,
                    "ColorSpace" => "DeviceGray",
                    "BitsPerComponent" => 8,
                    "Filter" => "FlateDecode",
                },
                alpha.clone(),
            );
            let mask_id = self.doc.add_object(mask);
            dict.set("SMask", mask_id);
        }

        let image_id = self.doc.add_object(Stream::new(dict, image.data.clone()));
        let id = self.images.len();
        let handle = ImageHandle {
            id,
            resource_name: self.fresh_name("BurnIm"),
            width: image.width,
            height: image.height,
        };
        self.images.push((handle.clone(), image_id));
        Ok(handle)
    }

    fn append_ops(&mut self, page_index: usize, ops: &[DrawOp]) -> Result<(), RenderError> {
        let page_id = self.page_id(page_index)?;
        if ops.is_empty() {
            return Ok(());
        }
        let origin = self.pages[page_index].origin;

        let mut operations = Vec::new();
        let mut resources = PageResources::new();

        operations.push(Operation::new("q", vec![]));
        if origin != Point::default() {
            operations.push(Operation::new(
                "cm",
                vec![1.into(), 0.into(), 0.into(), 1.into(), origin.x.into(), origin.y.into()],
            ));
        }
        for op in ops {
            self.encode_op(op, &mut operations, &mut resources)?;
        }
        operations.push(Operation::new("Q", vec![]));

        let bytes = Content { operations }.encode()?;
        overlay_content(&mut self.doc, page_id, bytes).map_err(composer_error)?;
        merge_page_resources(&mut self.doc, page_id, &resources).map_err(composer_error)?;

        log::debug!(
            "Appended {} drawing op(s) to page {} ({} new resource(s))",
            ops.len(),
            page_index + 1,
            resources.len()
        );
        Ok(())
    }

    fn serialize(mut self) -> Result<Vec<u8>, RenderError> {
        let mut buffer = Vec::new();
        self.doc.save_to(&mut buffer)?;
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burnin_render_core::{ImageColorSpace, ImageEncoding, Paint, Stroke};
    use burnin_types::{Rect, Rgb};

    fn build_pdf(media_box: Vec<Object>, rotate: Option<i64>) -> Vec<u8> {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();
        let content_id = doc.add_object(Stream::new(dictionary! {}, b"0 0 1 rg 10 10 20 20 re f".to_vec()));
        let mut page = dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        };
        if let Some(rotate) = rotate {
            page.set("Rotate", rotate);
        }
        let page_id = doc.add_object(page);
        doc.objects.insert(
            pages_id,
            dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
                "MediaBox" => media_box,
            }
            .into(),
        );
        let catalog_id = doc.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    fn letter_pdf() -> Vec<u8> {
        build_pdf(vec![0.into(), 0.into(), 612.into(), 792.into()], None)
    }

    fn page_operators(doc: &LopdfDocument) -> Vec<String> {
        let bytes = doc.document().get_page_content(doc.page_ids[0]).unwrap();
        Content::decode(&bytes)
            .unwrap()
            .operations
            .into_iter()
            .map(|op| op.operator)
            .collect()
    }

    fn page_resources(doc: &LopdfDocument) -> lopdf::Dictionary {
        burnin_pdf_composer::effective_resources(doc.document(), doc.page_ids[0]).unwrap()
    }

    #[test]
    fn test_page_info_reads_inherited_media_box() {
        let doc = LopdfDocument::load(&letter_pdf()).unwrap();
        assert_eq!(doc.page_count(), 1);
        let info = doc.page_info(0).unwrap();
        assert_eq!(info.size, PageSize::new(612.0, 792.0));
        assert_eq!(info.rotation, 0);
        assert!(matches!(doc.page_info(1), Err(RenderError::PageOutOfRange { .. })));
    }

    #[test]
    fn test_page_info_offset_media_box_and_rotation() {
        let bytes = build_pdf(vec![50.into(), 100.into(), 250.into(), 400.into()], Some(-90));
        let doc = LopdfDocument::load(&bytes).unwrap();
        let info = doc.page_info(0).unwrap();
        assert_eq!(info.size, PageSize::new(200.0, 300.0));
        assert_eq!(info.rotation, 270);
        assert_eq!(doc.pages[0].origin, Point::new(50.0, 100.0));
    }

    #[test]
    fn test_missing_media_box_falls_back_to_letter() {
        let bytes = build_pdf(vec![0.into(), 0.into()], None);
        let doc = LopdfDocument::load(&bytes).unwrap();
        assert_eq!(doc.page_info(0).unwrap().size, PageSize::letter());
    }

    #[test]
    fn test_append_rectangle_overlays_original_content() {
        let mut doc = LopdfDocument::load(&letter_pdf()).unwrap();
        let op = DrawOp::Rectangle {
            rect: Rect::new(50.0, 100.0, 100.0, 50.0),
            paint: Paint {
                fill: Some(Rgb::WHITE),
                stroke: Some(Stroke::new(Rgb::BLACK, 2.0)),
            },
            opacity: 1.0,
        };
        doc.append_ops(0, &[op]).unwrap();

        let ops = page_operators(&doc);
        // q <original> Q q q rg RG w J re B Q Q
        assert_eq!(ops.first().map(String::as_str), Some("q"));
        let overlay_start = ops.iter().position(|o| o == "Q").unwrap() + 1;
        assert_eq!(
            &ops[overlay_start..],
            &["q", "q", "rg", "RG", "w", "J", "re", "B", "Q", "Q"]
        );
        assert!(!page_resources(&doc).has(b"ExtGState"));
    }

    #[test]
    fn test_translucent_op_uses_shared_ext_g_state() {
        let mut doc = LopdfDocument::load(&letter_pdf()).unwrap();
        let op = DrawOp::Rectangle {
            rect: Rect::new(0.0, 0.0, 10.0, 10.0),
            paint: Paint::fill(Rgb::new(1.0, 1.0, 0.0)),
            opacity: 0.4,
        };
        doc.append_ops(0, &[op.clone(), op]).unwrap();

        assert_eq!(doc.graphics_states.len(), 1);
        let resources = page_resources(&doc);
        let states = resources.get(b"ExtGState").unwrap().as_dict().unwrap();
        assert!(states.has(b"BurnGS1"));
        assert_eq!(page_operators(&doc).iter().filter(|o| *o == "gs").count(), 2);
    }

    #[test]
    fn test_reopened_output_gets_fresh_resource_names() {
        let translucent = |opacity| DrawOp::Rectangle {
            rect: Rect::new(0.0, 0.0, 10.0, 10.0),
            paint: Paint::fill(Rgb::new(1.0, 1.0, 0.0)),
            opacity,
        };
        let mut first = LopdfDocument::load(&letter_pdf()).unwrap();
        first.append_ops(0, &[translucent(0.4)]).unwrap();
        let bytes = first.serialize().unwrap();

        let mut second = LopdfDocument::load(&bytes).unwrap();
        assert!(second.taken_names.contains("BurnGS1"));
        second.append_ops(0, &[translucent(0.9)]).unwrap();

        let resources = page_resources(&second);
        let states = resources.get(b"ExtGState").unwrap().as_dict().unwrap();
        assert_eq!(states.len(), 2);
        let alpha = |name: &[u8]| {
            let id = states.get(name).unwrap().as_reference().unwrap();
            second.document().get_dictionary(id).unwrap().get(b"ca").unwrap().as_float().unwrap()
        };
        assert_eq!(alpha(b"BurnGS1"), 0.4);
        assert_eq!(alpha(b"BurnGS2"), 0.9);
    }

    #[test]
    fn test_text_op_registers_font_resource() {
        let mut doc = LopdfDocument::load(&letter_pdf()).unwrap();
        let font = doc.embed_font(FontVariant::Bold).unwrap();
        assert_eq!(doc.embed_font(FontVariant::Bold).unwrap(), font);

        doc.append_ops(
            0,
            &[DrawOp::Text {
                text: "APPROVED".to_string(),
                origin: Point::new(72.0, 700.0),
                font: font.clone(),
                size: 18.0,
                color: Rgb::BLACK,
                opacity: 1.0,
            }],
        )
        .unwrap();

        let resources = page_resources(&doc);
        let fonts = resources.get(b"Font").unwrap().as_dict().unwrap();
        let font_id = fonts.get(font.resource_name.as_bytes()).unwrap().as_reference().unwrap();
        let font_dict = doc.document().get_dictionary(font_id).unwrap();
        assert_eq!(font_dict.get(b"BaseFont").unwrap().as_name().unwrap(), b"Helvetica-Bold");

        let content = String::from_utf8_lossy(&doc.document().get_page_content(doc.page_ids[0]).unwrap())
            .to_string();
        assert!(content.contains("(APPROVED) Tj"));
    }

    #[test]
    fn test_unknown_font_handle_is_rejected() {
        let mut doc = LopdfDocument::load(&letter_pdf()).unwrap();
        let stray = FontHandle {
            variant: FontVariant::Italic,
            resource_name: "BurnF9".to_string(),
        };
        let err = doc
            .append_ops(
                0,
                &[DrawOp::Text {
                    text: "x".to_string(),
                    origin: Point::default(),
                    font: stray,
                    size: 12.0,
                    color: Rgb::BLACK,
                    opacity: 1.0,
                }],
            )
            .unwrap_err();
        assert!(matches!(err, RenderError::UnknownHandle(_)));
    }

    #[test]
    fn test_embed_image_with_soft_mask() {
        let mut doc = LopdfDocument::load(&letter_pdf()).unwrap();
        let image = EncodedImage {
            width: 2,
            height: 1,
            color_space: ImageColorSpace::DeviceRgb,
            bits_per_component: 8,
            encoding: ImageEncoding::Flate,
            data: vec![0; 8],
            soft_mask: Some(vec![0; 8]),
        };
        let handle = doc.embed_image(&image).unwrap();
        doc.append_ops(
            0,
            &[DrawOp::Image {
                image: handle.clone(),
                rect: Rect::new(0.0, 0.0, 20.0, 10.0),
                opacity: 1.0,
            }],
        )
        .unwrap();

        let resources = page_resources(&doc);
        let xobjects = resources.get(b"XObject").unwrap().as_dict().unwrap();
        let image_id = xobjects.get(handle.resource_name.as_bytes()).unwrap().as_reference().unwrap();
        let stream = doc.document().get_object(image_id).unwrap().as_stream().unwrap();
        assert!(stream.dict.has(b"SMask"));
        assert_eq!(stream.dict.get(b"Width").unwrap().as_i64().unwrap(), 2);
    }

    #[test]
    fn test_offset_media_box_translates_overlay() {
        let bytes = build_pdf(vec![50.into(), 100.into(), 250.into(), 400.into()], None);
        let mut doc = LopdfDocument::load(&bytes).unwrap();
        let op = DrawOp::Line {
            from: Point::new(0.0, 0.0),
            to: Point::new(10.0, 10.0),
            stroke: Stroke::new(Rgb::BLACK, 1.0),
            opacity: 1.0,
        };
        doc.append_ops(0, &[op]).unwrap();
        let ops = page_operators(&doc);
        assert!(ops.contains(&"cm".to_string()));
    }

    #[test]
    fn test_serialize_round_trips_through_lopdf() {
        let mut doc = LopdfDocument::load(&letter_pdf()).unwrap();
        let font = doc.embed_font(FontVariant::Regular).unwrap();
        doc.append_ops(
            0,
            &[DrawOp::Text {
                text: "Hello".to_string(),
                origin: Point::new(10.0, 10.0),
                font,
                size: 16.0,
                color: Rgb::BLACK,
                opacity: 0.5,
            }],
        )
        .unwrap();

        let bytes = doc.serialize().unwrap();
        let reloaded = Document::load_mem(&bytes).unwrap();
        assert_eq!(reloaded.get_pages().len(), 1);
    }
}
