//! Raster payload embedding.
//!
//! Payloads fall into two buckets. PNGs are decoded and re-encoded as
//! Flate-compressed RGB plus an optional alpha soft mask. Everything else
//! must be a JPEG, which is passed through untouched as a DCT stream.
//!
//! Embedding is content-addressed: the same payload bytes are embedded once
//! per save no matter how many annotations or references point at them.

use crate::config::EmbedConfig;
use crate::error::EmbedError;
use burnin_render_core::{
    EncodedImage, ImageColorSpace, ImageEncoding, ImageHandle, OutputDocument,
};
use burnin_traits::{ResourceProvider, SharedResourceData};
use burnin_types::ResourceUri;
use flate2::Compression;
use flate2::write::ZlibEncoder;
use image::{ExtendedColorType, ImageDecoder};
use std::collections::HashMap;
use std::io::{Cursor, Write};
use std::sync::Arc;

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1A, b'\n'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Compressed,
}

impl ImageFormat {
    /// Buckets a payload by its signature, its `data:` media type, or the
    /// caller's hint, in that order of trust.
    pub fn detect(bytes: &[u8], reference: &str, hint: Option<&str>) -> Self {
        let is_png = bytes.starts_with(&PNG_SIGNATURE)
            || reference.starts_with("data:image/png")
            || hint.is_some_and(|h| {
                let h = h.trim().to_ascii_lowercase();
                h == "png" || h == "image/png"
            });
        if is_png {
            ImageFormat::Png
        } else {
            ImageFormat::Compressed
        }
    }
}

fn deflate(data: &[u8]) -> Result<Vec<u8>, EmbedError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .and_then(|_| encoder.finish())
        .map_err(|e| EmbedError::Decode(format!("compression failed: {}", e)))
}

/// Decodes a PNG into RGB samples plus an alpha mask when any pixel is not opaque.
pub fn encode_png(bytes: &[u8]) -> Result<EncodedImage, EmbedError> {
    let decoded = image::load_from_memory_with_format(bytes, image::ImageFormat::Png)
        .map_err(|e| EmbedError::Decode(e.to_string()))?;
    let (width, height) = (decoded.width(), decoded.height());

    let soft_mask = if decoded.color().has_alpha() {
        let alpha: Vec<u8> = decoded.to_rgba8().pixels().map(|p| p[3]).collect();
        if alpha.iter().all(|&a| a == u8::MAX) {
            None
        } else {
            Some(deflate(&alpha)?)
        }
    } else {
        None
    };

    let rgb = decoded.to_rgb8();
    Ok(EncodedImage {
        width,
        height,
        color_space: ImageColorSpace::DeviceRgb,
        bits_per_component: 8,
        encoding: ImageEncoding::Flate,
        data: deflate(rgb.as_raw())?,
        soft_mask,
    })
}

/// Reads the JPEG header and wraps the untouched bytes as a DCT stream.
pub fn encode_jpeg(bytes: &[u8]) -> Result<EncodedImage, EmbedError> {
    let decoder = image::codecs::jpeg::JpegDecoder::new(Cursor::new(bytes))
        .map_err(|e| EmbedError::UnsupportedFormat(format!("not a JPEG ({})", e)))?;
    let (width, height) = decoder.dimensions();
    let color_space = match decoder.original_color_type() {
        ExtendedColorType::L8 | ExtendedColorType::L16 => ImageColorSpace::DeviceGray,
        ExtendedColorType::Cmyk8 => ImageColorSpace::DeviceCmyk,
        _ => ImageColorSpace::DeviceRgb,
    };

    Ok(EncodedImage {
        width,
        height,
        color_space,
        bits_per_component: 8,
        encoding: ImageEncoding::Dct,
        data: bytes.to_vec(),
        soft_mask: None,
    })
}

/// Fetches, decodes and embeds raster payloads for one save.
#[derive(Debug)]
pub struct ImageEmbedder {
    config: EmbedConfig,
    provider: Arc<dyn ResourceProvider>,
    by_content: HashMap<SharedResourceData, ImageHandle>,
}

impl ImageEmbedder {
    pub fn new(config: EmbedConfig, provider: Arc<dyn ResourceProvider>) -> Self {
        Self {
            config,
            provider,
            by_content: HashMap::new(),
        }
    }

    /// Number of distinct payloads embedded so far.
    pub fn embedded_count(&self) -> usize {
        self.by_content.len()
    }

    pub fn encode(
        &self,
        bytes: &[u8],
        reference: &str,
        hint: Option<&str>,
    ) -> Result<EncodedImage, EmbedError> {
        if bytes.len() > self.config.max_payload_bytes {
            return Err(EmbedError::TooLarge {
                size: bytes.len(),
                limit: self.config.max_payload_bytes,
            });
        }

        match ImageFormat::detect(bytes, reference, hint) {
            ImageFormat::Png => encode_png(bytes),
            ImageFormat::Compressed if self.config.allow_compressed => encode_jpeg(bytes),
            ImageFormat::Compressed => Err(EmbedError::UnsupportedFormat(
                "non-PNG payloads are disabled".to_string(),
            )),
        }
    }

    pub fn embed<D: OutputDocument>(
        &mut self,
        doc: &mut D,
        reference: &ResourceUri,
        hint: Option<&str>,
    ) -> Result<ImageHandle, EmbedError> {
        let bytes = self.provider.load(reference.as_str())?;

        if let Some(handle) = self.by_content.get(&bytes) {
            log::debug!("Reusing embedded image {} for '{}'", handle.resource_name, reference);
            return Ok(handle.clone());
        }

        let encoded = self.encode(&bytes, reference.as_str(), hint)?;
        let handle = doc.embed_image(&encoded)?;
        log::debug!(
            "Embedded {}x{} image '{}' as {}",
            encoded.width,
            encoded.height,
            reference,
            handle.resource_name
        );
        self.by_content.insert(bytes, handle.clone());
        Ok(handle)
    }
}
