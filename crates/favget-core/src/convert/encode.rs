//! Resize, background treatment and re-encoding of a decoded raster.

use image::codecs::jpeg::JpegEncoder;
use image::{imageops, imageops::FilterType, DynamicImage, ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;

use super::{ConversionResult, TargetFormat};
use crate::error::{FavgetError, Result};

/// Padding colour for fit-and-pad: white, fully transparent.
const PAD: Rgba<u8> = Rgba([255, 255, 255, 0]);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeParams {
    pub format: TargetFormat,
    /// Square output edge in pixels; `None` keeps the source dimensions.
    pub size: Option<u32>,
    pub transparent: bool,
    /// Lossy quality for JPEG and WebP.
    pub quality: u8,
}

/// Scales `img` to fit inside `size`×`size` keeping its aspect ratio and
/// centres it on a transparent canvas. Never crops.
pub fn fit_and_pad(img: &RgbaImage, size: u32) -> RgbaImage {
    let (w, h) = img.dimensions();
    let (nw, nh) = if w >= h {
        (size, scaled(h, size, w))
    } else {
        (scaled(w, size, h), size)
    };

    let resized = if (nw, nh) == (w, h) {
        img.clone()
    } else {
        imageops::resize(img, nw, nh, FilterType::Lanczos3)
    };
    if (nw, nh) == (size, size) {
        return resized;
    }

    let mut canvas = RgbaImage::from_pixel(size, size, PAD);
    let x = i64::from((size - nw) / 2);
    let y = i64::from((size - nh) / 2);
    imageops::replace(&mut canvas, &resized, x, y);
    canvas
}

/// `len * target / longest`, rounded, at least 1 and at most `target`.
fn scaled(len: u32, target: u32, longest: u32) -> u32 {
    let v = (u64::from(len) * u64::from(target) + u64::from(longest) / 2) / u64::from(longest);
    (v as u32).clamp(1, target)
}

/// Composites every pixel onto opaque white.
pub fn flatten_onto_white(img: &mut RgbaImage) {
    for px in img.pixels_mut() {
        let a = u32::from(px[3]);
        for c in 0..3 {
            let v = u32::from(px[c]) * a + 255 * (255 - a);
            px[c] = ((v + 127) / 255) as u8;
        }
        px[3] = 255;
    }
}

/// Applies size and background policy and encodes to the target format.
pub fn encode(mut img: RgbaImage, params: &EncodeParams) -> Result<ConversionResult> {
    let (w, h) = img.dimensions();
    if w == 0 || h == 0 {
        return Err(FavgetError::EncodingFailed("empty image".to_string()));
    }

    if let Some(size) = params.size {
        img = fit_and_pad(&img, size);
    }
    // JPEG has no alpha channel, so it always gets a white background.
    if !params.transparent || params.format == TargetFormat::Jpeg {
        flatten_onto_white(&mut img);
    }

    let bytes = match params.format {
        TargetFormat::Png => encode_png(img)?,
        TargetFormat::Jpeg => encode_jpeg(img, params.quality)?,
        TargetFormat::WebP => encode_webp(&img, params.quality)?,
    };

    Ok(ConversionResult {
        bytes,
        content_type: params.format.content_type().to_string(),
        extension: params.format.extension().to_string(),
    })
}

fn encode_png(img: RgbaImage) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .map_err(|e| FavgetError::EncodingFailed(format!("Failed to encode PNG: {}", e)))?;
    Ok(buffer)
}

fn encode_jpeg(img: RgbaImage, quality: u8) -> Result<Vec<u8>> {
    let rgb = DynamicImage::ImageRgba8(img).to_rgb8();
    let mut buffer = Vec::new();
    DynamicImage::ImageRgb8(rgb)
        .write_with_encoder(JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100)))
        .map_err(|e| FavgetError::EncodingFailed(format!("Failed to encode JPEG: {}", e)))?;
    Ok(buffer)
}

fn encode_webp(img: &RgbaImage, quality: u8) -> Result<Vec<u8>> {
    let encoder = webp::Encoder::from_rgba(img.as_raw(), img.width(), img.height());
    let data = encoder
        .encode_simple(false, f32::from(quality.clamp(1, 100)))
        .map_err(|e| FavgetError::EncodingFailed(format!("Failed to encode WebP: {:?}", e)))?;
    if data.is_empty() {
        return Err(FavgetError::EncodingFailed(
            "WebP encoder produced no output".to_string(),
        ));
    }
    Ok(data.to_vec())
}
