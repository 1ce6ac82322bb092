//! Test fixtures for the conversion pipeline.
//!
//! Provides small in-memory images and icon containers for unit tests.

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;

/// Fixture sizes for standard icon dimensions
pub mod sizes {
    pub const SMALL: u32 = 16;
    pub const MEDIUM: u32 = 48;
    pub const SOURCE: u32 = 100;
}

/// Opaque gradient, square.
pub fn rgba_opaque(size: u32) -> RgbaImage {
    let mut img = RgbaImage::new(size, size);
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        *pixel = Rgba([(x * 2) as u8, (y * 2) as u8, 128, 255]);
    }
    img
}

/// Solid colour with the given alpha.
pub fn rgba_solid(width: u32, height: u32, color: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba(color))
}

pub fn encode_png_rgba(img: &RgbaImage) -> Vec<u8> {
    let mut buf = Vec::new();
    DynamicImage::ImageRgba8(img.clone())
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .expect("Failed to encode PNG fixture");
    buf
}

/// Opaque 100x100 PNG.
pub fn png_opaque_100() -> Vec<u8> {
    encode_png_rgba(&rgba_opaque(sizes::SOURCE))
}

/// ICO with one solid square entry per size, in the given order. Entry `i`
/// has red channel `i * 40` so tests can tell entries of equal width apart.
pub fn build_ico(sizes: &[u32]) -> Vec<u8> {
    let mut dir = ico::IconDir::new(ico::ResourceType::Icon);
    for (i, &size) in sizes.iter().enumerate() {
        let shade = (i as u8).wrapping_mul(40);
        let rgba: Vec<u8> = (0..size * size).flat_map(|_| [shade, 0, 0, 255]).collect();
        let image = ico::IconImage::from_rgba_data(size, size, rgba);
        dir.add_entry(ico::IconDirEntry::encode(&image).expect("Failed to encode ICO entry"));
    }
    let mut out = Vec::new();
    dir.write(&mut out).expect("Failed to write ICO fixture");
    out
}

/// Standard 16/32/48 favicon container.
pub fn favicon_ico() -> Vec<u8> {
    build_ico(&[sizes::SMALL, 32, sizes::MEDIUM])
}
