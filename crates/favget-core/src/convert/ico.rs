//! Legacy multi-resolution icon container (ICO) decoding.
//!
//! Picks the widest entry. Among entries of equal width the first one in
//! directory order wins. Any failure means "not decodable as a container";
//! the caller then treats the bytes as an ordinary raster.

use image::RgbaImage;
use std::io::Cursor;

/// ICO header: reserved 0, type 1 (icon).
const ICO_MAGIC: [u8; 4] = [0, 0, 1, 0];

/// True if the declared content-type names an ICO container, or the bytes
/// start with the ICO header (servers often send ICO as octet-stream).
pub fn is_icon_container(content_type: Option<&str>, bytes: &[u8]) -> bool {
    let declared = content_type
        .map(|ct| {
            let ct = ct.to_ascii_lowercase();
            ct.contains("x-icon") || ct.contains("vnd.microsoft.icon")
        })
        .unwrap_or(false);
    declared || bytes.starts_with(&ICO_MAGIC)
}

/// Index of the first maximum in `widths`.
pub(crate) fn widest_index(widths: impl IntoIterator<Item = u32>) -> Option<usize> {
    let mut best: Option<(usize, u32)> = None;
    for (i, w) in widths.into_iter().enumerate() {
        match best {
            Some((_, bw)) if w <= bw => {}
            _ => best = Some((i, w)),
        }
    }
    best.map(|(i, _)| i)
}

/// Decodes the widest entry of an ICO container to RGBA.
/// Returns `None` when the bytes are not a usable container.
pub fn decode_largest(bytes: &[u8]) -> Option<RgbaImage> {
    let dir = match ico::IconDir::read(Cursor::new(bytes)) {
        Ok(dir) => dir,
        Err(e) => {
            tracing::debug!("not an icon container: {}", e);
            return None;
        }
    };
    let entries = dir.entries();
    let index = widest_index(entries.iter().map(|e| e.width()))?;
    let entry = &entries[index];

    let icon = match entry.decode() {
        Ok(icon) => icon,
        Err(e) => {
            tracing::debug!(width = entry.width(), "icon entry decode failed: {}", e);
            return None;
        }
    };
    tracing::debug!(
        entries = entries.len(),
        width = icon.width(),
        height = icon.height(),
        "decoded icon container"
    );
    RgbaImage::from_raw(icon.width(), icon.height(), icon.rgba_data().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::fixtures::build_ico;

    #[test]
    fn detects_container_by_type_or_magic() {
        assert!(is_icon_container(Some("image/x-icon"), b""));
        assert!(is_icon_container(Some("image/vnd.microsoft.icon"), b""));
        assert!(is_icon_container(Some("application/octet-stream"), &[0, 0, 1, 0, 3, 0]));
        assert!(!is_icon_container(Some("image/png"), b"\x89PNG"));
        assert!(!is_icon_container(None, b""));
    }

    #[test]
    fn selects_widest_entry() {
        let bytes = build_ico(&[16, 32, 48]);
        let img = decode_largest(&bytes).unwrap();
        assert_eq!(img.dimensions(), (48, 48));
    }

    #[test]
    fn widest_entry_found_regardless_of_order() {
        let bytes = build_ico(&[48, 16, 32]);
        assert_eq!(decode_largest(&bytes).unwrap().width(), 48);
    }

    #[test]
    fn equal_width_tie_goes_to_first() {
        assert_eq!(widest_index([16, 32, 32]), Some(1));
        assert_eq!(widest_index([64, 64]), Some(0));
        assert_eq!(widest_index(std::iter::empty()), None);

        // Second entry (shade 40) and third (shade 80) are both 32 wide.
        let bytes = build_ico(&[16, 32, 32]);
        let img = decode_largest(&bytes).unwrap();
        assert_eq!(img.get_pixel(0, 0).0, [40, 0, 0, 255]);
    }

    #[test]
    fn garbage_and_empty_are_not_decodable() {
        assert!(decode_largest(b"definitely not an icon").is_none());
        assert!(decode_largest(&[0, 0, 1, 0, 0, 0]).is_none());
        assert!(decode_largest(&[]).is_none());
    }
}
