//! Low-level RGBA8 buffer operations shared by ingest and the atlas builder:
//! opacity scans, rectangular blit, and content hashing.

use crate::error::{CramError, Result};
use crate::model::Rect;
use image::RgbaImage;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// True iff every pixel in row `y` has a zero alpha channel.
pub fn row_is_clear(pixels: &RgbaImage, y: u32) -> bool {
    let w = pixels.width();
    (0..w).all(|x| pixels.get_pixel(x, y)[3] == 0)
}

/// True iff every pixel in column `x` has a zero alpha channel.
pub fn column_is_clear(pixels: &RgbaImage, x: u32) -> bool {
    let h = pixels.height();
    (0..h).all(|y| pixels.get_pixel(x, y)[3] == 0)
}

/// Copies a `w x h` region from `src` at `src_rect.{x,y}` into `dst` at
/// `dst_rect.{x,y}`. `src_rect` and `dst_rect` must have identical `w, h`;
/// pixels are copied as opaque 32-bit units, no alpha blending.
pub fn blit(dst: &mut RgbaImage, dst_rect: &Rect, src: &RgbaImage, src_rect: &Rect) -> Result<()> {
    if dst_rect.w != src_rect.w || dst_rect.h != src_rect.h {
        return Err(CramError::InvalidBlit {
            src_w: src_rect.w,
            src_h: src_rect.h,
            dst_w: dst_rect.w,
            dst_h: dst_rect.h,
        });
    }
    for row in 0..src_rect.h {
        for col in 0..src_rect.w {
            let px = *src.get_pixel(src_rect.x + col, src_rect.y + row);
            dst.put_pixel(dst_rect.x + col, dst_rect.y + row, px);
        }
    }
    Ok(())
}

/// Stable 64-bit content hash, used only as a dedup prefilter before an
/// exact byte compare. Deterministic for the lifetime of the process
/// (`DefaultHasher` is SipHash seeded with fixed keys, not `RandomState`).
pub fn hash_pixels(pixels: &RgbaImage) -> u64 {
    let mut hasher = DefaultHasher::new();
    pixels.as_raw().hash(&mut hasher);
    hasher.finish()
}
