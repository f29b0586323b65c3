//! Bin growth, compositing, and metadata synthesis: turns a list of ingested
//! [`Image`]s into a single packed `RgbaImage` plus one [`ImageMetadata`]
//! record per input, in insertion order.

use crate::error::{CramError, Result};
use crate::image::Image;
use crate::model::Rect;
use crate::packer::{PackResult, RectPacker};
use crate::pixelops;
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// One row of the public metadata table, named to match the field names the
/// original CLI emits (`Name`, `X`, `Y`, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageMetadata {
    pub name: String,
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
    pub trim_offset_x: u32,
    pub trim_offset_y: u32,
    pub untrimmed_width: u32,
    pub untrimmed_height: u32,
}

pub struct PackedAtlas {
    pub pixels: RgbaImage,
    pub metadata: Vec<ImageMetadata>,
}

/// Packs `images` (already trimmed/deduped) into a single page.
///
/// Starts the bin at 32x32 and alternately doubles width then height until
/// every canonical image fits or the next growth step would exceed
/// `max_dimension`, at which point packing fails with
/// [`CramError::NotEnoughRoom`]. Duplicates are never handed to the packer;
/// they inherit their canonical's placement and carry their own trim rect
/// into the metadata row.
#[instrument(skip_all, fields(image_count = images.len(), padding, max_dimension))]
pub fn build(images: &mut [Image], padding: u32, max_dimension: u32) -> Result<PackedAtlas> {
    if images.is_empty() {
        return Err(CramError::Empty);
    }

    let canonical_indices: Vec<usize> = images
        .iter()
        .enumerate()
        .filter(|(_, img)| img.is_canonical())
        .map(|(i, _)| i)
        .collect();

    if canonical_indices.is_empty() {
        // every input was skipped by the transparent policy; there is
        // nothing to composite, same as if no images had been added.
        return Err(CramError::Empty);
    }

    let sizes: Vec<(u32, u32)> = canonical_indices
        .iter()
        .map(|&i| {
            let r = images[i].trimmed_rect;
            (r.w + padding, r.h + padding)
        })
        .collect();

    let (bin_w, bin_h, placements) = grow_and_pack(&sizes, max_dimension)?;

    for (slot, &idx) in canonical_indices.iter().enumerate() {
        images[idx].packed_rect = placements[slot];
    }

    // propagate each duplicate's placement from its canonical, now that every
    // canonical has a final packed_rect.
    for i in 0..images.len() {
        if let Some(canon) = images[i].canonical {
            images[i].packed_rect = images[canon].packed_rect;
        }
    }

    let mut pixels = RgbaImage::new(bin_w, bin_h);
    for &idx in &canonical_indices {
        let img = &images[idx];
        let src = img.pixels.as_ref().expect("canonical images always own pixels");
        let dst_rect = Rect::new(img.packed_rect.x, img.packed_rect.y, img.trimmed_rect.w, img.trimmed_rect.h);
        let src_rect = Rect::new(0, 0, img.trimmed_rect.w, img.trimmed_rect.h);
        pixelops::blit(&mut pixels, &dst_rect, src, &src_rect)?;
    }

    Ok(PackedAtlas {
        pixels,
        metadata: synthesize_metadata(images),
    })
}

fn grow_and_pack(sizes: &[(u32, u32)], max_dimension: u32) -> Result<(u32, u32, Vec<Rect>)> {
    let mut w: u32 = 32;
    let mut h: u32 = 32;
    let mut grow_width = true;

    loop {
        debug!(attempt_w = w, attempt_h = h, "attempting bin size");
        match RectPacker::new(w, h).pack(sizes) {
            PackResult::Fit(placements) => return Ok((w, h, placements)),
            PackResult::DoesNotFit => {
                let (next_w, next_h) = if grow_width { (w * 2, h) } else { (w, h * 2) };
                if next_w > max_dimension || next_h > max_dimension {
                    return Err(CramError::NotEnoughRoom {
                        attempted_width: w,
                        attempted_height: h,
                        max_dimension,
                    });
                }
                w = next_w;
                h = next_h;
                grow_width = !grow_width;
            }
        }
    }
}

/// One row per input image, in insertion order. A duplicate reports its own
/// trim rect (not its canonical's) per the corrected trim-offset semantics:
/// `trim_offset` is the distance from the duplicate's own untrimmed origin
/// to its own trimmed content, even though the pixels it shares are the
/// canonical's.
fn synthesize_metadata(images: &[Image]) -> Vec<ImageMetadata> {
    images
        .iter()
        .map(|img| ImageMetadata {
            name: img.name.clone(),
            x: img.packed_rect.x,
            y: img.packed_rect.y,
            w: img.trimmed_rect.w,
            h: img.trimmed_rect.h,
            trim_offset_x: img.trimmed_rect.x,
            trim_offset_y: img.trimmed_rect.y,
            untrimmed_width: img.original_rect.w,
            untrimmed_height: img.original_rect.h,
        })
        .collect()
}
