//! Per-input preprocessing: opaque-bounds trimming and content-addressed
//! deduplication against already-ingested images.

use crate::model::Rect;
use crate::pixelops::{self, hash_pixels};
use image::RgbaImage;
use serde::{Deserialize, Serialize};

/// Policy for an input that is fully transparent when trimming is enabled.
/// `Keep` matches the original `cram` C implementation: its trim scan never
/// finds a non-clear row/column, so `top`/`left` stay at their initialized
/// `0` and `bottom`/`right` stay at their initialized `height`/`width`,
/// which makes `trimmedRect` equal to the untrimmed `originalRect` — trim
/// silently no-ops rather than producing a zero-area rect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TransparentPolicy {
    /// Treat the image as untrimmed (matches the original's incidental behavior).
    #[default]
    Keep,
    /// Reduce the image to a single opaque-sized placeholder rect at its origin.
    OneByOne,
    /// Drop the image from the atlas entirely.
    Skip,
}

/// One ingested input image.
///
/// A duplicate (`canonical.is_some()`) carries no pixel buffer of its own;
/// it only ever references an already-ingested canonical, which the
/// insertion-order scan in [`Image::ingest`] guarantees outlives it.
pub struct Image {
    pub name: String,
    pub original_rect: Rect,
    pub trimmed_rect: Rect,
    pub pixels: Option<RgbaImage>,
    pub hash: u64,
    pub canonical: Option<usize>,
    pub packed_rect: Rect,
    /// Set by [`TransparentPolicy::Skip`]; the image still occupies a slot
    /// in the context's image list (for insertion-order metadata) but is
    /// never packed or composited.
    pub skipped: bool,
}

impl Image {
    /// Ingests one decoded RGBA8 input, computing its trimmed bounds and
    /// checking it for duplication against `canonicals` — the subsequence
    /// of `existing` images with `canonical.is_none()`, which must be in
    /// insertion order (earlier entries win ties, per the dedup rule that
    /// the first-inserted of an equivalent group becomes canonical).
    pub fn ingest(
        name: String,
        source: &RgbaImage,
        trim: bool,
        transparent_policy: TransparentPolicy,
        existing: &[Image],
    ) -> Self {
        let (w, h) = source.dimensions();
        let original_rect = Rect::new(0, 0, w, h);

        let trimmed_rect = if trim {
            match compute_trim_bounds(source) {
                Some(r) => r,
                None => match transparent_policy {
                    TransparentPolicy::Keep => original_rect,
                    TransparentPolicy::OneByOne => Rect::new(0, 0, 1, 1),
                    TransparentPolicy::Skip => Rect::new(0, 0, 0, 0),
                },
            }
        } else {
            original_rect
        };

        let skipped = trimmed_rect.w == 0 || trimmed_rect.h == 0;
        if skipped {
            return Self {
                name,
                original_rect,
                trimmed_rect,
                pixels: None,
                hash: 0,
                canonical: None,
                packed_rect: Rect::new(0, 0, 0, 0),
                skipped: true,
            };
        }

        let mut buffer = RgbaImage::new(trimmed_rect.w, trimmed_rect.h);
        // Safe to unwrap: dst/src rects share identical w,h by construction.
        pixelops::blit(
            &mut buffer,
            &Rect::new(0, 0, trimmed_rect.w, trimmed_rect.h),
            source,
            &trimmed_rect,
        )
        .expect("trim blit dimensions always match");

        let hash = hash_pixels(&buffer);

        let canonical = existing.iter().position(|candidate| {
            !candidate.skipped
                && candidate.canonical.is_none()
                && candidate.hash == hash
                && candidate.trimmed_rect.w == trimmed_rect.w
                && candidate.trimmed_rect.h == trimmed_rect.h
                && candidate.pixels.as_ref().map(|p| p.as_raw()) == Some(buffer.as_raw())
        });

        let pixels = if canonical.is_some() { None } else { Some(buffer) };

        Self {
            name,
            original_rect,
            trimmed_rect,
            pixels,
            hash,
            canonical,
            packed_rect: Rect::new(0, 0, 0, 0),
            skipped: false,
        }
    }

    pub fn is_canonical(&self) -> bool {
        !self.skipped && self.canonical.is_none()
    }
}

/// Tight bounding box of nonzero-alpha pixels, in `source`'s own coordinate
/// space. Returns `None` if every pixel is fully transparent.
pub fn compute_trim_bounds(source: &RgbaImage) -> Option<Rect> {
    let (w, h) = source.dimensions();

    let top = (0..h).find(|&y| !pixelops::row_is_clear(source, y))?;
    let bottom = 1 + (0..h).rev().find(|&y| !pixelops::row_is_clear(source, y))?;
    let left = (0..w).find(|&x| !pixelops::column_is_clear(source, x))?;
    let right = 1 + (0..w).rev().find(|&x| !pixelops::column_is_clear(source, x))?;

    Some(Rect::new(left, top, right - left, bottom - top))
}
