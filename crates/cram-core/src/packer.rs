//! Online best-area-fit rectangle packer with maximal-rectangles splitting.
//!
//! A single [`RectPacker`] instance is scoped to one packing attempt at a
//! fixed bin size; the atlas builder constructs a fresh one for every
//! bin-growth retry (see `atlas.rs`).

use crate::model::Rect;

pub struct RectPacker {
    free: Vec<Rect>,
}

/// `None` iff at least one of the requested rects could not be placed; the
/// packer's internal state after that point is unspecified and discarded.
pub enum PackResult {
    Fit(Vec<Rect>),
    DoesNotFit,
}

impl RectPacker {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            free: vec![Rect::new(0, 0, width, height)],
        }
    }

    /// Assigns x,y to every rect in `sizes` (given as w,h pairs), in the
    /// order supplied. Ties in the best-area-fit score are broken by
    /// iteration order: the first (rect, free-rect) pair encountered wins,
    /// so callers that need deterministic, reproducible placement must pass
    /// `sizes` in a stable order (insertion order, per the façade contract).
    pub fn pack(mut self, sizes: &[(u32, u32)]) -> PackResult {
        let mut placed = vec![false; sizes.len()];
        let mut out = vec![Rect::new(0, 0, 0, 0); sizes.len()];

        for _ in 0..sizes.len() {
            let mut best: Option<(usize, Rect, i64, i64)> = None;

            for (idx, &(w, h)) in sizes.iter().enumerate() {
                if placed[idx] {
                    continue;
                }
                for fr in &self.free {
                    if fr.w < w || fr.h < h {
                        continue;
                    }
                    let primary = fr.area() as i64 - (w as u64 * h as u64) as i64;
                    let secondary = (fr.w - w).min(fr.h - h) as i64;
                    let better = match &best {
                        None => true,
                        Some((_, _, bp, bs)) => primary < *bp || (primary == *bp && secondary < *bs),
                    };
                    if better {
                        best = Some((idx, Rect::new(fr.x, fr.y, w, h), primary, secondary));
                    }
                }
            }

            match best {
                None => return PackResult::DoesNotFit,
                Some((idx, placement, _, _)) => {
                    self.place(&placement);
                    out[idx] = placement;
                    placed[idx] = true;
                }
            }
        }

        PackResult::Fit(out)
    }

    /// Splits every free rect intersecting `node` into up to four offcuts
    /// (the parts of the free rect outside `node`), with local dedup within
    /// the new offcuts and against the surviving free list.
    fn place(&mut self, node: &Rect) {
        let mut fresh: Vec<Rect> = Vec::new();

        let mut i = 0;
        while i < self.free.len() {
            if self.free[i].intersects(node) {
                let fr = self.free.swap_remove(i);
                split(&fr, node, &mut fresh);
            } else {
                i += 1;
            }
        }

        fresh.retain(|nr| !self.free.iter().any(|existing| existing.contains(nr)));
        self.free.extend(fresh);
    }
}

/// Replaces free rect `fr` (known to intersect `node`) with the parts of
/// `fr` lying outside `node`: left/right slabs when `node`'s y-extent
/// overlaps `fr`'s, top/bottom slabs when `node`'s x-extent overlaps `fr`'s.
fn split(fr: &Rect, node: &Rect, out: &mut Vec<Rect>) {
    let fr_x2 = fr.right();
    let fr_y2 = fr.bottom();
    let n_x2 = node.right();
    let n_y2 = node.bottom();

    let y_overlap = node.y < fr_y2 && n_y2 > fr.y;
    let x_overlap = node.x < fr_x2 && n_x2 > fr.x;

    if y_overlap {
        if node.x > fr.x && node.x < fr_x2 {
            add_fresh(out, Rect::new(fr.x, fr.y, node.x - fr.x, fr.h));
        }
        if n_x2 < fr_x2 {
            add_fresh(out, Rect::new(n_x2, fr.y, fr_x2 - n_x2, fr.h));
        }
    }
    if x_overlap {
        if node.y > fr.y && node.y < fr_y2 {
            add_fresh(out, Rect::new(fr.x, fr.y, fr.w, node.y - fr.y));
        }
        if n_y2 < fr_y2 {
            add_fresh(out, Rect::new(fr.x, n_y2, fr.w, fr_y2 - n_y2));
        }
    }
}

fn add_fresh(out: &mut Vec<Rect>, rect: Rect) {
    if rect.w == 0 || rect.h == 0 {
        return;
    }
    if out.iter().any(|existing| existing.contains(&rect)) {
        return;
    }
    out.retain(|existing| !rect.contains(existing));
    out.push(rect);
}
