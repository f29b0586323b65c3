use cram_core::packer::{PackResult, RectPacker};

fn fit(sizes: &[(u32, u32)], w: u32, h: u32) -> Vec<(u32, u32, u32, u32)> {
    match RectPacker::new(w, h).pack(sizes) {
        PackResult::Fit(rects) => rects.into_iter().map(|r| (r.x, r.y, r.w, r.h)).collect(),
        PackResult::DoesNotFit => panic!("expected a fit"),
    }
}

#[test]
fn single_rect_fills_from_origin() {
    let placed = fit(&[(10, 10)], 32, 32);
    assert_eq!(placed[0], (0, 0, 10, 10));
}

#[test]
fn exact_fit_bin_succeeds() {
    let placed = fit(&[(32, 32)], 32, 32);
    assert_eq!(placed[0], (0, 0, 32, 32));
}

#[test]
fn oversized_rect_does_not_fit() {
    match RectPacker::new(16, 16).pack(&[(17, 16)]) {
        PackResult::DoesNotFit => {}
        PackResult::Fit(_) => panic!("expected no fit"),
    }
}

#[test]
fn four_quadrants_pack_without_overlap() {
    let placed = fit(&[(16, 16), (16, 16), (16, 16), (16, 16)], 32, 32);
    for i in 0..placed.len() {
        for j in (i + 1)..placed.len() {
            let (ax, ay, aw, ah) = placed[i];
            let (bx, by, bw, bh) = placed[j];
            let overlap = !(ax >= bx + bw || bx >= ax + aw || ay >= by + bh || by >= ay + ah);
            assert!(!overlap, "{:?} overlaps {:?}", placed[i], placed[j]);
        }
    }
}

/// Ties in best-area-fit score break by insertion order: among several
/// same-size items competing for the same free rect, the first listed wins
/// the bin's origin.
#[test]
fn ties_break_by_insertion_order() {
    let placed = fit(&[(8, 8), (8, 8)], 32, 32);
    assert_eq!(placed[0], (0, 0, 8, 8));
    assert!(placed[1] != placed[0]);
}
