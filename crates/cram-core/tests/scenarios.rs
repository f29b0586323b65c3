use cram_core::{AtlasContext, AtlasOptions, CramError, TransparentPolicy};
use image::{Rgba, RgbaImage};

fn solid(w: u32, h: u32, color: Rgba<u8>) -> RgbaImage {
    RgbaImage::from_pixel(w, h, color)
}

fn opaque_square_on_transparent(full: u32, border: u32, color: Rgba<u8>) -> RgbaImage {
    let mut img = RgbaImage::from_pixel(full, full, Rgba([0, 0, 0, 0]));
    let inner = full - 2 * border;
    for y in 0..inner {
        for x in 0..inner {
            img.put_pixel(border + x, border + y, color);
        }
    }
    img
}

/// A `size x size` opaque square at `(x, y)` on an otherwise transparent
/// `canvas x canvas` buffer — lets the square's trimmed interior stay
/// byte-identical across canvases of different overall size and offset.
fn opaque_square_at(canvas: u32, x: u32, y: u32, size: u32, color: Rgba<u8>) -> RgbaImage {
    let mut img = RgbaImage::from_pixel(canvas, canvas, Rgba([0, 0, 0, 0]));
    for row in 0..size {
        for col in 0..size {
            img.put_pixel(x + col, y + row, color);
        }
    }
    img
}

/// S1: single 8x8 opaque image, trim off, padding 0.
#[test]
fn s1_single_untrimmed_image_lands_in_32x32_bin() {
    let mut ctx = AtlasContext::new(AtlasOptions {
        name: "s1".into(),
        trim: false,
        padding: 0,
        ..Default::default()
    })
    .unwrap();
    ctx.add_image("a", &solid(8, 8, Rgba([255, 0, 0, 255])));
    ctx.pack().unwrap();

    let pixels = ctx.get_pixels().unwrap();
    assert_eq!(pixels.dimensions(), (32, 32));

    let rows = ctx.get_metadata().unwrap();
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!((row.x, row.y, row.w, row.h), (0, 0, 8, 8));
    assert_eq!((row.trim_offset_x, row.trim_offset_y), (0, 0));
}

/// S2: 4x4 opaque square with a 2px transparent border in an 8x8 input, trim on.
#[test]
fn s2_trim_reports_offset_and_trimmed_size() {
    let mut ctx = AtlasContext::new(AtlasOptions {
        name: "s2".into(),
        trim: true,
        ..Default::default()
    })
    .unwrap();
    ctx.add_image("a", &opaque_square_on_transparent(8, 2, Rgba([0, 255, 0, 255])));
    ctx.pack().unwrap();

    let rows = ctx.get_metadata().unwrap();
    let row = &rows[0];
    assert_eq!((row.w, row.h), (4, 4));
    assert_eq!((row.trim_offset_x, row.trim_offset_y), (2, 2));
    assert_eq!((row.untrimmed_width, row.untrimmed_height), (8, 8));
}

/// S3: two bitwise-identical 16x16 opaque images dedup to one copy.
#[test]
fn s3_identical_images_dedup_to_one_copy() {
    let mut ctx = AtlasContext::new(AtlasOptions {
        name: "s3".into(),
        trim: false,
        ..Default::default()
    })
    .unwrap();
    let color = Rgba([10, 20, 30, 255]);
    ctx.add_image("a", &solid(16, 16, color));
    ctx.add_image("b", &solid(16, 16, color));
    ctx.pack().unwrap();

    let rows = ctx.get_metadata().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!((rows[0].x, rows[0].y), (rows[1].x, rows[1].y));
    assert_eq!((rows[0].w, rows[0].h), (rows[1].w, rows[1].h));

    let pixels = ctx.get_pixels().unwrap();
    let colored_pixel_count = pixels.pixels().filter(|p| **p == color).count();
    assert_eq!(colored_pixel_count, 16 * 16);
}

/// Duplicate trim-offset correction (spec.md §9, open question 2): a
/// duplicate's trimmed interior can be byte-identical to its canonical's
/// while the two sit at different offsets within differently sized originals.
/// The duplicate's metadata row must report its *own* trim_offset_x/y and
/// untrimmed dimensions, not the canonical's — only x/y/w/h are shared.
#[test]
fn duplicate_with_different_surrounding_padding_reports_its_own_trim_offsets() {
    let mut ctx = AtlasContext::new(AtlasOptions {
        name: "dup-offsets".into(),
        trim: true,
        ..Default::default()
    })
    .unwrap();
    let color = Rgba([200, 100, 50, 255]);
    // canonical: 4x4 square at (3,3) on a 10x10 canvas -> trim offset (3,3), untrimmed 10x10.
    ctx.add_image("canonical", &opaque_square_at(10, 3, 3, 4, color));
    // duplicate: same 4x4 interior, but at (4,4) on a 12x12 canvas -> trim offset (4,4), untrimmed 12x12.
    ctx.add_image("duplicate", &opaque_square_at(12, 4, 4, 4, color));
    ctx.pack().unwrap();

    let rows = ctx.get_metadata().unwrap();
    assert_eq!(rows.len(), 2);
    let canonical = &rows[0];
    let duplicate = &rows[1];

    // shared packed placement and trimmed size, since the interiors dedup.
    assert_eq!((canonical.x, canonical.y), (duplicate.x, duplicate.y));
    assert_eq!((canonical.w, canonical.h), (4, 4));
    assert_eq!((duplicate.w, duplicate.h), (4, 4));

    // but each reports its *own* trim offset and untrimmed size.
    assert_eq!((canonical.trim_offset_x, canonical.trim_offset_y), (3, 3));
    assert_eq!((canonical.untrimmed_width, canonical.untrimmed_height), (10, 10));
    assert_eq!((duplicate.trim_offset_x, duplicate.trim_offset_y), (4, 4));
    assert_eq!((duplicate.untrimmed_width, duplicate.untrimmed_height), (12, 12));
    assert_ne!(
        (canonical.trim_offset_x, canonical.trim_offset_y),
        (duplicate.trim_offset_x, duplicate.trim_offset_y)
    );
    assert_ne!(
        (canonical.untrimmed_width, canonical.untrimmed_height),
        (duplicate.untrimmed_width, duplicate.untrimmed_height)
    );
}

/// S4: 17 opaque 32x32 images cannot fit under a 64 max dimension.
#[test]
fn s4_too_many_images_exceeds_max_dimension() {
    let mut ctx = AtlasContext::new(AtlasOptions {
        name: "s4".into(),
        trim: false,
        max_dimension: 64,
        ..Default::default()
    })
    .unwrap();
    for i in 0..17 {
        ctx.add_image(format!("img{i}"), &solid(32, 32, Rgba([i as u8, 0, 0, 255])));
    }

    match ctx.pack() {
        Err(CramError::NotEnoughRoom { max_dimension, .. }) => assert_eq!(max_dimension, 64),
        other => panic!("expected NotEnoughRoom, got {other:?}"),
    }
}

/// S5: 4 opaque 30x30 images with padding 2 fit in a 64x64 bin, separated by
/// at least the padding amount on every axis.
#[test]
fn s5_padding_separates_placed_rects() {
    let mut ctx = AtlasContext::new(AtlasOptions {
        name: "s5".into(),
        trim: false,
        padding: 2,
        max_dimension: 64,
        ..Default::default()
    })
    .unwrap();
    for i in 0..4 {
        ctx.add_image(format!("img{i}"), &solid(30, 30, Rgba([i as u8 * 60, 0, 0, 255])));
    }
    ctx.pack().unwrap();

    assert_eq!(ctx.get_pixels().unwrap().dimensions(), (64, 64));

    let rows = ctx.get_metadata().unwrap();
    assert_eq!(rows.len(), 4);
    for row in rows {
        assert_eq!((row.w, row.h), (30, 30));
    }
    for i in 0..rows.len() {
        for j in (i + 1)..rows.len() {
            let a = &rows[i];
            let b = &rows[j];
            let separated = a.x + a.w + 2 <= b.x
                || b.x + b.w + 2 <= a.x
                || a.y + a.h + 2 <= b.y
                || b.y + b.h + 2 <= a.y;
            assert!(separated, "rects {a:?} vs {b:?} not separated by padding");
        }
    }
}

/// S6: a fully transparent image with trim on follows the chosen
/// fully-transparent policy (Keep: trims to nothing, i.e. stays untrimmed).
#[test]
fn s6_fully_transparent_image_with_trim_keeps_untrimmed_bounds() {
    let mut ctx = AtlasContext::new(AtlasOptions {
        name: "s6".into(),
        trim: true,
        transparent_policy: TransparentPolicy::Keep,
        ..Default::default()
    })
    .unwrap();
    ctx.add_image("a", &solid(8, 8, Rgba([0, 0, 0, 0])));
    ctx.pack().unwrap();

    let rows = ctx.get_metadata().unwrap();
    assert_eq!((rows[0].w, rows[0].h), (8, 8));
    assert_eq!((rows[0].trim_offset_x, rows[0].trim_offset_y), (0, 0));
}

#[test]
fn s6_skip_policy_drops_the_image_from_packing() {
    let mut ctx = AtlasContext::new(AtlasOptions {
        name: "s6-skip".into(),
        trim: true,
        transparent_policy: TransparentPolicy::Skip,
        ..Default::default()
    })
    .unwrap();
    ctx.add_image("a", &solid(8, 8, Rgba([0, 0, 0, 0])));

    match ctx.pack() {
        Err(CramError::Empty) => {}
        other => panic!("expected Empty since the only input was skipped, got {other:?}"),
    }
}
