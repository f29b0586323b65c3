//! Packs a folder of images into a single RGBA texture atlas page.
//!
//! - [`AtlasContext`] is the entry point: add images, call `pack`, then read
//!   back the composited pixels and per-image metadata.
//! - Inputs are trimmed to their opaque bounds and deduplicated by content
//!   before packing; duplicates share one copy of the pixel data.
//! - Packing uses a best-area-fit maximal-rectangles placement with no
//!   rotation and a single output page; the bin grows by doubling width
//!   then height starting from 32x32 up to `AtlasOptions::max_dimension`.
//!
//! ```ignore
//! use cram_core::{AtlasContext, AtlasOptions};
//! # fn main() -> cram_core::Result<()> {
//! let mut ctx = AtlasContext::new(AtlasOptions { name: "demo".into(), ..Default::default() })?;
//! ctx.add_image("a.png", &image::open("a.png")?.to_rgba8());
//! ctx.add_image("b.png", &image::open("b.png")?.to_rgba8());
//! ctx.pack()?;
//! let pixels = ctx.get_pixels().unwrap();
//! let metadata = ctx.get_metadata().unwrap();
//! # Ok(()) }
//! ```

pub mod atlas;
pub mod context;
pub mod error;
pub mod image;
pub mod model;
pub mod packer;
pub mod pixelops;

pub use atlas::ImageMetadata;
pub use context::{AtlasContext, AtlasOptions};
pub use error::{CramError, Result};
pub use image::TransparentPolicy;
pub use model::Rect;

/// Convenience prelude for common types.
pub mod prelude {
    pub use crate::atlas::ImageMetadata;
    pub use crate::context::{AtlasContext, AtlasOptions};
    pub use crate::error::{CramError, Result};
    pub use crate::image::TransparentPolicy;
    pub use crate::model::Rect;
}
