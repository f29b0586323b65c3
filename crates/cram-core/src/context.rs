//! Public façade: [`AtlasOptions`] configures a run, [`AtlasContext`] accepts
//! images and produces a packed atlas.

use crate::atlas::{self, ImageMetadata, PackedAtlas};
use crate::error::{CramError, Result};
use crate::image::{Image, TransparentPolicy};
use image::RgbaImage;
use tracing::{info, instrument};

/// Configuration for one packing run. Mirrors the original C API's
/// `CramCreateInfo`.
#[derive(Debug, Clone)]
pub struct AtlasOptions {
    /// Identifies this atlas in logs and in the default output naming; not
    /// otherwise interpreted by the packing engine.
    pub name: String,
    /// Hard ceiling on both atlas dimensions. The bin grows by doubling
    /// width then height starting from 32x32 and never exceeds this value.
    pub max_dimension: u32,
    /// Extra space reserved to the right and below every packed image.
    pub padding: u32,
    /// Trim fully-transparent borders off every input before packing.
    pub trim: bool,
    /// What to do with an image that trims to nothing.
    pub transparent_policy: TransparentPolicy,
}

impl Default for AtlasOptions {
    fn default() -> Self {
        Self {
            name: String::new(),
            max_dimension: 8192,
            padding: 0,
            trim: true,
            transparent_policy: TransparentPolicy::default(),
        }
    }
}

impl AtlasOptions {
    pub fn validate(&self) -> Result<()> {
        if self.max_dimension < 32 {
            return Err(CramError::InvalidOption(format!(
                "max_dimension ({}) must be at least 32, the minimum bin size",
                self.max_dimension
            )));
        }
        if self.padding >= self.max_dimension {
            return Err(CramError::InvalidOption(format!(
                "padding ({}) leaves no usable space at max_dimension ({})",
                self.padding, self.max_dimension
            )));
        }
        Ok(())
    }
}

/// Accumulates images and, once [`AtlasContext::pack`] succeeds, exposes the
/// composited pixel buffer and per-image metadata. There is no explicit
/// `destroy`: dropping the context releases everything it owns.
pub struct AtlasContext {
    options: AtlasOptions,
    images: Vec<Image>,
    result: Option<PackedAtlas>,
}

impl AtlasContext {
    pub fn new(options: AtlasOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            options,
            images: Vec::new(),
            result: None,
        })
    }

    pub fn options(&self) -> &AtlasOptions {
        &self.options
    }

    /// Ingests one RGBA8 image under `name`. Invalidates any previous
    /// [`pack`](Self::pack) result: the atlas must be rebuilt after any
    /// image is added.
    #[instrument(skip(self, source))]
    pub fn add_image(&mut self, name: impl Into<String> + std::fmt::Debug, source: &RgbaImage) {
        let name = name.into();
        let image = Image::ingest(
            name,
            source,
            self.options.trim,
            self.options.transparent_policy,
            &self.images,
        );
        self.images.push(image);
        self.result = None;
    }

    /// Packs every added image into a single atlas page.
    ///
    /// Fails with [`CramError::Empty`] if no images were added, or
    /// [`CramError::NotEnoughRoom`] if they cannot fit within
    /// `max_dimension` even at the largest bin size tried.
    #[instrument(skip_all, fields(atlas = %self.options.name, images = self.images.len()))]
    pub fn pack(&mut self) -> Result<()> {
        if self.images.is_empty() {
            return Err(CramError::Empty);
        }
        let packed = atlas::build(&mut self.images, self.options.padding, self.options.max_dimension)?;
        info!(
            width = packed.pixels.width(),
            height = packed.pixels.height(),
            "packed atlas"
        );
        self.result = Some(packed);
        Ok(())
    }

    /// The composited atlas pixels. `None` until [`pack`](Self::pack) has
    /// succeeded since the last image was added.
    pub fn get_pixels(&self) -> Option<&RgbaImage> {
        self.result.as_ref().map(|r| &r.pixels)
    }

    /// One record per added image, in insertion order. `None` until
    /// [`pack`](Self::pack) has succeeded since the last image was added.
    pub fn get_metadata(&self) -> Option<&[ImageMetadata]> {
        self.result.as_ref().map(|r| r.metadata.as_slice())
    }
}
