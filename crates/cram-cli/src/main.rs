use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{ArgAction, Parser};
use cram_core::{AtlasContext, AtlasOptions, TransparentPolicy};
use image::ImageReader;
use serde::Serialize;
use tracing::{error, info, instrument};
use walkdir::WalkDir;

#[derive(Parser, Debug)]
#[command(name = "cram", about = "Pack a folder of images into one texture atlas", version, author)]
struct Cli {
    /// Directory to walk recursively for .png images
    #[arg(help_heading = "Input/Output")]
    input_dir: PathBuf,
    /// Directory to write <name>.png and <name>.json into
    #[arg(help_heading = "Input/Output")]
    output_dir: PathBuf,
    /// Base name for the output files
    #[arg(help_heading = "Input/Output")]
    name: String,

    /// Pixels reserved to the right and below every packed image
    #[arg(long, default_value_t = 0, help_heading = "Layout")]
    padding: u32,
    /// Hard ceiling on the atlas's width and height
    #[arg(long, default_value_t = 8192, help_heading = "Layout")]
    max_dimension: u32,
    /// Disable trimming of transparent borders
    #[arg(long, default_value_t = false, help_heading = "Layout")]
    no_trim: bool,
    /// Premultiply RGB by alpha in the output PNG
    #[arg(long, default_value_t = false, help_heading = "Image Processing")]
    premultiply: bool,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true, help_heading = "Logging")]
    verbose: u8,
    /// Quiet mode (overrides verbose)
    #[arg(short, long, default_value_t = false, global = true, help_heading = "Logging")]
    quiet: bool,
}

/// One row of `<name>.json`, field names matching the original tool exactly.
#[derive(Serialize)]
struct MetadataRecord {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "X")]
    x: u32,
    #[serde(rename = "Y")]
    y: u32,
    #[serde(rename = "W")]
    w: u32,
    #[serde(rename = "H")]
    h: u32,
    #[serde(rename = "TrimOffsetX")]
    trim_offset_x: u32,
    #[serde(rename = "TrimOffsetY")]
    trim_offset_y: u32,
    #[serde(rename = "UntrimmedWidth")]
    untrimmed_width: u32,
    #[serde(rename = "UntrimmedHeight")]
    untrimmed_height: u32,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose);
    run(&cli)
}

#[instrument(skip_all, fields(input_dir = %cli.input_dir.display(), name = %cli.name))]
fn run(cli: &Cli) -> anyhow::Result<()> {
    if !cli.input_dir.is_dir() {
        bail!("input directory not found: {}", cli.input_dir.display());
    }
    if !cli.output_dir.is_dir() {
        bail!("output directory not found: {}", cli.output_dir.display());
    }

    let mut ctx = AtlasContext::new(AtlasOptions {
        name: cli.name.clone(),
        max_dimension: cli.max_dimension,
        padding: cli.padding,
        trim: !cli.no_trim,
        transparent_policy: TransparentPolicy::Keep,
    })?;

    let mut loaded = 0usize;
    for path in find_pngs(&cli.input_dir) {
        match load_rgba(&path) {
            Ok(rgba) => {
                let key = relative_name(&cli.input_dir, &path);
                ctx.add_image(key, &rgba);
                loaded += 1;
            }
            Err(e) => error!(path = %path.display(), error = %e, "skip image"),
        }
    }
    info!(loaded, "ingested images");

    ctx.pack()?;

    let mut pixels = ctx.get_pixels().expect("pack succeeded").clone();
    if cli.premultiply {
        premultiply(&mut pixels);
    }

    let png_path = cli.output_dir.join(format!("{}.png", cli.name));
    pixels
        .save(&png_path)
        .with_context(|| format!("write {}", png_path.display()))?;

    let records: Vec<MetadataRecord> = ctx
        .get_metadata()
        .expect("pack succeeded")
        .iter()
        .map(|m| MetadataRecord {
            name: m.name.clone(),
            x: m.x,
            y: m.y,
            w: m.w,
            h: m.h,
            trim_offset_x: m.trim_offset_x,
            trim_offset_y: m.trim_offset_y,
            untrimmed_width: m.untrimmed_width,
            untrimmed_height: m.untrimmed_height,
        })
        .collect();

    let json_path = cli.output_dir.join(format!("{}.json", cli.name));
    let json = serde_json::to_string_pretty(&records)?;
    std::fs::write(&json_path, json).with_context(|| format!("write {}", json_path.display()))?;

    info!(png = %png_path.display(), json = %json_path.display(), "wrote atlas");
    Ok(())
}

fn find_pngs(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .map(|e| e.eq_ignore_ascii_case("png"))
                .unwrap_or(false)
        })
        .collect()
}

fn load_rgba(path: &Path) -> anyhow::Result<image::RgbaImage> {
    let img = ImageReader::open(path)?.with_guessed_format()?.decode()?;
    Ok(img.to_rgba8())
}

/// Path from `path` to `root`, with `/` separators, matching the original's
/// `relative_path` + backslash replacement.
fn relative_name(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.to_string_lossy().replace('\\', "/")
}

fn premultiply(pixels: &mut image::RgbaImage) {
    for px in pixels.pixels_mut() {
        let a = px[3] as u32;
        px[0] = ((px[0] as u32 * a) / 255) as u8;
        px[1] = ((px[1] as u32 * a) / 255) as u8;
        px[2] = ((px[2] as u32 * a) / 255) as u8;
    }
}

fn init_tracing(quiet: bool, verbose: u8) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_target(false)
        .try_init();
}
