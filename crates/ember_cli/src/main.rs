//! Headless renderer: builds the preset scene, runs a render session to
//! completion and writes the pixel buffer as plain-text PPM.

use anyhow::Context;
use clap::Parser;
use ember_render::{
    init_scene, Camera, CameraConfig, RenderSession, RenderSettings, Vec3,
};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "ember", about = "CPU Monte Carlo path tracer")]
struct Args {
    /// Image width in pixels
    #[arg(long, default_value_t = 1200)]
    width: u32,

    /// Image height in pixels; defaults to a 16:9 height for the width
    #[arg(long)]
    height: Option<u32>,

    /// Samples per pixel
    #[arg(long, default_value_t = 100)]
    samples: u32,

    /// Maximum path depth
    #[arg(long, default_value_t = 50)]
    depth: u32,

    /// Scene spread; the small-sphere grid covers (2 * spread)^2 cells
    #[arg(long, default_value_t = 11)]
    spread: i32,

    /// Worker thread count; defaults to the available parallelism
    #[arg(long)]
    threads: Option<usize>,

    /// Vertical field of view in degrees
    #[arg(long, default_value_t = 30.0)]
    vfov: f64,

    /// Lens aperture diameter; 0 disables depth of field
    #[arg(long, default_value_t = 0.1)]
    aperture: f64,

    /// Output file (plain-text PPM)
    #[arg(short, long, default_value = "render.ppm")]
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let width = args.width.max(2);
    let height = args
        .height
        .unwrap_or_else(|| (width as f64 * 9.0 / 16.0) as u32)
        .max(2);

    let look_from = Vec3::new(13.0, 2.0, 3.0);
    let look_at = Vec3::ZERO;
    let camera = Camera::new(&CameraConfig {
        vfov: args.vfov,
        aspect_ratio: width as f64 / height as f64,
        look_from,
        look_at,
        vup: Vec3::Y,
        aperture: args.aperture,
        focus_dist: (look_from - look_at).length() / 2.0,
    });

    let world = init_scene(args.spread);
    let settings = RenderSettings {
        samples_per_pixel: args.samples.max(1),
        max_depth: args.depth.max(1),
        threads: args.threads,
    };

    let mut session = RenderSession::new(world, camera, width, height, settings);

    let start = Instant::now();
    session.start()?;
    session.wait();
    log::info!("render finished in {:.2?}", start.elapsed());

    let pixels = session.framebuffer().snapshot();
    write_ppm(&args.output, width, height, &pixels)
        .with_context(|| format!("writing {}", args.output.display()))?;
    log::info!("wrote {}", args.output.display());

    Ok(())
}

/// Write the buffer as plain-text PPM (`P3`).
///
/// The buffer's row 0 is the bottom of the image, so rows are emitted in
/// reverse to get the conventional top-to-bottom scan order.
fn write_ppm(path: &Path, width: u32, height: u32, rgba: &[u8]) -> std::io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "P3")?;
    writeln!(writer, "{} {}", width, height)?;
    writeln!(writer, "255")?;

    for y in (0..height).rev() {
        for x in 0..width {
            let i = ((y * width + x) * 4) as usize;
            writeln!(writer, "{} {} {}", rgba[i], rgba[i + 1], rgba[i + 2])?;
        }
    }

    writer.flush()
}
