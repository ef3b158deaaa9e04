//! Voronoi diagram CLI
//!
//! Renders a Voronoi diagram for a set of randomly placed seeds, each cell
//! painted with a maximally-distinct palette color.
//!
//! ## YAML spec file
//!
//! ```yaml
//! width: 1280
//! height: 720
//! seeds: 16
//! seed: 0
//! placement: grid
//! marker_size: 9
//! ```
//!
//! Run with: `voromap -o out.png --spec render.yaml`
//!
//! CLI flags override spec values:
//!
//!   voromap -o out.png --width 1920 --height 1080 --seeds 64 --placement grid

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;

use voromap_core::{build_palette, Canvas, FillEngine, Seed, SeedField};

#[derive(Debug, Clone, Copy, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Placement {
    /// Uniform random positions
    Random,
    /// One seed per box of a near-square lattice
    Grid,
}

/// YAML spec file format (every field optional; CLI flags win)
#[derive(Debug, Default, Deserialize)]
struct RenderSpec {
    width: Option<u32>,
    height: Option<u32>,
    seeds: Option<usize>,
    seed: Option<u64>,
    placement: Option<Placement>,
    marker_size: Option<u32>,
}

fn load_spec(path: &PathBuf) -> anyhow::Result<RenderSpec> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read spec file: {:?}", path))?;
    serde_yaml::from_str(&contents)
        .with_context(|| format!("failed to parse spec file: {:?}", path))
}

#[derive(Parser, Debug)]
#[command(name = "voromap")]
#[command(about = "Render Voronoi diagrams", long_about = None)]
struct Args {
    /// Output PNG path
    #[arg(short, long, default_value = "voronoi.png")]
    output: PathBuf,

    /// Image width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Image height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Number of seeds
    #[arg(short = 'n', long)]
    seeds: Option<usize>,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Seed placement strategy
    #[arg(long, value_enum)]
    placement: Option<Placement>,

    /// Side of the square marker drawn on each seed (0 = no markers)
    #[arg(long)]
    marker_size: Option<u32>,

    /// Resolve every pixel by exhaustive scan, skipping the disc pass
    #[arg(long)]
    brute_force: bool,

    /// YAML spec file with render parameters
    #[arg(long)]
    spec: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let spec = match args.spec.as_ref().map(load_spec).transpose()? {
        Some(spec) => spec,
        None => RenderSpec::default(),
    };

    // CLI args take precedence over spec values
    let width = args.width.or(spec.width).unwrap_or(1280);
    let height = args.height.or(spec.height).unwrap_or(720);
    let num_seeds = args.seeds.or(spec.seeds).unwrap_or(16);
    let rng_seed = args.seed.or(spec.seed).unwrap_or(0);
    let placement = args.placement.or(spec.placement).unwrap_or(Placement::Random);
    let marker_size = args.marker_size.or(spec.marker_size).unwrap_or(0);

    println!(
        "Rendering {}x{} with {} seeds (seed: {}, placement: {:?})",
        width, height, num_seeds, rng_seed, placement
    );

    let palette = build_palette(num_seeds)?;
    let field = match placement {
        Placement::Random => SeedField::random(num_seeds, width, height, &palette, rng_seed)?,
        Placement::Grid => {
            SeedField::grid_partitioned(num_seeds, width, height, &palette, rng_seed)?
        }
    };
    let sized = field.compute_adjacency();

    let engine = if args.brute_force {
        println!("Using exhaustive fill (disc pass disabled)");
        FillEngine::brute_force()
    } else {
        FillEngine::new()
    };

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner().template("{spinner:.green} {msg} [{elapsed_precise}]")?,
    );
    spinner.set_message("Filling Voronoi cells");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let mut canvas = Canvas::new(width, height);
    let fill_start = Instant::now();
    let report = engine.fill(&mut canvas, &sized)?;
    let fill_ms = fill_start.elapsed().as_secs_f64() * 1000.0;

    spinner.finish_and_clear();
    println!(
        "Filled {} pixels in {:.1}ms ({} by disc pass, {} by fallback)",
        report.total(),
        fill_ms,
        report.disc,
        report.fallback,
    );

    let mut image = canvas.to_image();
    if marker_size > 0 {
        draw_markers(&mut image, field.seeds(), marker_size);
    }

    image
        .save(&args.output)
        .with_context(|| format!("failed to write {:?}", args.output))?;
    println!("Output saved to: {:?}", args.output);

    Ok(())
}

/// Draw a square marker centered on each seed position, clipped to the
/// image. Markers are black, or white over a black cell so they stay
/// visible (the palette does not reserve black).
fn draw_markers(image: &mut image::RgbImage, seeds: &[Seed], size: u32) {
    let (w, h) = (image.width() as i32, image.height() as i32);
    let half = (size / 2) as i32;
    for seed in seeds {
        let marker = if seed.color == [0, 0, 0] {
            [255, 255, 255]
        } else {
            [0, 0, 0]
        };
        for dy in -half..=half {
            for dx in -half..=half {
                let px = seed.pos.x + dx;
                let py = seed.pos.y + dy;
                if px >= 0 && px < w && py >= 0 && py < h {
                    image.put_pixel(px as u32, py as u32, image::Rgb(marker));
                }
            }
        }
    }
}
