use clap::Parser;
use std::path::PathBuf;
use image_to_palette_wasm::{extract_palette_file, swatch, PaletteConfig, SwatchSize};
use anyhow::{bail, Result};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Extract a representative color palette from an image and save it as a swatch.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Input image path, e.g. `image.png`
    #[arg(short, long = "input-file", alias = "in")]
    input: PathBuf,

    /// Output swatch path, e.g. `sample.png`
    #[arg(short, long = "output-file", alias = "out", default_value = "colorSample.png")]
    output: PathBuf,

    /// Number of palette colors
    #[arg(short = 'n', long, default_value_t = 10)]
    num_clusters: usize,

    /// Number of brightening levels to run
    #[arg(short = 'b', long, default_value_t = 1)]
    brightening_iterations: usize,

    /// Seed for picking initial centroids (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Fail instead of looping forever when clustering keeps moving samples
    #[arg(long)]
    max_iterations: Option<usize>,

    /// Width of one swatch cell in pixels
    #[arg(long, default_value_t = 150)]
    cell_width: u32,

    /// Height of one swatch cell in pixels
    #[arg(long, default_value_t = 75)]
    cell_height: u32,

    /// Print the palette as JSON instead of one entry per line
    #[arg(long)]
    json: bool,

    /// Log every clustering pass
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    if args.num_clusters == 0 {
        bail!("--num-clusters must be at least 1");
    }
    if args.cell_width == 0 || args.cell_height == 0 {
        bail!("swatch cells must be at least 1x1 pixels");
    }

    let config = PaletteConfig {
        clusters: args.num_clusters,
        brightening: args.brightening_iterations,
        max_iterations: args.max_iterations,
        seed: args.seed,
    };
    let cell = SwatchSize {
        width: args.cell_width,
        height: args.cell_height,
    };

    let palette = extract_palette_file(&args.input, &args.output, &config, cell)?;

    if args.json {
        let entries: Vec<serde_json::Value> = palette
            .iter()
            .map(|c| {
                serde_json::json!({
                    "hex": swatch::to_hex(c),
                    "rgb": c.rgb8(),
                    "members": c.members(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        for centroid in &palette {
            println!("{centroid}");
        }
    }
    tracing::info!("Saved → {}", args.output.display());

    Ok(())
}
