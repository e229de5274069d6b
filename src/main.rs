use clap::Parser;
use image::{ImageReader, Rgb};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use textdet::{DetectorConfig, TextDetector, visualize};

#[derive(Parser)]
#[command(name = "textdet")]
#[command(about = "Locate text regions in an image")]
struct Cli {
    /// Path to input image file
    #[arg(value_name = "IMAGE")]
    image_path: PathBuf,

    /// Path to the .rten text detection model
    #[arg(short, long, value_name = "MODEL")]
    model: PathBuf,

    /// Longest edge fed to the network
    #[arg(long, default_value_t = 960)]
    max_size: u32,

    /// Feed the image at its original size
    #[arg(long)]
    no_resize: bool,

    /// Minimum mean probability for a box to be kept
    #[arg(long, default_value_t = 0.7)]
    box_score_threshold: f32,

    /// Keep boxes regardless of their score
    #[arg(long)]
    no_score_filter: bool,

    /// Probability above which a pixel counts as text
    #[arg(long, default_value_t = 0.3)]
    box_threshold: f32,

    /// Use the probability map without thresholding it
    #[arg(long)]
    no_binarize: bool,

    /// Boxes with a side at or below this size are dropped
    #[arg(long, default_value_t = 3)]
    min_size: u32,

    /// How much detected boxes are enlarged
    #[arg(long, default_value_t = 1.5)]
    unclip_ratio: f32,

    /// Save a copy of the image with the detected boxes drawn on it
    #[arg(long, value_name = "PATH")]
    visualize: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn config(&self) -> DetectorConfig {
        DetectorConfig::new()
            .with_max_size((!self.no_resize).then_some(self.max_size))
            .with_box_score_threshold((!self.no_score_filter).then_some(self.box_score_threshold))
            .with_box_threshold((!self.no_binarize).then_some(self.box_threshold))
            .with_min_size(self.min_size)
            .with_unclip_ratio(self.unclip_ratio)
    }
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    info!("Loading image: {:?}", args.image_path);
    let img = ImageReader::open(&args.image_path)?
        .decode()
        .map_err(|e| anyhow::anyhow!("Failed to decode image: {}", e))?;
    info!("Image loaded: {}x{}", img.width(), img.height());

    let mut detector = TextDetector::from_model_file(&args.model)?;
    detector.set_config(args.config());

    let boxes = detector.detect(&img)?;

    println!("=== Text Detection Results ===");
    println!("Total regions: {}", boxes.len());
    for (i, b) in boxes.iter().enumerate() {
        println!(
            "  {}: center=({:.1}, {:.1}) size={:.1}x{:.1} angle={:.1}",
            i + 1,
            b.center.x,
            b.center.y,
            b.width,
            b.height,
            b.angle
        );
    }

    if let Some(path) = &args.visualize {
        let annotated = visualize(&img, &boxes, Rgb([255, 0, 0]), 2);
        annotated
            .save(path)
            .map_err(|e| anyhow::anyhow!("Failed to save {}: {}", path.display(), e))?;
        info!("Saved annotated image to {}", path.display());
    }

    Ok(())
}
