use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;

/// Render the two-part logo mark to a JPEG or PNG.
#[derive(Parser, Debug)]
#[command(name = "insignia", version)]
struct Cli {
    /// Left text (the blue side).
    #[arg(short, long)]
    left: String,

    /// Right text (the dark side, carrying ring and cross).
    #[arg(short, long)]
    right: String,

    /// Output path; the extension picks the format ('jpg' or 'png').
    #[arg(short, long, default_value = "output.jpg")]
    output: PathBuf,

    /// Directory holding the font and image assets.
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Calibration overrides as a JSON file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Skip the opaque white background (PNG debugging).
    #[arg(long)]
    transparent: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut cfg = match &cli.config {
        Some(path) => insignia::RenderConfig::from_json_file(path)?,
        None => insignia::RenderConfig::default(),
    };
    if let Some(assets) = cli.assets {
        cfg.assets_root = assets;
    }
    if cli.transparent {
        cfg.transparent_background = true;
    }

    let written = insignia::draw_to_file(&cli.left, &cli.right, &cli.output, &cfg)
        .with_context(|| format!("render '{}'", cli.output.display()))?;

    eprintln!("wrote {}", written.display());
    Ok(())
}
