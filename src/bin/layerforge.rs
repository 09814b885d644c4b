use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use layerforge::{
    DirectorySink, DocumentSink, FsAssetStore, ImageLayoutOpts, Layout, PlaceholderSpec,
    PlaceholderStyle, Position, Rgba8,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "layerforge", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compose a layout JSON into a directory of layer PNGs plus a manifest.
    Compose(ComposeArgs),
    /// Generate a single placeholder PNG.
    Placeholder(PlaceholderArgs),
    /// Build a layout JSON that wraps one image.
    FromImage(FromImageArgs),
}

#[derive(Parser, Debug)]
struct ComposeArgs {
    /// Input layout JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output directory for layers and `document.json`.
    #[arg(long)]
    out: PathBuf,

    /// Directory placeholders are written under (defaults to the output directory).
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Margin added around the layout, in pixels.
    #[arg(long, default_value_t = 0)]
    margin: u32,

    /// Background style for generated placeholders.
    #[arg(long, value_enum, default_value_t = PlaceholderStyle::Gradient)]
    placeholder_style: PlaceholderStyle,

    /// Label forced onto every placeholder.
    #[arg(long)]
    placeholder_label: Option<String>,

    /// Write the resolved layout (rewritten sources, backfilled sizes) to this path.
    #[arg(long)]
    write_layout: Option<PathBuf>,

    /// Also write a flattened `preview.png`.
    #[arg(long, default_value_t = false)]
    preview: bool,
}

#[derive(Parser, Debug)]
struct PlaceholderArgs {
    /// Width in pixels.
    #[arg(long)]
    width: u32,

    /// Height in pixels.
    #[arg(long)]
    height: u32,

    /// Background style.
    #[arg(long, value_enum, default_value_t = PlaceholderStyle::Gradient)]
    style: PlaceholderStyle,

    /// Label drawn in the middle band.
    #[arg(long, default_value = "Image")]
    label: String,

    /// Corner radius in pixels.
    #[arg(long, default_value_t = 0.0)]
    radius: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct FromImageArgs {
    /// Source image.
    #[arg(long)]
    image: PathBuf,

    /// Output layout JSON.
    #[arg(long)]
    out: PathBuf,

    /// Element name (defaults to the image file stem).
    #[arg(long)]
    name: Option<String>,

    /// Left edge of the elements.
    #[arg(long, default_value_t = 0.0)]
    x: f64,

    /// Top edge of the elements.
    #[arg(long, default_value_t = 0.0)]
    y: f64,

    /// Border width; `0` leaves the border element out.
    #[arg(long, default_value_t = 0.0)]
    border_width: f64,

    /// Border colour.
    #[arg(long)]
    border_color: Option<String>,

    /// Corner radius.
    #[arg(long, default_value_t = 0.0)]
    border_radius: f64,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Compose(args) => cmd_compose(args),
        Command::Placeholder(args) => cmd_placeholder(args),
        Command::FromImage(args) => cmd_from_image(args),
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn parent_or_dot(path: &Path) -> PathBuf {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn cmd_compose(args: ComposeArgs) -> anyhow::Result<()> {
    let layout = Layout::from_path(&args.in_path)?;
    let base_dir = parent_or_dot(&args.in_path);
    let asset_dir = args.assets.clone().unwrap_or_else(|| args.out.clone());

    let mut req = layerforge::ComposeRequest::new(layout.elements.clone(), asset_dir, base_dir)
        .with_margin(args.margin)
        .with_placeholder_style(args.placeholder_style);
    if let Some(label) = args.placeholder_label.clone() {
        req = req.with_placeholder_label(label);
    }

    let store = FsAssetStore::new();
    let outcome = layerforge::compose(&req, &store)?;

    let mut sink = DirectorySink::new(&args.out).with_preview(args.preview);
    sink.write_document(&outcome.document)?;

    if let Some(path) = &args.write_layout {
        layout
            .with_elements(outcome.elements.clone())
            .write_path(path)?;
    }

    let summary = serde_json::json!({
        "width": outcome.document.width,
        "height": outcome.document.height,
        "layer_count": outcome.layer_count,
        "placeholders": outcome.placeholders,
        "diagnostics": outcome.diagnostics,
        "out": args.out,
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&summary).context("serialize summary")?
    );
    Ok(())
}

fn cmd_placeholder(args: PlaceholderArgs) -> anyhow::Result<()> {
    let bytes = layerforge::render_placeholder(&PlaceholderSpec {
        width: args.width,
        height: args.height,
        style: args.style,
        label: args.label,
        radius: args.radius,
    })?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, bytes)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_from_image(args: FromImageArgs) -> anyhow::Result<()> {
    let border_color = args
        .border_color
        .as_deref()
        .map(Rgba8::parse)
        .transpose()
        .map_err(|e| anyhow::anyhow!("--border-color: {e}"))?;

    let opts = ImageLayoutOpts {
        name: args.name,
        position: Position::new(args.x, args.y),
        border_width: args.border_width,
        border_color,
        border_radius: args.border_radius,
        layout_base_dir: parent_or_dot(&args.out),
    };
    let store = FsAssetStore::new();
    let elements = layerforge::layout_from_image(&args.image, &opts, &store)?;
    Layout::from_elements(elements).write_path(&args.out)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}
