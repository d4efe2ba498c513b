use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "thumbforge", version)]
struct Cli {
    /// Log pipeline steps to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Composite a base image, a cutout and text layers into a PNG.
    Render(RenderArgs),
    /// Print the CSS filter string for a set of filter settings.
    Filter(FilterArgs),
    /// Print the pixel pivot of an anchored element.
    Anchor(AnchorArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Base image (background frame).
    #[arg(long)]
    base: PathBuf,

    /// Foreground cutout image.
    #[arg(long)]
    cutout: PathBuf,

    /// JSON array of text elements.
    #[arg(long)]
    elements: Option<PathBuf>,

    #[command(flatten)]
    filters: FilterArgs,

    /// Output width; defaults to the base image width.
    #[arg(long, requires = "height")]
    width: Option<u32>,

    /// Output height; defaults to the base image height.
    #[arg(long, requires = "width")]
    height: Option<u32>,

    /// Font file to register; may be repeated.
    #[arg(long = "font")]
    fonts: Vec<PathBuf>,

    /// JSON render config; missing keys keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// How long each image may take to load.
    #[arg(long, default_value_t = 10_000)]
    timeout_ms: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(clap::Args, Debug)]
struct FilterArgs {
    /// JSON filter settings.
    #[arg(long = "filters")]
    filters_path: Option<PathBuf>,

    /// Named filter preset; overrides `--filters`.
    #[arg(long)]
    preset: Option<String>,
}

#[derive(Parser, Debug)]
struct AnchorArgs {
    /// Anchor name, e.g. `top-left`.
    #[arg(long, default_value = "center")]
    position: String,

    /// Horizontal percentage.
    #[arg(long, default_value_t = 50.0)]
    x: f64,

    /// Vertical percentage.
    #[arg(long, default_value_t = 50.0)]
    y: f64,

    /// Canvas width.
    #[arg(long, default_value_t = 1280)]
    width: u32,

    /// Canvas height.
    #[arg(long, default_value_t = 720)]
    height: u32,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.cmd {
        Command::Render(args) => cmd_render(args).await,
        Command::Filter(args) => cmd_filter(args),
        Command::Anchor(args) => cmd_anchor(args),
    }
}

fn init_logging(verbose: bool) {
    if !verbose {
        return;
    }
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .try_init();
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> anyhow::Result<T> {
    let f = File::open(path).with_context(|| format!("open {what} '{}'", path.display()))?;
    let value = serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parse {what} JSON '{}'", path.display()))?;
    Ok(value)
}

fn load_filters(args: &FilterArgs) -> anyhow::Result<thumbforge::ImageFilter> {
    let filters = match (&args.preset, &args.filters_path) {
        (Some(name), _) => thumbforge::filter_preset(name)?,
        (None, Some(path)) => read_json(path, "filters")?,
        (None, None) => thumbforge::ImageFilter::default(),
    };
    filters.validate()?;
    Ok(filters)
}

async fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => thumbforge::RenderConfig::from_path(path)?,
        None => thumbforge::RenderConfig::default(),
    }
    .with_env_overrides();
    config.validate()?;

    let elements: Vec<thumbforge::TextElement> = match &args.elements {
        Some(path) => read_json(path, "elements")?,
        None => Vec::new(),
    };
    let filters = load_filters(&args.filters)?;
    let target = match (args.width, args.height) {
        (Some(w), Some(h)) => Some(thumbforge::Canvas::new(w, h)?),
        _ => None,
    };

    let mut fonts = thumbforge::FontBook::new();
    for path in &args.fonts {
        let families = fonts.register_font_file(path)?;
        tracing::debug!(path = %path.display(), ?families, "registered font");
    }
    let mut compositor = thumbforge::Compositor::with_fonts(config, fonts);

    let output = compositor
        .composite_sources(
            &thumbforge::FileSource::new(&args.base),
            &thumbforge::FileSource::new(&args.cutout),
            &elements,
            &filters,
            target,
            Duration::from_millis(args.timeout_ms),
        )
        .await?;

    for skipped in &output.report.skipped {
        eprintln!("skipped element '{}': {}", skipped.id, skipped.reason);
    }

    let png = output.to_png()?;
    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_filter(args: FilterArgs) -> anyhow::Result<()> {
    let filters = load_filters(&args)?;
    println!("{}", thumbforge::build_filter_string(&filters));
    Ok(())
}

fn cmd_anchor(args: AnchorArgs) -> anyhow::Result<()> {
    let mut element = thumbforge::TextElement::new("");
    element.position = args.position.parse()?;
    element.x = args.x;
    element.y = args.y;
    let p = thumbforge::resolve_position(&element, f64::from(args.width), f64::from(args.height));
    println!("{} {}", p.x, p.y);
    Ok(())
}
