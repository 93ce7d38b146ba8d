use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "scrawl", version, about = "Render plain text as a handwritten page")]
struct Cli {
    /// UTF-8 text file to render.
    #[arg(short, long)]
    input: PathBuf,

    /// Output image path.
    #[arg(short, long, default_value = "output.png")]
    output: PathBuf,

    /// Handwriting style name from the config's font list.
    #[arg(short, long, default_value = "regular")]
    style: String,

    /// Configuration file (YAML, or JSON by extension).
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Seed for a reproducible page.
    #[arg(long)]
    seed: Option<u64>,

    /// Render lines in parallel.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Override rayon worker threads (parallel mode only).
    #[arg(long)]
    threads: Option<usize>,

    /// Debug logging unless RUST_LOG is set.
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = scrawl::Config::from_path(&cli.config)?;
    let text = std::fs::read_to_string(&cli.input)
        .with_context(|| format!("read input '{}'", cli.input.display()))?;

    let fonts = scrawl::FontBook::load(&config, &config.fonts_dir());
    if !fonts.styles().iter().any(|s| *s == cli.style) {
        tracing::warn!(
            style = %cli.style,
            available = ?fonts.styles(),
            "requested style is not loaded, using a fallback"
        );
    }
    let template = scrawl::PageTemplate::load_or_create(&config, &config.templates_dir())?;

    let opts = scrawl::RenderOpts {
        style: cli.style,
        seed: cli.seed,
        threading: scrawl::RenderThreading {
            parallel: cli.parallel,
            threads: cli.threads,
        },
    };
    let (page, _stats) = scrawl::render_document(&config, &fonts, &template, &text, &opts)?;
    scrawl::save_page(&page, &cli.output, &config.output)?;

    println!("Document created: {}", cli.output.display());
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
