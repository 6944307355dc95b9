use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use tracing::Level;

const DEFAULT_DOC: &str = r##"<composite op=hue>
  <composite op=add>
    <gradient width=512 height=384 angle=1.5708 colors="black white"/>
    <tile width=512 height=384>
      <gradient width=64 height=64 angle=0.7854 colors="#404040 black #404040"/>
    </tile>
  </composite>
  <gradient width=512 height=384 angle=0.7854 colors="red orange yellow green cyan blue magenta"/>
</composite>
"##;

#[derive(Parser, Debug)]
#[command(name = "rastermark", version, about = "Render a markup pipeline to a PNG")]
struct Cli {
    /// Markup file to render.
    #[arg(short, long, conflicts_with = "string")]
    file: Option<PathBuf>,

    /// Markup text to render.
    #[arg(short, long)]
    string: Option<String>,

    /// Output PNG path.
    #[arg(short, long, default_value = "out.png")]
    out: PathBuf,

    /// Evaluation options JSON (search_paths, background, max_dimension).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the parsed document before rendering.
    #[arg(long)]
    dump_tree: bool,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut opts = match &cli.config {
        Some(path) => rastermark::EvalOpts::from_path(path)?,
        None => rastermark::EvalOpts::default(),
    };

    let text = match (&cli.file, &cli.string) {
        (Some(path), _) => {
            if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
                opts.search_paths.push(dir.to_path_buf());
            }
            std::fs::read_to_string(path)
                .with_context(|| format!("read markup '{}'", path.display()))?
        }
        (None, Some(s)) => s.clone(),
        (None, None) => DEFAULT_DOC.to_owned(),
    };

    let doc = rastermark::parse_document(&text);
    if cli.dump_tree {
        println!("{doc}");
    }

    let source = rastermark::FsSource::from_opts(&opts);
    let evaluator = rastermark::Evaluator::new(&source, opts);
    let raster = evaluator
        .render(&doc)
        .context("document produced no image")?;

    if let Some(parent) = cli.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    image::save_buffer_with_format(
        &cli.out,
        &raster.to_straight_rgba8(),
        raster.width(),
        raster.height(),
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", cli.out.display()))?;

    eprintln!(
        "wrote {} ({}x{})",
        cli.out.display(),
        raster.width(),
        raster.height()
    );
    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}
