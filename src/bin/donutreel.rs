use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "donutreel", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the whole chart as a PNG.
    Still(StillArgs),
    /// Render the reveal animation as a PNG sequence directory or an animated GIF.
    Reveal(RevealArgs),
}

#[derive(Parser, Debug)]
struct StillArgs {
    /// Input chart JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Backend to use.
    #[arg(long, value_enum, default_value_t = BackendChoice::Cpu)]
    backend: BackendChoice,
}

#[derive(Parser, Debug)]
struct RevealArgs {
    /// Input chart JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output directory for `frame_NNNN.png` files, or a path ending in `.gif`.
    #[arg(long)]
    out: PathBuf,

    /// Backend to use.
    #[arg(long, value_enum, default_value_t = BackendChoice::Cpu)]
    backend: BackendChoice,

    /// Keyframes per second.
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Render frames on a worker pool.
    #[arg(long)]
    parallel: bool,

    /// Worker thread count for `--parallel`.
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BackendChoice {
    Cpu,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("DONUTREEL_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Still(args) => cmd_still(args),
        Command::Reveal(args) => cmd_reveal(args),
    }
}

fn read_chart(path: &Path) -> anyhow::Result<donutreel::ChartDocument> {
    let doc = donutreel::ChartDocument::from_path(path)
        .with_context(|| format!("read chart '{}'", path.display()))?;
    doc.validate()
        .with_context(|| format!("validate chart '{}'", path.display()))?;
    Ok(doc)
}

fn make_backend(choice: BackendChoice) -> Box<dyn donutreel::RasterBackend> {
    let kind = match choice {
        BackendChoice::Cpu => donutreel::BackendKind::Cpu,
    };
    donutreel::create_backend(kind, donutreel::CpuBackendOpts::default())
}

fn cmd_still(args: StillArgs) -> anyhow::Result<()> {
    let doc = read_chart(&args.in_path)?;
    let mut backend = make_backend(args.backend);
    let batch = doc.build(backend.as_mut())?;
    let frame = batch.flatten()?;
    donutreel::write_png(&args.out, &frame)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_reveal(args: RevealArgs) -> anyhow::Result<()> {
    let doc = read_chart(&args.in_path)?;
    let mut backend = make_backend(args.backend);
    let batch = doc.build(backend.as_mut())?;

    let animator = donutreel::RevealAnimator::new(donutreel::RevealOpts {
        frames_per_second: args.fps,
        parallel: args.parallel,
        threads: args.threads,
        ..donutreel::RevealOpts::default()
    });
    let request = doc.animation_or_default().to_request();
    let sequence = animator.render(&batch, &request, backend.as_mut())?;

    let is_gif = args
        .out
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gif"));
    let mut sink: Box<dyn donutreel::FrameSink> = if is_gif {
        Box::new(donutreel::GifSink::new(&args.out))
    } else {
        Box::new(donutreel::PngSequenceSink::new(&args.out))
    };
    donutreel::export_frames(&sequence, sink.as_mut())
        .with_context(|| format!("export frames to '{}'", args.out.display()))?;

    eprintln!("wrote {} frames to {}", sequence.len(), args.out.display());
    Ok(())
}
