use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Context as _;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use halfblock::{FrameIndex, FrameSink, PixelSurface, ScaleAlgorithm, Scene, SinkConfig, TerminalSink};

#[derive(Parser, Debug)]
#[command(name = "halfblock", version)]
struct Cli {
    /// Raise log verbosity on stderr (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one scene frame to stdout.
    Frame(FrameArgs),
    /// Play a scene frame range in place at a fixed rate.
    Play(PlayArgs),
    /// Print a PNG once, optionally rescaled to a width.
    Image(ImageArgs),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Frame index (0-based).
    #[arg(long, default_value_t = 0)]
    frame: u64,

    /// Write the merged frame as a PNG instead of printing it.
    #[arg(long)]
    png: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct PlayArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Target frames per second.
    #[arg(long, default_value_t = 30.0)]
    fps: f64,

    /// First frame (inclusive).
    #[arg(long, default_value_t = 0)]
    from: u64,

    /// Last frame (exclusive); defaults to the scene's frame count.
    #[arg(long)]
    to: Option<u64>,

    /// Skip writing frames identical to the previous one.
    #[arg(long, default_value_t = false)]
    static_frame_elision: bool,
}

#[derive(Parser, Debug)]
struct ImageArgs {
    /// Input PNG.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output width in columns; height follows the aspect ratio.
    #[arg(long)]
    width: Option<u32>,

    /// Resampling kernel used with `--width`.
    #[arg(long, value_enum, default_value_t = Kernel::Bilinear)]
    algorithm: Kernel,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Kernel {
    Direct,
    Nearest,
    Bilinear,
    Bicubic,
}

impl From<Kernel> for ScaleAlgorithm {
    fn from(k: Kernel) -> Self {
        match k {
            Kernel::Direct => ScaleAlgorithm::DirectRatio,
            Kernel::Nearest => ScaleAlgorithm::NearestNeighbor,
            Kernel::Bilinear => ScaleAlgorithm::Bilinear,
            Kernel::Bicubic => ScaleAlgorithm::Bicubic,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Play(args) => cmd_play(args),
        Command::Image(args) => cmd_image(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load_scene(path: &Path) -> anyhow::Result<(Scene, PathBuf)> {
    let scene = Scene::from_path(path)
        .with_context(|| format!("load scene '{}'", path.display()))?;
    let assets_root = path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();
    Ok((scene, assets_root))
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let (scene, assets_root) = load_scene(&args.in_path)?;
    let mut pipeline = scene.build_pipeline(&assets_root)?;
    let frame = FrameIndex(args.frame);

    if let Some(out) = args.png {
        pipeline.run(frame)?;
        let dest = pipeline.destination();
        if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
        image::save_buffer_with_format(
            &out,
            &dest.to_rgba(),
            dest.width(),
            dest.height(),
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", out.display()))?;
        eprintln!("wrote {}", out.display());
        return Ok(());
    }

    let (width, height) = pipeline.canvas_size();
    let wire = pipeline.render_wire(frame)?;
    print_once(wire, width, height)
}

fn cmd_play(args: PlayArgs) -> anyhow::Result<()> {
    if !(args.fps.is_finite() && args.fps > 0.0) {
        anyhow::bail!("--fps must be a positive number, got {}", args.fps);
    }
    let (scene, assets_root) = load_scene(&args.in_path)?;
    let end = args.to.unwrap_or(scene.frames);
    if args.from >= end {
        anyhow::bail!("empty frame range {}..{end}", args.from);
    }
    let mut pipeline = scene.build_pipeline(&assets_root)?;
    let (width, height) = pipeline.canvas_size();
    let frame_time = Duration::from_secs_f64(1.0 / args.fps);

    let out = BufWriter::with_capacity(pipeline.destination().wire_capacity(), std::io::stdout());
    let mut sink = TerminalSink::new(out).with_static_frame_elision(args.static_frame_elision);
    sink.begin(SinkConfig { width, height })?;
    for f in args.from..end {
        let started = Instant::now();
        let idx = FrameIndex(f);
        let wire = pipeline.render_wire(idx)?;
        sink.push_frame(idx, wire)?;
        std::thread::sleep(frame_time.saturating_sub(started.elapsed()));
    }
    sink.end()?;

    let stats = sink.stats();
    tracing::info!(
        frames = stats.frames_total,
        written = stats.frames_written,
        elided = stats.frames_elided,
        "playback finished"
    );
    Ok(())
}

fn cmd_image(args: ImageArgs) -> anyhow::Result<()> {
    let mut surface = PixelSurface::from_png_path(&args.in_path)
        .with_context(|| format!("load png '{}'", args.in_path.display()))?;
    if let Some(width) = args.width {
        let height = scaled_height(surface.width(), surface.height(), width);
        surface.scale(width, height, args.algorithm.into())?;
    }
    let (width, height) = (surface.width(), surface.height());
    print_once(surface.to_wire_format(), width, height)
}

fn scaled_height(src_w: u32, src_h: u32, dst_w: u32) -> u32 {
    let h = (u64::from(src_h) * u64::from(dst_w) + u64::from(src_w) / 2) / u64::from(src_w.max(1));
    u32::try_from(h).unwrap_or(u32::MAX).max(1)
}

fn print_once(wire: &[u8], width: u32, height: u32) -> anyhow::Result<()> {
    let mut sink = TerminalSink::new(BufWriter::new(std::io::stdout()));
    sink.begin(SinkConfig { width, height })?;
    sink.push_frame(FrameIndex(0), wire)?;
    sink.end()?;
    Ok(())
}
