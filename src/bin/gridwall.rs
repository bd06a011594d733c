use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use gridwall::{
    Command as WallCommand, CpuSurface, FrameRGBA, GridConfig, GridState, HostRequest, Palette,
    Viewport,
};

#[derive(Parser, Debug)]
#[command(name = "gridwall", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Render a frame sequence as numbered PNGs.
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct CommonArgs {
    /// Viewport width in pixels.
    #[arg(long, default_value_t = 1920)]
    width: u32,

    /// Viewport height in pixels.
    #[arg(long, default_value_t = 1080)]
    height: u32,

    /// Determinism seed; the same seed always renders the same wall.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Ticks per second used to derive elapsed time.
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Optional GridConfig JSON overriding the defaults.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Frame index (0-based) to capture.
    #[arg(long, default_value_t = 0)]
    frame: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Number of frames to render.
    #[arg(long, default_value_t = 300)]
    frames: u64,

    /// Output directory for `frame_NNNNN.png` files.
    #[arg(long)]
    out_dir: PathBuf,

    /// Reshuffle the wall (fresh tiles and seeds) before this frame.
    #[arg(long)]
    reshuffle_at: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Render(args) => cmd_render(args),
    }
}

fn read_config(path: Option<&Path>) -> anyhow::Result<GridConfig> {
    let Some(path) = path else {
        return Ok(GridConfig::default());
    };
    let f = File::open(path).with_context(|| format!("open config '{}'", path.display()))?;
    let r = BufReader::new(f);
    let cfg: GridConfig = serde_json::from_reader(r).with_context(|| "parse config JSON")?;
    Ok(cfg)
}

fn setup(common: &CommonArgs) -> anyhow::Result<(GridState, CpuSurface)> {
    let cfg = read_config(common.config.as_deref())?;
    let viewport = Viewport::new(f64::from(common.width), f64::from(common.height));
    let grid = GridState::initialize(cfg, Palette::default(), common.seed, viewport)?;
    let surface = CpuSurface::new(common.width, common.height)?;
    Ok((grid, surface))
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let (mut grid, mut surface) = setup(&args.common)?;
    let fps = f64::from(args.common.fps.max(1));

    for f in 0..=args.frame {
        grid.render_frame(&mut surface, f as f64 / fps);
    }

    // The capture command is the host-facing path: the core relays the
    // request and this host persists the raster as a PNG.
    if let Some(HostRequest::CaptureFrame) = grid.on_command(WallCommand::CaptureFrame) {
        let frame = surface.take_frame()?;
        save_png(&frame, &args.out)?;
        eprintln!("wrote {}", args.out.display());
    }
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let (mut grid, mut surface) = setup(&args.common)?;
    let fps = f64::from(args.common.fps.max(1));

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;

    for f in 0..args.frames {
        if args.reshuffle_at == Some(f) {
            grid.on_command(WallCommand::Reinitialize);
        }
        grid.render_frame(&mut surface, f as f64 / fps);
        let frame = surface.take_frame()?;
        let path = args.out_dir.join(format!("frame_{f:05}.png"));
        save_png(&frame, &path)?;
    }

    eprintln!("wrote {} frames to {}", args.frames, args.out_dir.display());
    Ok(())
}

fn save_png(frame: &FrameRGBA, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        path,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))
}
