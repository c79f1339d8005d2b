use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};

use quadfit::{
    BlendMode, Canvas, CpuSurface, EditorOpts, FitConfig, FitSession, PointerEvent, Quad,
    RedrawPolicy, SourceImage,
};

#[derive(Parser, Debug)]
#[command(name = "quadfit", version, about = "Warp a garment image onto a photo through a quad")]
struct Cli {
    /// Log level (error, warn, info, debug, trace).
    #[arg(long, global = true, default_value = "warn")]
    log: tracing::Level,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one composited frame as a PNG.
    Render(RenderArgs),
    /// Print the default fit for a canvas size as JSON.
    Seed(SeedArgs),
    /// Drive the editor with a recorded pointer script, then render the result.
    Replay(ReplayArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BlendChoice {
    Normal,
    Multiply,
    Overlay,
    SoftLight,
}

impl From<BlendChoice> for BlendMode {
    fn from(b: BlendChoice) -> Self {
        match b {
            BlendChoice::Normal => BlendMode::Normal,
            BlendChoice::Multiply => BlendMode::Multiply,
            BlendChoice::Overlay => BlendMode::Overlay,
            BlendChoice::SoftLight => BlendMode::SoftLight,
        }
    }
}

#[derive(Args, Debug)]
struct SceneArgs {
    /// Garment image (PNG, JPEG, ...).
    #[arg(long)]
    garment: PathBuf,

    /// Photo drawn underneath, stretched over the canvas.
    #[arg(long)]
    backdrop: Option<PathBuf>,

    /// Canvas width; defaults to the backdrop width, else 400.
    #[arg(long)]
    width: Option<u32>,

    /// Canvas height; defaults to the backdrop height, else 500.
    #[arg(long)]
    height: Option<u32>,

    /// Fit JSON applied before any flag below.
    #[arg(long)]
    fit: Option<PathBuf>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// Quad as "x,y x,y x,y x,y" (top-left, top-right, bottom-right, bottom-left).
    #[arg(long)]
    quad: Option<String>,

    #[arg(long)]
    opacity: Option<f32>,

    #[arg(long, value_enum)]
    blend: Option<BlendChoice>,

    #[arg(long)]
    subdivisions: Option<u32>,

    /// Garment size about the quad center, 0.4 to 2.0.
    #[arg(long)]
    scale: Option<f64>,

    /// Garment rotation about the quad center in degrees, -35 to 35.
    #[arg(long, allow_hyphen_values = true)]
    rotate: Option<f64>,

    /// Draw the quad outline and vertex handles.
    #[arg(long, default_value_t = false)]
    handles: bool,
}

#[derive(Args, Debug)]
struct SeedArgs {
    #[arg(long)]
    width: u32,

    #[arg(long)]
    height: u32,
}

#[derive(Args, Debug)]
struct ReplayArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// JSON array of pointer events.
    #[arg(long)]
    events: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(cli.log)
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Seed(args) => cmd_seed(args),
        Command::Replay(args) => cmd_replay(args),
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let flags = FitConfig {
        quad: args.quad.as_deref().map(Quad::parse).transpose()?,
        opacity: args.opacity,
        blend: args.blend.map(BlendMode::from),
        subdivisions: args.subdivisions,
        show_handles: args.handles.then_some(true),
    };
    flags.validate()?;

    let mut sess = open_session(&args.scene)?;
    let mut fit = match load_fit(&args.scene)? {
        Some(file) => file.merged(flags),
        None => flags,
    };
    // Exported frames leave the handles off unless asked for.
    fit.show_handles.get_or_insert(false);
    sess.apply_fit(&fit);
    if let Some(scale) = args.scale {
        sess.set_scale(scale);
    }
    if let Some(degrees) = args.rotate {
        sess.set_rotation(degrees);
    }

    finish(sess, &args.scene.out)
}

fn cmd_seed(args: SeedArgs) -> anyhow::Result<()> {
    let canvas = Canvas::non_empty(args.width, args.height)?;
    let mut editor = quadfit::QuadEditor::default();
    editor.resize(canvas);
    println!("{}", FitConfig::from_editor(&editor).to_json_pretty()?);
    Ok(())
}

fn cmd_replay(args: ReplayArgs) -> anyhow::Result<()> {
    let script = std::fs::read_to_string(&args.events)
        .with_context(|| format!("read events '{}'", args.events.display()))?;
    let events = PointerEvent::parse_script(&script)?;

    let mut sess = open_session(&args.scene)?;
    if let Some(fit) = load_fit(&args.scene)? {
        sess.apply_fit(&fit);
    }
    let changed = events.iter().filter(|ev| sess.on_pointer(ev)).count();
    tracing::info!(events = events.len(), changed, "replayed pointer script");

    println!("{}", FitConfig::from_editor(sess.editor()).to_json_pretty()?);
    finish(sess, &args.scene.out)
}

fn open_session(scene: &SceneArgs) -> anyhow::Result<FitSession<CpuSurface>> {
    let garment = quadfit::load_image(&scene.garment)?;
    let backdrop = scene
        .backdrop
        .as_deref()
        .map(quadfit::load_image)
        .transpose()?;

    let canvas = canvas_for(scene, backdrop.as_ref())?;
    let mut sess = FitSession::new(CpuSurface::new(canvas), EditorOpts::default())
        .with_policy(RedrawPolicy::Coalesced);
    sess.set_backdrop(backdrop);
    sess.load_garment(garment);
    Ok(sess)
}

fn canvas_for(scene: &SceneArgs, backdrop: Option<&SourceImage>) -> anyhow::Result<Canvas> {
    let (bw, bh) = backdrop.map_or((400, 500), |b| (b.width, b.height));
    let canvas = Canvas::non_empty(scene.width.unwrap_or(bw), scene.height.unwrap_or(bh))?;
    Ok(canvas)
}

fn load_fit(scene: &SceneArgs) -> anyhow::Result<Option<FitConfig>> {
    let Some(path) = &scene.fit else {
        return Ok(None);
    };
    let fit = FitConfig::from_path(path).with_context(|| format!("load fit '{}'", path.display()))?;
    Ok(Some(fit))
}

fn finish(mut sess: FitSession<CpuSurface>, out: &Path) -> anyhow::Result<()> {
    sess.flush();
    if let Some(parent) = out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    sess.surface().save_png(out)?;
    eprintln!("wrote {}", out.display());
    Ok(())
}
