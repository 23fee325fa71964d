use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "wigglegram", version)]
struct Cli {
    /// Log pipeline details to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Slice a photo into segment PNGs plus an `anchors.json` with the default anchors.
    Slice(SliceArgs),
    /// Build a wigglegram GIF from a photo.
    Make(MakeArgs),
}

#[derive(Args, Debug)]
struct SourceArgs {
    /// Input photo.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Number of vertical segments (2, 3 or 4).
    #[arg(long)]
    segments: Option<u32>,

    /// Downscale sources taller than this many pixels before slicing.
    #[arg(long)]
    max_height: Option<u32>,

    /// Keep the source at its original size.
    #[arg(long, conflicts_with = "max_height")]
    no_prescale: bool,

    /// JSON options file; flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct SliceArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Directory receiving `segment_<i>.png` and `anchors.json`.
    #[arg(long)]
    out_dir: PathBuf,
}

#[derive(Args, Debug)]
struct MakeArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Output GIF path.
    #[arg(long)]
    out: PathBuf,

    /// JSON array of `[x, y]` anchors, one per segment.
    #[arg(long)]
    anchors: Option<PathBuf>,

    /// Delay between frames in milliseconds.
    #[arg(long)]
    delay_ms: Option<u32>,

    /// Play forward then backward.
    #[arg(long)]
    ping_pong: bool,

    /// Play once instead of looping forever.
    #[arg(long)]
    no_loop: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Slice(args) => cmd_slice(args),
        Command::Make(args) => cmd_make(args),
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn resolve_opts(source: &SourceArgs) -> anyhow::Result<wigglegram::WiggleOpts> {
    let mut opts = match &source.config {
        Some(path) => wigglegram::WiggleOpts::from_json_file(path)?,
        None => wigglegram::WiggleOpts::default(),
    };
    if let Some(n) = source.segments {
        opts.segments = n;
    }
    if let Some(h) = source.max_height {
        opts.max_height = Some(h);
    }
    if source.no_prescale {
        opts.max_height = None;
    }
    Ok(opts)
}

fn load_source(
    source: &SourceArgs,
    opts: &wigglegram::WiggleOpts,
) -> anyhow::Result<wigglegram::PixelBuffer> {
    let image = wigglegram::PixelBuffer::open(&source.in_path)?;
    Ok(match opts.max_height {
        Some(h) => wigglegram::prescale(&image, h)?,
        None => image,
    })
}

fn cmd_slice(args: SliceArgs) -> anyhow::Result<()> {
    let opts = resolve_opts(&args.source)?;
    opts.validate()?;
    let image = load_source(&args.source, &opts)?;
    let segments = wigglegram::slice(&image, opts.segments)?;

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;
    for (i, seg) in segments.iter().enumerate() {
        let path = args.out_dir.join(format!("segment_{i}.png"));
        seg.buffer().save_png(&path)?;
    }

    let anchors = segments
        .iter()
        .map(wigglegram::Segment::anchor)
        .collect::<Vec<_>>();
    let anchors_path = args.out_dir.join("anchors.json");
    std::fs::write(&anchors_path, wigglegram::anchors_to_json(&anchors)?)
        .with_context(|| format!("write anchors '{}'", anchors_path.display()))?;

    eprintln!(
        "wrote {} segments to {}",
        segments.len(),
        args.out_dir.display()
    );
    Ok(())
}

fn read_anchors(path: &Path) -> anyhow::Result<Vec<wigglegram::Anchor>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read anchors '{}'", path.display()))?;
    Ok(wigglegram::anchors_from_json(&text)?)
}

fn cmd_make(args: MakeArgs) -> anyhow::Result<()> {
    let mut opts = resolve_opts(&args.source)?;
    if let Some(d) = args.delay_ms {
        opts.frame_delay_ms = d;
    }
    if args.ping_pong {
        opts.order = wigglegram::FrameOrder::PingPong;
    }
    if args.no_loop {
        opts.loop_forever = false;
    }
    opts.validate()?;

    let image = load_source(&args.source, &opts)?;
    let mut session = wigglegram::AnchorSession::from_source(&image, opts.segments)?;
    if let Some(path) = &args.anchors {
        let anchors = read_anchors(path)?;
        if anchors.len() != session.len() {
            anyhow::bail!(
                "anchors file has {} entries, expected {}",
                anchors.len(),
                session.len()
            );
        }
        for (i, a) in anchors.into_iter().enumerate() {
            session.set_anchor(i, a)?;
        }
    }

    let run = session.freeze(opts)?;
    let layout = run.layout()?;
    let mut sink = wigglegram::FileSink::new(&args.out);
    let mut last = 0u8;
    let handle = run.deliver(&mut sink, &mut |p: u8| {
        if p / 25 > last / 25 {
            eprintln!("encoding... {p}%");
        }
        last = p;
    })?;

    if let wigglegram::SinkHandle::File(path) = handle {
        eprintln!(
            "wrote {} ({}x{})",
            path.display(),
            layout.width,
            layout.height
        );
    }
    Ok(())
}
