use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use cardgen::{
    Album, AlbumSource, Align, AppConfig, BatchOpts, Card, CardKind, CardSession, CoverArtMode,
    DirFontProvider, FontCache, FontProvider, OfflineFontProvider, Page, PageSize, ParleyMetrics,
    PlanOptions, RenderPlan, ThemeOverrides, ThemeResolver, format_output_name,
};

#[derive(Parser, Debug)]
#[command(name = "cardgen", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Lay out j-cards for album manifests and write the plans as JSON.
    Album(AlbumArgs),
}

#[derive(Parser, Debug)]
struct AlbumArgs {
    /// Album manifest JSON; join two with a comma for a double-album card.
    #[arg(required = true)]
    sources: Vec<String>,

    /// Output JSON path (defaults to a name from the output template).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output template name from the config.
    #[arg(long, default_value = "default")]
    output_name: String,

    /// Config file (defaults to ./cardgen.toml when present).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Card type: jcard_4panel or jcard_5panel.
    #[arg(long)]
    card_type: Option<CardKind>,

    /// Page size: letter, half, a4 or a5.
    #[arg(long)]
    page_size: Option<PageSize>,

    /// Target DPI (300-1200).
    #[arg(long)]
    dpi: Option<u32>,

    /// Leave out crop marks.
    #[arg(long, default_value_t = false)]
    no_crop_marks: bool,

    /// Gradient background from the cover art palette.
    #[arg(long, default_value_t = false)]
    gradient: bool,

    /// Palette indices of the gradient colors, as I,J.
    #[arg(long, value_parser = parse_pair)]
    gradient_colors: Option<(usize, usize)>,

    /// Show the Dolby NR logo on the spine.
    #[arg(long, default_value_t = false)]
    dolby_logo: bool,

    /// Tape length in minutes (both sides).
    #[arg(long)]
    tape_length: Option<u32>,

    /// Cover art placement: square or fullscale.
    #[arg(long)]
    cover_art_mode: Option<CoverArtMode>,

    /// Cover art alignment: left, center or right.
    #[arg(long)]
    cover_art_align: Option<Align>,

    /// Directory of downloaded font files (<Family>-<weight>.ttf).
    #[arg(long)]
    fonts_dir: Option<PathBuf>,

    /// Build plans in parallel.
    #[arg(long, default_value_t = false)]
    parallel: bool,
}

fn parse_pair(s: &str) -> Result<(usize, usize), String> {
    let (a, b) = s
        .split_once(',')
        .ok_or_else(|| format!("expected I,J but got '{s}'"))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<usize>()
            .map_err(|e| format!("bad index '{v}': {e}"))
    };
    Ok((parse(a)?, parse(b)?))
}

#[derive(serde::Serialize)]
struct Output<'a> {
    pages: &'a [Page],
    plans: &'a [RenderPlan],
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Album(args) => cmd_album(args),
    }
}

fn card_overrides(args: &AlbumArgs) -> ThemeOverrides {
    let mut o = ThemeOverrides::default();
    if args.gradient {
        o.use_gradient = true.into();
    }
    if let Some(pair) = args.gradient_colors {
        o.gradient_indices = pair.into();
    }
    if args.dolby_logo {
        o.dolby_logo = true.into();
    }
    if let Some(minutes) = args.tape_length {
        o.tape_length = minutes.into();
    }
    if let Some(mode) = args.cover_art_mode {
        o.cover_art_mode = mode.into();
    }
    if let Some(align) = args.cover_art_align {
        o.cover_art_align = align.into();
    }
    o
}

fn load_album(path: &Path) -> anyhow::Result<Album> {
    let (album, warnings) =
        AlbumSource::load(path).with_context(|| format!("load album '{}'", path.display()))?;
    for w in warnings {
        eprintln!("warning: {w}");
    }
    Ok(album)
}

fn cmd_album(args: AlbumArgs) -> anyhow::Result<()> {
    let mut cfg = AppConfig::load(args.config.as_deref())?;
    if let Some(dpi) = args.dpi {
        cfg.dpi = dpi;
    }
    if let Some(kind) = args.card_type {
        cfg.card_type = kind;
    }
    if let Some(page) = args.page_size {
        cfg.page_size = page;
    }
    if args.no_crop_marks {
        cfg.crop_marks = false;
    }
    cfg.validate()?;
    let dpi = cfg.dpi()?;
    let template = cfg.template(&args.output_name)?.to_string();

    let provider: Box<dyn FontProvider> = match &args.fonts_dir {
        Some(dir) => Box::new(DirFontProvider::new(dir)),
        None => Box::new(OfflineFontProvider),
    };
    let fonts = Arc::new(FontCache::from_boxed(provider));
    let session = CardSession::new(
        ThemeResolver::new(cfg.theme.clone(), fonts),
        Arc::new(ParleyMetrics::new()),
        PlanOptions {
            page_size: cfg.page_size,
            crop_marks: cfg.crop_marks,
        },
    );

    let overrides = card_overrides(&args);
    let mut cards: Vec<Card> = Vec::with_capacity(args.sources.len());
    for source in &args.sources {
        let paths: Vec<&str> = source.split(',').map(str::trim).collect();
        let card = match paths.as_slice() {
            [one] => session.card_single(cfg.card_type, load_album(Path::new(one))?, &overrides)?,
            [first, second] => session.card_double(
                load_album(Path::new(first))?,
                load_album(Path::new(second))?,
                &overrides,
            )?,
            _ => anyhow::bail!("'{source}' names more than two albums"),
        };
        cards.push(card);
    }

    let batch = BatchOpts {
        parallel: args.parallel,
        threads: None,
    };
    let mut plans = Vec::with_capacity(cards.len());
    for (card, result) in cards.iter().zip(session.build_render_plans(&cards, dpi, &batch)?) {
        let plan = result.with_context(|| {
            let album = &card.albums()[0];
            format!("lay out '{} - {}'", album.artist(), album.title())
        })?;
        for w in plan.warnings() {
            eprintln!("warning: {w}");
        }
        plans.push(plan);
    }
    let pages = session.compose_pages(&plans, dpi)?;

    let out = match args.output {
        Some(path) => path,
        None => {
            let album = &cards[0].albums()[0];
            PathBuf::from(format_output_name(
                &template,
                album.artist(),
                album.title(),
                album.year(),
            )?)
        }
    };
    if let Some(parent) = out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(&Output {
        pages: &pages,
        plans: &plans,
    })
    .context("serialize plans")?;
    std::fs::write(&out, json).with_context(|| format!("write '{}'", out.display()))?;

    eprintln!("wrote {}", out.display());
    Ok(())
}
