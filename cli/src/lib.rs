//! fontfav CLI (made by FontLab https://www.fontlab.com/)

use std::env;
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum, ValueHint};
use regex::Regex;

use fontfav_core::catalog::{FamilyEntry, FontCatalog, ListCatalog, PathCatalog};
use fontfav_core::geometry::{clamp_to_screen, ScreenSize, WindowGeometry};
use fontfav_core::layout::{CharCountMeasure, FittedColumn};
use fontfav_core::output::{write_json_pretty, write_ndjson};
use fontfav_core::sample::{render_sample, SamplePreview, DEFAULT_POINT_SIZE, DEFAULT_SAMPLE};
use fontfav_core::session::{Action, Notice, Session};
use fontfav_core::settings::{SettingsRecord, DEFAULT_SETTINGS_FILE};

/// CLI entrypoint for fontfav.
#[derive(Debug, Parser)]
#[command(
    name = "fontfav",
    about = "Installed fonts and your favorites among them (made by FontLab https://www.fontlab.com/)"
)]
pub struct Cli {
    /// Settings file (defaults to $FONTFAV_CONFIG, then ./config.ini)
    #[arg(long = "config", global = true, value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// Log more (-v info, -vv debug); RUST_LOG overrides
    #[arg(short = 'v', long = "verbose", global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List installed font families
    List(ListArgs),
    /// Show favorites, dropping any that are no longer installed
    Favorites(FavoritesArgs),
    /// Add families to favorites
    Add(NamesArgs),
    /// Remove families from favorites
    Remove(NamesArgs),
    /// Re-read the catalog and drop stale favorites
    Reconcile(CatalogArgs),
    /// Write all fonts or favorites to a text file
    Export(ExportArgs),
    /// Show or change the remembered window geometry
    Geometry(GeometryArgs),
    /// Lay out a sample string in one family
    Preview(PreviewArgs),
}

#[derive(Debug, Args)]
struct CatalogArgs {
    /// Font directories to scan (defaults to the system font directories)
    #[arg(long = "font-dir", value_hint = ValueHint::DirPath)]
    font_dirs: Vec<PathBuf>,

    /// Also scan the system font directories when --font-dir is given
    #[arg(long = "system-fonts", action = ArgAction::SetTrue)]
    system_fonts: bool,

    /// Use a saved font list (one family per line) instead of scanning
    #[arg(
        long = "catalog-file",
        value_hint = ValueHint::FilePath,
        conflicts_with_all = ["font_dirs", "system_fonts"]
    )]
    catalog_file: Option<PathBuf>,

    /// Follow symlinks while walking font directories
    #[arg(long = "follow-symlinks", action = ArgAction::SetTrue)]
    follow_symlinks: bool,

    /// Number of threads used to read font files
    #[arg(short = 'J', long = "jobs")]
    jobs: Option<usize>,
}

#[derive(Debug, Args)]
struct OutputArgs {
    /// Emit a single JSON array
    #[arg(long = "json", action = ArgAction::SetTrue, conflicts_with = "ndjson")]
    json: bool,

    /// Emit newline-delimited JSON
    #[arg(long = "ndjson", action = ArgAction::SetTrue)]
    ndjson: bool,

    /// Format output as padded columns
    #[arg(long = "columns", action = ArgAction::SetTrue)]
    columns: bool,

    /// Control colorized output (auto|always|never)
    #[arg(long = "color", default_value_t = ColorChoice::Auto, value_enum)]
    color: ColorChoice,
}

#[derive(Debug, Args)]
struct ListArgs {
    #[command(flatten)]
    catalog: CatalogArgs,

    #[command(flatten)]
    output: OutputArgs,

    /// Regex patterns; a family is listed when any of them matches its name
    #[arg(short = 'n', long = "name", value_hint = ValueHint::Other)]
    name_patterns: Vec<String>,
}

#[derive(Debug, Args)]
struct FavoritesArgs {
    #[command(flatten)]
    catalog: CatalogArgs,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Debug, Args)]
struct NamesArgs {
    #[command(flatten)]
    catalog: CatalogArgs,

    /// Exact family names
    #[arg(required = true)]
    names: Vec<String>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum ExportWhich {
    All,
    Favorites,
}

#[derive(Debug, Args)]
struct ExportArgs {
    #[command(flatten)]
    catalog: CatalogArgs,

    /// Which list to write
    #[arg(value_enum)]
    which: ExportWhich,

    /// Destination file (defaults to font_list.txt or favorites_list.txt)
    #[arg(short = 'o', long = "output", value_hint = ValueHint::FilePath)]
    output: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct GeometryArgs {
    /// Fit the remembered geometry onto a screen of this size (WIDTHxHEIGHT)
    #[arg(long = "screen")]
    screen: Option<ScreenSize>,

    /// Remember a new geometry (WIDTHxHEIGHT+X+Y)
    #[arg(long = "set")]
    set: Option<WindowGeometry>,
}

#[derive(Debug, Args)]
struct PreviewArgs {
    #[command(flatten)]
    catalog: CatalogArgs,

    /// Family to preview
    name: String,

    /// Sample text
    #[arg(short = 't', long = "text", default_value = DEFAULT_SAMPLE)]
    text: String,

    /// Point size
    #[arg(short = 's', long = "size", default_value_t = DEFAULT_POINT_SIZE)]
    size: f32,

    /// Emit the glyph run as JSON
    #[arg(long = "json", action = ArgAction::SetTrue)]
    json: bool,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum ColorChoice {
    Auto,
    Always,
    Never,
}

/// Parse CLI args and execute the selected command.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = settings_path(cli.config.as_deref());
    match cli.command {
        Command::List(args) => run_list(args, &config),
        Command::Favorites(args) => run_favorites(args, &config),
        Command::Add(args) => run_names(args, &config, "add"),
        Command::Remove(args) => run_names(args, &config, "remove"),
        Command::Reconcile(args) => run_reconcile(args, &config),
        Command::Export(args) => run_export(args, &config),
        Command::Geometry(args) => run_geometry(args, &config),
        Command::Preview(args) => run_preview(args),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .try_init();
}

fn settings_path(flag: Option<&Path>) -> PathBuf {
    if let Some(path) = flag {
        return path.to_path_buf();
    }
    match env::var_os("FONTFAV_CONFIG") {
        Some(raw) if !raw.is_empty() => PathBuf::from(raw),
        _ => PathBuf::from(DEFAULT_SETTINGS_FILE),
    }
}

fn open_session(
    args: &CatalogArgs,
    config: &Path,
) -> Result<(Session<Box<dyn FontCatalog>>, Vec<Notice>)> {
    let catalog = build_catalog(args)?;
    log::debug!("using settings file {}", config.display());
    Session::open(catalog, config)
}

fn build_catalog(args: &CatalogArgs) -> Result<Box<dyn FontCatalog>> {
    if let Some(file) = &args.catalog_file {
        return Ok(Box::new(ListCatalog::from_file(file)?));
    }

    let mut roots = args.font_dirs.clone();
    if args.system_fonts || roots.is_empty() {
        roots.extend(system_font_roots()?);
    }

    Ok(Box::new(
        PathCatalog::new(roots)
            .follow_symlinks(args.follow_symlinks)
            .jobs(args.jobs),
    ))
}

/// Where a well-known font directory is anchored.
enum FontDirBase {
    Absolute,
    Env(&'static str),
}

#[cfg(target_os = "macos")]
const PLATFORM_FONT_DIRS: &[(FontDirBase, &str)] = &[
    (FontDirBase::Absolute, "/System/Library/Fonts"),
    (FontDirBase::Absolute, "/Library/Fonts"),
    (FontDirBase::Env("HOME"), "Library/Fonts"),
];

#[cfg(target_os = "linux")]
const PLATFORM_FONT_DIRS: &[(FontDirBase, &str)] = &[
    (FontDirBase::Absolute, "/usr/share/fonts"),
    (FontDirBase::Absolute, "/usr/local/share/fonts"),
    (FontDirBase::Env("HOME"), ".local/share/fonts"),
    (FontDirBase::Env("HOME"), ".fonts"),
];

#[cfg(target_os = "windows")]
const PLATFORM_FONT_DIRS: &[(FontDirBase, &str)] = &[
    (FontDirBase::Env("SYSTEMROOT"), "Fonts"),
    (FontDirBase::Env("LOCALAPPDATA"), "Microsoft/Windows/Fonts"),
];

#[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
const PLATFORM_FONT_DIRS: &[(FontDirBase, &str)] = &[];

fn system_font_roots() -> Result<Vec<PathBuf>> {
    let (source, mut roots): (&str, Vec<PathBuf>) = match env::var_os("FONTFAV_SYSTEM_FONT_DIRS") {
        Some(raw) => (
            "FONTFAV_SYSTEM_FONT_DIRS",
            env::split_paths(&raw).filter(|p| !p.as_os_str().is_empty()).collect(),
        ),
        None => (
            "the platform defaults",
            PLATFORM_FONT_DIRS
                .iter()
                .filter_map(|(base, dir)| match base {
                    FontDirBase::Absolute => Some(PathBuf::from(dir)),
                    FontDirBase::Env(var) => env::var_os(var).map(|v| PathBuf::from(v).join(dir)),
                })
                .collect(),
        ),
    };

    roots.retain(|p| p.is_dir());
    roots.sort();
    roots.dedup();

    if roots.is_empty() {
        return Err(anyhow!("no existing font directories in {source}"));
    }
    log::debug!("system font roots from {source}: {roots:?}");
    Ok(roots)
}

fn run_list(args: ListArgs, config: &Path) -> Result<()> {
    let (session, notices) = open_session(&args.catalog, config)?;
    report(&notices);

    let patterns = compile_patterns(&args.name_patterns)?;
    let families = session.catalog().filter(&patterns);
    let favorites = session.store();

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if args.output.ndjson {
        write_ndjson(&families, &mut handle)?;
    } else if args.output.json {
        write_json_pretty(&families, &mut handle)?;
    } else if args.output.columns {
        let color = use_color(args.output.color, &handle);
        let rows: Vec<Row> = families
            .iter()
            .map(|f| Row::for_family(f, favorites.contains(&f.name)))
            .collect();
        write_columns(&rows, &mut handle, color)?;
    } else {
        write_plain(families.iter().map(|f| f.name.as_str()), &mut handle)?;
    }

    Ok(())
}

fn run_favorites(args: FavoritesArgs, config: &Path) -> Result<()> {
    let (session, notices) = open_session(&args.catalog, config)?;
    report(&notices);

    let names = session.store().sorted();
    let families: Vec<&FamilyEntry> = names
        .iter()
        .filter_map(|n| session.catalog().family(n))
        .collect();

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if args.output.ndjson {
        write_ndjson(&families, &mut handle)?;
    } else if args.output.json {
        write_json_pretty(&families, &mut handle)?;
    } else if args.output.columns {
        let color = use_color(args.output.color, &handle);
        let rows: Vec<Row> = families.iter().map(|f| Row::for_family(f, true)).collect();
        write_columns(&rows, &mut handle, color)?;
    } else {
        write_plain(names.iter().map(String::as_str), &mut handle)?;
    }

    Ok(())
}

fn run_names(args: NamesArgs, config: &Path, action: &str) -> Result<()> {
    let (mut session, mut notices) = open_session(&args.catalog, config)?;

    for name in &args.names {
        notices.extend(session.dispatch(Action::from_name(action, Some(name.as_str()))?));
    }
    notices.extend(session.dispatch(Action::Close));

    finish(&notices)
}

fn run_reconcile(args: CatalogArgs, config: &Path) -> Result<()> {
    let (mut session, mut notices) = open_session(&args, config)?;
    notices.extend(session.dispatch(Action::Close));
    finish(&notices)
}

fn run_export(args: ExportArgs, config: &Path) -> Result<()> {
    let (mut session, notices) = open_session(&args.catalog, config)?;
    report(&notices);

    let action = match args.which {
        ExportWhich::All => {
            Action::SaveAll(args.output.unwrap_or_else(|| PathBuf::from("font_list.txt")))
        }
        ExportWhich::Favorites => Action::SaveFavorites(
            args.output
                .unwrap_or_else(|| PathBuf::from("favorites_list.txt")),
        ),
    };

    let exported = session.dispatch(action);
    finish(&exported)
}

fn run_geometry(args: GeometryArgs, config: &Path) -> Result<()> {
    let mut record = SettingsRecord::load(config);

    if let Some(geometry) = args.set {
        record.geometry = geometry;
        record.save(config)?;
    }

    let geometry = match args.screen {
        Some(screen) => clamp_to_screen(record.geometry, screen),
        None => record.geometry,
    };

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{geometry}")?;
    Ok(())
}

fn run_preview(args: PreviewArgs) -> Result<()> {
    let catalog = build_catalog(&args.catalog)?.list_families()?;
    let preview = render_sample(&catalog, &args.name, args.size, &args.text)?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if args.json {
        serde_json::to_writer_pretty(&mut handle, &preview)?;
        writeln!(handle)?;
    } else {
        write_preview(&preview, &mut handle)?;
    }
    Ok(())
}

fn compile_patterns(patterns: &[String]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|p| Regex::new(p).with_context(|| format!("invalid regex: {p}")))
        .collect()
}

fn use_color(choice: ColorChoice, handle: &impl IsTerminal) -> bool {
    match choice {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => handle.is_terminal(),
    }
}

/// Print notices to stderr as they would appear in a message box.
fn report(notices: &[Notice]) {
    let stderr = io::stderr();
    let mut handle = stderr.lock();
    for notice in notices {
        let _ = if notice.is_problem() {
            writeln!(handle, "warning: {notice}")
        } else {
            writeln!(handle, "{notice}")
        };
    }
}

/// Report notices and fail when any of them is a problem.
fn finish(notices: &[Notice]) -> Result<()> {
    report(notices);
    let problems = notices.iter().filter(|n| n.is_problem()).count();
    if problems > 0 {
        return Err(anyhow!("{problems} action(s) did not complete"));
    }
    Ok(())
}

fn write_plain<'a>(names: impl IntoIterator<Item = &'a str>, mut w: impl Write) -> Result<()> {
    for name in names {
        writeln!(w, "{name}")?;
    }
    Ok(())
}

struct Row {
    name: String,
    favorite: bool,
    faces: usize,
    location: String,
}

impl Row {
    fn for_family(family: &FamilyEntry, favorite: bool) -> Self {
        Self {
            name: family.name.clone(),
            favorite,
            faces: family.faces.len(),
            location: family
                .faces
                .first()
                .map(|f| f.path_with_index())
                .unwrap_or_default(),
        }
    }
}

const NAME_PADDING: f32 = 2.0;

fn write_columns(rows: &[Row], mut w: impl Write, color: bool) -> Result<()> {
    // refit on every render so the width always matches the rows shown
    let names = FittedColumn::fit(
        rows.iter().map(|r| r.name.clone()).collect(),
        &CharCountMeasure,
        NAME_PADDING,
    );
    let name_width = names.cells();

    for row in rows {
        let marker = if row.favorite { "*" } else { " " };
        let padded_name = format!("{:<name_width$}", row.name);
        let faces = format!("faces:{:<3}", row.faces);

        let rendered_marker = apply_color(marker, color, AnsiColor::Green);
        let rendered_name = apply_color(&padded_name, color, AnsiColor::Yellow);
        let rendered_path = apply_color(&row.location, color, AnsiColor::Cyan);

        let line = format!("{rendered_marker} {rendered_name}{faces} {rendered_path}");
        writeln!(w, "{}", line.trim_end())?;
    }

    Ok(())
}

fn write_preview(preview: &SamplePreview, mut w: impl Write) -> Result<()> {
    writeln!(
        w,
        "{} at {}pt: {} glyphs, {:.1} wide",
        preview.family,
        preview.point_size,
        preview.glyphs.len(),
        preview.width
    )?;
    if !preview.missing.is_empty() {
        let missing: String = preview.missing.iter().collect();
        writeln!(w, "missing: {missing}")?;
    }
    Ok(())
}

#[derive(Copy, Clone)]
enum AnsiColor {
    Cyan,
    Yellow,
    Green,
}

fn apply_color(text: &str, color: bool, code: AnsiColor) -> String {
    if !color {
        return text.to_string();
    }

    let code_str = match code {
        AnsiColor::Cyan => "36",
        AnsiColor::Yellow => "33",
        AnsiColor::Green => "32",
    };

    format!("\u{1b}[{}m{}\u{1b}[0m", code_str, text)
}
