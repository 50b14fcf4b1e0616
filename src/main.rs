use clap::{ArgAction, Parser, Subcommand};
use imgror::acquire::{AcquireError, HttpFetcher, IngestReport, Upload, upload_name};
use imgror::config::{self, ToolConfig};
use imgror::imaging::{RustBackend, TransformParams};
use imgror::output;
use imgror::session::Session;
use std::path::PathBuf;
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

/// Where images come from.
#[derive(clap::Args, Clone)]
struct SourceArgs {
    /// Image files to add to the library (PNG, JPG, JPEG by default)
    files: Vec<PathBuf>,

    /// Fetch an image over HTTP(S); repeatable
    #[arg(long = "url", value_name = "URL")]
    urls: Vec<String>,
}

#[derive(clap::Args, Clone)]
struct CompressArgs {
    #[command(flatten)]
    sources: SourceArgs,

    /// Library entry to edit (defaults to the first one added)
    #[arg(long)]
    select: Option<String>,

    /// Target width in pixels, 1-65535 (defaults to the native width)
    #[arg(long, value_parser = dimension_parser())]
    width: Option<u32>,

    /// Target height in pixels, 1-65535 (defaults to the native height)
    #[arg(long, value_parser = dimension_parser())]
    height: Option<u32>,

    /// When only one of --width/--height is given, derive the other from the aspect ratio
    #[arg(long)]
    keep_aspect: bool,

    /// JPEG quality, clamped to 10-100
    #[arg(long)]
    quality: Option<u32>,

    /// Directory to write IMGROR_<name>.jpg into (overrides export.output_dir)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Show the preview without writing a file
    #[arg(long)]
    dry_run: bool,

    /// Print the preview report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
#[command(name = "imgror")]
#[command(about = "Live image resizer and JPEG compressor")]
#[command(long_about = "\
Live image resizer and JPEG compressor

Images from local files and URLs are loaded into an in-memory library. Pick
one, choose a width, height and JPEG quality, and see the size before and
after. The result is written as IMGROR_<name>.jpg.

The \"estimated size\" of the original is a JPEG re-encode at its native size
and quality 85, not its size on disk.

Run 'imgror gen-config' to print a documented imgror.toml.")]
#[command(version)]
struct Cli {
    /// Config file (default: ./imgror.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load images and list the library
    List {
        #[command(flatten)]
        sources: SourceArgs,

        /// Print the library as JSON
        #[arg(long)]
        json: bool,
    },
    /// Load images, preview a resize/compression, and export the result
    Compress(CompressArgs),
    /// Print a stock imgror.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let cwd = std::env::current_dir()?;
    let config = config::load_config(cli.config.as_deref(), &cwd)?;
    let backend = RustBackend::with_filter(config.transform.filter);

    match cli.command {
        Command::List { sources, json } => {
            let session = load_session(&config, &backend, &sources, !json)?;
            let rows = session.summaries(&backend)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                output::print_library(&rows);
            }
        }
        Command::Compress(args) => {
            let mut session = load_session(&config, &backend, &args.sources, !args.json)?;

            let name = match &args.select {
                Some(name) => name.clone(),
                None => session
                    .library()
                    .names()
                    .first()
                    .map(|n| n.to_string())
                    .ok_or("The library is empty. Add files or a URL.")?,
            };
            session.select(&name)?;

            match (args.width, args.height, args.keep_aspect) {
                (Some(w), None, true) => session.fit_width(w)?,
                (None, Some(h), true) => session.fit_height(h)?,
                (w, h, _) => {
                    if let Some(w) = w {
                        session.set_width(w)?;
                    }
                    if let Some(h) = h {
                        session.set_height(h)?;
                    }
                }
            }
            if let Some(q) = args.quality {
                session.set_quality(q)?;
            }

            let preview = session.preview(&backend)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&preview.report)?);
            } else {
                output::print_preview(&preview.report);
            }

            if !args.dry_run {
                let dir = args.output.unwrap_or(config.export.output_dir);
                let path = preview.into_artifact().write_to(&dir)?;
                info!(path = %path.display(), "written");
                if !args.json {
                    output::print_exported(&path);
                }
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Target edge length in pixels, within what a JPEG can hold.
fn dimension_parser() -> clap::builder::RangedI64ValueParser<u32> {
    clap::value_parser!(u32).range(1..=i64::from(TransformParams::MAX_DIMENSION))
}

/// Log to stderr; stdout is reserved for results.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Build a session from files and URLs, reporting per-item outcomes.
///
/// Acquisition failures are reported and skipped; they never abort the run.
fn load_session(
    config: &ToolConfig,
    backend: &RustBackend,
    sources: &SourceArgs,
    print: bool,
) -> Result<Session, Box<dyn std::error::Error>> {
    let mut session = Session::new(&config.transform);

    let mut read_failures = Vec::new();
    let mut uploads = Vec::new();
    for path in &sources.files {
        match Upload::from_path(path) {
            Ok(upload) => uploads.push(upload),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "cannot read file");
                read_failures.push((upload_name(path), err));
            }
        }
    }

    let mut report: IngestReport =
        session.add_uploads(backend, &uploads, &config.upload.extensions);
    report.failed.extend(read_failures);

    let mut fetched: Vec<(String, Result<String, AcquireError>)> = Vec::new();
    if !sources.urls.is_empty() {
        let fetcher = HttpFetcher::new(&config.fetch)?;
        for url in &sources.urls {
            let result = session.fetch_url(backend, &fetcher, url);
            if let Err(err) = &result {
                warn!(url = %url, error = %err, "fetch failed");
            }
            fetched.push((url.clone(), result));
        }
    }

    if print {
        output::print_ingest(&report, &fetched);
    }
    Ok(session)
}
