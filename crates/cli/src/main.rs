//! Print the Steam game catalog the dial would show.
//!
//! Examples:
//!   steamscroll-cli
//!   steamscroll-cli --steam-dir "D:\\Steam" --extractor ".\\bin\\appinfoparser.exe"
//!   steamscroll-cli --filter game --filter tool --json
//!   steamscroll-cli --all --verbose
//!   steamscroll-cli --launch 440
//!
//! Notes:
//! - Without --extractor no appinfo metadata is read, so every entry is `Unknown`
//!   with the placeholder icon. Use --all or `--filter unknown` to see them.

use std::{path::PathBuf, sync::Arc};

use clap::Parser;
use serde::Serialize;

use steamscroll_core::{launcher::steam_run_uri, prelude::*, steam::icon::PLACEHOLDER_ICON};

// ───────────────────────────── CLI Args ─────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "steamscroll-cli",
    version,
    about = "List installed Steam apps with their appinfo category and icon"
)]
struct Args {
    /// Steam install directory (defaults to the platform's standard location)
    #[arg(short, long, value_name = "DIR")]
    steam_dir: Option<String>,

    /// appinfo extractor executable (prints `id,category,iconRef` lines)
    #[arg(short, long, value_name = "EXE")]
    extractor: Option<PathBuf>,

    /// Category to include; repeatable. Defaults to game, tool, application
    #[arg(short, long = "filter", value_name = "CATEGORY")]
    filters: Vec<String>,

    /// Print every entry regardless of category
    #[arg(short, long, conflicts_with = "filters")]
    all: bool,

    /// Image used when an app has no cached icon
    #[arg(long, value_name = "PATH", default_value = PLACEHOLDER_ICON)]
    placeholder: PathBuf,

    /// Emit a JSON object (`install_dir`, `entries`) instead of tab-separated lines
    #[arg(long)]
    json: bool,

    /// Launch this app id through the Steam client after listing
    #[arg(long, value_name = "APP_ID")]
    launch: Option<String>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

// ───────────────────────────── Logger ─────────────────────────────

/// Diagnostics go to stderr so stdout stays machine-readable.
#[derive(Clone)]
struct StderrLogger {
    verbose: bool,
}

impl CoreLog for StderrLogger {
    fn log(&self, level: LogLevel, msg: &str) {
        match level {
            LogLevel::Debug | LogLevel::Info if !self.verbose => {}
            LogLevel::Debug => eprintln!("DEBUG: {msg}"),
            LogLevel::Info => eprintln!("INFO:  {msg}"),
            LogLevel::Warn => eprintln!("WARN:  {msg}"),
            LogLevel::Error => eprintln!("ERROR: {msg}"),
        }
    }
}

/// Stand-in when no extractor is configured; the catalog degrades to `Unknown`.
struct NoMetadata;

impl MetadataExtractor for NoMetadata {
    fn fetch(
        &self,
        _appinfo: &std::path::Path,
        _logger: &Arc<dyn CoreLog>,
    ) -> Result<Vec<AppMetadataRecord>, ExtractorError> {
        Err(ExtractorError::Invocation(
            "no extractor configured (pass --extractor)".to_string(),
        ))
    }
}

#[derive(Serialize)]
struct Listing {
    install_dir: String,
    entries: Vec<CatalogEntry>,
    /// Catalog size before filtering
    #[serde(skip)]
    total: usize,
}

/// Scan the Steam install and apply the requested filters.
fn run(args: &Args, core_log: &Arc<dyn CoreLog>) -> Result<Listing, String> {
    let install_dir = effective_install_dir(args.steam_dir.as_deref());
    core_log.info(&format!("Steam dir: {}", install_dir.display()));

    if !appinfo_path(&install_dir).is_file() {
        return Err(format!(
            "not a Steam directory (no appcache/appinfo.vdf): {}",
            install_dir.display()
        ));
    }

    let extractor: Box<dyn MetadataExtractor> = match args.extractor.as_ref() {
        Some(exe) => {
            if !exe.is_file() {
                return Err(format!("--extractor not found: {}", exe.display()));
            }
            Box::new(ProcessExtractor::new(exe.clone()))
        }
        None => Box::new(NoMetadata),
    };
    let icons = IconResolver::new(args.placeholder.clone());

    let catalog = load_catalog(&install_dir, extractor.as_ref(), &icons, core_log);
    let entries = if args.all {
        catalog.to_vec()
    } else {
        let filters = FilterSet::from_options(&args.filters);
        core_log.debug(&format!("filters: {:?}", filters.to_options()));
        filters.apply(&catalog)
    };

    Ok(Listing {
        install_dir: install_dir.to_string_lossy().into_owned(),
        entries,
        total: catalog.len(),
    })
}

// ───────────────────────────── main ─────────────────────────────

fn main() -> Result<(), String> {
    let args = Args::parse();

    let core_log: Arc<dyn CoreLog> = Arc::new(StderrLogger {
        verbose: args.verbose,
    });

    let listing = run(&args, &core_log)?;

    if args.json {
        let text = serde_json::to_string_pretty(&listing).map_err(|e| format!("json: {e}"))?;
        println!("{text}");
    } else {
        for e in &listing.entries {
            println!("{}\t{}\t{}\t{}", e.id, e.category, e.name, e.icon_path);
        }
    }
    core_log.info(&format!(
        "{} of {} entries shown",
        listing.entries.len(),
        listing.total
    ));

    if let Some(app_id) = args.launch.as_deref() {
        SteamUriLauncher.launch(app_id)?;
        core_log.info(&format!("Launched {}", steam_run_uri(app_id)));
    }
    Ok(())
}
