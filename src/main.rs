//! Imgr server entry point
//!
//! This is the main executable for the imgr gallery server. It indexes a
//! directory of image-set folders and serves random, paginated and
//! tag-filtered image queries over HTTP, alongside the image files
//! themselves.
//!
//! # Usage
//!
//! ```bash
//! # Run the server against a photo library (default command)
//! imgr --root /srv/photos
//! imgr --root /srv/photos --bind 0.0.0.0:8080 serve
//!
//! # Scan once and print what the index would contain
//! imgr --root /srv/photos scan
//!
//! # Use an explicit config file
//! imgr --config /etc/imgr/config.toml
//! ```
//!
//! # Configuration
//!
//! Settings are layered from built-in defaults, a TOML config file
//! (`~/.config/imgr/config.toml` on Linux unless `--config` is given),
//! `IMGR_*` environment variables, and finally the CLI flags. A missing or
//! empty root is not a startup error; the index stays empty until a scan
//! finds something.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use imgr::cli::{Cli, Commands};
use imgr::config::Settings;
use imgr::index::{FolderRecord, IndexStore, Snapshot};
use imgr::query::QueryEngine;
use imgr::scan::Scanner;
use imgr::{ImgrError, server};

type Result<T> = std::result::Result<T, ImgrError>;

const DEFAULT_LOG_FILTER: &str = "imgr=info,tower_http=info";

fn init_tracing(quiet: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if quiet { "warn" } else { DEFAULT_LOG_FILTER })
    });

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// JSON summary printed by the `scan` subcommand
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ScanSummary<'a> {
    root: String,
    built_at: DateTime<Utc>,
    image_count: usize,
    folder_count: usize,
    folders: &'a [FolderRecord],
}

impl<'a> ScanSummary<'a> {
    fn new(settings: &Settings, snapshot: &'a Snapshot) -> Self {
        Self {
            root: settings.root_path.display().to_string(),
            built_at: snapshot.built_at,
            image_count: snapshot.images.len(),
            folder_count: snapshot.folders.len(),
            folders: &snapshot.folders,
        }
    }
}

async fn run_serve(settings: Settings) -> Result<()> {
    let store = Arc::new(IndexStore::new(&settings));

    // Build the first snapshot up front; a failure degrades to an empty
    // index rather than aborting startup.
    let initial = Arc::clone(&store);
    match tokio::task::spawn_blocking(move || initial.rebuild()).await {
        Ok(Ok(())) => {}
        Ok(Err(error)) => {
            tracing::error!(%error, "initial scan failed, starting with an empty index");
        }
        Err(error) => return Err(ImgrError::ServerError(error.to_string())),
    }

    let engine = QueryEngine::new(store);
    server::serve(settings, engine).await
}

fn run_scan(settings: &Settings) -> Result<()> {
    let snapshot = Scanner::new(settings).scan()?;
    let summary = ScanSummary::new(settings, &snapshot);
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let settings = cli.settings()?;
    match cli.command() {
        Commands::Serve => run_serve(settings).await,
        Commands::Scan => run_scan(&settings),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();
    init_tracing(cli.quiet);

    if let Err(error) = run(cli).await {
        tracing::error!(%error, "exiting");
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}
