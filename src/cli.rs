//! Command-line interface definitions and parsing
//!
//! This module defines the CLI structure for imgr using the `clap` crate.
//! The binary has two modes: running the gallery API server (the default)
//! and a one-shot scan that prints a JSON summary of what the index would
//! contain.
//!
//! Flags override the corresponding values loaded from the config file and
//! environment, so `imgr --root /srv/photos serve` works without any
//! configuration on disk.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use config::ConfigError;

use crate::config::Settings;

/// Top-level CLI arguments
#[derive(Parser, Debug)]
#[command(
    name = "imgr",
    version,
    about = "Folder-based image index and gallery API server",
    long_about = "Indexes a directory tree of image files grouped into folders, each \
                  optionally tagged via a .tags.json sidecar file, and serves random, \
                  paginated and tag-filtered image queries over HTTP."
)]
pub struct Cli {
    /// Path to the config file (defaults to the user config directory)
    #[arg(short, long, global = true, env = "IMGR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Root directory to index, overrides the config file
    #[arg(long, global = true, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// URL prefix images are served under, overrides the config file
    #[arg(long = "serve-path", global = true, value_name = "PREFIX")]
    pub serve_path: Option<String>,

    /// Address to bind the HTTP server to, overrides the config file
    #[arg(short, long, global = true, value_name = "ADDR")]
    pub bind: Option<String>,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Run the gallery API server (default)
    #[command(alias = "s")]
    Serve,
    /// Scan the root directory once and print a JSON summary
    Scan,
}

impl Cli {
    /// Parse command line arguments
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// The selected subcommand, defaulting to `serve`
    #[must_use]
    pub fn command(&self) -> Commands {
        self.command.unwrap_or(Commands::Serve)
    }

    /// Load settings and apply the CLI overrides on top
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config file cannot be read or parsed.
    pub fn settings(&self) -> Result<Settings, ConfigError> {
        let mut settings = Settings::load(self.config.as_deref())?;

        if let Some(root) = &self.root {
            settings.root_path = root.clone();
        }
        if let Some(serve_path) = &self.serve_path {
            settings.base_serve_path = serve_path.clone();
        }
        if let Some(bind) = &self.bind {
            settings.bind_addr = bind.clone();
        }

        Ok(settings)
    }
}
