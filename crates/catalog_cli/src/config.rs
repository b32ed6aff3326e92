//! Command-line surface and runtime configuration for the catalog shell.
//!
//! Sources, highest priority first: flags, `CATALOG_*` environment
//! variables, built-in defaults.

use crate::commands::Command;
use clap::Parser;
use std::path::PathBuf;

const DEFAULT_DB_FILE_NAME: &str = "catalog.sqlite3";

/// Catalog - category and product catalog
#[derive(Parser, Debug)]
#[command(name = "catalog")]
#[command(bin_name = "catalog")]
#[command(about = "Manage product categories and products in a local SQLite catalog")]
#[command(version = catalog_core::core_version())]
#[command(disable_help_subcommand = true)]
pub(crate) struct Cli {
    /// SQLite database file
    #[arg(long, global = true, env = "CATALOG_DB_PATH")]
    #[arg(default_value = DEFAULT_DB_FILE_NAME)]
    pub(crate) db: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "CATALOG_LOG_LEVEL")]
    log_level: Option<String>,

    /// Directory for rolling log files; logging stays off when unset
    #[arg(long, global = true, env = "CATALOG_LOG_DIR")]
    log_dir: Option<String>,

    #[command(subcommand)]
    pub(crate) command: Command,
}

impl Cli {
    pub(crate) fn log_level(&self) -> &str {
        self.log_level
            .as_deref()
            .unwrap_or_else(|| catalog_core::default_log_level())
    }

    pub(crate) fn log_dir(&self) -> Option<&str> {
        self.log_dir
            .as_deref()
            .filter(|dir| !dir.trim().is_empty())
    }
}
