//! Catalog command-line shell.
//!
//! # Responsibility
//! - Parse the command line, then wire logging, storage and services together.
//! - Translate service errors into user-facing messages and exit codes.

mod commands;
mod config;

use anyhow::{Context, Result};
use catalog_core::db::open_db;
use catalog_core::{
    init_logging, CatalogError, CategoryService, ProductService, SqliteCategoryRepository,
    SqliteProductRepository, SqliteTransactionManager,
};
use clap::Parser;
use config::Cli;
use log::info;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<CatalogError>() {
                Some(catalog_err) => eprintln!("{}", commands::user_message(catalog_err)),
                None => eprintln!("error: {err:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir() {
        init_logging(cli.log_level(), log_dir).context("failed to initialize logging")?;
    }

    let conn = open_db(&cli.db)
        .with_context(|| format!("failed to open database: {}", cli.db.display()))?;
    let categories = CategoryService::new(SqliteTransactionManager::new(
        &conn,
        SqliteCategoryRepository::new,
    ));
    let products = ProductService::new(
        SqliteTransactionManager::new(&conn, SqliteProductRepository::new),
        &categories,
    );

    info!(
        "event=cli_command module=cli status=start command={}",
        cli.command.label()
    );
    commands::dispatch(&cli.command, &categories, &products)
}
