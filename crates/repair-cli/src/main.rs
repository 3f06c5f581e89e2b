//! RePAIR dataset CLI
//!
//! Fetches, verifies and patches RePAIR puzzle releases, and inspects the
//! prepared data on disk.

mod cli;
mod commands;
mod error;
mod logging;

use std::path::PathBuf;

use clap::{CommandFactory, Parser};
use colored::Colorize;
use repair_core::Catalog;

use cli::{Cli, Commands};
use error::{CliError, Result};

/// Folder under the user data directory used when `--root` is not given.
const DEFAULT_ROOT_DIR: &str = "repair-dataset";

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("{}: logging disabled: {}", "warning".yellow().bold(), e);
    }
    tracing::debug!("Verbose mode enabled");

    let Some(command) = cli.command else {
        Cli::command()
            .print_help()
            .map_err(|e| CliError::user(e.to_string()))?;
        println!();
        return Ok(());
    };

    let catalog = match &cli.catalog {
        Some(path) => Catalog::load(path)?,
        None => Catalog::builtin(),
    };

    match command {
        Commands::Fetch { selection } => {
            commands::run_fetch(&resolve_root(cli.root)?, &catalog, &selection)
        }
        Commands::List { selection } => {
            commands::run_list(&resolve_root(cli.root)?, &catalog, &selection)
        }
        Commands::Status => commands::run_status(&resolve_root(cli.root)?),
        Commands::Versions { variant } => commands::run_versions(&catalog, variant.as_deref()),
    }
}

fn resolve_root(root: Option<PathBuf>) -> Result<PathBuf> {
    match root {
        Some(root) => Ok(root),
        None => dirs::data_dir()
            .map(|dir| dir.join(DEFAULT_ROOT_DIR))
            .ok_or_else(|| CliError::user("No data directory found; pass --root")),
    }
}
