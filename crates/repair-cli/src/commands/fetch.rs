//! Fetch command: download, verify and prepare one dataset version

use std::path::Path;

use colored::Colorize;
use repair_core::Catalog;

use crate::cli::Selection;
use crate::error::Result;

/// Run the fetch command
pub fn run_fetch(root: &Path, catalog: &Catalog, selection: &Selection) -> Result<()> {
    let dataset = super::open(root, catalog, selection)?;

    println!(
        "{} {}",
        "Ready:".green().bold(),
        dataset.variant_version().key().cyan()
    );
    if let Some(report) = dataset.report() {
        let fetched = if report.fetched { "downloaded" } else { "cached" };
        println!("  {:<10} {} ({})", "archive", report.archive.display(), fetched.dimmed());
        if report.extracted {
            println!("  {:<10} {} applied", "patches", report.patches_applied);
        } else {
            println!("  {:<10} {}", "patches", "already prepared".dimmed());
        }
    }
    println!("  {:<10} {}", "puzzles", dataset.len());
    println!("  {:<10} {}", "data", dataset.data_path().display());

    Ok(())
}
