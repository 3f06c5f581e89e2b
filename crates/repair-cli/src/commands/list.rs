//! List the puzzles of a dataset version

use std::path::Path;

use colored::Colorize;
use repair_core::Catalog;

use crate::cli::Selection;
use crate::error::Result;

/// Run the list command
pub fn run_list(root: &Path, catalog: &Catalog, selection: &Selection) -> Result<()> {
    let dataset = super::open(root, catalog, selection)?;

    for name in dataset.names() {
        println!("{name}");
    }
    eprintln!(
        "{} {} puzzles in {}",
        "Total:".dimmed(),
        dataset.len(),
        dataset.variant_version().key().cyan()
    );

    Ok(())
}
