//! Status command: show the STATUS ledger of a dataset root

use std::path::Path;

use colored::Colorize;
use repair_core::{Status, StatusLedger};
use repair_fs::RootLayout;

use crate::error::Result;

/// Run the status command
pub fn run_status(root: &Path) -> Result<()> {
    let layout = RootLayout::new(root);
    let ledger = StatusLedger::load(layout.status_file())?;
    let entries = ledger.entries();

    println!("{} {}", "Dataset root:".bold(), root.display());
    if entries.is_empty() {
        println!("  {}", "No dataset versions recorded".dimmed());
        return Ok(());
    }

    for (key, status) in entries {
        let marker = match status {
            Status::Ok => status.as_str().green(),
            Status::None => status.as_str().yellow(),
        };
        println!("  {key:<24} {marker}");
    }

    Ok(())
}
