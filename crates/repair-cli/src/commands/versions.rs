//! Versions command: show what the catalog knows about

use colored::Colorize;
use repair_core::Catalog;

use crate::error::Result;

/// Run the versions command
pub fn run_versions(catalog: &Catalog, variant_filter: Option<&str>) -> Result<()> {
    let variants: Vec<String> = match variant_filter {
        Some(name) => {
            catalog.variant(name)?;
            vec![name.to_string()]
        }
        None => catalog.variant_names(),
    };

    for name in variants {
        let variant = catalog.variant(&name)?;
        println!("{}:", name.cyan().bold());
        for (version, entry) in &variant.versions {
            let label = if *version == variant.default_version {
                format!("{} {}", version.to_string().green(), "(default)".dimmed())
            } else {
                version.to_string().green().to_string()
            };
            let base = entry.base_or(version);
            let mut detail = format!("from v{base}");
            if !entry.patches.is_empty() {
                let patches: Vec<&str> = entry.patches.iter().map(|p| p.as_str()).collect();
                detail.push_str(&format!(" + {}", patches.join(", ")));
            }
            println!("  {:<24} {}", label, detail.dimmed());
        }
        println!();
    }

    Ok(())
}
