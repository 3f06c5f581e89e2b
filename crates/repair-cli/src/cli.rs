//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// RePAIR dataset manager - download, verify, patch and browse puzzle releases
#[derive(Parser, Debug)]
#[command(name = "repair")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Dataset root folder (defaults to the user data directory)
    #[arg(long, global = true, env = "REPAIR_ROOT")]
    pub root: Option<PathBuf>,

    /// Catalog file (TOML, JSON or YAML) replacing the built-in catalog
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Which dataset version to open and how
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Dataset variant
    #[arg(long, default_value = "2D_SOLVED")]
    pub variant: String,

    /// Version to resolve, e.g. 2, 2.0.2 or 2.5b (default: the variant default)
    #[arg(long = "version", value_name = "VERSION")]
    pub version: Option<String>,

    /// Use the prepared data in the root as is, without downloading
    #[arg(long)]
    pub unmanaged: bool,

    /// Rebuild this version even if it is already prepared
    #[arg(long)]
    pub from_scratch: bool,

    /// Skip archive checksum verification
    #[arg(long)]
    pub skip_verify: bool,

    /// Open in supervised mode (2D only)
    #[arg(long)]
    pub supervised: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Download, verify and prepare a dataset version
    ///
    /// Examples:
    ///   repair fetch                          # default 2D_SOLVED version
    ///   repair fetch --version 2              # latest 2.x release
    ///   repair fetch --variant 3D_SOLVED
    Fetch {
        #[command(flatten)]
        selection: Selection,
    },

    /// List the puzzles of a prepared dataset version
    List {
        #[command(flatten)]
        selection: Selection,
    },

    /// Show the preparation state of every version in the root
    Status,

    /// Show supported variants and versions
    Versions {
        /// Only show this variant
        #[arg(long)]
        variant: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_fetch_flags() {
        let cli = Cli::try_parse_from([
            "repair",
            "--root",
            "/data",
            "fetch",
            "--version",
            "2",
            "--from-scratch",
            "--skip-verify",
        ])
        .unwrap();

        assert_eq!(cli.root, Some(PathBuf::from("/data")));
        let Some(Commands::Fetch { selection }) = cli.command else {
            panic!("expected fetch");
        };
        assert_eq!(selection.variant, "2D_SOLVED");
        assert_eq!(selection.version.as_deref(), Some("2"));
        assert!(selection.from_scratch && selection.skip_verify);
        assert!(!selection.unmanaged);
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["repair", "status", "--root", "/data", "-v"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.command, Some(Commands::Status));
    }
}
