//! Versioned acquisition pipeline for the RePAIR puzzle dataset
//!
//! This crate turns a dataset request into prepared puzzle folders:
//!
//! - **Version resolution**: partial versions such as `2` resolve to the
//!   greatest matching catalog entry (`2.0.2`)
//! - **Download and verification**: archives are fetched once and checked
//!   against an MD5/SHA-256 digest before use
//! - **Status ledger**: a `STATUS` file records which versions are fully
//!   extracted and patched, so repeated runs skip finished work
//! - **Patch chains**: ordered, run-once rewrites of extracted metadata and
//!   images
//! - **Dataset façade**: lookup of puzzles by index or name
//!
//! # Architecture
//!
//! ```text
//!                  Dataset
//!                     |
//!   Catalog --- DataManager --- PatchRegistry
//!                /    |    \
//!   DownloaderVerifier | StatusLedger
//!                  extract
//!                     |
//!                 repair-fs
//! ```
//!
//! # Example
//!
//! ```no_run
//! use repair_core::{Catalog, Dataset, DatasetOptions, Result};
//!
//! fn example() -> Result<()> {
//!     let options = DatasetOptions::new("/data/repair", "2D_SOLVED").version("2");
//!     let dataset = Dataset::open(options, &Catalog::builtin())?;
//!     for sample in dataset.iter() {
//!         println!("{:?}", sample?.name());
//!     }
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod dataset;
pub mod download;
pub mod error;
pub mod extract;
pub mod getters;
pub mod imaging;
pub mod ledger;
pub mod manager;
pub mod patch;
pub mod puzzle;
pub mod version;

mod progress;

pub use catalog::{
    Acquisition, Catalog, CatalogEntry, RemoteDescriptor, VARIANT_2D_SOLVED, VARIANT_3D_SOLVED,
    VariantCatalog, VariantVersion,
};
pub use dataset::{Dataset, DatasetOptions};
pub use download::{DownloaderVerifier, Fetcher, HttpFetcher, LocalArchive, VerifyMode};
pub use error::{Error, ErrorKind, Result};
pub use extract::extract_fresh;
pub use getters::{PuzzleKey, Sample};
pub use ledger::{Status, StatusLedger};
pub use manager::{DataManager, EnsureReport};
pub use patch::{Patch, PatchChain, PatchId, PatchRegistry};
pub use puzzle::{FragmentRecord, PuzzleMetadata, list_puzzles};
pub use version::{Version, VersionRequest};
