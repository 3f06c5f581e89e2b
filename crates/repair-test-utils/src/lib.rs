//! Shared test fixtures for the repair-dataset workspace.
//!
//! Dev-dependency only, never published. Nothing here touches the network.
//!
//! # Modules
//!
//! - [`archive`]: synthetic puzzles and in-memory zip archives
//! - [`fetcher`]: [`CountingFetcher`], an in-memory [`repair_core::Fetcher`]
//! - [`root`]: [`TestRoot`], a temporary managed root with assertions

pub mod archive;
pub mod fetcher;
pub mod root;

pub use archive::{ArchiveBuilder, PuzzleFixture, png_bytes};
pub use fetcher::CountingFetcher;
pub use root::{TestRoot, catalog_serving};
