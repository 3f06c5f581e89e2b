//! Filesystem layer for the RePAIR dataset manager
//!
//! Provides the managed-root layout, atomic writes, archive checksums and
//! format-agnostic config loading used by `repair-core`.

pub mod checksum;
pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod layout;

pub use checksum::{Algorithm, Checksum};
pub use config::{ConfigFormat, load_config};
pub use constants::{DatasetPath, PUZZLE_PREFIX};
pub use error::{Error, Result};
pub use layout::RootLayout;
