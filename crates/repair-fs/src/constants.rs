//! Constants and enums for dataset filesystem paths.

use std::path::Path;

/// Prefix shared by every puzzle directory inside an extracted dataset.
pub const PUZZLE_PREFIX: &str = "puzzle_";

/// Well-known file names in a managed root and inside puzzle directories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetPath {
    /// The `STATUS` ledger at the managed root
    StatusFile,
    /// The `README` at the managed root
    Readme,
    /// Per-puzzle metadata descriptor
    Metadata,
    /// Whole-puzzle preview image
    Preview,
}

impl DatasetPath {
    /// Get the string representation of the path.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StatusFile => "STATUS",
            Self::Readme => "README",
            Self::Metadata => "data.json",
            Self::Preview => "preview.png",
        }
    }
}

impl AsRef<Path> for DatasetPath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for DatasetPath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for DatasetPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
