//! Managed root layout
//!
//! ```text
//! root/
//!   README
//!   STATUS
//!   <archive-filename>
//!   <archive-filename>.part          (only while downloading)
//!   <variant>/v<version>/<folder>/puzzle_*/
//! ```

use std::path::{Path, PathBuf};

use crate::DatasetPath;

/// Path resolution for a managed dataset root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootLayout {
    root: PathBuf,
}

impl RootLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn status_file(&self) -> PathBuf {
        self.root.join(DatasetPath::StatusFile)
    }

    pub fn readme(&self) -> PathBuf {
        self.root.join(DatasetPath::Readme)
    }

    /// Final location of a downloaded archive.
    pub fn archive(&self, filename: &str) -> PathBuf {
        self.root.join(filename)
    }

    /// Sibling path an archive is streamed into before verification.
    pub fn temp_archive(&self, filename: &str) -> PathBuf {
        self.root.join(format!("{filename}.part"))
    }

    /// Directory an archive is extracted into: `<root>/<variant>/v<version>`.
    pub fn extract_dir(&self, variant: &str, version: &str) -> PathBuf {
        self.root.join(variant).join(format!("v{version}"))
    }

    /// Directory holding the puzzle folders of an extraction.
    pub fn data_dir(&self, variant: &str, version: &str, folder_name: &str) -> PathBuf {
        self.extract_dir(variant, version).join(folder_name)
    }
}
