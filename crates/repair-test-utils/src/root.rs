//! [`TestRoot`]: a temporary managed dataset root.

use std::fs;
use std::path::{Path, PathBuf};

use repair_core::Catalog;
use repair_fs::checksum::compute_content_checksum;
use repair_fs::Algorithm;
use tempfile::TempDir;

/// The built-in catalog with every remote's checksum replaced by the SHA-256
/// of `archive`, so a [`CountingFetcher`](crate::CountingFetcher) serving
/// those bytes passes verification.
pub fn catalog_serving(archive: &[u8]) -> Catalog {
    let mut catalog = Catalog::builtin();
    let checksum = compute_content_checksum(archive, Algorithm::Sha256);
    for remote in catalog.remotes.values_mut() {
        remote.checksum = checksum.clone();
    }
    catalog
}

/// A temporary directory used as a managed root.
pub struct TestRoot {
    temp_dir: TempDir,
}

impl Default for TestRoot {
    fn default() -> Self {
        Self::new()
    }
}

impl TestRoot {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn join(&self, relative: &str) -> PathBuf {
        self.path().join(relative)
    }

    /// Contents of `STATUS`, or an empty string when absent.
    pub fn status_file(&self) -> String {
        fs::read_to_string(self.join("STATUS")).unwrap_or_default()
    }

    /// Read a JSON file relative to the root.
    pub fn read_json(&self, relative: &str) -> serde_json::Value {
        let path = self.join(relative);
        let content = fs::read_to_string(&path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", path.display()));
        serde_json::from_str(&content)
            .unwrap_or_else(|e| panic!("Invalid JSON in {}: {e}", path.display()))
    }

    /// Assert that `relative` exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_exists(&self, relative: &str) {
        let path = self.join(relative);
        assert!(path.exists(), "Expected path to exist: {}", path.display());
    }

    /// Assert that `relative` does **not** exist.
    pub fn assert_not_exists(&self, relative: &str) {
        let path = self.join(relative);
        assert!(!path.exists(), "Expected path NOT to exist: {}", path.display());
    }
}
