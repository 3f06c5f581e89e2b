//! Atomic I/O operations with file locking

use std::fs;
use std::io::Write;
use std::path::Path;

use fs2::FileExt;
use tempfile::NamedTempFile;

use crate::{Error, Result};

/// Write `content` to `path` so readers see either the old or the new bytes.
///
/// Each call fills its own uniquely named sibling file, holding an advisory
/// lock while writing, then persists it over `path`. Concurrent writers to
/// the same target never share a temporary file; the last rename wins.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;

    // Same directory keeps the rename on one filesystem
    let mut temp = NamedTempFile::new_in(dir).map_err(|e| Error::io(dir, e))?;
    let lock_failed = || Error::LockFailed {
        path: path.to_path_buf(),
    };

    temp.as_file().lock_exclusive().map_err(|_| lock_failed())?;
    temp.write_all(content)
        .map_err(|e| Error::io(temp.path(), e))?;
    temp.as_file()
        .sync_all()
        .map_err(|e| Error::io(temp.path(), e))?;
    temp.as_file().unlock().map_err(|_| lock_failed())?;

    temp.persist(path).map_err(|e| Error::io(path, e.error))?;
    Ok(())
}

/// Read text content from a file.
pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::io(path, e))
}

/// Write text content to a file atomically.
pub fn write_text(path: &Path, content: &str) -> Result<()> {
    write_atomic(path, content.as_bytes())
}

/// Remove a file if it exists. Missing files are not an error.
pub fn remove_file_if_exists(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::io(path, e)),
    }
}
