//! Durable per-version completion ledger (`STATUS`)
//!
//! One `key:value` entry per line, where the key is a
//! [`VariantVersion`](crate::VariantVersion) key and the value is `NONE` or
//! `OK`. The file is read whole and rewritten whole on every change.

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use repair_fs::io;
use tracing::{debug, warn};

use crate::{Error, Result};

/// Completion state of one version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    /// Not prepared, or preparation must start over
    #[default]
    None,
    /// Extracted and fully patched
    Ok,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Ok => "OK",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "NONE" => Some(Self::None),
            "OK" => Some(Self::Ok),
            _ => None,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// In-memory view of a `STATUS` file.
///
/// Unknown values are kept verbatim so rewriting the file never drops another
/// tool's entries; they read back as [`Status::None`].
#[derive(Debug, Clone)]
pub struct StatusLedger {
    path: PathBuf,
    entries: Vec<(String, String)>,
}

impl StatusLedger {
    /// Load the ledger at `path`. A missing file is an empty ledger.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = if path.exists() {
            read_entries(&path)?
        } else {
            debug!(path = %path.display(), "No status ledger yet");
            Vec::new()
        };
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Status recorded for `key`. Absent and unrecognised entries are `None`.
    pub fn get(&self, key: &str) -> Status {
        match self.raw(key) {
            Some(value) => Status::parse(value).unwrap_or_else(|| {
                warn!(%key, %value, "Unknown status in ledger, treating as NONE");
                Status::None
            }),
            None => Status::None,
        }
    }

    /// Record `status` for `key` and rewrite the file atomically.
    ///
    /// Other entries and their order are preserved.
    pub fn set(&mut self, key: &str, status: Status) -> Result<()> {
        let value = status.as_str().to_string();
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key.to_string(), value)),
        }
        self.persist()?;
        debug!(%key, %status, "Status updated");
        Ok(())
    }

    /// All entries in file order, with their parsed status.
    pub fn entries(&self) -> Vec<(String, Status)> {
        self.entries
            .iter()
            .map(|(key, _)| (key.clone(), self.get(key)))
            .collect()
    }

    fn raw(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn persist(&self) -> Result<()> {
        let mut content = String::new();
        for (key, value) in &self.entries {
            content.push_str(key);
            content.push(':');
            content.push_str(value);
            content.push('\n');
        }
        io::write_text(&self.path, &content)?;
        Ok(())
    }
}

fn read_entries(path: &Path) -> Result<Vec<(String, String)>> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    FileExt::lock_shared(&file).map_err(|_| repair_fs::Error::LockFailed {
        path: path.to_path_buf(),
    })?;

    let mut entries: Vec<(String, String)> = Vec::new();
    for line in BufReader::new(&file).lines() {
        let line = line.map_err(|e| Error::io(path, e))?;
        let line = line.trim();
        let Some((key, value)) = line.split_once(':') else {
            if !line.is_empty() {
                warn!(path = %path.display(), %line, "Skipping malformed ledger line");
            }
            continue;
        };
        let (key, value) = (key.trim().to_string(), value.trim().to_string());
        match entries.iter_mut().find(|(k, _)| *k == key) {
            Some(existing) => existing.1 = value,
            None => entries.push((key, value)),
        }
    }

    FileExt::unlock(&file).map_err(|_| repair_fs::Error::LockFailed {
        path: path.to_path_buf(),
    })?;
    Ok(entries)
}
