//! Archive download with checksum verification
//!
//! [`DownloaderVerifier::ensure_local`] is safe to call on every run: an
//! archive that is already present and verifies costs zero network requests.
//! Otherwise the archive is streamed into `<filename>.part`, verified, and only
//! then renamed into place. A corrupt download is deleted and reported; the
//! next call starts over.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use repair_fs::checksum::compute_file_checksum;
use repair_fs::{RootLayout, io as fs_io};
use tracing::{debug, info, warn};

use crate::catalog::RemoteDescriptor;
use crate::{Error, Result, progress};

/// Source of archive bytes.
///
/// Implementations write the full body to `sink` and return the byte count.
pub trait Fetcher: Send + Sync {
    fn fetch(&self, url: &str, sink: &mut dyn Write) -> Result<u64>;
}

/// Blocking HTTP GET via `ureq`.
#[derive(Debug, Default, Clone, Copy)]
pub struct HttpFetcher;

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str, sink: &mut dyn Write) -> Result<u64> {
        let download_error = |message: String| Error::Download {
            url: url.to_string(),
            message,
        };

        let mut response = ureq::get(url)
            .call()
            .map_err(|e| download_error(e.to_string()))?;

        let total = response
            .headers()
            .get(ureq::http::header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());

        let pb = progress::bytes(total, "Downloading");
        let mut reader = pb.wrap_read(response.body_mut().as_reader());
        let copied = io::copy(&mut reader, sink).map_err(|e| download_error(e.to_string()))?;
        pb.finish_and_clear();
        Ok(copied)
    }
}

/// Whether downloaded archives are checked against their digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerifyMode {
    #[default]
    Checksum,
    /// Accept any bytes. Only for trusted or offline copies.
    Skip,
}

/// The archive as it sits on disk after [`DownloaderVerifier::ensure_local`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalArchive {
    pub path: PathBuf,
    /// Whether this call hit the network
    pub fetched: bool,
}

/// Keeps one remote archive present and verified inside a managed root.
pub struct DownloaderVerifier {
    remote: RemoteDescriptor,
    target: PathBuf,
    temp: PathBuf,
    mode: VerifyMode,
    fetcher: Arc<dyn Fetcher>,
}

impl DownloaderVerifier {
    pub fn new(
        layout: &RootLayout,
        remote: &RemoteDescriptor,
        mode: VerifyMode,
        fetcher: Arc<dyn Fetcher>,
    ) -> Self {
        Self {
            target: layout.archive(&remote.filename),
            temp: layout.temp_archive(&remote.filename),
            remote: remote.clone(),
            mode,
            fetcher,
        }
    }

    /// Final path of the archive.
    pub fn file_path(&self) -> &Path {
        &self.target
    }

    /// Check `path` against the remote digest. Always true in [`VerifyMode::Skip`].
    pub fn verify(&self, path: &Path) -> Result<bool> {
        if self.mode == VerifyMode::Skip {
            return Ok(true);
        }
        self.remote
            .checksum
            .verify_file(path)
            .map_err(|e| Error::io(path, e))
    }

    /// Make sure the archive exists locally and verifies.
    pub fn ensure_local(&self) -> Result<LocalArchive> {
        if let Some(parent) = self.target.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }

        if self.target.exists() {
            if self.verify(&self.target)? {
                debug!(path = %self.target.display(), "Archive present and verified");
                return Ok(LocalArchive {
                    path: self.target.clone(),
                    fetched: false,
                });
            }
            warn!(
                path = %self.target.display(),
                "Existing archive failed verification, downloading again"
            );
        }

        if self.temp.exists() {
            warn!(path = %self.temp.display(), "Discarding stale partial download");
            fs_io::remove_file_if_exists(&self.temp)?;
        }

        info!(url = %self.remote.url, "Downloading {}", self.remote.filename);
        let bytes = match self.download_to_temp() {
            Ok(bytes) => bytes,
            Err(e) => {
                fs_io::remove_file_if_exists(&self.temp)?;
                return Err(e);
            }
        };

        if !self.verify(&self.temp)? {
            let actual = compute_file_checksum(&self.temp, self.remote.checksum.algorithm())
                .map(|c| c.to_string())
                .unwrap_or_else(|_| "<unreadable>".to_string());
            fs_io::remove_file_if_exists(&self.temp)?;
            return Err(Error::ChecksumMismatch {
                path: self.target.clone(),
                expected: self.remote.checksum.to_string(),
                actual,
            });
        }

        fs::rename(&self.temp, &self.target).map_err(|e| Error::io(&self.target, e))?;
        info!(bytes, path = %self.target.display(), "Download complete");

        Ok(LocalArchive {
            path: self.target.clone(),
            fetched: true,
        })
    }

    fn download_to_temp(&self) -> Result<u64> {
        let file = File::create(&self.temp).map_err(|e| Error::io(&self.temp, e))?;
        let mut writer = BufWriter::new(file);
        let bytes = self.fetcher.fetch(&self.remote.url, &mut writer)?;

        let file = writer
            .into_inner()
            .map_err(|e| Error::io(&self.temp, e.into_error()))?;
        file.sync_all().map_err(|e| Error::io(&self.temp, e))?;
        Ok(bytes)
    }
}
