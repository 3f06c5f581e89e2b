//! Error types for repair-core

use std::path::PathBuf;

use crate::patch::PatchId;

/// Result type for repair-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Broad classification of an [`Error`].
///
/// Configuration errors are never worth retrying. Integrity errors mean the
/// downloaded bytes were discarded and the next call downloads again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Integrity,
    Io,
    Patch,
    Data,
}

/// Errors that can occur in repair-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No dataset variant was given
    #[error("Dataset variant must be specified")]
    MissingVariant,

    /// Variant is not present in the catalog
    #[error("Unsupported dataset variant '{variant}'. Supported variants are: {}", .supported.join(", "))]
    UnknownVariant {
        variant: String,
        supported: Vec<String>,
    },

    /// Version string does not follow the version grammar
    #[error("Invalid version '{version}': {reason}")]
    InvalidVersion { version: String, reason: String },

    /// Unmanaged acquisition needs an explicit version
    #[error("A version must be specified for variant '{variant}' when acquisition is unmanaged")]
    VersionRequired { variant: String },

    /// No catalog version matches the request
    #[error("Unsupported version {requested} for variant '{variant}'. Supported versions are: {}", .supported.join(", "))]
    UnsupportedVersion {
        variant: String,
        requested: String,
        supported: Vec<String>,
    },

    /// No remote descriptor for the base archive of a resolved version
    #[error("Remote missing for variant '{variant}' and base version {base}")]
    MissingRemote { variant: String, base: String },

    /// Patch id referenced by the catalog is not registered
    #[error("Unknown patch '{patch}'")]
    UnknownPatch { patch: PatchId },

    /// Catalog failed validation
    #[error("Invalid catalog: {message}")]
    InvalidCatalog { message: String },

    /// Downloaded bytes do not match the expected digest
    #[error(
        "Checksum mismatch for {path}: expected {expected}, got {actual}. \
         Try downloading again; if the problem persists, skip verification at your own risk"
    )]
    ChecksumMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    /// Transfer failed before any verification happened
    #[error("Download of {url} failed: {message}")]
    Download { url: String, message: String },

    /// Archive vanished between download and extraction
    #[error("Archive not found at {path}")]
    ArchiveMissing { path: PathBuf },

    /// Archive could not be read
    #[error("Failed to read archive {path}: {message}")]
    Archive { path: PathBuf, message: String },

    /// Puzzle metadata could not be parsed or lacks required fields
    #[error("Invalid metadata at {path}: {message}")]
    Metadata { path: PathBuf, message: String },

    /// Image could not be decoded, encoded or has no opaque pixels
    #[error("Failed to process image {path}: {message}")]
    Image { path: PathBuf, message: String },

    /// A step of a patch chain failed
    #[error("Patch '{patch}' failed on {target}: {source}")]
    PatchFailed {
        patch: PatchId,
        target: PathBuf,
        #[source]
        source: Box<Error>,
    },

    /// The bounded patch worker pool could not be created
    #[error("Failed to build patch worker pool: {message}")]
    WorkerPool { message: String },

    /// Data folder is absent after acquisition
    #[error("Cannot find data folder {path}. {hint}")]
    DataMissing { path: PathBuf, hint: String },

    /// Data folder holds no puzzle directories
    #[error("No puzzles found in {path}. {hint}")]
    NoPuzzles { path: PathBuf, hint: String },

    /// Lookup by name or index failed
    #[error("Puzzle not found: {key}")]
    PuzzleNotFound { key: String },

    /// Operation has no getter for this variant
    #[error("{operation} is not supported for variant '{variant}'")]
    Unsupported { operation: String, variant: String },

    /// A 3D fragment lacks one of its files
    #[error("Fragment '{name}' in {path} is missing one of the required files (.obj, .mtl, .png)")]
    IncompleteFragment { name: String, path: PathBuf },

    /// Filesystem error from repair-fs
    #[error(transparent)]
    Fs(#[from] repair_fs::Error),
}

impl Error {
    /// I/O error tied to a path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Fs(repair_fs::Error::io(path, source))
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingVariant
            | Self::UnknownVariant { .. }
            | Self::InvalidVersion { .. }
            | Self::VersionRequired { .. }
            | Self::UnsupportedVersion { .. }
            | Self::MissingRemote { .. }
            | Self::UnknownPatch { .. }
            | Self::InvalidCatalog { .. }
            | Self::Unsupported { .. } => ErrorKind::Configuration,
            Self::ChecksumMismatch { .. } => ErrorKind::Integrity,
            Self::Download { .. }
            | Self::ArchiveMissing { .. }
            | Self::Archive { .. }
            | Self::Metadata { .. }
            | Self::Image { .. } => ErrorKind::Io,
            Self::PatchFailed { .. } | Self::WorkerPool { .. } => ErrorKind::Patch,
            Self::DataMissing { .. }
            | Self::NoPuzzles { .. }
            | Self::PuzzleNotFound { .. }
            | Self::IncompleteFragment { .. } => ErrorKind::Data,
            Self::Fs(inner) => match inner {
                repair_fs::Error::ConfigParse { .. }
                | repair_fs::Error::UnsupportedFormat { .. }
                | repair_fs::Error::InvalidChecksum { .. } => ErrorKind::Configuration,
                repair_fs::Error::Io { .. } | repair_fs::Error::LockFailed { .. } => ErrorKind::Io,
            },
        }
    }
}
