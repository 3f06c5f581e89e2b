//! Puzzle directories and their `data.json` descriptors

use std::fs;
use std::path::{Path, PathBuf};

use repair_fs::{DatasetPath, PUZZLE_PREFIX, io};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::{Error, Result};

/// Schema assumed when a descriptor carries no `metadata_version`.
pub const LEGACY_METADATA_VERSION: u32 = 2;

/// Sorted puzzle directories directly under `data_dir`.
pub fn list_puzzles(data_dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(data_dir).map_err(|e| Error::io(data_dir, e))?;

    let mut puzzles = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::io(data_dir, e))?;
        let path = entry.path();
        let is_puzzle = entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with(PUZZLE_PREFIX));
        if is_puzzle && path.is_dir() {
            puzzles.push(path);
        }
    }
    puzzles.sort();
    Ok(puzzles)
}

/// Directory name of a puzzle path.
pub fn puzzle_name(puzzle_dir: &Path) -> String {
    puzzle_dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// One fragment entry of a descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FragmentRecord {
    pub idx: u64,
    pub filename: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Legacy placement `(x, y, angle)` in preview pixels, integers kept as written
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pixel_position: Option<Vec<Number>>,

    /// Centroid placement `(x, y, 0)` written by the geometry patches
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_2d: Option<Vec<f64>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FragmentRecord {
    /// File stem of `filename`.
    pub fn stem(&self) -> String {
        Path::new(&self.filename)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// The image file of this fragment. Releases before 2.0.2 point at `.obj`.
    pub fn image_filename(&self) -> String {
        self.filename.replace(".obj", ".png")
    }
}

/// A puzzle descriptor (`data.json`).
///
/// Unknown fields survive a load/save cycle through `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PuzzleMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata_version: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset_version: Option<String>,

    pub fragments: Vec<FragmentRecord>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solution_size: Option<[u32; 2]>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adjacency: Option<Value>,

    /// Puzzle directory the descriptor was read from. Never written.
    #[serde(skip)]
    pub path: Option<PathBuf>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PuzzleMetadata {
    /// Read `<puzzle_dir>/data.json`.
    pub fn load(puzzle_dir: &Path) -> Result<Self> {
        let path = puzzle_dir.join(DatasetPath::Metadata);
        let content = io::read_text(&path)?;
        let mut metadata: Self = serde_json::from_str(&content).map_err(|e| Error::Metadata {
            path: path.clone(),
            message: e.to_string(),
        })?;
        metadata.path = Some(puzzle_dir.to_path_buf());
        Ok(metadata)
    }

    /// Atomically rewrite `<puzzle_dir>/data.json` with 4-space indentation.
    pub fn save(&self, puzzle_dir: &Path) -> Result<()> {
        let path = puzzle_dir.join(DatasetPath::Metadata);

        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut serializer).map_err(|e| Error::Metadata {
            path: path.clone(),
            message: e.to_string(),
        })?;

        io::write_atomic(&path, &buf)?;
        Ok(())
    }

    /// Schema version, accepting both `"3"` and `3`.
    pub fn schema_version(&self) -> u32 {
        match &self.metadata_version {
            Some(Value::Number(n)) => n
                .as_u64()
                .and_then(|v| u32::try_from(v).ok())
                .unwrap_or(LEGACY_METADATA_VERSION),
            Some(Value::String(s)) => s.trim().parse().unwrap_or(LEGACY_METADATA_VERSION),
            _ => LEGACY_METADATA_VERSION,
        }
    }

    /// Fill the puzzle name and per-fragment names of a legacy descriptor.
    pub fn derive_names(&mut self, puzzle_name: &str) {
        self.name = Some(puzzle_name.to_string());
        for fragment in &mut self.fragments {
            fragment.name = Some(fragment.stem());
        }
    }
}
