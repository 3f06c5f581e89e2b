use std::path::Path;

use repair_fs::DatasetPath;
use serde_json::{Map, Value};

use super::{PATCH_WORKERS, Patch, for_each_puzzle};
use crate::imaging;
use crate::puzzle::{FragmentRecord, PuzzleMetadata, puzzle_name};
use crate::{Error, Result};

/// Descriptor layout written by [`Recenter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecenterSchema {
    /// `metadata_version: "3"` with `solution_size`, processed in parallel
    V2_5b,
    /// `dataset_version: "v3-beta"`, processed sequentially
    V3Beta,
}

/// Crop every fragment image to its opaque pixels and place fragments by centroid.
///
/// The centroid is taken on the uncropped image, so `position_2d` stays in
/// solution-canvas coordinates. Images are overwritten as `<stem>.png` and the
/// descriptor is rebuilt from scratch: only the puzzle name, adjacency and the
/// recomputed fragments survive.
#[derive(Debug, Clone, Copy)]
pub struct Recenter {
    schema: RecenterSchema,
}

impl Recenter {
    pub fn new(schema: RecenterSchema) -> Self {
        Self { schema }
    }

    fn workers(&self) -> usize {
        match self.schema {
            RecenterSchema::V2_5b => PATCH_WORKERS,
            RecenterSchema::V3Beta => 1,
        }
    }

    fn rewrite_puzzle(&self, puzzle_dir: &Path) -> Result<()> {
        let source = PuzzleMetadata::load(puzzle_dir)?;
        let name = puzzle_name(puzzle_dir);

        let fragments = source
            .fragments
            .iter()
            .map(|fragment| recenter_fragment(puzzle_dir, fragment))
            .collect::<Result<Vec<_>>>()?;

        let (metadata_version, dataset_version, solution_size) = match self.schema {
            RecenterSchema::V2_5b => {
                let (width, height) =
                    imaging::dimensions(&puzzle_dir.join(DatasetPath::Preview))?;
                (Some(Value::from("3")), None, Some([width, height]))
            }
            RecenterSchema::V3Beta => (None, Some("v3-beta".to_string()), None),
        };

        let rewritten = PuzzleMetadata {
            name: Some(name),
            metadata_version,
            dataset_version,
            fragments,
            solution_size,
            adjacency: source.adjacency,
            path: None,
            extra: Map::new(),
        };
        rewritten.save(puzzle_dir)
    }
}

fn recenter_fragment(puzzle_dir: &Path, fragment: &FragmentRecord) -> Result<FragmentRecord> {
    let image_path = puzzle_dir.join(fragment.image_filename());
    let img = imaging::load_rgba(&image_path)?;

    let transparent = || Error::Image {
        path: image_path.clone(),
        message: "image has no foreground pixels".into(),
    };
    let (x, y) = imaging::centroid_rgba(&img).ok_or_else(transparent)?;
    let cropped = imaging::crop_to_alpha(&img).ok_or_else(transparent)?;
    imaging::save_png(&cropped, &image_path)?;

    let stem = image_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let filename = image_path
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(FragmentRecord {
        idx: fragment.idx,
        filename,
        name: Some(stem),
        pixel_position: None,
        position_2d: Some(vec![x, y, 0.0]),
        extra: Map::new(),
    })
}

impl Patch for Recenter {
    fn describe(&self) -> &str {
        match self.schema {
            RecenterSchema::V2_5b => "Crop fragments to opaque pixels (metadata v3)",
            RecenterSchema::V3Beta => "Crop fragments to opaque pixels (v3-beta)",
        }
    }

    fn apply(&self, data_dir: &Path) -> Result<()> {
        let label = match self.schema {
            RecenterSchema::V2_5b => "crop-to-opaque",
            RecenterSchema::V3Beta => "v3-beta",
        };
        for_each_puzzle(data_dir, label, self.workers(), |puzzle_dir| {
            self.rewrite_puzzle(puzzle_dir)
        })?;
        Ok(())
    }
}
