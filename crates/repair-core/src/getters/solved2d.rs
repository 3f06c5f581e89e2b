//! `2D_SOLVED` getters

use std::path::Path;

use image::RgbaImage;

use super::Sample;
use crate::Result;
use crate::imaging;
use crate::puzzle::{LEGACY_METADATA_VERSION, PuzzleMetadata, puzzle_name};

/// A fragment image handed to a solver.
#[derive(Debug, Clone)]
pub struct FragmentImage {
    pub idx: u64,
    pub name: String,
    pub image: RgbaImage,
}

/// Solver input: fragment images without placement.
#[derive(Debug, Clone)]
pub struct PuzzleInput {
    pub name: String,
    pub fragments: Vec<FragmentImage>,
}

/// Descriptor of a puzzle with `path` filled in.
pub fn metadata(puzzle_dir: &Path) -> Result<PuzzleMetadata> {
    PuzzleMetadata::load(puzzle_dir)
}

/// Load one item.
///
/// Legacy descriptors get their puzzle and fragment names derived from the
/// directory and file names.
pub fn item(puzzle_dir: &Path, supervised: bool) -> Result<Sample> {
    let mut data = metadata(puzzle_dir)?;
    let name = puzzle_name(puzzle_dir);

    if data.schema_version() == LEGACY_METADATA_VERSION {
        data.derive_names(&name);
    }

    if !supervised {
        return Ok(Sample::Solved2d(data));
    }

    let fragments = data
        .fragments
        .iter()
        .map(|fragment| {
            let image = imaging::load_rgba(&puzzle_dir.join(fragment.image_filename()))?;
            Ok(FragmentImage {
                idx: fragment.idx,
                name: fragment.name.clone().unwrap_or_else(|| fragment.stem()),
                image,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Sample::Supervised2d {
        input: PuzzleInput { name, fragments },
        target: data,
    })
}
