use std::path::Path;

use super::{Patch, for_each_puzzle};
use crate::Result;
use crate::puzzle::PuzzleMetadata;

/// Rewrite fragment filenames from `.obj` to `.png` in every puzzle.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjToPng;

impl Patch for ObjToPng {
    fn describe(&self) -> &str {
        "Point fragment filenames at .png images"
    }

    fn apply(&self, data_dir: &Path) -> Result<()> {
        for_each_puzzle(data_dir, "obj-to-png", 1, |puzzle_dir| {
            let mut metadata = PuzzleMetadata::load(puzzle_dir)?;
            for fragment in &mut metadata.fragments {
                fragment.filename = fragment.image_filename();
            }
            metadata.save(puzzle_dir)
        })?;
        Ok(())
    }
}
