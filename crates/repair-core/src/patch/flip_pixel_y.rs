use std::path::Path;

use repair_fs::DatasetPath;
use serde_json::Number;

use super::Patch;
use crate::imaging;
use crate::puzzle::PuzzleMetadata;
use crate::{Error, Result};

/// Puzzles of the 2.0.0 release stored with an inverted y axis.
pub const FLIPPED_PUZZLES: [&str; 3] = [
    "puzzle_0000031_RP_group_30",
    "puzzle_0000062_RP_group_61",
    "puzzle_0000059_RP_group_58",
];

/// Mirror `pixel_position.y` against the preview height for a fixed set of puzzles.
///
/// Only `pixel_position` is touched; every listed puzzle must exist.
#[derive(Debug, Clone)]
pub struct FlipPixelY {
    puzzles: Vec<String>,
}

impl FlipPixelY {
    pub fn for_puzzles<I, S>(puzzles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            puzzles: puzzles.into_iter().map(Into::into).collect(),
        }
    }

    fn flip(puzzle_dir: &Path) -> Result<()> {
        let (_, height) = imaging::dimensions(&puzzle_dir.join(DatasetPath::Preview))?;
        let invalid = |message: String| Error::Metadata {
            path: puzzle_dir.join(DatasetPath::Metadata),
            message,
        };

        let mut metadata = PuzzleMetadata::load(puzzle_dir)?;
        for fragment in &mut metadata.fragments {
            let position = fragment
                .pixel_position
                .as_mut()
                .filter(|p| p.len() >= 2)
                .ok_or_else(|| invalid(format!("fragment {} has no pixel_position", fragment.idx)))?;
            let flipped = mirror(&position[1], height).ok_or_else(|| {
                invalid(format!("fragment {} has a non-finite pixel_position", fragment.idx))
            })?;
            position[1] = flipped;
        }
        metadata.save(puzzle_dir)
    }
}

/// `height - y`, staying an integer when `y` is one.
fn mirror(y: &Number, height: u32) -> Option<Number> {
    match y.as_i64() {
        Some(y) => Some(Number::from(i64::from(height) - y)),
        None => y.as_f64().and_then(|y| Number::from_f64(f64::from(height) - y)),
    }
}

impl Default for FlipPixelY {
    fn default() -> Self {
        Self::for_puzzles(FLIPPED_PUZZLES)
    }
}

impl Patch for FlipPixelY {
    fn describe(&self) -> &str {
        "Flip pixel_position.y of upside-down puzzles"
    }

    fn apply(&self, data_dir: &Path) -> Result<()> {
        for name in &self.puzzles {
            Self::flip(&data_dir.join(name))?;
        }
        Ok(())
    }
}
