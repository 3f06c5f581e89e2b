//! Per-variant item getters used by [`Dataset`](crate::Dataset)

pub mod solved2d;
pub mod solved3d;

use std::fmt;

use crate::puzzle::PuzzleMetadata;

pub use solved2d::{FragmentImage, PuzzleInput};
pub use solved3d::{Fragment3d, Puzzle3d};

/// Lookup key for a puzzle: position in the sorted listing or directory name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PuzzleKey {
    Index(usize),
    Name(String),
}

impl From<usize> for PuzzleKey {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl From<&str> for PuzzleKey {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for PuzzleKey {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl fmt::Display for PuzzleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => write!(f, "index {index}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

/// One dataset item.
#[derive(Debug, Clone)]
pub enum Sample {
    /// 2D descriptor, unsupervised mode
    Solved2d(PuzzleMetadata),
    /// 2D fragments with decoded images, and the ground truth kept apart
    Supervised2d {
        input: PuzzleInput,
        target: PuzzleMetadata,
    },
    /// 3D fragment files grouped by name
    Solved3d(Puzzle3d),
}

impl Sample {
    /// Puzzle name, when the item carries one.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Solved2d(metadata) => metadata.name.as_deref(),
            Self::Supervised2d { input, .. } => Some(&input.name),
            Self::Solved3d(puzzle) => Some(&puzzle.name),
        }
    }
}
