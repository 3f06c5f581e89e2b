//! Patch chains applied to freshly extracted data
//!
//! A patch rewrites puzzle metadata (and sometimes images) in place. Patches
//! are NOT idempotent: running a chain twice over the same extraction can
//! corrupt it. The [`DataManager`](crate::DataManager) only runs a chain over
//! a fresh extraction and records completion in the status ledger.
//!
//! Chains are declared in the catalog as ordered [`PatchId`]s and resolved to
//! strategies through a [`PatchRegistry`] before anything runs, so an unknown
//! id fails before the archive is touched.

mod flip_pixel_y;
mod obj_to_png;
mod parallel;
mod recenter;

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{Error, Result};

pub use flip_pixel_y::FlipPixelY;
pub use obj_to_png::ObjToPng;
pub use parallel::{PATCH_WORKERS, for_each_puzzle};
pub use recenter::{Recenter, RecenterSchema};

/// Identifiers of the patches shipped with this crate.
pub mod builtin {
    /// Flip `pixel_position.y` for the puzzles shipped upside down
    pub const FLIP_PIXEL_Y: &str = "flip-pixel-y";
    /// Point fragment filenames at `.png` instead of `.obj`
    pub const OBJ_TO_PNG: &str = "obj-to-png";
    /// Crop fragments to their opaque pixels, record centroids (metadata v3)
    pub const CROP_TO_OPAQUE: &str = "crop-to-opaque";
    /// Same geometry rewrite tagged as dataset `v3-beta`
    pub const V3_BETA: &str = "v3-beta";
}

/// Name of a patch in the catalog and the registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatchId(String);

impl PatchId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PatchId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for PatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A transformation over an extracted data directory.
///
/// `data_dir` is the folder holding the `puzzle_*` directories. On success
/// the directory must be in a valid state for the next step of the chain.
pub trait Patch: Send + Sync {
    /// Short human-readable summary for logs.
    fn describe(&self) -> &str;

    /// Apply the patch in place.
    fn apply(&self, data_dir: &Path) -> Result<()>;
}

/// Registry mapping patch ids to their strategies.
#[derive(Clone, Default)]
pub struct PatchRegistry {
    patches: HashMap<PatchId, Arc<dyn Patch>>,
}

impl PatchRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in patches registered.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(builtin::FLIP_PIXEL_Y, FlipPixelY::default());
        registry.register(builtin::OBJ_TO_PNG, ObjToPng);
        registry.register(builtin::CROP_TO_OPAQUE, Recenter::new(RecenterSchema::V2_5b));
        registry.register(builtin::V3_BETA, Recenter::new(RecenterSchema::V3Beta));
        registry
    }

    /// Register a patch, replacing any previous patch with the same id.
    pub fn register(&mut self, id: impl Into<PatchId>, patch: impl Patch + 'static) {
        self.patches.insert(id.into(), Arc::new(patch));
    }

    pub fn get(&self, id: &PatchId) -> Option<Arc<dyn Patch>> {
        self.patches.get(id).cloned()
    }

    /// Registered ids, sorted.
    pub fn ids(&self) -> Vec<PatchId> {
        let mut ids: Vec<PatchId> = self.patches.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Resolve an ordered list of ids into a runnable chain.
    ///
    /// Order and duplicates are preserved exactly as declared.
    pub fn resolve_chain(&self, ids: &[PatchId]) -> Result<PatchChain> {
        let steps = ids
            .iter()
            .map(|id| {
                self.get(id)
                    .map(|patch| (id.clone(), patch))
                    .ok_or_else(|| Error::UnknownPatch { patch: id.clone() })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(PatchChain { steps })
    }
}

impl fmt::Debug for PatchRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatchRegistry")
            .field("patches", &self.ids())
            .finish()
    }
}

/// An ordered sequence of resolved patches.
#[derive(Clone, Default)]
pub struct PatchChain {
    steps: Vec<(PatchId, Arc<dyn Patch>)>,
}

impl PatchChain {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn ids(&self) -> Vec<PatchId> {
        self.steps.iter().map(|(id, _)| id.clone()).collect()
    }

    /// Run every step in order, stopping at the first failure.
    ///
    /// Returns the number of steps applied. A failure leaves earlier steps'
    /// changes in place.
    pub fn run(&self, data_dir: &Path) -> Result<usize> {
        if self.steps.is_empty() {
            info!("No patches to apply");
            return Ok(0);
        }

        info!("Applying {} patches...", self.steps.len());
        for (position, (id, patch)) in self.steps.iter().enumerate() {
            info!(
                step = position + 1,
                total = self.steps.len(),
                patch = %id,
                "{}",
                patch.describe()
            );
            patch.apply(data_dir).map_err(|e| Error::PatchFailed {
                patch: id.clone(),
                target: data_dir.to_path_buf(),
                source: Box::new(e),
            })?;
        }
        Ok(self.steps.len())
    }
}

impl fmt::Debug for PatchChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.ids()).finish()
    }
}
