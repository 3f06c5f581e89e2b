use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::debug;

use crate::puzzle::list_puzzles;
use crate::{Error, Result, progress};

/// Size of the bounded pool used by image-rewriting patches.
pub const PATCH_WORKERS: usize = 8;

/// Run `task` once per puzzle directory under `data_dir`.
///
/// With `workers > 1` puzzles are processed on a dedicated pool of that size;
/// otherwise they run in sorted order on the calling thread. The first failure
/// is returned once in-flight puzzles finish. Returns the number of puzzles.
pub fn for_each_puzzle<F>(data_dir: &Path, label: &str, workers: usize, task: F) -> Result<usize>
where
    F: Fn(&Path) -> Result<()> + Send + Sync,
{
    let puzzles = list_puzzles(data_dir)?;
    let pb = progress::items(puzzles.len() as u64, label);

    let run_one = |puzzle: &PathBuf| -> Result<()> {
        let outcome = task(puzzle);
        pb.inc(1);
        outcome
    };

    if workers <= 1 {
        puzzles.iter().try_for_each(run_one)?;
    } else {
        debug!(workers, puzzles = puzzles.len(), "Patching puzzles in parallel");
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()
            .map_err(|e| Error::WorkerPool {
                message: e.to_string(),
            })?;
        pool.install(|| puzzles.par_iter().try_for_each(run_one))?;
    }

    pb.finish_and_clear();
    Ok(puzzles.len())
}
