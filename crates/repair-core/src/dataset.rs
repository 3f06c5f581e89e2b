//! Dataset façade
//!
//! Resolves the requested version, lets a [`DataManager`] prepare it (managed
//! acquisition) or trusts `root` to hold prepared puzzles (unmanaged), then
//! indexes the `puzzle_*` folders by position and name.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;

use crate::catalog::{Acquisition, Catalog, VARIANT_2D_SOLVED, VARIANT_3D_SOLVED, VariantVersion};
use crate::download::{Fetcher, HttpFetcher, VerifyMode};
use crate::getters::{PuzzleKey, Sample, solved2d, solved3d};
use crate::manager::{DataManager, EnsureReport};
use crate::patch::PatchRegistry;
use crate::puzzle::{PuzzleMetadata, list_puzzles, puzzle_name};
use crate::version::VersionRequest;
use crate::{Error, Result};

const MANAGED_HINT: &str = "Check the specified root folder is correct. If the error persists, \
    recreate the dataset with from_scratch or delete the STATUS file inside the folder.";
const UNMANAGED_HINT: &str = "Check the specified root folder is correct.";

/// How to open a [`Dataset`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetOptions {
    pub root: PathBuf,
    pub variant: String,
    pub version: VersionRequest,
    pub acquisition: Acquisition,
    /// Discard a prepared copy of this version and rebuild it
    pub from_scratch: bool,
    pub verify: VerifyMode,
    /// Split items into solver input and ground truth
    pub supervised: bool,
}

impl DatasetOptions {
    pub fn new(root: impl Into<PathBuf>, variant: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            variant: variant.into(),
            version: VersionRequest::Default,
            acquisition: Acquisition::Managed,
            from_scratch: false,
            verify: VerifyMode::Checksum,
            supervised: false,
        }
    }

    pub fn version(mut self, version: impl Into<VersionRequest>) -> Self {
        self.version = version.into();
        self
    }

    pub fn acquisition(mut self, acquisition: Acquisition) -> Self {
        self.acquisition = acquisition;
        self
    }

    /// Use prepared data in `root` as is.
    pub fn unmanaged(self) -> Self {
        self.acquisition(Acquisition::Unmanaged)
    }

    pub fn from_scratch(mut self, from_scratch: bool) -> Self {
        self.from_scratch = from_scratch;
        self
    }

    pub fn verify(mut self, verify: VerifyMode) -> Self {
        self.verify = verify;
        self
    }

    pub fn supervised(mut self, supervised: bool) -> Self {
        self.supervised = supervised;
        self
    }
}

/// An opened dataset version.
#[derive(Debug)]
pub struct Dataset {
    target: VariantVersion,
    data_path: PathBuf,
    supervised: bool,
    puzzles: Vec<PathBuf>,
    by_name: HashMap<String, usize>,
    report: Option<EnsureReport>,
}

impl Dataset {
    /// Open with the built-in patches, downloading over HTTP when needed.
    pub fn open(options: DatasetOptions, catalog: &Catalog) -> Result<Self> {
        Self::open_with(
            options,
            catalog,
            &PatchRegistry::with_builtins(),
            Arc::new(HttpFetcher),
        )
    }

    /// Open with an explicit patch registry and archive source.
    pub fn open_with(
        options: DatasetOptions,
        catalog: &Catalog,
        registry: &PatchRegistry,
        fetcher: Arc<dyn Fetcher>,
    ) -> Result<Self> {
        if options.variant.trim().is_empty() {
            return Err(Error::MissingVariant);
        }

        let target = catalog.resolve(&options.variant, &options.version, options.acquisition)?;
        if options.supervised && target.variant() != VARIANT_2D_SOLVED {
            return Err(Error::Unsupported {
                operation: "Supervised mode".into(),
                variant: target.variant().to_string(),
            });
        }
        info!(dataset = %target, "Opening RePAIR dataset");

        let (data_path, report, hint) = match options.acquisition {
            Acquisition::Managed => {
                let manager = DataManager::from_catalog(
                    &options.root,
                    catalog,
                    target.clone(),
                    registry,
                    options.verify,
                    fetcher,
                )?;
                let report = manager.ensure(options.from_scratch)?;
                (manager.data_path(), Some(report), MANAGED_HINT)
            }
            Acquisition::Unmanaged => (options.root.clone(), None, UNMANAGED_HINT),
        };

        if !data_path.is_dir() {
            return Err(Error::DataMissing {
                path: data_path,
                hint: hint.to_string(),
            });
        }

        let puzzles = list_puzzles(&data_path)?;
        if puzzles.is_empty() {
            return Err(Error::NoPuzzles {
                path: data_path,
                hint: hint.to_string(),
            });
        }

        let by_name = puzzles
            .iter()
            .enumerate()
            .map(|(index, dir)| (puzzle_name(dir), index))
            .collect();

        Ok(Self {
            target,
            data_path,
            supervised: options.supervised,
            puzzles,
            by_name,
            report,
        })
    }

    pub fn variant_version(&self) -> &VariantVersion {
        &self.target
    }

    /// Folder holding the puzzle directories.
    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    /// What preparation did while opening. `None` for unmanaged datasets.
    pub fn report(&self) -> Option<&EnsureReport> {
        self.report.as_ref()
    }

    pub fn len(&self) -> usize {
        self.puzzles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.puzzles.is_empty()
    }

    /// Puzzle names in index order.
    pub fn names(&self) -> impl Iterator<Item = String> + '_ {
        self.puzzles.iter().map(|dir| puzzle_name(dir))
    }

    pub fn puzzle_dir(&self, key: impl Into<PuzzleKey>) -> Result<&Path> {
        let key = key.into();
        let index = match &key {
            PuzzleKey::Index(index) => Some(*index),
            PuzzleKey::Name(name) => self.by_name.get(name).copied(),
        };
        index
            .and_then(|i| self.puzzles.get(i))
            .map(PathBuf::as_path)
            .ok_or_else(|| Error::PuzzleNotFound {
                key: key.to_string(),
            })
    }

    /// Raw descriptor of a 2D puzzle, with `path` set.
    pub fn metadata(&self, key: impl Into<PuzzleKey>) -> Result<PuzzleMetadata> {
        let dir = self.puzzle_dir(key)?;
        if self.target.variant() != VARIANT_2D_SOLVED {
            return Err(Error::Unsupported {
                operation: "Metadata lookup".into(),
                variant: self.target.variant().to_string(),
            });
        }
        solved2d::metadata(dir)
    }

    pub fn get(&self, key: impl Into<PuzzleKey>) -> Result<Sample> {
        let dir = self.puzzle_dir(key)?;
        match self.target.variant() {
            VARIANT_2D_SOLVED => solved2d::item(dir, self.supervised),
            VARIANT_3D_SOLVED => solved3d::item(dir).map(Sample::Solved3d),
            other => Err(Error::Unsupported {
                operation: "Item lookup".into(),
                variant: other.to_string(),
            }),
        }
    }

    /// Items in index order.
    pub fn iter(&self) -> impl Iterator<Item = Result<Sample>> + '_ {
        (0..self.len()).map(|index| self.get(index))
    }
}
