//! Acquisition orchestration for one variant version
//!
//! Per ledger key the manager moves `NONE -> OK` by downloading (or reusing)
//! the verified base archive, extracting it into a fresh directory and running
//! the version's full patch chain. `OK` is only recorded after the last patch
//! succeeds, so an interrupted or failed run restarts from extraction on the
//! next call. Other versions' entries are never touched.
//!
//! A single writer per root is assumed.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use repair_fs::{RootLayout, io};
use tracing::{debug, info};

use crate::catalog::{Catalog, RemoteDescriptor, VariantVersion};
use crate::download::{DownloaderVerifier, Fetcher, VerifyMode};
use crate::extract::extract_fresh;
use crate::ledger::{Status, StatusLedger};
use crate::patch::{PatchChain, PatchRegistry};
use crate::Result;

const README: &str = "\
RePAIR dataset root

This folder is managed by repair-dataset.

  STATUS                          preparation state per <variant>_v<version> (NONE or OK)
  <archive>.zip                   verified base archives
  <variant>/v<version>/<folder>/  extracted and patched puzzles (puzzle_*)

Files under <variant>/v<version>/ are rewritten by patches; do not edit them by hand.
To rebuild a version, open it with from_scratch or delete its line from STATUS.
";

/// What [`DataManager::ensure`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnsureReport {
    pub archive: PathBuf,
    /// The archive was downloaded during this call
    pub fetched: bool,
    /// Extraction and patching ran during this call
    pub extracted: bool,
    pub patches_applied: usize,
}

/// Prepares one [`VariantVersion`] inside a managed root.
pub struct DataManager {
    layout: RootLayout,
    target: VariantVersion,
    folder_name: String,
    chain: PatchChain,
    downloader: DownloaderVerifier,
}

impl DataManager {
    pub fn new(
        root: impl Into<PathBuf>,
        target: VariantVersion,
        remote: &RemoteDescriptor,
        chain: PatchChain,
        verify: VerifyMode,
        fetcher: Arc<dyn Fetcher>,
    ) -> Self {
        let layout = RootLayout::new(root);
        let downloader = DownloaderVerifier::new(&layout, remote, verify, fetcher);
        Self {
            layout,
            target,
            folder_name: remote.folder_name.clone(),
            chain,
            downloader,
        }
    }

    /// Build a manager from catalog lookups.
    ///
    /// Fails before any I/O when the remote is missing or a patch id is unknown.
    pub fn from_catalog(
        root: impl Into<PathBuf>,
        catalog: &Catalog,
        target: VariantVersion,
        registry: &PatchRegistry,
        verify: VerifyMode,
        fetcher: Arc<dyn Fetcher>,
    ) -> Result<Self> {
        let remote = catalog.remote_for(&target)?;
        let chain = registry.resolve_chain(&catalog.entry(&target)?.patches)?;
        Ok(Self::new(root, target, remote, chain, verify, fetcher))
    }

    pub fn target(&self) -> &VariantVersion {
        &self.target
    }

    pub fn root(&self) -> &Path {
        self.layout.root()
    }

    pub fn chain(&self) -> &PatchChain {
        &self.chain
    }

    /// Directory the archive is extracted into.
    pub fn extract_dir(&self) -> PathBuf {
        let version = self.target.version().to_string();
        self.layout.extract_dir(self.target.variant(), &version)
    }

    /// Directory holding the `puzzle_*` folders once ready.
    pub fn data_path(&self) -> PathBuf {
        let version = self.target.version().to_string();
        self.layout
            .data_dir(self.target.variant(), &version, &self.folder_name)
    }

    /// Current ledger state of this version.
    pub fn status(&self) -> Result<Status> {
        Ok(self.ledger()?.get(&self.target.key()))
    }

    /// Mark this version `NONE` so the next [`ensure`](Self::ensure) rebuilds it.
    pub fn reset(&self) -> Result<()> {
        self.ledger()?.set(&self.target.key(), Status::None)
    }

    /// Bring this version to `OK`, doing only the work that is missing.
    pub fn ensure(&self, from_scratch: bool) -> Result<EnsureReport> {
        let key = self.target.key();

        if from_scratch {
            info!(%key, "Forcing fresh preparation");
            self.reset()?;
        }

        let archive = self.downloader.ensure_local()?;
        self.write_readme()?;

        let mut ledger = self.ledger()?;
        if ledger.get(&key) == Status::Ok {
            debug!(%key, "Already prepared, skipping extraction and patches");
            return Ok(EnsureReport {
                archive: archive.path,
                fetched: archive.fetched,
                extracted: false,
                patches_applied: 0,
            });
        }

        ledger.set(&key, Status::None)?;
        extract_fresh(&archive.path, &self.extract_dir())?;
        let patches_applied = self.chain.run(&self.data_path())?;
        ledger.set(&key, Status::Ok)?;

        info!(%key, patches = patches_applied, "Dataset version is ready");
        Ok(EnsureReport {
            archive: archive.path,
            fetched: archive.fetched,
            extracted: true,
            patches_applied,
        })
    }

    fn ledger(&self) -> Result<StatusLedger> {
        StatusLedger::load(self.layout.status_file())
    }

    fn write_readme(&self) -> Result<()> {
        let path = self.layout.readme();
        if !path.exists() {
            io::write_text(&path, README)?;
        }
        Ok(())
    }
}
