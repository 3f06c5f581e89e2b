//! Shared setup: a three-release catalog and marker patches.
//!
//! Versions 2.0.0, 2.0.1 and 2.0.2 of `2D_SOLVED` all download the 2.0.0
//! archive. 2.0.1 applies `[mark_a]`, 2.0.2 applies `[mark_a, mark_b]`.
//! Each marker patch appends its letter to `<data>/MARKS`.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use repair_core::{
    Catalog, CatalogEntry, Dataset, DatasetOptions, Error, Patch, PatchId, PatchRegistry,
    RemoteDescriptor, Result, VariantCatalog, Version,
};
use repair_fs::checksum::compute_content_checksum;
use repair_fs::Algorithm;
use repair_test_utils::{CountingFetcher, TestRoot};

pub const VARIANT: &str = "2D_SOLVED";
pub const MARK_A: &str = "mark_a";
pub const MARK_B: &str = "mark_b";
pub const BROKEN: &str = "broken";
pub const MARKS_FILE: &str = "MARKS";

/// Appends a letter to the marker file in the data directory.
pub struct Mark(pub &'static str);

impl Patch for Mark {
    fn describe(&self) -> &str {
        "Append a marker"
    }

    fn apply(&self, data_dir: &Path) -> Result<()> {
        let path = data_dir.join(MARKS_FILE);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| Error::io(&path, e))?;
        file.write_all(self.0.as_bytes())
            .map_err(|e| Error::io(&path, e))
    }
}

/// Always fails.
pub struct Broken;

impl Patch for Broken {
    fn describe(&self) -> &str {
        "Fail unconditionally"
    }

    fn apply(&self, data_dir: &Path) -> Result<()> {
        Err(Error::Metadata {
            path: data_dir.to_path_buf(),
            message: "broken on purpose".into(),
        })
    }
}

pub fn registry() -> PatchRegistry {
    let mut registry = PatchRegistry::new();
    registry.register(MARK_A, Mark("A"));
    registry.register(MARK_B, Mark("B"));
    registry.register(BROKEN, Broken);
    registry
}

fn version(raw: &str) -> Version {
    Version::parse(raw).unwrap()
}

/// The three-release catalog whose single remote has the digest of `archive`.
pub fn catalog(archive: &[u8]) -> Catalog {
    catalog_with_chain(archive, &[MARK_A, MARK_B])
}

/// Like [`catalog`] but with `chain` as the patches of 2.0.2.
pub fn catalog_with_chain(archive: &[u8], chain: &[&str]) -> Catalog {
    let base = version("2.0.0");
    let mut versions = BTreeMap::new();
    versions.insert(base.clone(), CatalogEntry::default());
    versions.insert(
        version("2.0.1"),
        CatalogEntry::new(Some(base.clone()), vec![PatchId::from(MARK_A)]),
    );
    versions.insert(
        version("2.0.2"),
        CatalogEntry::new(
            Some(base.clone()),
            chain.iter().map(|id| PatchId::from(*id)).collect(),
        ),
    );

    let mut variants = BTreeMap::new();
    variants.insert(
        VARIANT.to_string(),
        VariantCatalog {
            default_version: base,
            versions,
        },
    );

    let mut remotes = BTreeMap::new();
    remotes.insert(
        format!("{VARIANT}_v2"),
        RemoteDescriptor {
            url: "https://example.invalid/2D_SOLVED.zip".into(),
            checksum: compute_content_checksum(archive, Algorithm::Sha256),
            filename: "2D_SOLVED_v2.zip".into(),
            folder_name: "SOLVED".into(),
        },
    );

    let catalog = Catalog { variants, remotes };
    catalog.validate().unwrap();
    catalog
}

/// Open `version` under `root` with the marker registry.
pub fn open(
    root: &TestRoot,
    catalog: &Catalog,
    fetcher: &Arc<CountingFetcher>,
    version: &str,
    from_scratch: bool,
) -> Result<Dataset> {
    Dataset::open_with(
        DatasetOptions::new(root.path(), VARIANT)
            .version(version)
            .from_scratch(from_scratch),
        catalog,
        &registry(),
        fetcher.clone(),
    )
}
