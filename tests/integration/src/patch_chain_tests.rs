//! Patch chains composed by the catalog and their effect on the ledger.

mod support;

use std::fs;
use std::sync::Arc;

use pretty_assertions::assert_eq;
use repair_core::{Error, ErrorKind};
use repair_test_utils::{ArchiveBuilder, CountingFetcher, TestRoot};

use support::{BROKEN, MARK_A, MARK_B, MARKS_FILE, catalog, catalog_with_chain, open};

fn marks(root: &TestRoot, version: &str) -> String {
    fs::read_to_string(root.join(&format!("2D_SOLVED/v{version}/SOLVED/{MARKS_FILE}")))
        .unwrap_or_default()
}

#[test]
fn chains_run_in_declared_order() {
    let root = TestRoot::new();
    let archive = ArchiveBuilder::solved(2).build();
    let catalog = catalog(&archive);
    let fetcher = Arc::new(CountingFetcher::new(archive));

    let base = open(&root, &catalog, &fetcher, "", false).unwrap();
    let single = open(&root, &catalog, &fetcher, "2.0.1", false).unwrap();
    let double = open(&root, &catalog, &fetcher, "2.0.2", false).unwrap();

    assert_eq!(base.report().unwrap().patches_applied, 0);
    assert_eq!(single.report().unwrap().patches_applied, 1);
    assert_eq!(double.report().unwrap().patches_applied, 2);
    assert_eq!(marks(&root, "2"), "");
    assert_eq!(marks(&root, "2.0.1"), "A");
    assert_eq!(marks(&root, "2.0.2"), "AB");
}

#[test]
fn reversed_chain_reverses_effects() {
    let root = TestRoot::new();
    let archive = ArchiveBuilder::solved(1).build();
    let catalog = catalog_with_chain(&archive, &[MARK_B, MARK_A]);
    let fetcher = Arc::new(CountingFetcher::new(archive));

    open(&root, &catalog, &fetcher, "2.0.2", false).unwrap();
    assert_eq!(marks(&root, "2.0.2"), "BA");
}

#[test]
fn repeated_patch_runs_twice() {
    let root = TestRoot::new();
    let archive = ArchiveBuilder::solved(1).build();
    let catalog = catalog_with_chain(&archive, &[MARK_A, MARK_A]);
    let fetcher = Arc::new(CountingFetcher::new(archive));

    open(&root, &catalog, &fetcher, "2.0.2", false).unwrap();
    assert_eq!(marks(&root, "2.0.2"), "AA");
}

#[test]
fn mid_chain_failure_leaves_version_unprepared() {
    let root = TestRoot::new();
    let archive = ArchiveBuilder::solved(1).build();
    let broken = catalog_with_chain(&archive, &[MARK_A, BROKEN, MARK_B]);
    let fetcher = Arc::new(CountingFetcher::new(archive.clone()));

    let err = open(&root, &broken, &fetcher, "2.0.2", false).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Patch);
    let Error::PatchFailed { patch, .. } = &err else {
        panic!("expected a patch failure, got {err:?}");
    };
    assert_eq!(patch.as_str(), BROKEN);
    assert_eq!(root.status_file(), "2D_SOLVED_v2.0.2:NONE\n");
    // steps after the failing one never ran
    assert_eq!(marks(&root, "2.0.2"), "A");

    // the next open starts again from a clean extraction
    let fixed = catalog(&archive);
    let dataset = open(&root, &fixed, &fetcher, "2.0.2", false).unwrap();
    assert!(dataset.report().unwrap().extracted);
    assert_eq!(marks(&root, "2.0.2"), "AB");
    assert_eq!(root.status_file(), "2D_SOLVED_v2.0.2:OK\n");
    assert_eq!(fetcher.requests(), 1);
}

#[test]
fn unknown_patch_is_rejected_before_download() {
    let root = TestRoot::new();
    let archive = ArchiveBuilder::solved(1).build();
    let catalog = catalog_with_chain(&archive, &[MARK_A, "not_registered"]);
    let fetcher = Arc::new(CountingFetcher::new(archive));

    let err = open(&root, &catalog, &fetcher, "2.0.2", false).unwrap_err();

    assert!(matches!(err, Error::UnknownPatch { .. }));
    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert_eq!(fetcher.requests(), 0);
    assert_eq!(root.status_file(), "");
}
