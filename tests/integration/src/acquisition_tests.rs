//! End-to-end acquisition: resolve, download, verify, extract, ledger.

mod support;

use std::fs;
use std::sync::Arc;

use pretty_assertions::assert_eq;
use repair_core::{Dataset, DatasetOptions, Error, ErrorKind};
use repair_test_utils::{ArchiveBuilder, CountingFetcher, TestRoot};
use rstest::rstest;

use support::{VARIANT, catalog, open, registry};

const ARCHIVE_NAME: &str = "2D_SOLVED_v2.zip";

fn archive() -> Vec<u8> {
    ArchiveBuilder::solved(3).build()
}

#[test]
fn major_request_resolves_latest_and_prepares_it() {
    let root = TestRoot::new();
    let archive = archive();
    let catalog = catalog(&archive);
    let fetcher = Arc::new(CountingFetcher::new(archive));

    let dataset = open(&root, &catalog, &fetcher, "2", false).unwrap();

    assert_eq!(dataset.variant_version().key(), "2D_SOLVED_v2.0.2");
    assert_eq!(root.status_file(), "2D_SOLVED_v2.0.2:OK\n");
    assert_eq!(dataset.data_path(), root.join("2D_SOLVED/v2.0.2/SOLVED"));
    assert_eq!(dataset.len(), 3);
    root.assert_exists("2D_SOLVED/v2.0.2/SOLVED/puzzle_0000100_RP_group_99/data.json");
    root.assert_exists(ARCHIVE_NAME);
    root.assert_exists("README");
    root.assert_not_exists("2D_SOLVED_v2.zip.part");
    assert_eq!(fetcher.requests(), 1);
}

#[rstest]
#[case("", "2D_SOLVED_v2")]
#[case("2.0.0", "2D_SOLVED_v2.0.2")]
#[case("2.0", "2D_SOLVED_v2.0.2")]
#[case("v2.0.1", "2D_SOLVED_v2.0.1")]
fn requests_resolve_to_catalog_versions(#[case] request: &str, #[case] key: &str) {
    let root = TestRoot::new();
    let archive = archive();
    let catalog = catalog(&archive);
    let fetcher = Arc::new(CountingFetcher::new(archive));

    let dataset = open(&root, &catalog, &fetcher, request, false).unwrap();
    assert_eq!(dataset.variant_version().key(), key);
}

#[test]
fn prepared_version_is_not_fetched_or_extracted_again() {
    let root = TestRoot::new();
    let archive = archive();
    let catalog = catalog(&archive);
    let fetcher = Arc::new(CountingFetcher::new(archive));

    open(&root, &catalog, &fetcher, "2.0.2", false).unwrap();
    let extracted_marker = root.join("2D_SOLVED/v2.0.2/SOLVED/sentinel");
    fs::write(&extracted_marker, "kept").unwrap();

    let dataset = open(&root, &catalog, &fetcher, "2.0.2", false).unwrap();
    let report = dataset.report().unwrap();

    assert_eq!(fetcher.requests(), 1);
    assert!(!report.fetched);
    assert!(!report.extracted);
    assert_eq!(report.patches_applied, 0);
    // no re-extraction means the directory was left alone
    assert!(extracted_marker.exists());
    assert_eq!(root.status_file(), "2D_SOLVED_v2.0.2:OK\n");
}

#[test]
fn corrupted_archive_on_disk_is_downloaded_again() {
    let root = TestRoot::new();
    let archive = archive();
    let catalog = catalog(&archive);
    let fetcher = Arc::new(CountingFetcher::new(archive.clone()));

    open(&root, &catalog, &fetcher, "2.0.1", false).unwrap();
    fs::write(root.join(ARCHIVE_NAME), b"not the release").unwrap();

    let dataset = open(&root, &catalog, &fetcher, "2.0.1", false).unwrap();

    assert_eq!(fetcher.requests(), 2);
    assert!(dataset.report().unwrap().fetched);
    assert_eq!(fs::read(root.join(ARCHIVE_NAME)).unwrap(), archive);
}

#[test]
fn mismatching_download_is_rejected_and_discarded() {
    let root = TestRoot::new();
    let archive = archive();
    let catalog = catalog(&archive);
    let fetcher = Arc::new(CountingFetcher::new(b"tampered".to_vec()));

    let err = open(&root, &catalog, &fetcher, "2.0.1", false).unwrap_err();

    assert!(matches!(err, Error::ChecksumMismatch { .. }));
    assert_eq!(err.kind(), ErrorKind::Integrity);
    root.assert_not_exists(ARCHIVE_NAME);
    root.assert_not_exists("2D_SOLVED_v2.zip.part");
    root.assert_not_exists("2D_SOLVED/v2.0.1");
    assert_eq!(root.status_file(), "");
}

#[test]
fn versions_share_one_archive_and_keep_separate_trees() {
    let root = TestRoot::new();
    let archive = archive();
    let catalog = catalog(&archive);
    let fetcher = Arc::new(CountingFetcher::new(archive));

    open(&root, &catalog, &fetcher, "2.0.1", false).unwrap();
    open(&root, &catalog, &fetcher, "2.0.2", false).unwrap();

    assert_eq!(fetcher.requests(), 1);
    assert_eq!(
        root.status_file(),
        "2D_SOLVED_v2.0.1:OK\n2D_SOLVED_v2.0.2:OK\n"
    );
    root.assert_exists("2D_SOLVED/v2.0.1/SOLVED");
    root.assert_exists("2D_SOLVED/v2.0.2/SOLVED");
}

#[test]
fn from_scratch_rebuilds_only_the_requested_version() {
    let root = TestRoot::new();
    let archive = archive();
    let catalog = catalog(&archive);
    let fetcher = Arc::new(CountingFetcher::new(archive));

    open(&root, &catalog, &fetcher, "2.0.1", false).unwrap();
    open(&root, &catalog, &fetcher, "2.0.2", false).unwrap();
    let other = root.join("2D_SOLVED/v2.0.1/SOLVED/sentinel");
    let rebuilt = root.join("2D_SOLVED/v2.0.2/SOLVED/sentinel");
    fs::write(&other, "kept").unwrap();
    fs::write(&rebuilt, "wiped").unwrap();

    let dataset = open(&root, &catalog, &fetcher, "2.0.2", true).unwrap();

    assert!(dataset.report().unwrap().extracted);
    assert!(other.exists());
    assert!(!rebuilt.exists());
    assert_eq!(
        root.status_file(),
        "2D_SOLVED_v2.0.1:OK\n2D_SOLVED_v2.0.2:OK\n"
    );
}

#[test]
fn none_status_forces_a_fresh_extraction() {
    let root = TestRoot::new();
    let archive = archive();
    let catalog = catalog(&archive);
    let fetcher = Arc::new(CountingFetcher::new(archive));

    // an empty request selects the default version, 2.0.0
    open(&root, &catalog, &fetcher, "", false).unwrap();
    let leftover = root.join("2D_SOLVED/v2/SOLVED/puzzle_9999999_RP_group_0");
    fs::create_dir(&leftover).unwrap();
    fs::write(root.join("STATUS"), "2D_SOLVED_v2:NONE\n").unwrap();

    let dataset = open(&root, &catalog, &fetcher, "", false).unwrap();

    assert!(dataset.report().unwrap().extracted);
    assert!(!leftover.exists());
    assert_eq!(dataset.len(), 3);
    assert_eq!(fetcher.requests(), 1);
}

#[test]
fn unmanaged_open_reads_a_managed_data_path() {
    let root = TestRoot::new();
    let archive = archive();
    let catalog = catalog(&archive);
    let fetcher = Arc::new(CountingFetcher::new(archive));

    let managed = open(&root, &catalog, &fetcher, "2.0.2", false).unwrap();

    let unmanaged = Dataset::open_with(
        DatasetOptions::new(managed.data_path(), VARIANT)
            .version("2.0.2")
            .unmanaged(),
        &catalog,
        &registry(),
        fetcher.clone(),
    )
    .unwrap();

    assert!(unmanaged.report().is_none());
    assert_eq!(
        unmanaged.names().collect::<Vec<_>>(),
        managed.names().collect::<Vec<_>>()
    );
    assert_eq!(fetcher.requests(), 1);
}
