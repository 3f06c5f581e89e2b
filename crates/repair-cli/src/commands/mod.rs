//! Command implementations

mod fetch;
mod list;
mod status;
mod versions;

pub use fetch::run_fetch;
pub use list::run_list;
pub use status::run_status;
pub use versions::run_versions;

use std::path::Path;

use repair_core::{Dataset, DatasetOptions, VerifyMode, VersionRequest};

use crate::cli::Selection;

/// Translate command-line selection flags into dataset options.
pub(crate) fn dataset_options(root: &Path, selection: &Selection) -> DatasetOptions {
    let mut options = DatasetOptions::new(root, selection.variant.as_str())
        .from_scratch(selection.from_scratch)
        .supervised(selection.supervised);
    if let Some(version) = &selection.version {
        options = options.version(VersionRequest::Raw(version.clone()));
    }
    if selection.unmanaged {
        options = options.unmanaged();
    }
    if selection.skip_verify {
        options = options.verify(VerifyMode::Skip);
    }
    options
}

pub(crate) fn open(
    root: &Path,
    catalog: &repair_core::Catalog,
    selection: &Selection,
) -> repair_core::Result<Dataset> {
    Dataset::open(dataset_options(root, selection), catalog)
}
