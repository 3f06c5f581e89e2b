//! All-or-nothing archive extraction

use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::Path;

use tracing::{debug, info, warn};

use crate::{Error, Result, progress};

/// Extract the zip at `archive` into a freshly created `target`.
///
/// An existing `target` is removed first, so no file from an earlier
/// extraction or patch run survives. Entries whose names would escape
/// `target` are skipped. Returns the number of files written.
pub fn extract_fresh(archive: &Path, target: &Path) -> Result<usize> {
    if !archive.is_file() {
        return Err(Error::ArchiveMissing {
            path: archive.to_path_buf(),
        });
    }

    if target.exists() {
        debug!(path = %target.display(), "Removing previous extraction");
        fs::remove_dir_all(target).map_err(|e| Error::io(target, e))?;
    }
    fs::create_dir_all(target).map_err(|e| Error::io(target, e))?;

    let archive_error = |message: String| Error::Archive {
        path: archive.to_path_buf(),
        message,
    };

    let file = File::open(archive).map_err(|e| Error::io(archive, e))?;
    let mut zip =
        zip::ZipArchive::new(BufReader::new(file)).map_err(|e| archive_error(e.to_string()))?;

    info!(
        archive = %archive.display(),
        target = %target.display(),
        entries = zip.len(),
        "Extracting archive"
    );
    let pb = progress::items(zip.len() as u64, "Extracting");

    let mut written = 0;
    for index in 0..zip.len() {
        let mut entry = zip
            .by_index(index)
            .map_err(|e| archive_error(e.to_string()))?;
        pb.inc(1);

        let Some(relative) = entry.enclosed_name() else {
            warn!(entry = entry.name(), "Skipping archive entry with unsafe path");
            continue;
        };
        let out_path = target.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&out_path).map_err(|e| Error::io(&out_path, e))?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
        let mut out = File::create(&out_path).map_err(|e| Error::io(&out_path, e))?;
        io::copy(&mut entry, &mut out).map_err(|e| archive_error(e.to_string()))?;
        written += 1;
    }

    pb.finish_and_clear();
    info!(files = written, "Extraction complete");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;

    fn zip_bytes(files: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in files {
            writer.start_file(*name, SimpleFileOptions::default()).unwrap();
            writer.write_all(content).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn extracts_nested_files() {
        let tmp = tempfile::tempdir().unwrap();
        let archive = tmp.path().join("a.zip");
        fs::write(
            &archive,
            zip_bytes(&[
                ("SOLVED/puzzle_1/data.json", b"{}"),
                ("SOLVED/puzzle_1/preview.png", b"png"),
            ]),
        )
        .unwrap();

        let target = tmp.path().join("out");
        assert_eq!(extract_fresh(&archive, &target).unwrap(), 2);
        assert_eq!(
            fs::read(target.join("SOLVED/puzzle_1/data.json")).unwrap(),
            b"{}"
        );
    }

    #[test]
    fn previous_contents_are_removed() {
        let tmp = tempfile::tempdir().unwrap();
        let archive = tmp.path().join("a.zip");
        fs::write(&archive, zip_bytes(&[("SOLVED/x", b"1")])).unwrap();

        let target = tmp.path().join("out");
        fs::create_dir_all(target.join("SOLVED")).unwrap();
        fs::write(target.join("SOLVED/stale"), b"old").unwrap();

        extract_fresh(&archive, &target).unwrap();
        assert!(!target.join("SOLVED/stale").exists());
        assert!(target.join("SOLVED/x").exists());
    }

    #[test]
    fn missing_archive_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let err = extract_fresh(&tmp.path().join("none.zip"), &tmp.path().join("out")).unwrap_err();
        assert!(matches!(err, Error::ArchiveMissing { .. }));
        assert_eq!(err.kind(), crate::ErrorKind::Io);
    }

    #[test]
    fn garbage_archive_is_an_archive_error() {
        let tmp = tempfile::tempdir().unwrap();
        let archive = tmp.path().join("a.zip");
        fs::write(&archive, b"definitely not a zip").unwrap();

        let err = extract_fresh(&archive, &tmp.path().join("out")).unwrap_err();
        assert!(matches!(err, Error::Archive { .. }));
    }
}
