//! `3D_SOLVED` getter

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::puzzle::puzzle_name;
use crate::{Error, Result};

/// Files making up one 3D fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment3d {
    pub name: String,
    pub obj: PathBuf,
    pub mtl: PathBuf,
    pub png: PathBuf,
}

/// A 3D puzzle: its directory and fragments sorted by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Puzzle3d {
    pub path: PathBuf,
    pub name: String,
    pub fragments: Vec<Fragment3d>,
}

#[derive(Default)]
struct Parts {
    obj: Option<PathBuf>,
    mtl: Option<PathBuf>,
    png: Option<PathBuf>,
}

/// Group `.obj`, `.mtl` and `.png` files by stem.
///
/// Every stem must have all three files.
pub fn item(puzzle_dir: &Path) -> Result<Puzzle3d> {
    let mut groups: BTreeMap<String, Parts> = BTreeMap::new();

    for entry in fs::read_dir(puzzle_dir).map_err(|e| Error::io(puzzle_dir, e))? {
        let path = entry.map_err(|e| Error::io(puzzle_dir, e))?.path();
        let Some(extension) = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
        else {
            continue;
        };
        let Some(stem) = path.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
            continue;
        };

        let parts = groups.entry(stem).or_default();
        match extension.as_str() {
            "obj" => parts.obj = Some(path),
            "mtl" => parts.mtl = Some(path),
            "png" => parts.png = Some(path),
            _ => {}
        }
    }

    let mut fragments = Vec::new();
    for (name, parts) in groups {
        match parts {
            Parts {
                obj: Some(obj),
                mtl: Some(mtl),
                png: Some(png),
            } => fragments.push(Fragment3d { name, obj, mtl, png }),
            Parts {
                obj: None,
                mtl: None,
                png: None,
            } => {}
            _ => {
                return Err(Error::IncompleteFragment {
                    name,
                    path: puzzle_dir.to_path_buf(),
                });
            }
        }
    }

    Ok(Puzzle3d {
        path: puzzle_dir.to_path_buf(),
        name: puzzle_name(puzzle_dir),
        fragments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn touch(dir: &Path, names: &[&str]) {
        for name in names {
            fs::write(dir.join(name), b"").unwrap();
        }
    }

    #[test]
    fn groups_files_by_fragment() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("puzzle_3d");
        fs::create_dir(&dir).unwrap();
        touch(
            &dir,
            &["b.obj", "b.mtl", "b.PNG", "a.obj", "a.mtl", "a.png", "notes.txt"],
        );

        let puzzle = item(&dir).unwrap();
        assert_eq!(puzzle.name, "puzzle_3d");
        let names: Vec<&str> = puzzle.fragments.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(puzzle.fragments[1].png, dir.join("b.PNG"));
    }

    #[test]
    fn incomplete_fragment_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("puzzle_3d");
        fs::create_dir(&dir).unwrap();
        touch(&dir, &["a.obj", "a.png"]);

        let err = item(&dir).unwrap_err();
        assert!(matches!(err, Error::IncompleteFragment { ref name, .. } if name == "a"));
    }
}
