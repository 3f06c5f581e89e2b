//! Synthetic puzzles packed into zip archives.
//!
//! Fixtures mimic the 2.0.0 release: `data.json` lists fragments with `.obj`
//! filenames and `pixel_position`, while the fragment images are `.png`.

use std::io::{Cursor, Write};

use image::{ImageFormat, Rgba, RgbaImage};
use serde_json::json;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Encode an image as PNG bytes.
pub fn png_bytes(img: &RgbaImage) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png)
        .expect("encoding a PNG in memory cannot fail");
    buf.into_inner()
}

/// Fragment canvas with an opaque `4x2` block whose top-left corner is `(x, y)`.
///
/// The alpha centroid is `(x + 1.5, y + 0.5)`.
pub fn fragment_image(width: u32, height: u32, x: u32, y: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |px, py| {
        if (x..x + 4).contains(&px) && (y..y + 2).contains(&py) {
            Rgba([180, 120, 60, 255])
        } else {
            Rgba([0, 0, 0, 0])
        }
    })
}

/// One legacy puzzle directory.
#[derive(Debug, Clone)]
pub struct PuzzleFixture {
    pub name: String,
    pub fragments: usize,
    pub preview: (u32, u32),
}

impl PuzzleFixture {
    /// Two fragments on a `40x30` preview.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fragments: 2,
            preview: (40, 30),
        }
    }

    pub fn fragments(mut self, count: usize) -> Self {
        self.fragments = count;
        self
    }

    /// Stem of fragment `idx`.
    pub fn fragment_stem(idx: usize) -> String {
        format!("RPf_{:05}", idx + 1)
    }

    /// The legacy `data.json` content.
    pub fn metadata(&self) -> serde_json::Value {
        let fragments: Vec<_> = (0..self.fragments)
            .map(|idx| {
                json!({
                    "idx": idx,
                    "filename": format!("{}.obj", Self::fragment_stem(idx)),
                    "pixel_position": [10 + idx, 5 + idx, 0.0],
                })
            })
            .collect();
        json!({
            "fragments": fragments,
            "adjacency": vec![vec![1; self.fragments]; self.fragments],
        })
    }

    /// Relative file paths and contents making up the puzzle.
    pub fn files(&self) -> Vec<(String, Vec<u8>)> {
        let (width, height) = self.preview;
        let mut files = vec![
            (
                "data.json".to_string(),
                serde_json::to_vec_pretty(&self.metadata()).expect("fixture JSON serializes"),
            ),
            (
                "preview.png".to_string(),
                png_bytes(&RgbaImage::new(width, height)),
            ),
        ];
        for idx in 0..self.fragments {
            let offset = (idx as u32 % 5) * 2;
            files.push((
                format!("{}.png", Self::fragment_stem(idx)),
                png_bytes(&fragment_image(width, height, 4 + offset, 6 + offset)),
            ));
        }
        files
    }
}

/// Builds a zip archive shaped like a released dataset:
/// `<folder>/puzzle_*/...`.
#[derive(Debug, Clone)]
pub struct ArchiveBuilder {
    folder: String,
    puzzles: Vec<PuzzleFixture>,
    extra: Vec<(String, Vec<u8>)>,
}

impl ArchiveBuilder {
    pub fn new(folder: impl Into<String>) -> Self {
        Self {
            folder: folder.into(),
            puzzles: Vec::new(),
            extra: Vec::new(),
        }
    }

    /// An archive with `count` generic puzzles under `SOLVED/`.
    pub fn solved(count: usize) -> Self {
        (0..count).fold(Self::new("SOLVED"), |builder, i| {
            builder.puzzle(PuzzleFixture::new(format!(
                "puzzle_{:07}_RP_group_{}",
                i + 100,
                i + 99
            )))
        })
    }

    /// Like [`solved`](Self::solved) plus the puzzles the 2.0.1 release flips.
    pub fn release_2(count: usize) -> Self {
        let mut builder = Self::solved(count);
        for name in [
            "puzzle_0000031_RP_group_30",
            "puzzle_0000062_RP_group_61",
            "puzzle_0000059_RP_group_58",
        ] {
            builder = builder.puzzle(PuzzleFixture::new(name));
        }
        builder
    }

    pub fn puzzle(mut self, puzzle: PuzzleFixture) -> Self {
        self.puzzles.push(puzzle);
        self
    }

    /// Add an arbitrary entry; `path` is relative to the archive root.
    pub fn file(mut self, path: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        self.extra.push((path.into(), content.into()));
        self
    }

    pub fn puzzle_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.puzzles.iter().map(|p| p.name.clone()).collect();
        names.sort();
        names
    }

    /// Zip bytes.
    pub fn build(&self) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();

        for puzzle in &self.puzzles {
            for (file, content) in puzzle.files() {
                let path = format!("{}/{}/{}", self.folder, puzzle.name, file);
                writer.start_file(path, options).expect("zip entry starts");
                writer.write_all(&content).expect("zip entry writes");
            }
        }
        for (path, content) in &self.extra {
            writer.start_file(path.as_str(), options).expect("zip entry starts");
            writer.write_all(content).expect("zip entry writes");
        }

        writer.finish().expect("zip finishes").into_inner()
    }
}
