//! RGBA helpers for fragment images

use std::path::Path;

use image::{RgbaImage, imageops};

use crate::{Error, Result};

/// Pixel bounds of the opaque region: `(x, y, width, height)`.
pub type Bounds = (u32, u32, u32, u32);

/// Open an image from disk as 8-bit RGBA.
pub fn load_rgba(path: &Path) -> Result<RgbaImage> {
    let img = image::open(path).map_err(|e| Error::Image {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    Ok(img.to_rgba8())
}

/// Encode an RGBA image as PNG, replacing any existing file.
pub fn save_png(img: &RgbaImage, path: &Path) -> Result<()> {
    img.save_with_format(path, image::ImageFormat::Png)
        .map_err(|e| Error::Image {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}

/// Width and height of an image file without decoding its pixels.
pub fn dimensions(path: &Path) -> Result<(u32, u32)> {
    image::image_dimensions(path).map_err(|e| Error::Image {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Mean coordinate of the pixels with non-zero alpha, rounded to 2 decimals.
///
/// `None` for a fully transparent image.
pub fn centroid_rgba(img: &RgbaImage) -> Option<(f64, f64)> {
    let mut count = 0u64;
    let mut sum_x = 0f64;
    let mut sum_y = 0f64;

    for (x, y, pixel) in img.enumerate_pixels() {
        if pixel[3] > 0 {
            count += 1;
            sum_x += f64::from(x);
            sum_y += f64::from(y);
        }
    }

    if count == 0 {
        return None;
    }
    let n = count as f64;
    Some((round2(sum_x / n), round2(sum_y / n)))
}

/// Bounding box of the pixels with non-zero alpha.
pub fn alpha_bbox(img: &RgbaImage) -> Option<Bounds> {
    let mut min_x = u32::MAX;
    let mut min_y = u32::MAX;
    let mut max_x = 0;
    let mut max_y = 0;
    let mut any = false;

    for (x, y, pixel) in img.enumerate_pixels() {
        if pixel[3] > 0 {
            any = true;
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
    }

    any.then(|| (min_x, min_y, max_x - min_x + 1, max_y - min_y + 1))
}

/// Crop an image to its opaque region. `None` for a fully transparent image.
pub fn crop_to_alpha(img: &RgbaImage) -> Option<RgbaImage> {
    let (x, y, width, height) = alpha_bbox(img)?;
    Some(imageops::crop_imm(img, x, y, width, height).to_image())
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use pretty_assertions::assert_eq;

    fn canvas_with_block(width: u32, height: u32, block: Bounds) -> RgbaImage {
        let (bx, by, bw, bh) = block;
        RgbaImage::from_fn(width, height, |x, y| {
            if x >= bx && x < bx + bw && y >= by && y < by + bh {
                Rgba([200, 10, 10, 255])
            } else {
                Rgba([0, 0, 0, 0])
            }
        })
    }

    #[test]
    fn centroid_of_block() {
        let img = canvas_with_block(10, 10, (2, 4, 3, 2));
        assert_eq!(centroid_rgba(&img), Some((3.0, 4.5)));
    }

    #[test]
    fn centroid_is_rounded_to_two_decimals() {
        // opaque pixels at x = 0, 0, 1 -> mean 1/3
        let mut img = RgbaImage::new(2, 2);
        img.put_pixel(0, 0, Rgba([1, 1, 1, 255]));
        img.put_pixel(0, 1, Rgba([1, 1, 1, 255]));
        img.put_pixel(1, 1, Rgba([1, 1, 1, 1]));
        assert_eq!(centroid_rgba(&img), Some((0.33, 0.67)));
    }

    #[test]
    fn transparent_image_has_no_centroid_or_bbox() {
        let img = RgbaImage::new(4, 4);
        assert_eq!(centroid_rgba(&img), None);
        assert_eq!(alpha_bbox(&img), None);
        assert!(crop_to_alpha(&img).is_none());
    }

    #[test]
    fn crop_keeps_only_opaque_region() {
        let img = canvas_with_block(12, 8, (5, 1, 4, 6));
        assert_eq!(alpha_bbox(&img), Some((5, 1, 4, 6)));

        let cropped = crop_to_alpha(&img).unwrap();
        assert_eq!(cropped.dimensions(), (4, 6));
        assert!(cropped.pixels().all(|p| p[3] == 255));
    }

    #[test]
    fn png_round_trip_preserves_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frag.png");
        save_png(&canvas_with_block(7, 3, (0, 0, 1, 1)), &path).unwrap();

        assert_eq!(dimensions(&path).unwrap(), (7, 3));
        assert_eq!(load_rgba(&path).unwrap().dimensions(), (7, 3));
    }

    #[test]
    fn undecodable_file_is_an_image_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not a png").unwrap();

        let err = load_rgba(&path).unwrap_err();
        assert!(matches!(err, Error::Image { .. }));
    }
}
