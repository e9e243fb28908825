//! Shared test utilities for the artcheck test suite.
//!
//! Builds small in-memory images with known pixel content, and writes them
//! to disk when a test needs a real file to ingest.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! let img = banded_image(50, &[(40, [0, 0, 0, 255]), (10, [255, 255, 255, 255])]);
//! let path = write_image(tmp.path(), "bands.png", &img);
//! ```

use image::{DynamicImage, Rgba, RgbaImage};
use std::path::{Path, PathBuf};

/// A `width × height` image filled with one RGBA color.
pub fn solid_image(width: u32, height: u32, rgba: [u8; 4]) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba(rgba)))
}

/// Horizontal bands stacked top to bottom, each `(rows, color)`.
pub fn banded_image(width: u32, bands: &[(u32, [u8; 4])]) -> DynamicImage {
    let height: u32 = bands.iter().map(|(rows, _)| rows).sum();
    let mut img = RgbaImage::new(width, height);
    let mut y0 = 0;
    for &(rows, rgba) in bands {
        for y in y0..y0 + rows {
            for x in 0..width {
                img.put_pixel(x, y, Rgba(rgba));
            }
        }
        y0 += rows;
    }
    DynamicImage::ImageRgba8(img)
}

/// Save `img` as `dir/name`, encoded by the file extension. Panics on failure.
///
/// JPEG has no alpha channel, so `.jpg`/`.jpeg` targets are written as RGB.
pub fn write_image(dir: &Path, name: &str, img: &DynamicImage) -> PathBuf {
    let path = dir.join(name);
    let is_jpeg = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("jpg") || e.eq_ignore_ascii_case("jpeg"));
    let result = if is_jpeg {
        DynamicImage::ImageRgb8(img.to_rgb8()).save(&path)
    } else {
        img.save(&path)
    };
    result.unwrap_or_else(|e| panic!("failed to write {}: {e}", path.display()));
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banded_image_stacks_rows() {
        let img = banded_image(3, &[(2, [255, 0, 0, 255]), (1, [0, 0, 255, 255])]).to_rgba8();
        assert_eq!(img.dimensions(), (3, 3));
        assert_eq!(img.get_pixel(0, 1).0, [255, 0, 0, 255]);
        assert_eq!(img.get_pixel(2, 2).0, [0, 0, 255, 255]);
    }

    #[test]
    fn write_image_handles_jpeg() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = write_image(tmp.path(), "a.jpg", &solid_image(4, 4, [9, 9, 9, 255]));
        assert!(path.exists());
    }
}
