//! Shared test utilities for the resource-build test suite.
//!
//! Provides synthetic PNG writers, in-memory source builders, and a media
//! fixture layout that the render and pipeline tests share.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_media();
//! let store = SourceStore::load(&RustBackend::new(), &tmp.path().join("media")).unwrap();
//! assert_eq!(store.len(), 3);
//! ```

use image::{DynamicImage, ImageBuffer, Rgba, RgbaImage};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::sources::SourceImage;

// =========================================================================
// Image builders
// =========================================================================

/// Write a solid-colour RGBA PNG of the given size.
pub fn create_test_png(path: &Path, width: u32, height: u32, color: [u8; 4]) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    let img: RgbaImage = ImageBuffer::from_pixel(width, height, Rgba(color));
    img.save_with_format(path, image::ImageFormat::Png).unwrap();
}

/// An in-memory square source named `name` with side `side`.
pub fn source(name: &str, side: u32) -> SourceImage {
    sized_source(name, side, side)
}

/// An in-memory source with explicit width and height.
pub fn sized_source(name: &str, width: u32, height: u32) -> SourceImage {
    SourceImage::new(
        name,
        PathBuf::from("/media").join(name),
        DynamicImage::new_rgba8(width, height),
    )
}

// =========================================================================
// Fixture setup
// =========================================================================

/// Lay out a small project under a temp directory:
///
/// ```text
/// media/icon-1024.png       1024x1024 red
/// media/small/icon-40.png   40x40 green
/// media/Default-big.png     600x600 blue
/// media/notes.txt
/// out/
/// ```
pub fn setup_media() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let media = tmp.path().join("media");
    create_test_png(&media.join("icon-1024.png"), 1024, 1024, [255, 0, 0, 255]);
    create_test_png(&media.join("small/icon-40.png"), 40, 40, [0, 255, 0, 255]);
    create_test_png(&media.join("Default-big.png"), 600, 600, [0, 0, 255, 255]);
    std::fs::write(media.join("notes.txt"), "not an image").unwrap();
    std::fs::create_dir_all(tmp.path().join("out")).unwrap();
    tmp
}

/// Sorted file names directly inside `dir`.
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
        .map(|e| e.file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}
