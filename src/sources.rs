//! Source image discovery and the in-memory source store.
//!
//! The media directory (by default `media/system/`) holds the artwork every
//! icon and launch image is rendered from:
//!
//! ```text
//! media/system/
//! ├── icon-1024.png          # icon source (prefix "icon")
//! ├── icon-small.png         # a second icon source for tiny sizes
//! ├── launch/
//! │   └── Default-big.png    # launch source (prefix "default")
//! └── notes.txt              # ignored
//! ```
//!
//! Subdirectories are walked recursively, but file names must be unique
//! across the whole tree: requirements refer to sources by name only, so two
//! `icon.png` files in different folders would be ambiguous.
//!
//! Every accepted file is decoded once when the store is loaded. Rendering
//! only reads from the store, so one store can serve any number of render
//! calls in any order.

use crate::imaging::{BackendError, Dimensions, ImageBackend, nearest_fit};
use crate::naming::{SourceKind, classify_source};
use image::DynamicImage;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Cannot walk source directory: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Duplicate source image {name}: {first} and {second}")]
    DuplicateSource {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },
    #[error("Failed to load source image: {0}")]
    Imaging(#[from] BackendError),
}

/// A decoded source image.
#[derive(Debug, Clone)]
pub struct SourceImage {
    pub name: String,
    pub path: PathBuf,
    pub kind: SourceKind,
    pub image: DynamicImage,
}

impl SourceImage {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, image: DynamicImage) -> Self {
        let name = name.into();
        let kind = SourceKind::from_first_char(&name);
        Self {
            name,
            path: path.into(),
            kind,
            image,
        }
    }

    /// Side used for nearest-fit scoring: the natural width.
    pub fn side(&self) -> u32 {
        self.image.width()
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.image.width(),
            height: self.image.height(),
        }
    }
}

/// Immutable set of decoded sources keyed by file name.
#[derive(Debug, Clone, Default)]
pub struct SourceStore {
    images: BTreeMap<String, SourceImage>,
}

impl SourceStore {
    /// Walk `root` and decode every source image found.
    ///
    /// A missing directory is an error, an empty one is not: the render step
    /// reports the missing class when it needs it.
    pub fn load(backend: &impl ImageBackend, root: &Path) -> Result<Self, SourceError> {
        let mut images: BTreeMap<String, SourceImage> = BTreeMap::new();

        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_string();
            if classify_source(&name).is_none() {
                continue;
            }
            if let Some(existing) = images.get(&name) {
                return Err(SourceError::DuplicateSource {
                    name,
                    first: existing.path.clone(),
                    second: entry.path().to_path_buf(),
                });
            }

            let image = backend.decode(entry.path())?;
            log::debug!(
                "loaded source {} ({}x{})",
                entry.path().display(),
                image.width(),
                image.height()
            );
            images.insert(name.clone(), SourceImage::new(name, entry.path(), image));
        }

        Ok(Self { images })
    }

    /// Build a store from already-decoded images.
    ///
    /// Later entries with the same name replace earlier ones.
    pub fn from_images(images: impl IntoIterator<Item = SourceImage>) -> Self {
        Self {
            images: images
                .into_iter()
                .map(|img| (img.name.clone(), img))
                .collect(),
        }
    }

    /// The source of `kind` whose side is closest to `square`.
    ///
    /// Ties go to the smallest file name.
    pub fn nearest(&self, kind: SourceKind, square: u32) -> Option<&SourceImage> {
        let candidates = self
            .images
            .values()
            .filter(|img| img.kind == kind)
            .map(|img| (img.name.as_str(), img.side()));
        nearest_fit(candidates, square).and_then(|name| self.images.get(name))
    }

    pub fn get(&self, name: &str) -> Option<&SourceImage> {
        self.images.get(name)
    }

    pub fn count(&self, kind: SourceKind) -> usize {
        self.images.values().filter(|img| img.kind == kind).count()
    }

    /// All sources, sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = &SourceImage> {
        self.images.values()
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}
