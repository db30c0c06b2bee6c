//! Nearest-fit rendering of catalog requirements.
//!
//! Turns each [`GraphicRequirement`] into an exact-size PNG in the output
//! directory, drawn from the best-fitting source image in a [`SourceStore`].
//!
//! ## Selection
//!
//! For a `w × h` requirement the drawn square is `min(w, h)`. Among sources
//! of the matching class (icon sources for square requirements, launch
//! sources otherwise) the one whose width is closest to that square wins;
//! equal distances go to the smallest file name.
//!
//! ## Drawing
//!
//! ```text
//! Default.png 320x480, square 320
//! ┌──────────┐
//! │ bg fill  │  80px
//! ├──────────┤
//! │  source  │ 320px, resized bicubic
//! ├──────────┤
//! │ bg fill  │  80px
//! └──────────┘
//! ```
//!
//! ## Parallel Processing
//!
//! The store is read-only while rendering, so a batch renders its
//! requirements in parallel with [rayon](https://docs.rs/rayon). Results come
//! back in catalog order; the first failure aborts the batch.

use crate::catalog::{Catalog, CatalogError, GraphicRequirement, Orientation};
use crate::imaging::{BackendError, ImageBackend, Rgba, create_fitted_image, square_size};
use crate::naming::SourceKind;
use crate::sources::SourceStore;
use rayon::prelude::*;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("No {kind} source image available for {requirement}")]
    NoMatchingSource {
        requirement: String,
        kind: SourceKind,
    },
    #[error("Failed to render {requirement}: {source}")]
    Imaging {
        requirement: String,
        source: BackendError,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

/// One written output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedAsset {
    pub requirement: String,
    pub source: String,
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

/// Progress notifications from [`Renderer::render_all`].
#[derive(Debug, Clone)]
pub enum RenderEvent {
    BatchStarted { kind: SourceKind, count: usize },
    Rendered(RenderedAsset),
}

/// Renders requirements from an immutable source store.
pub struct Renderer<B: ImageBackend> {
    backend: B,
    store: SourceStore,
}

impl<B: ImageBackend> Renderer<B> {
    pub fn new(backend: B, store: SourceStore) -> Self {
        Self { backend, store }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn store(&self) -> &SourceStore {
        &self.store
    }

    /// Render one requirement into `output_dir/<name>`.
    pub fn render(
        &self,
        requirement: &GraphicRequirement,
        output_dir: &Path,
        background: Rgba,
    ) -> Result<RenderedAsset, RenderError> {
        let kind = SourceKind::for_requirement(requirement.is_icon());
        let (width, height) = requirement.size();
        let square = square_size(width, height);

        let source = self.store.nearest(kind, square).ok_or_else(|| {
            RenderError::NoMatchingSource {
                requirement: requirement.name.clone(),
                kind,
            }
        })?;
        log::debug!(
            "{} ({}x{}) <- {} ({}px)",
            requirement.name,
            width,
            height,
            source.name,
            source.side()
        );

        let path = output_dir.join(&requirement.name);
        create_fitted_image(&self.backend, &source.image, &path, (width, height), background)
            .map_err(|source| RenderError::Imaging {
                requirement: requirement.name.clone(),
                source,
            })?;

        Ok(RenderedAsset {
            requirement: requirement.name.clone(),
            source: source.name.clone(),
            path,
            width,
            height,
        })
    }

    /// Render every requirement of `kind` for both platforms.
    ///
    /// Creates `output_dir` if needed. Nothing is written when the store has
    /// no source of the right class.
    pub fn render_all(
        &self,
        catalog: &Catalog,
        kind: SourceKind,
        output_dir: &Path,
        background: Rgba,
        events: Option<Sender<RenderEvent>>,
    ) -> Result<Vec<RenderedAsset>, RenderError> {
        let requirements = catalog.query(kind.is_icon(), true, true);

        if self.store.count(kind) == 0 {
            if let Some(first) = requirements.first() {
                return Err(RenderError::NoMatchingSource {
                    requirement: first.name.clone(),
                    kind,
                });
            }
        }

        std::fs::create_dir_all(output_dir)?;
        if let Some(tx) = &events {
            tx.send(RenderEvent::BatchStarted {
                kind,
                count: requirements.len(),
            })
            .ok();
        }

        requirements
            .par_iter()
            .map_with(events, |tx, requirement| -> Result<RenderedAsset, RenderError> {
                let asset = self.render(requirement, output_dir, background)?;
                if let Some(tx) = tx {
                    tx.send(RenderEvent::Rendered(asset.clone())).ok();
                }
                Ok(asset)
            })
            .collect()
    }
}

/// Every file name either orientation's catalog can produce.
pub fn generated_names() -> Result<BTreeSet<String>, CatalogError> {
    let mut names = BTreeSet::new();
    for orientation in Orientation::ALL {
        let catalog = Catalog::new(orientation)?;
        names.extend(catalog.iter().map(|r| r.name.clone()));
    }
    Ok(names)
}

/// Delete every generated icon and launch image from `output_dir`.
///
/// Missing files are skipped. Returns the paths actually removed.
pub fn remove_generated(output_dir: &Path) -> Result<Vec<PathBuf>, RenderError> {
    let mut removed = Vec::new();
    for name in generated_names()? {
        let path = output_dir.join(&name);
        match std::fs::remove_file(&path) {
            Ok(()) => {
                log::debug!("removed {}", path.display());
                removed.push(path);
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(removed)
}
