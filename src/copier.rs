//! Copies media files (sounds, music) into the build tree.
//!
//! Every file under the source directory whose extension is in the configured
//! list is copied into a single flat target directory under its lower-cased
//! file name. Device file systems are case sensitive while the authoring
//! machine often is not, so a mixed-case path below the source directory is
//! reported as a warning.

use crate::config::MediaConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum CopyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("{first} and {second} both copy to {target}")]
    Collision {
        target: PathBuf,
        first: PathBuf,
        second: PathBuf,
    },
}

/// One copied file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopiedFile {
    pub source: PathBuf,
    pub target: PathBuf,
    /// Source path below the media directory contained upper-case characters.
    pub mixed_case: bool,
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| extensions.iter().any(|want| want.eq_ignore_ascii_case(ext)))
}

/// Copy matching files from `source` into `target`.
///
/// A missing source directory copies nothing. Files are visited in sorted
/// order; two sources that lower-case to the same name are an error.
pub fn copy_by_extension(
    source: &Path,
    extensions: &[String],
    target: &Path,
) -> Result<Vec<CopiedFile>, CopyError> {
    if !source.is_dir() {
        log::debug!("no media directory at {}", source.display());
        return Ok(Vec::new());
    }

    let mut copied: Vec<CopiedFile> = Vec::new();
    for entry in WalkDir::new(source).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() || !has_extension(entry.path(), extensions) {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy().to_lowercase();
        let dest = target.join(&file_name);
        if let Some(prev) = copied.iter().find(|c| c.target == dest) {
            return Err(CopyError::Collision {
                target: dest,
                first: prev.source.clone(),
                second: entry.path().to_path_buf(),
            });
        }

        let relative = entry.path().strip_prefix(source).unwrap_or(entry.path());
        let display = relative.to_string_lossy();
        let mixed_case = display != display.to_lowercase();
        if mixed_case {
            log::warn!("{} is not lower case", entry.path().display());
        }

        if copied.is_empty() {
            std::fs::create_dir_all(target)?;
        }
        std::fs::copy(entry.path(), &dest)?;
        copied.push(CopiedFile {
            source: entry.path().to_path_buf(),
            target: dest,
            mixed_case,
        });
    }
    Ok(copied)
}

/// Copy the configured media of a project into its output directory.
pub fn copy_media(
    project: &Path,
    output_dir: &Path,
    media: &MediaConfig,
) -> Result<Vec<CopiedFile>, CopyError> {
    copy_by_extension(
        &project.join(&media.source),
        &media.extensions,
        &output_dir.join(&media.target),
    )
}
