//! Centralized filename conventions for source and output images.
//!
//! Filenames are an external contract here: App Store and Play Store tooling
//! look for exact names, and the media directory is organised by prefix. Every
//! substring or prefix rule the pipeline relies on lives in this module so the
//! rest of the code asks a question ("is this an icon source?") instead of
//! slicing strings.
//!
//! ## Source images
//!
//! Files in the media directory are picked up when their lower-cased name
//! starts with one of [`SOURCE_PREFIXES`] and ends in `.png`:
//!
//! - `icon-1024.png` → [`SourceKind::Icon`]
//! - `Default-big.PNG` → [`SourceKind::Launch`]
//! - `launch.png` → [`SourceKind::Launch`]
//! - `background.png` → ignored
//!
//! ## OS version tags
//!
//! Launch images for the iPhone 6 generation (`667h`, `736h`) require iOS 8;
//! everything else is tagged `7.0`. See [`OsVersion::for_filename`].

use serde::Serialize;
use std::fmt;

/// Prefixes (lower case) that mark a file as a source image.
pub const SOURCE_PREFIXES: &[&str] = &["icon", "default", "launch"];

/// The only extension accepted for source images.
pub const SOURCE_EXTENSION: &str = "png";

/// Filename prefix shared by every launch image requirement.
pub const LAUNCH_PREFIX: &str = "Default";

/// Display-height markers of launch images that need iOS 8.
pub const TALL_DISPLAY_MARKERS: &[&str] = &["667h", "736h"];

/// Which family of requirements a source image can feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Square application icons.
    Icon,
    /// Launch (splash) screens.
    Launch,
}

impl SourceKind {
    /// Classify a file already known to be a source by its first character.
    ///
    /// `i`/`I` is an icon, anything else a launch image. Loading only admits
    /// the [`SOURCE_PREFIXES`], so in practice this separates `icon*` from
    /// `default*`/`launch*`.
    pub fn from_first_char(file_name: &str) -> Self {
        match file_name.chars().next() {
            Some(c) if c.eq_ignore_ascii_case(&'i') => SourceKind::Icon,
            _ => SourceKind::Launch,
        }
    }

    /// The source class that can render a requirement of the given shape.
    pub fn for_requirement(is_icon: bool) -> Self {
        if is_icon {
            SourceKind::Icon
        } else {
            SourceKind::Launch
        }
    }

    pub fn is_icon(self) -> bool {
        self == SourceKind::Icon
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Icon => f.write_str("icon"),
            SourceKind::Launch => f.write_str("launch"),
        }
    }
}

/// Decide whether a file in the media tree is a source image, and of which kind.
///
/// Both the prefix and the `.png` extension are matched case-insensitively.
pub fn classify_source(file_name: &str) -> Option<SourceKind> {
    let lower = file_name.to_ascii_lowercase();
    let has_prefix = SOURCE_PREFIXES.iter().any(|p| lower.starts_with(p));
    let is_png = lower
        .rsplit_once('.')
        .is_some_and(|(stem, ext)| !stem.is_empty() && ext == SOURCE_EXTENSION);
    (has_prefix && is_png).then(|| SourceKind::from_first_char(file_name))
}

/// Minimum OS version a generated image is declared for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OsVersion {
    #[serde(rename = "7.0")]
    V7,
    #[serde(rename = "8.0")]
    V8,
}

impl OsVersion {
    /// `8.0` for `Default*` names carrying a tall-display marker, else `7.0`.
    pub fn for_filename(file_name: &str) -> Self {
        let tall = file_name.starts_with(LAUNCH_PREFIX)
            && TALL_DISPLAY_MARKERS.iter().any(|m| file_name.contains(m));
        if tall { OsVersion::V8 } else { OsVersion::V7 }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OsVersion::V7 => "7.0",
            OsVersion::V8 => "8.0",
        }
    }
}

impl fmt::Display for OsVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
