//! The requirement catalog: every icon and launch image a build must produce.
//!
//! The catalog is built once from fixed platform tables and is immutable
//! afterwards. The only variable input is the app [`Orientation`], which
//! decides which launch images are needed.
//!
//! ## Tables
//!
//! | Table | Platforms | Notes |
//! |---|---|---|
//! | [`ANDROID_ICONS`] | Android | one per density bucket, `ldpi` to `xxxhdpi` |
//! | [`APPLE_ICON_FAMILIES`] | iOS | expanded to `Icon<suffix>[@Nx].png` per scale |
//! | [`SHARED_LAUNCH_IMAGES`] | iOS + Android | phone and tablet, 1x and 2x |
//! | [`APPLE_LAUNCH_IMAGES`] | iOS | 4", 4.7" and 5.5" displays |
//!
//! ## Orientation filter
//!
//! A launch image is kept when its landscape-ness (`width > height`) matches
//! the app orientation. [`ALWAYS_INCLUDED_LAUNCH_IMAGE`] is kept regardless:
//! iOS only enables tall (4") mode when that file is present.
//!
//! ## Query order
//!
//! [`Catalog::query`] always returns entries sorted by name. Generated file
//! lists (e.g. `CFBundleIconFiles`) inherit that order, which keeps the output
//! of repeated builds identical.

use crate::naming::OsVersion;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Duplicate requirement: {0}")]
    DuplicateRequirement(String),
    #[error("No launch images left for {0} orientation")]
    NoLaunchImages(Orientation),
}

/// App display orientation.
///
/// Parsed case-insensitively from config and CLI input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Orientation {
    Portrait,
    Landscape,
}

impl Orientation {
    pub const ALL: [Orientation; 2] = [Orientation::Portrait, Orientation::Landscape];

    pub fn as_str(self) -> &'static str {
        match self {
            Orientation::Portrait => "portrait",
            Orientation::Landscape => "landscape",
        }
    }

    pub fn is_landscape(self) -> bool {
        self == Orientation::Landscape
    }
}

impl FromStr for Orientation {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "portrait" => Ok(Orientation::Portrait),
            "landscape" => Ok(Orientation::Landscape),
            _ => Err(CatalogError::InvalidConfiguration(format!(
                "orientation must be \"portrait\" or \"landscape\", got {s:?}"
            ))),
        }
    }
}

impl TryFrom<String> for Orientation {
    type Error = CatalogError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Orientation> for String {
    fn from(value: Orientation) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed-size icon entry.
#[derive(Debug, Clone, Copy)]
pub struct IconSpec {
    pub name: &'static str,
    pub size: u32,
}

/// A family of Apple icons sharing a suffix, rendered at scales `1..=max_scale`.
#[derive(Debug, Clone, Copy)]
pub struct IconFamily {
    pub suffix: &'static str,
    pub max_scale: u32,
    pub base_size: u32,
}

/// Launch image entry, before orientation filtering.
#[derive(Debug, Clone, Copy)]
pub struct LaunchSpec {
    pub name: &'static str,
    pub width: u32,
    pub height: u32,
}

pub const ANDROID_ICONS: &[IconSpec] = &[
    IconSpec { name: "Icon-xxxhdpi.png", size: 192 },
    IconSpec { name: "Icon-xxhdpi.png", size: 144 },
    IconSpec { name: "Icon-xhdpi.png", size: 96 },
    IconSpec { name: "Icon-hdpi.png", size: 72 },
    IconSpec { name: "Icon-mdpi.png", size: 48 },
    IconSpec { name: "Icon-ldpi.png", size: 36 },
];

pub const APPLE_ICON_FAMILIES: &[IconFamily] = &[
    IconFamily { suffix: "", max_scale: 2, base_size: 57 },
    IconFamily { suffix: "-60", max_scale: 3, base_size: 60 },
    IconFamily { suffix: "-72", max_scale: 2, base_size: 72 },
    IconFamily { suffix: "-76", max_scale: 2, base_size: 76 },
    IconFamily { suffix: "-Small-40", max_scale: 3, base_size: 40 },
    IconFamily { suffix: "-Small-50", max_scale: 2, base_size: 50 },
    IconFamily { suffix: "-Small", max_scale: 3, base_size: 29 },
];

/// Launch images used by both iOS and Android.
pub const SHARED_LAUNCH_IMAGES: &[LaunchSpec] = &[
    LaunchSpec { name: "Default.png", width: 320, height: 480 },
    LaunchSpec { name: "Default-Portrait.png", width: 768, height: 1024 },
    LaunchSpec { name: "Default-Landscape.png", width: 1024, height: 768 },
    LaunchSpec { name: "Default@2x.png", width: 640, height: 960 },
    LaunchSpec { name: "Default-Portrait@2x.png", width: 1536, height: 2048 },
    LaunchSpec { name: "Default-Landscape@2x.png", width: 2048, height: 1536 },
];

/// Launch images only iOS asks for.
pub const APPLE_LAUNCH_IMAGES: &[LaunchSpec] = &[
    LaunchSpec { name: "Default-568h@2x.png", width: 640, height: 1136 },
    LaunchSpec { name: "Default-667h@2x.png", width: 750, height: 1334 },
    LaunchSpec { name: "Default-736h@2x.png", width: 1242, height: 2208 },
    LaunchSpec { name: "Default-Landscape-568h@2x.png", width: 1136, height: 640 },
    LaunchSpec { name: "Default-Landscape-667h@2x.png", width: 1334, height: 750 },
    LaunchSpec { name: "Default-Landscape-736h@2x.png", width: 2208, height: 1242 },
];

/// Kept for both orientations: its presence switches on 4" tall mode on iOS.
pub const ALWAYS_INCLUDED_LAUNCH_IMAGE: &str = "Default-568h@2x.png";

/// One output file the build must produce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphicRequirement {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub targets_apple: bool,
    pub targets_android: bool,
    pub os_version: OsVersion,
}

impl GraphicRequirement {
    fn new(name: impl Into<String>, width: u32, height: u32, apple: bool, android: bool) -> Self {
        let name = name.into();
        let os_version = OsVersion::for_filename(&name);
        Self {
            name,
            width,
            height,
            targets_apple: apple,
            targets_android: android,
            os_version,
        }
    }

    /// Icons are exactly the square requirements.
    pub fn is_icon(&self) -> bool {
        self.width == self.height
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Immutable, orientation-specific set of requirements keyed by name.
#[derive(Debug, Clone)]
pub struct Catalog {
    orientation: Orientation,
    entries: BTreeMap<String, GraphicRequirement>,
}

impl Catalog {
    /// Build the catalog for an orientation.
    ///
    /// Fails if a table contains the same name twice or if the orientation
    /// filter leaves no launch image.
    pub fn new(orientation: Orientation) -> Result<Self, CatalogError> {
        let mut catalog = Self {
            orientation,
            entries: BTreeMap::new(),
        };

        for icon in ANDROID_ICONS {
            catalog.add(GraphicRequirement::new(icon.name, icon.size, icon.size, false, true))?;
        }
        for (name, size) in expand_apple_icons(APPLE_ICON_FAMILIES) {
            catalog.add(GraphicRequirement::new(name, size, size, true, false))?;
        }

        let mut launch_count = 0;
        let launch_specs = SHARED_LAUNCH_IMAGES
            .iter()
            .map(|spec| (spec, true))
            .chain(APPLE_LAUNCH_IMAGES.iter().map(|spec| (spec, false)));
        for (spec, android) in launch_specs {
            if launch_image_wanted(spec, orientation) {
                catalog.add(GraphicRequirement::new(
                    spec.name,
                    spec.width,
                    spec.height,
                    true,
                    android,
                ))?;
                launch_count += 1;
            }
        }

        if launch_count == 0 {
            return Err(CatalogError::NoLaunchImages(orientation));
        }
        Ok(catalog)
    }

    /// Parse an orientation name (case-insensitive) and build its catalog.
    pub fn for_orientation_name(name: &str) -> Result<Self, CatalogError> {
        Self::new(name.parse()?)
    }

    fn add(&mut self, requirement: GraphicRequirement) -> Result<(), CatalogError> {
        if self.entries.contains_key(&requirement.name) {
            return Err(CatalogError::DuplicateRequirement(requirement.name));
        }
        self.entries.insert(requirement.name.clone(), requirement);
        Ok(())
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Select requirements by shape and platform, sorted by name.
    ///
    /// An entry matches when its icon-ness equals `want_icon` **and** it
    /// targets at least one of the requested platforms. Pass both platform
    /// flags for the union.
    pub fn query(
        &self,
        want_icon: bool,
        want_apple: bool,
        want_android: bool,
    ) -> Vec<&GraphicRequirement> {
        self.entries
            .values()
            .filter(|r| {
                r.is_icon() == want_icon
                    && ((r.targets_apple && want_apple) || (r.targets_android && want_android))
            })
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<&GraphicRequirement> {
        self.entries.get(name)
    }

    /// All entries, sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = &GraphicRequirement> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Expand icon families to `(file name, pixel size)` pairs.
///
/// Scale 1 has no marker; larger scales get `@Nx` before the extension.
pub fn expand_apple_icons(families: &[IconFamily]) -> Vec<(String, u32)> {
    families
        .iter()
        .flat_map(|family| {
            (1..=family.max_scale).map(move |scale| {
                let name = if scale > 1 {
                    format!("Icon{}@{}x.png", family.suffix, scale)
                } else {
                    format!("Icon{}.png", family.suffix)
                };
                (name, family.base_size * scale)
            })
        })
        .collect()
}

fn launch_image_wanted(spec: &LaunchSpec, orientation: Orientation) -> bool {
    spec.name == ALWAYS_INCLUDED_LAUNCH_IMAGE
        || (spec.width > spec.height) == orientation.is_landscape()
}
