//! Project configuration module.
//!
//! Handles loading, validating, and merging the project's `config.toml`.
//! Stock defaults are the base layer; the user file only overrides what it
//! names.
//!
//! ## Config File Location
//!
//! ```text
//! project/
//! ├── config.toml              # Project config (overrides stock defaults)
//! ├── media/
//! │   ├── system/              # Icon and launch image sources
//! │   └── sounds/              # Copied into the build tree
//! └── source/                  # Build output
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [application]
//! orientation = "portrait"      # or "landscape", any case
//!
//! [display]
//! width = 640                   # config.lua content size
//! height = 960
//! scale = "letterbox"
//!
//! [launch]
//! background = "255,255,255,255" # fill around launch artwork, r,g,b[,a] or #rrggbb[aa]
//!
//! [icons]
//! background = "255,255,255,0"   # fill behind icon artwork
//!
//! [adverts]
//! providers = []                # admob, vungle, crossinstall, inmobi, inneractive
//! uses_banners = false          # providers need iosbanner + androidbanner ids
//! uses_interstitials = false    # providers need iosinterstitial + androidinterstitial ids
//!
//! [media]
//! source = "media/sounds"       # relative to the project
//! target = "media"              # relative to the output directory
//! extensions = ["wav", "mp3"]
//!
//! [processing]
//! max_processes = 4             # Max parallel workers (omit for auto = CPU cores)
//!
//! [information]                 # Free-form, written to information.lua
//!
//! [information.admob]           # Ad unit ids, moved to adverts.admob
//! iosbanner = "ca-app-pub-..."
//! ```
//!
//! Unknown keys are rejected to catch typos early, except inside
//! `[information]`, which is copied as-is.

use crate::catalog::Orientation;
use crate::imaging::Rgba;
use crate::settings::Advertiser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Project config file name, looked up in the project directory.
pub const CONFIG_FILE: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Project configuration loaded from `config.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    /// App-wide settings (orientation).
    pub application: ApplicationConfig,
    /// `config.lua` content area.
    pub display: DisplayConfig,
    /// Launch image rendering.
    pub launch: LaunchConfig,
    /// Icon rendering.
    pub icons: IconsConfig,
    /// Advertising providers the app integrates.
    pub adverts: AdvertsConfig,
    /// Media copied verbatim into the build tree.
    pub media: MediaConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
    /// Free-form application information for `information.lua`.
    pub information: toml::Table,
}

/// Scale modes understood by the runtime's `config.lua`.
pub const SCALE_MODES: &[&str] = &["letterbox", "zoomEven", "zoomStretch", "adaptive"];

impl ProjectConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.display.width == 0 || self.display.height == 0 {
            return Err(ConfigError::Validation(
                "display.width and display.height must be non-zero".into(),
            ));
        }
        if !SCALE_MODES.contains(&self.display.scale.as_str()) {
            return Err(ConfigError::Validation(format!(
                "display.scale must be one of {}, got {:?}",
                SCALE_MODES.join(", "),
                self.display.scale
            )));
        }
        if self.media.extensions.iter().any(|e| e.trim().is_empty()) {
            return Err(ConfigError::Validation(
                "media.extensions must not contain empty entries".into(),
            ));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// App-wide settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApplicationConfig {
    pub orientation: Orientation,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            orientation: Orientation::Portrait,
        }
    }
}

/// Logical content area written to `config.lua`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    pub width: u32,
    pub height: u32,
    pub scale: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 960,
            scale: "letterbox".to_string(),
        }
    }
}

/// Launch image settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LaunchConfig {
    /// Fill colour around the centred artwork.
    pub background: Rgba,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            background: Rgba::WHITE,
        }
    }
}

/// Icon settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IconsConfig {
    /// Fill colour behind the artwork. Only visible for non-square sources.
    pub background: Rgba,
}

impl Default for IconsConfig {
    fn default() -> Self {
        Self {
            background: Rgba::TRANSPARENT_WHITE,
        }
    }
}

/// Advertising settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AdvertsConfig {
    pub providers: Vec<Advertiser>,
    /// Providers without both banner ids are left out.
    pub uses_banners: bool,
    /// Providers without both interstitial ids are left out.
    pub uses_interstitials: bool,
}

/// Media copy settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MediaConfig {
    /// Directory scanned for media, relative to the project.
    pub source: String,
    /// Destination, relative to the output directory.
    pub target: String,
    /// File extensions to copy, without the dot. Matched case-insensitively.
    pub extensions: Vec<String>,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            source: "media/sounds".to_string(),
            target: "media".to_string(),
            extensions: vec!["wav".to_string(), "mp3".to_string()],
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel render workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

fn core_count() -> usize {
    std::thread::available_parallelism().map_or(1, |n| n.get())
}

/// Render workers for a build: `max_processes` capped at the core count,
/// or every core when unset.
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = core_count();
    match config.max_processes {
        Some(limit) => limit.clamp(1, cores),
        None => cores,
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// [`ProjectConfig::default`] as a TOML table, the layer `config.toml`
/// is merged onto.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(ProjectConfig::default()).expect("default config must serialize")
}

/// Lay `user` over `defaults`. Sections merge key by key, so
/// `[launch] background` alone keeps the rest of the defaults; any other
/// value, arrays included, replaces the default outright.
pub fn merge_toml(defaults: toml::Value, user: toml::Value) -> toml::Value {
    match (defaults, user) {
        (toml::Value::Table(mut merged), toml::Value::Table(user)) => {
            for (key, value) in user {
                let value = match merged.remove(&key) {
                    Some(default) => merge_toml(default, value),
                    None => value,
                };
                merged.insert(key, value);
            }
            toml::Value::Table(merged)
        }
        (_, user) => user,
    }
}

/// The project's `config.toml`, unparsed into a [`ProjectConfig`] yet.
/// A project without one gives `Ok(None)`.
pub fn load_raw_config(project: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let path = project.join(CONFIG_FILE);
    if !path.is_file() {
        return Ok(None);
    }
    let text = fs::read_to_string(&path)?;
    Ok(Some(toml::from_str(&text)?))
}

/// Build the final config from the stock table and the user's file, if any.
pub fn resolve_config(
    defaults: toml::Value,
    user: Option<toml::Value>,
) -> Result<ProjectConfig, ConfigError> {
    let table = match user {
        Some(user) => merge_toml(defaults, user),
        None => defaults,
    };
    let config: ProjectConfig = table.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Read, merge and validate `<project>/config.toml`.
pub fn load_config(project: &Path) -> Result<ProjectConfig, ConfigError> {
    resolve_config(stock_defaults_value(), load_raw_config(project)?)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# resource-build configuration
# ============================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Place this file in the project directory as config.toml.
# Unknown keys will cause an error (except inside [information]).

# ---------------------------------------------------------------------------
# Application
# ---------------------------------------------------------------------------
[application]
# Display orientation: "portrait" or "landscape" (any case).
# Decides which launch images are rendered and the build.settings
# orientation block.
orientation = "portrait"

# ---------------------------------------------------------------------------
# config.lua content area
# ---------------------------------------------------------------------------
[display]
width = 640
height = 960

# One of: letterbox, zoomEven, zoomStretch, adaptive.
scale = "letterbox"

# ---------------------------------------------------------------------------
# Launch images
# ---------------------------------------------------------------------------
[launch]
# Fill around the centred launch artwork, as "r,g,b[,a]" or "#rrggbb[aa]".
background = "255,255,255,255"

# ---------------------------------------------------------------------------
# Icons
# ---------------------------------------------------------------------------
[icons]
# Fill behind the icon artwork. Transparent white by default.
background = "255,255,255,0"

# ---------------------------------------------------------------------------
# Advertising
# ---------------------------------------------------------------------------
[adverts]
# Providers to add plugins for: admob, vungle, crossinstall, inmobi,
# inneractive.
providers = []

# Ad unit ids live in [information.<provider>] as iosbanner, androidbanner,
# iosinterstitial and androidinterstitial. When an ad type is enabled, a
# provider missing either platform's id for it is not made available.
uses_banners = false
uses_interstitials = false

# ---------------------------------------------------------------------------
# Media copying
# ---------------------------------------------------------------------------
[media]
# Directory scanned for media files, relative to the project.
source = "media/sounds"

# Destination directory, relative to the output directory.
target = "media"

# Extensions to copy (case-insensitive, no dot).
extensions = ["wav", "mp3"]

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel render workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4

# ---------------------------------------------------------------------------
# Application information
# ---------------------------------------------------------------------------
[information]
# Any tables and values here are written to information.lua as
# ApplicationInformation. Strings, numbers, arrays and tables only.
#
# [information.application]
# name = "My Game"
# version = "1.0"
"##
}
