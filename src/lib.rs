//! # resource-build
//!
//! Builds the graphic and configuration resources of a mobile game project
//! from a handful of master images. A few large source PNGs go in; every
//! icon and launch image both platforms ask for comes out, together with the
//! Lua configuration files the runtime reads.
//!
//! # Pipeline
//!
//! ```text
//! media/system/*.png  →  SourceStore  →  Renderer  →  source/Icon*.png, source/Default*.png
//! config.toml         →  ProjectConfig  →  settings  →  source/{config.lua,build.settings,information.lua}
//! media/sounds/       →  copier  →  source/media/
//! ```
//!
//! Each step is independent and can be run on its own from the CLI.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`naming`] | Source file classification and OS version tags |
//! | [`catalog`] | The fixed list of required icons and launch images, per orientation |
//! | [`imaging`] | Square sizing, centered paste, resize and PNG output behind a backend trait |
//! | [`sources`] | Loads the source images once and picks the nearest fit |
//! | [`render`] | Renders requirements, single or batched in parallel; removes generated files |
//! | [`lua`] | Value tree and its Lua table rendering |
//! | [`settings`] | Builds `config.lua`, `build.settings` and `information.lua` |
//! | [`copier`] | Copies media files by extension with lower-cased names |
//! | [`config`] | `config.toml` loading, validation and stock defaults |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Nearest Fit Over Best Quality
//!
//! A requirement is rendered from the source whose side is closest to the
//! requirement's square, whether larger or smaller. Ties go to the smallest
//! file name, so the same inputs always produce the same outputs. Artists can
//! supply a hand-tuned small icon and it will be used for the small sizes.
//!
//! ## Resize to a Square, Then Centre
//!
//! The source is resized to a square whose side is the requirement's shorter
//! edge, then pasted centred onto a canvas of the requirement's full width
//! and height filled with the background colour. Launch images are therefore
//! letterboxed, never cropped.
//!
//! ## Declarative Tables
//!
//! The catalog is data: constant tables of names and sizes expanded once per
//! orientation. Adding a device size means adding a row.

pub mod catalog;
pub mod config;
pub mod copier;
pub mod imaging;
pub mod lua;
pub mod naming;
pub mod output;
pub mod render;
pub mod settings;
pub mod sources;

#[cfg(test)]
pub(crate) mod test_helpers;
