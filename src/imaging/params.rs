//! Parameter types for image operations.
//!
//! These structs describe *what* to draw, not *how*. They are the interface
//! between [`operations`](super::operations), which decides the geometry of
//! each output, and the [`backend`](super::backend), which does the pixel
//! work. Keeping them plain data lets tests assert on the plan without
//! decoding or encoding anything.
//!
//! ## Types
//!
//! - [`Rgba`]: canvas fill colour, parsed from `"r,g,b[,a]"` or `"#rrggbb[aa]"`.
//! - [`ComposeParams`]: output path, canvas size, square size, paste offset, fill.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("expected 3 or 4 components in {0:?}")]
    ComponentCount(String),
    #[error("component {component:?} in {input:?} is not a number between 0 and 255")]
    Component { input: String, component: String },
    #[error("malformed hex color {0:?}")]
    Hex(String),
}

/// An RGBA colour with 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba(pub [u8; 4]);

impl Rgba {
    pub const TRANSPARENT_WHITE: Rgba = Rgba([255, 255, 255, 0]);
    pub const WHITE: Rgba = Rgba([255, 255, 255, 255]);

    pub fn channels(self) -> [u8; 4] {
        self.0
    }
}

impl FromStr for Rgba {
    type Err = ColorParseError;

    /// Accepts `"255,128,0"`, `"255, 128, 0, 64"`, `"#ff8000"` or `"#ff800040"`.
    /// A missing alpha means fully opaque.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(hex) = trimmed.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| ColorParseError::Hex(s.to_string()));
        }

        let parts: Vec<&str> = trimmed.split(',').map(str::trim).collect();
        if parts.len() != 3 && parts.len() != 4 {
            return Err(ColorParseError::ComponentCount(s.to_string()));
        }
        let mut channels = [255u8; 4];
        for (slot, part) in channels.iter_mut().zip(&parts) {
            *slot = part.parse().map_err(|_| ColorParseError::Component {
                input: s.to_string(),
                component: part.to_string(),
            })?;
        }
        Ok(Rgba(channels))
    }
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    if (hex.len() != 6 && hex.len() != 8) || !hex.is_ascii() {
        return None;
    }
    let mut channels = [255u8; 4];
    for (i, slot) in channels.iter_mut().take(hex.len() / 2).enumerate() {
        *slot = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).ok()?;
    }
    Some(Rgba(channels))
}

impl TryFrom<String> for Rgba {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgba> for String {
    fn from(value: Rgba) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b, a] = self.0;
        write!(f, "{r},{g},{b},{a}")
    }
}

/// Everything the backend needs to draw one output image.
///
/// The source is resized to `square × square`, pasted at
/// `(offset_x, offset_y)` on a `canvas_width × canvas_height` canvas filled
/// with `background`, and written as PNG to `output`.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposeParams {
    pub output: PathBuf,
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub square: u32,
    pub offset_x: u32,
    pub offset_y: u32,
    pub background: Rgba,
}
