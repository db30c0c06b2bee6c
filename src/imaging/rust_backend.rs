//! Pure Rust image backend on top of the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (PNG) | `image::ImageReader` |
//! | Resize | `image::imageops::resize` with `CatmullRom` (bicubic) |
//! | Canvas fill | `image::RgbaImage::from_pixel` |
//! | Paste | `image::imageops::replace` (copies pixels, no blending) |
//! | Encode → PNG | `image::codecs::png::PngEncoder` |
//!
//! Outputs are written to a hidden sibling file first and renamed into place,
//! so a failed render never leaves a truncated PNG under the final name.

use super::backend::{BackendError, ImageBackend};
use super::params::ComposeParams;
use image::codecs::png::PngEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageEncoder, ImageReader, Rgba, RgbaImage};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Bicubic resampling, the closest match to what the platform tools use.
const RESIZE_FILTER: FilterType = FilterType::CatmullRom;

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Draw the output image described by `params` from `source`.
///
/// Exposed separately from [`RustBackend::compose`] so the pixel result can
/// be inspected without touching the filesystem.
pub fn compose_canvas(source: &DynamicImage, params: &ComposeParams) -> RgbaImage {
    let resized = image::imageops::resize(
        &source.to_rgba8(),
        params.square,
        params.square,
        RESIZE_FILTER,
    );
    let mut canvas = RgbaImage::from_pixel(
        params.canvas_width,
        params.canvas_height,
        Rgba(params.background.channels()),
    );
    image::imageops::replace(
        &mut canvas,
        &resized,
        i64::from(params.offset_x),
        i64::from(params.offset_y),
    );
    canvas
}

/// Encode an RGBA canvas as PNG bytes.
pub fn encode_png(canvas: &RgbaImage) -> Result<Vec<u8>, BackendError> {
    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes)
        .write_image(
            canvas.as_raw(),
            canvas.width(),
            canvas.height(),
            image::ExtendedColorType::Rgba8,
        )
        .map_err(|e| BackendError::ProcessingFailed(format!("PNG encode failed: {}", e)))?;
    Ok(bytes)
}

/// Hidden sibling path used while an output is being written.
fn partial_path(output: &Path) -> PathBuf {
    let name = output
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    output.with_file_name(format!(".{name}.partial"))
}

/// Write `bytes` next to `output` and rename over it once complete.
fn write_atomically(output: &Path, bytes: &[u8]) -> Result<(), BackendError> {
    let partial = partial_path(output);
    let result = std::fs::File::create(&partial)
        .and_then(|mut file| {
            file.write_all(bytes)?;
            file.sync_all()
        })
        .and_then(|_| std::fs::rename(&partial, output));
    if result.is_err() {
        let _ = std::fs::remove_file(&partial);
    }
    result.map_err(BackendError::Io)
}

impl ImageBackend for RustBackend {
    fn decode(&self, path: &Path) -> Result<DynamicImage, BackendError> {
        ImageReader::open(path)
            .map_err(BackendError::Io)?
            .decode()
            .map_err(|e| {
                BackendError::ProcessingFailed(format!(
                    "Failed to decode {}: {}",
                    path.display(),
                    e
                ))
            })
    }

    fn compose(&self, source: &DynamicImage, params: &ComposeParams) -> Result<(), BackendError> {
        let canvas = compose_canvas(source, params);
        let bytes = encode_png(&canvas)?;
        write_atomically(&params.output, &bytes)
    }
}
