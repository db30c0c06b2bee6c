//! High-level image operations.
//!
//! These functions combine calculations with backend execution. They take a
//! requirement and a chosen source, compute the geometry, and call the
//! backend.

use super::backend::{BackendError, ImageBackend};
use super::calculations::{centered_offset, square_size};
use super::params::{ComposeParams, Rgba};
use image::DynamicImage;
use std::path::Path;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Plan the drawing of a `width × height` output without executing it.
pub fn plan_compose(output: &Path, width: u32, height: u32, background: Rgba) -> ComposeParams {
    let square = square_size(width, height);
    let (offset_x, offset_y) = centered_offset(width, height, square);
    ComposeParams {
        output: output.to_path_buf(),
        canvas_width: width,
        canvas_height: height,
        square,
        offset_x,
        offset_y,
        background,
    }
}

/// Draw one output image from `source` and return the params used.
pub fn create_fitted_image(
    backend: &impl ImageBackend,
    source: &DynamicImage,
    output: &Path,
    size: (u32, u32),
    background: Rgba,
) -> Result<ComposeParams> {
    let params = plan_compose(output, size.0, size.1, background);
    backend.compose(source, &params)?;
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};

    #[test]
    fn plan_portrait_launch_image() {
        let params = plan_compose(Path::new("/out/Default.png"), 100, 150, Rgba::WHITE);
        assert_eq!(params.square, 100);
        assert_eq!((params.offset_x, params.offset_y), (0, 25));
        assert_eq!((params.canvas_width, params.canvas_height), (100, 150));
    }

    #[test]
    fn plan_landscape_launch_image() {
        let params = plan_compose(Path::new("/out/Default-Landscape.png"), 1024, 768, Rgba::WHITE);
        assert_eq!(params.square, 768);
        assert_eq!((params.offset_x, params.offset_y), (128, 0));
    }

    #[test]
    fn plan_icon_fills_canvas() {
        let params = plan_compose(Path::new("/out/Icon.png"), 57, 57, Rgba::TRANSPARENT_WHITE);
        assert_eq!(params.square, 57);
        assert_eq!((params.offset_x, params.offset_y), (0, 0));
        assert_eq!(params.background, Rgba::TRANSPARENT_WHITE);
    }

    #[test]
    fn create_fitted_image_uses_backend() {
        let backend = MockBackend::new();
        let source = DynamicImage::new_rgba8(200, 200);

        let params = create_fitted_image(
            &backend,
            &source,
            Path::new("/out/Default.png"),
            (100, 150),
            Rgba([1, 2, 3, 4]),
        )
        .unwrap();
        assert_eq!(params.square, 100);

        let ops = backend.get_operations();
        assert_eq!(
            ops,
            vec![RecordedOp::Compose {
                source: (200, 200),
                output: "/out/Default.png".to_string(),
                canvas: (100, 150),
                square: 100,
                offset: (0, 25),
                background: [1, 2, 3, 4],
            }]
        );
    }

    #[test]
    fn backend_failure_propagates() {
        let backend = MockBackend::failing_on(&["Icon.png"]);
        let source = DynamicImage::new_rgba8(10, 10);
        let result = create_fitted_image(&backend, &source, Path::new("/out/Icon.png"), (57, 57), Rgba::WHITE);
        assert!(matches!(result, Err(BackendError::ProcessingFailed(_))));
    }
}
