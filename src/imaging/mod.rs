//! Image processing for icons and launch images, in pure Rust.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader` |
//! | **Resize** | `imageops::resize`, Catmull-Rom (bicubic) |
//! | **Compose** | filled `RgbaImage` + `imageops::replace` at a centred offset |
//! | **Encode** | PNG, written atomically |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for geometry and nearest-fit scoring (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::{centered_offset, fit_score, nearest_fit, square_size};
pub use operations::{create_fitted_image, plan_compose};
pub use params::{ColorParseError, ComposeParams, Rgba};
pub use rust_backend::RustBackend;
