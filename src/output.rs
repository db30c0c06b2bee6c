//! CLI output formatting for every command.
//!
//! Output lists what was produced, with the file it came from as secondary
//! context. Paths are shown relative to the directory the command wrote into.
//!
//! # Output Format
//!
//! ## Rendering
//!
//! ```text
//! Icons (23 files)
//!     Icon-60.png 60x60 ← icon-1024.png
//!     Icon-60@2x.png 120x120 ← icon-1024.png
//! Launch images (7 files)
//!     Default.png 320x480 ← Default-big.png
//! ```
//!
//! Rendering runs in parallel, so the lines of one batch arrive in completion
//! order.
//!
//! ## Requirements
//!
//! ```text
//! Portrait: 23 icons, 7 launch images
//! Icons
//!     Icon-60.png 60x60 apple
//!     Icon-hdpi.png 72x72 android
//! Launch images
//!     Default.png 320x480 apple android
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure.

use crate::catalog::{Catalog, GraphicRequirement};
use crate::copier::CopiedFile;
use crate::lua::indent;
use crate::naming::SourceKind;
use crate::render::RenderEvent;
use std::path::Path;

// ============================================================================
// Shared helpers
// ============================================================================

fn kind_heading(kind: SourceKind) -> &'static str {
    match kind {
        SourceKind::Icon => "Icons",
        SourceKind::Launch => "Launch images",
    }
}

fn plural(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}

/// Display `path` relative to `base` when possible.
fn relative(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .display()
        .to_string()
}

fn requirement_line(req: &GraphicRequirement) -> String {
    let mut platforms = Vec::new();
    if req.targets_apple {
        platforms.push("apple");
    }
    if req.targets_android {
        platforms.push("android");
    }
    format!(
        "{}{} {}x{} {}",
        indent(1),
        req.name,
        req.width,
        req.height,
        platforms.join(" ")
    )
}

// ============================================================================
// requirements
// ============================================================================

/// Format the catalog for one orientation, icons first.
pub fn format_requirements(catalog: &Catalog) -> Vec<String> {
    let icons = catalog.query(true, true, true);
    let launch = catalog.query(false, true, true);
    let orientation = catalog.orientation().as_str();

    let mut lines = vec![format!(
        "{}{}: {}, {}",
        orientation[..1].to_uppercase(),
        &orientation[1..],
        plural(icons.len(), "icon", "icons"),
        plural(launch.len(), "launch image", "launch images"),
    )];
    for (kind, group) in [(SourceKind::Icon, icons), (SourceKind::Launch, launch)] {
        lines.push(kind_heading(kind).to_string());
        lines.extend(group.into_iter().map(requirement_line));
    }
    lines
}

pub fn print_requirements(catalog: &Catalog) {
    for line in format_requirements(catalog) {
        println!("{}", line);
    }
}

// ============================================================================
// icons / launch
// ============================================================================

/// Format a single render progress event as display lines.
pub fn format_render_event(event: &RenderEvent) -> Vec<String> {
    match event {
        RenderEvent::BatchStarted { kind, count } => {
            vec![format!(
                "{} ({})",
                kind_heading(*kind),
                plural(*count, "file", "files")
            )]
        }
        RenderEvent::Rendered(asset) => vec![format!(
            "{}{} {}x{} \u{2190} {}",
            indent(1),
            asset.requirement,
            asset.width,
            asset.height,
            asset.source
        )],
    }
}

// ============================================================================
// settings / copy-media / clean
// ============================================================================

/// Format the list of written settings files.
pub fn format_settings_output(written: &[impl AsRef<Path>], output_dir: &Path) -> Vec<String> {
    let mut lines = vec!["Settings".to_string()];
    for path in written {
        lines.push(format!("{}{}", indent(1), relative(path.as_ref(), output_dir)));
    }
    lines
}

pub fn print_settings_output(written: &[impl AsRef<Path>], output_dir: &Path) {
    for line in format_settings_output(written, output_dir) {
        println!("{}", line);
    }
}

/// Format copied media files as `target ← source`.
///
/// Mixed-case sources are marked; the device file system is case sensitive.
pub fn format_copy_output(copied: &[CopiedFile], project: &Path, output_dir: &Path) -> Vec<String> {
    let mut lines = vec![format!("Media ({})", plural(copied.len(), "file", "files"))];
    for file in copied {
        let marker = if file.mixed_case { " (mixed case)" } else { "" };
        lines.push(format!(
            "{}{} \u{2190} {}{}",
            indent(1),
            relative(&file.target, output_dir),
            relative(&file.source, project),
            marker
        ));
    }
    lines
}

pub fn print_copy_output(copied: &[CopiedFile], project: &Path, output_dir: &Path) {
    for line in format_copy_output(copied, project, output_dir) {
        println!("{}", line);
    }
}

/// Format the result of removing generated files.
pub fn format_clean_output(removed: &[impl AsRef<Path>], output_dir: &Path) -> Vec<String> {
    let mut lines = vec![format!(
        "Removed {} from {}",
        plural(removed.len(), "generated file", "generated files"),
        output_dir.display()
    )];
    for path in removed {
        lines.push(format!("{}{}", indent(1), relative(path.as_ref(), output_dir)));
    }
    lines
}

pub fn print_clean_output(removed: &[impl AsRef<Path>], output_dir: &Path) {
    for line in format_clean_output(removed, output_dir) {
        println!("{}", line);
    }
}

/// One-line summary printed at the end of `build`.
pub fn format_build_summary(icons: usize, launch: usize, settings: usize, media: usize) -> String {
    format!(
        "Built {}, {}, {}, {}",
        plural(icons, "icon", "icons"),
        plural(launch, "launch image", "launch images"),
        plural(settings, "settings file", "settings files"),
        plural(media, "media file", "media files"),
    )
}
