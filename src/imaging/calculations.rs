//! Pure calculation functions for output geometry and source selection.
//!
//! All functions here are pure and testable without any I/O or images.

/// Side of the square the source is scaled to for a `width × height` output.
///
/// Launch images are drawn from a square source even when the canvas is not
/// square, so the shorter edge wins.
///
/// ```
/// # use resource_build::imaging::square_size;
/// assert_eq!(square_size(320, 480), 320);
/// assert_eq!(square_size(2208, 1242), 1242);
/// ```
pub fn square_size(width: u32, height: u32) -> u32 {
    width.min(height)
}

/// Top-left position that centres a `square` inside a `width × height` canvas.
///
/// Odd remainders round down, so the extra pixel ends up on the right/bottom.
pub fn centered_offset(width: u32, height: u32, square: u32) -> (u32, u32) {
    (width.saturating_sub(square) / 2, height.saturating_sub(square) / 2)
}

/// Distance between a candidate's side and the wanted square (lower is better).
pub fn fit_score(source_side: u32, square: u32) -> u32 {
    source_side.abs_diff(square)
}

/// Pick the candidate whose side is closest to `square`.
///
/// Candidates are `(name, side)` pairs. Equal scores go to the smallest name,
/// so the choice does not depend on iteration order.
pub fn nearest_fit<'a, I>(candidates: I, square: u32) -> Option<&'a str>
where
    I: IntoIterator<Item = (&'a str, u32)>,
{
    candidates
        .into_iter()
        .min_by(|(a_name, a_side), (b_name, b_side)| {
            fit_score(*a_side, square)
                .cmp(&fit_score(*b_side, square))
                .then_with(|| a_name.cmp(b_name))
        })
        .map(|(name, _)| name)
}
