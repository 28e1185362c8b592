//! Physical model: book formats, unit conversions, spine width and the
//! resolution policy.
//!
//! Everything in this module is pure data and arithmetic.

mod color;
mod constants;
mod resolution;
mod sizes;

pub use color::ColorProfile;
pub use constants::*;
pub use resolution::{ResolutionCheck, validate_resolution};
pub use sizes::{BookSizeSpec, book_size, catalog};

use crate::types::{PrintError, Result};

/// Convert a physical length to whole pixels at `dpi`.
#[inline]
pub fn inches_to_pixels(inches: f64, dpi: u32) -> u32 {
    (inches * dpi as f64).round().max(0.0) as u32
}

/// Convert a pixel count to a physical length at `dpi`.
#[inline]
pub fn pixels_to_inches(px: u32, dpi: u32) -> f64 {
    px as f64 / dpi as f64
}

/// Convert inches to PDF points
#[inline]
pub fn inches_to_points(inches: f64) -> f64 {
    inches * POINTS_PER_INCH
}

/// Spine width for `page_count` pages at the standard paper thickness.
pub fn spine_width_inches(page_count: u32) -> Result<f64> {
    spine_width_inches_with(page_count, PAPER_THICKNESS_IN)
}

/// Spine width for `page_count` pages on paper `sheet_thickness_in` thick.
///
/// Pages are printed two per sheet, so an odd count still consumes a whole
/// final sheet.
pub fn spine_width_inches_with(page_count: u32, sheet_thickness_in: f64) -> Result<f64> {
    if page_count == 0 {
        return Err(PrintError::InvalidPageCount(page_count));
    }
    let sheets = page_count.div_ceil(PAGES_PER_SHEET);
    Ok(sheets as f64 * sheet_thickness_in)
}
