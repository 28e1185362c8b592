//! Shared physical constants for print production
//!
//! Vendors vary some of these (paper thickness especially), so they live here
//! as named values instead of being inlined at call sites.

// =============================================================================
// Unit Conversion
// =============================================================================

/// PDF user-space units per inch
pub const POINTS_PER_INCH: f64 = 72.0;

/// The single resolution every pixel dimension is expressed at
pub const CANONICAL_DPI: u32 = 300;

// =============================================================================
// Resolution Policy
// =============================================================================

/// Below this a photo is flagged as unfit for print
pub const MINIMUM_DPI: f64 = 150.0;

/// Below this a photo still prints but carries a warning
pub const RECOMMENDED_DPI: f64 = 300.0;

// =============================================================================
// Bleed and Safe Zones
// =============================================================================

/// Bleed allowance added on every side of the trim box (inches)
pub const BLEED_MARGIN_IN: f64 = 0.125;

/// Minimum distance between interior captions and the trim edge (inches)
pub const INTERIOR_SAFE_MARGIN_IN: f64 = 0.25;

/// Minimum distance between the cover title and the front trim box (inches)
pub const COVER_TITLE_SAFE_MARGIN_IN: f64 = 0.5;

/// Distance kept between spine text and the head/tail trim edges (inches)
pub const SPINE_SAFE_MARGIN_IN: f64 = 0.25;

/// Clearance between spine text and the spine folds (inches, each side)
pub const SPINE_TEXT_PADDING_IN: f64 = 0.03125;

// =============================================================================
// Paper
// =============================================================================

/// Thickness of one interior sheet (inches). One sheet carries two pages.
pub const PAPER_THICKNESS_IN: f64 = 0.012;

/// Printed pages per physical sheet
pub const PAGES_PER_SHEET: u32 = 2;

// =============================================================================
// Text
// =============================================================================

/// Smallest font size still considered legible in print (points)
pub const MIN_LEGIBLE_FONT_SIZE_PT: f64 = 6.0;
