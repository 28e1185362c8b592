use super::color::ColorProfile;
use super::constants::{BLEED_MARGIN_IN, CANONICAL_DPI, POINTS_PER_INCH};
use super::inches_to_pixels;
use crate::types::{PrintError, Result};

/// A purchasable physical book format.
///
/// Only the trim size is stored; bleed and pixel dimensions are always
/// derived from it so they can never disagree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BookSizeSpec {
    code: &'static str,
    name: &'static str,
    trim_width_in: f64,
    trim_height_in: f64,
    color_profile: ColorProfile,
}

impl BookSizeSpec {
    const fn new(
        code: &'static str,
        name: &'static str,
        trim_width_in: f64,
        trim_height_in: f64,
        color_profile: ColorProfile,
    ) -> Self {
        Self {
            code,
            name,
            trim_width_in,
            trim_height_in,
            color_profile,
        }
    }

    /// Catalog code the book record stores
    pub fn code(&self) -> &'static str {
        self.code
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn trim_width_in(&self) -> f64 {
        self.trim_width_in
    }

    pub fn trim_height_in(&self) -> f64 {
        self.trim_height_in
    }

    /// Trim width plus bleed on both sides
    pub fn bleed_width_in(&self) -> f64 {
        self.trim_width_in + 2.0 * BLEED_MARGIN_IN
    }

    /// Trim height plus bleed on both sides
    pub fn bleed_height_in(&self) -> f64 {
        self.trim_height_in + 2.0 * BLEED_MARGIN_IN
    }

    /// Bleed width at the canonical DPI
    pub fn pixel_width(&self) -> u32 {
        inches_to_pixels(self.bleed_width_in(), CANONICAL_DPI)
    }

    /// Bleed height at the canonical DPI
    pub fn pixel_height(&self) -> u32 {
        inches_to_pixels(self.bleed_height_in(), CANONICAL_DPI)
    }

    pub fn bleed_width_pt(&self) -> f64 {
        self.bleed_width_in() * POINTS_PER_INCH
    }

    pub fn bleed_height_pt(&self) -> f64 {
        self.bleed_height_in() * POINTS_PER_INCH
    }

    pub fn color_profile(&self) -> ColorProfile {
        self.color_profile
    }
}

static CATALOG: [BookSizeSpec; 5] = [
    BookSizeSpec::new("8x8", "8 x 8 in Square", 8.0, 8.0, ColorProfile::GRACOL_2013),
    BookSizeSpec::new(
        "10x10",
        "10 x 10 in Square",
        10.0,
        10.0,
        ColorProfile::GRACOL_2013,
    ),
    BookSizeSpec::new(
        "12x12",
        "12 x 12 in Square",
        12.0,
        12.0,
        ColorProfile::GRACOL_2013,
    ),
    BookSizeSpec::new(
        "8.5x11",
        "8.5 x 11 in Portrait",
        8.5,
        11.0,
        ColorProfile::SWOP_COATED,
    ),
    BookSizeSpec::new(
        "11x8.5",
        "11 x 8.5 in Landscape",
        11.0,
        8.5,
        ColorProfile::SWOP_COATED,
    ),
];

/// All purchasable formats
pub fn catalog() -> &'static [BookSizeSpec] {
    &CATALOG
}

/// Look up a format by its size code (case-insensitive).
pub fn book_size(code: &str) -> Result<BookSizeSpec> {
    let wanted = code.trim();
    CATALOG
        .iter()
        .find(|spec| spec.code.eq_ignore_ascii_case(wanted))
        .copied()
        .ok_or_else(|| PrintError::UnknownSize(code.to_string()))
}
