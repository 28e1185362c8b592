/// Print color profile parameters.
///
/// The profile is identified to the vendor by name and output condition;
/// the ink parameters drive the RGB to CMYK conversion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorProfile {
    /// Display name of the profile
    pub name: &'static str,
    /// Registered characterization name written into the PDF output intent
    pub output_condition_identifier: &'static str,
    /// Registry the output condition is defined in
    pub registry_name: &'static str,
    /// Maximum total area coverage, as a fraction (3.0 = 300%)
    pub total_ink_limit: f64,
    /// Share of the neutral component moved into black (0.0..=1.0)
    pub black_generation: f64,
}

impl ColorProfile {
    /// GRACoL 2013 coated sheet-fed stock
    pub const GRACOL_2013: ColorProfile = ColorProfile {
        name: "GRACoL2013_CRPC6",
        output_condition_identifier: "CGATS21_CRPC6",
        registry_name: "http://www.color.org",
        total_ink_limit: 3.2,
        black_generation: 0.8,
    };

    /// SWOP coated web stock
    pub const SWOP_COATED: ColorProfile = ColorProfile {
        name: "U.S. Web Coated (SWOP) v2",
        output_condition_identifier: "CGATS TR 001",
        registry_name: "http://www.color.org",
        total_ink_limit: 3.0,
        black_generation: 0.9,
    };
}
