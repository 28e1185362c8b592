use super::constants::{MINIMUM_DPI, RECOMMENDED_DPI};

/// Outcome of checking a pixel source against a physical print area.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolutionCheck {
    /// False only when the achieved DPI is below the minimum
    pub valid: bool,
    /// The lower of the horizontal and vertical DPI
    pub achieved_dpi: f64,
    /// Present whenever the achieved DPI is below the recommended DPI
    pub message: Option<String>,
}

/// Check how sharply `pixel_width` x `pixel_height` pixels print over a
/// `target_width_in` x `target_height_in` area.
///
/// Three tiers: below [`MINIMUM_DPI`] is invalid, below [`RECOMMENDED_DPI`] is
/// valid with a message, anything else is clean.
pub fn validate_resolution(
    pixel_width: u32,
    pixel_height: u32,
    target_width_in: f64,
    target_height_in: f64,
) -> ResolutionCheck {
    if !(target_width_in > 0.0 && target_height_in > 0.0) {
        return ResolutionCheck {
            valid: false,
            achieved_dpi: 0.0,
            message: Some(format!(
                "Target area {}in x {}in is not printable",
                target_width_in, target_height_in
            )),
        };
    }

    let achieved_dpi =
        (pixel_width as f64 / target_width_in).min(pixel_height as f64 / target_height_in);

    let message = if achieved_dpi < MINIMUM_DPI {
        Some(format!(
            "Resolution {:.0} DPI is below the minimum {:.0} DPI and will print visibly soft",
            achieved_dpi, MINIMUM_DPI
        ))
    } else if achieved_dpi < RECOMMENDED_DPI {
        Some(format!(
            "Resolution {:.0} DPI is below the recommended {:.0} DPI",
            achieved_dpi, RECOMMENDED_DPI
        ))
    } else {
        None
    };

    ResolutionCheck {
        valid: achieved_dpi >= MINIMUM_DPI,
        achieved_dpi,
        message,
    }
}
