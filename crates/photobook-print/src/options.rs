use crate::document::RgbColor;
use crate::physical::{BookSizeSpec, ColorProfile, MIN_LEGIBLE_FONT_SIZE_PT, PAPER_THICKNESS_IN};
use crate::types::*;
use crate::vendor::PaperType;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Print generation configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PrintOptions {
    // Color
    pub convert_to_cmyk: bool,

    // Paper
    pub paper_thickness_in: f64,
    pub paper_type: PaperType,

    // Typography
    pub title_font_size_pt: f64,
    pub min_title_font_size_pt: f64,
    pub caption_font_size_pt: f64,
    pub max_spine_font_size_pt: f64,

    // Colors
    pub title_color: RgbColor,
    pub caption_color: RgbColor,
    pub spine_color: RgbColor,
    pub spine_background: RgbColor,
    /// Gray level (0.0 black, 1.0 white) for missing-photo placeholders
    pub placeholder_gray: f64,
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self {
            convert_to_cmyk: false,
            paper_thickness_in: PAPER_THICKNESS_IN,
            paper_type: PaperType::default(),
            title_font_size_pt: 36.0,
            min_title_font_size_pt: 14.0,
            caption_font_size_pt: 11.0,
            max_spine_font_size_pt: 14.0,
            title_color: RgbColor::WHITE,
            caption_color: RgbColor::gray(0.2),
            spine_color: RgbColor::BLACK,
            spine_background: RgbColor::WHITE,
            placeholder_gray: 0.85,
        }
    }
}

impl PrintOptions {
    /// Load options from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options: Self = serde_json::from_slice(&bytes)
            .map_err(|e| PrintError::Config(format!("Failed to parse config: {}", e)))?;
        options.validate()?;
        Ok(options)
    }

    /// Save options to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| PrintError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        if !(self.paper_thickness_in.is_finite()
            && self.paper_thickness_in > 0.0
            && self.paper_thickness_in < 0.1)
        {
            return Err(PrintError::Config(format!(
                "Paper thickness {}in is outside (0, 0.1)",
                self.paper_thickness_in
            )));
        }

        let sizes = [
            ("title_font_size_pt", self.title_font_size_pt),
            ("min_title_font_size_pt", self.min_title_font_size_pt),
            ("caption_font_size_pt", self.caption_font_size_pt),
            ("max_spine_font_size_pt", self.max_spine_font_size_pt),
        ];
        for (name, size) in sizes {
            if !(size.is_finite() && size >= MIN_LEGIBLE_FONT_SIZE_PT) {
                return Err(PrintError::Config(format!(
                    "{} must be at least {}pt, got {}",
                    name, MIN_LEGIBLE_FONT_SIZE_PT, size
                )));
            }
        }
        if self.min_title_font_size_pt > self.title_font_size_pt {
            return Err(PrintError::Config(
                "min_title_font_size_pt exceeds title_font_size_pt".to_string(),
            ));
        }

        let colors = [
            ("title_color", self.title_color),
            ("caption_color", self.caption_color),
            ("spine_color", self.spine_color),
            ("spine_background", self.spine_background),
        ];
        for (name, color) in colors {
            if [color.r, color.g, color.b]
                .iter()
                .any(|c| !(0.0..=1.0).contains(c))
            {
                return Err(PrintError::Config(format!(
                    "{} components must be within 0..=1",
                    name
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.placeholder_gray) {
            return Err(PrintError::Config(
                "placeholder_gray must be within 0..=1".to_string(),
            ));
        }

        Ok(())
    }

    /// Profile to separate for, or `None` when staying in RGB
    pub fn color_profile_for(&self, size: &BookSizeSpec) -> Option<ColorProfile> {
        self.convert_to_cmyk.then(|| size.color_profile())
    }
}
