//! Image processing for print placement.
//!
//! | Step | Rule |
//! |------|------|
//! | Crop | explicit fractional crop, applied first |
//! | Resolution | checked on the cropped pixels against the target inches |
//! | Fit | `Cover` fills and trims around a focal point, `Contain` pads with white |
//! | Scale | `Lanczos3`, downsample only, capped at the canonical DPI |
//! | Color | optional CMYK separation, always after scaling |

mod color;
mod decode;
mod geometry;

pub use color::{convert_pixel, flatten_alpha, rgb_to_cmyk};
pub use decode::{apply_orientation, decode_photo};
pub use geometry::{
    ContainLayout, PixelRect, contain_layout, cover_output_size, cover_window, crop_to_pixels,
};

use crate::physical::{CANONICAL_DPI, ColorProfile, inches_to_pixels, validate_resolution};
use crate::records::{FocalPoint, NormalizedRect, PhotoRecord};
use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgb, RgbImage};
use std::borrow::Cow;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ImageProcessingError {
    #[error("Could not decode photo {photo_id}: {message}")]
    Decode { photo_id: String, message: String },
    #[error("Invalid target dimensions {width_in}in x {height_in}in")]
    InvalidDimensions { width_in: f64, height_in: f64 },
    #[error("Invalid crop: {0}")]
    InvalidCrop(String),
}

/// How a source fills its target area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FitMode {
    /// Fill the target and trim the overflow
    #[default]
    Cover,
    /// Fit entirely inside the target and pad the remainder
    Contain,
}

/// Pixel layout of a processed buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Rgb8,
    Cmyk8,
}

impl PixelFormat {
    pub fn channels(&self) -> usize {
        match self {
            PixelFormat::Rgb8 => 3,
            PixelFormat::Cmyk8 => 4,
        }
    }
}

/// A physical area to prepare a photo for.
#[derive(Debug, Clone, PartialEq)]
pub struct PrintTarget {
    pub width_in: f64,
    pub height_in: f64,
    pub fit: FitMode,
    pub crop: Option<NormalizedRect>,
    pub focal_point: Option<FocalPoint>,
    /// Separate into CMYK for this profile; `None` keeps RGB
    pub color_profile: Option<ColorProfile>,
}

impl PrintTarget {
    pub fn cover(width_in: f64, height_in: f64) -> Self {
        Self {
            width_in,
            height_in,
            fit: FitMode::Cover,
            crop: None,
            focal_point: None,
            color_profile: None,
        }
    }

    pub fn contain(width_in: f64, height_in: f64) -> Self {
        Self {
            fit: FitMode::Contain,
            ..Self::cover(width_in, height_in)
        }
    }

    pub fn with_crop(mut self, crop: Option<NormalizedRect>) -> Self {
        self.crop = crop;
        self
    }

    pub fn with_focal_point(mut self, focal_point: Option<FocalPoint>) -> Self {
        self.focal_point = focal_point;
        self
    }

    pub fn with_color_profile(mut self, profile: Option<ColorProfile>) -> Self {
        self.color_profile = profile;
        self
    }
}

/// Pixels ready to be placed over a [`PrintTarget`].
///
/// Owned by the requester; the same photo processed for two placements
/// yields two independent buffers.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedImage {
    pub pixels: Vec<u8>,
    pub width_px: u32,
    pub height_px: u32,
    pub format: PixelFormat,
    pub achieved_dpi: f64,
    pub warnings: Vec<String>,
}

/// Crop, fit, scale and optionally separate `source` for `target`.
///
/// Low resolution never fails here; it is reported in `warnings`.
pub fn process_for_print(
    source: &DynamicImage,
    target: &PrintTarget,
) -> Result<ProcessedImage, ImageProcessingError> {
    let (width_in, height_in) = (target.width_in, target.height_in);
    if !(width_in.is_finite() && height_in.is_finite() && width_in > 0.0 && height_in > 0.0) {
        return Err(ImageProcessingError::InvalidDimensions {
            width_in,
            height_in,
        });
    }
    if source.width() == 0 || source.height() == 0 {
        return Err(ImageProcessingError::InvalidCrop(
            "source image has no pixels".to_string(),
        ));
    }

    let cropped: Cow<'_, DynamicImage> = match &target.crop {
        Some(crop) => {
            crop.check().map_err(ImageProcessingError::InvalidCrop)?;
            let rect = crop_to_pixels(crop, source.width(), source.height());
            Cow::Owned(source.crop_imm(rect.x, rect.y, rect.width, rect.height))
        }
        None => Cow::Borrowed(source),
    };

    let mut warnings = Vec::new();
    let check = validate_resolution(cropped.width(), cropped.height(), width_in, height_in);
    if let Some(message) = check.message {
        warnings.push(message);
    }

    let target_px = (
        inches_to_pixels(width_in, CANONICAL_DPI).max(1),
        inches_to_pixels(height_in, CANONICAL_DPI).max(1),
    );

    let rgb = match target.fit {
        FitMode::Cover => {
            let focal = target.focal_point.unwrap_or(FocalPoint::CENTER);
            let window = cover_window(
                cropped.width(),
                cropped.height(),
                width_in / height_in,
                focal,
            );
            let windowed = flatten_alpha(&cropped.crop_imm(
                window.x,
                window.y,
                window.width,
                window.height,
            ));
            let (out_w, out_h) = cover_output_size((window.width, window.height), target_px);
            scale_to(windowed, out_w, out_h)
        }
        FitMode::Contain => {
            let layout = contain_layout((cropped.width(), cropped.height()), target_px);
            let flat = flatten_alpha(&cropped);
            let scaled = scale_to(flat, layout.image.0, layout.image.1);
            let mut canvas = RgbImage::from_pixel(layout.canvas.0, layout.canvas.1, Rgb([255; 3]));
            imageops::overlay(
                &mut canvas,
                &scaled,
                layout.offset.0 as i64,
                layout.offset.1 as i64,
            );
            canvas
        }
    };

    let (width_px, height_px) = rgb.dimensions();
    let (pixels, format) = match &target.color_profile {
        Some(profile) => (rgb_to_cmyk(&rgb, profile), PixelFormat::Cmyk8),
        None => (rgb.into_raw(), PixelFormat::Rgb8),
    };

    Ok(ProcessedImage {
        pixels,
        width_px,
        height_px,
        format,
        achieved_dpi: check.achieved_dpi,
        warnings,
    })
}

/// Decode `photo` and process it for `target`.
pub fn process_photo(
    photo: &PhotoRecord,
    target: &PrintTarget,
) -> Result<ProcessedImage, ImageProcessingError> {
    let image = decode_photo(photo)?;
    process_for_print(&image, target)
}

fn scale_to(image: RgbImage, width: u32, height: u32) -> RgbImage {
    if image.dimensions() == (width, height) {
        image
    } else {
        imageops::resize(&image, width, height, FilterType::Lanczos3)
    }
}
