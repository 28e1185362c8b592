//! Read-only input records handed in by the persistence layer.

use crate::types::{PrintError, Result};
use std::path::PathBuf;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tolerance for accumulated float error in layout fractions
const FRACTION_EPSILON: f64 = 1e-9;

/// A rectangle in fractional coordinates, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NormalizedRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl NormalizedRect {
    pub const FULL: NormalizedRect = NormalizedRect {
        x: 0.0,
        y: 0.0,
        width: 1.0,
        height: 1.0,
    };

    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Reject anything that is not a non-empty sub-rectangle of the unit square.
    pub fn check(&self) -> std::result::Result<(), String> {
        let values = [self.x, self.y, self.width, self.height];
        if values.iter().any(|v| !v.is_finite()) {
            return Err("coordinates must be finite".to_string());
        }
        if self.x < 0.0 || self.y < 0.0 {
            return Err(format!("origin ({}, {}) is negative", self.x, self.y));
        }
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(format!("size {} x {} is empty", self.width, self.height));
        }
        if self.x + self.width > 1.0 + FRACTION_EPSILON {
            return Err(format!("x + width = {} exceeds 1", self.x + self.width));
        }
        if self.y + self.height > 1.0 + FRACTION_EPSILON {
            return Err(format!("y + height = {} exceeds 1", self.y + self.height));
        }
        Ok(())
    }
}

/// A point of interest inside a photo, in fractional coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FocalPoint {
    pub x: f64,
    pub y: f64,
}

impl FocalPoint {
    pub const CENTER: FocalPoint = FocalPoint { x: 0.5, y: 0.5 };
}

/// One photo's placement on a page, as produced by the layout engine.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PageLayout {
    pub photo_id: String,
    /// Fractions of the page's bleed box
    pub position: NormalizedRect,
    /// Fractions of the source image
    #[cfg_attr(feature = "serde", serde(default))]
    pub crop: Option<NormalizedRect>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub focal_point: Option<FocalPoint>,
}

impl PageLayout {
    pub fn new(photo_id: impl Into<String>, position: NormalizedRect) -> Self {
        Self {
            photo_id: photo_id.into(),
            position,
            crop: None,
            focal_point: None,
        }
    }

    pub fn with_crop(mut self, crop: NormalizedRect) -> Self {
        self.crop = Some(crop);
        self
    }

    pub fn with_focal_point(mut self, focal_point: FocalPoint) -> Self {
        self.focal_point = Some(focal_point);
        self
    }

    /// Layout violations come from the layout engine and are never clamped.
    pub fn validate(&self, page: u32) -> Result<()> {
        let invalid = |reason: String| PrintError::InvalidLayout {
            page,
            photo_id: self.photo_id.clone(),
            reason,
        };

        self.position
            .check()
            .map_err(|reason| invalid(format!("position {}", reason)))?;

        if let Some(crop) = &self.crop {
            crop.check()
                .map_err(|reason| invalid(format!("crop {}", reason)))?;
        }

        if let Some(focal) = &self.focal_point {
            if !(0.0..=1.0).contains(&focal.x) || !(0.0..=1.0).contains(&focal.y) {
                return Err(invalid(format!(
                    "focal point ({}, {}) lies outside the photo",
                    focal.x, focal.y
                )));
            }
        }

        Ok(())
    }
}

/// The book being printed.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BookRecord {
    pub id: String,
    pub title: Option<String>,
    pub size_code: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub cover_photo_id: Option<String>,
    /// Page count as stored with the book
    pub page_count: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub spine_text: Option<String>,
}

/// A stored interior page.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PageRecord {
    pub page_number: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub layouts: Vec<PageLayout>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub text_content: Option<String>,
}

/// Where a photo's encoded bytes come from.
#[derive(Debug, Clone, PartialEq)]
pub enum PhotoSource {
    /// Already-fetched encoded bytes (JPEG, PNG, ...)
    Encoded(Arc<[u8]>),
    File(PathBuf),
}

/// EXIF orientation tag, already extracted by photo analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ExifOrientation {
    #[default]
    Normal,
    FlipHorizontal,
    Rotate180,
    FlipVertical,
    /// Mirrored across the top-left to bottom-right diagonal
    Transpose,
    Rotate90,
    /// Mirrored across the top-right to bottom-left diagonal
    Transverse,
    Rotate270,
}

impl ExifOrientation {
    /// Map the raw tag value (1-8). Unknown values read as upright.
    pub fn from_exif(value: u8) -> Self {
        match value {
            2 => ExifOrientation::FlipHorizontal,
            3 => ExifOrientation::Rotate180,
            4 => ExifOrientation::FlipVertical,
            5 => ExifOrientation::Transpose,
            6 => ExifOrientation::Rotate90,
            7 => ExifOrientation::Transverse,
            8 => ExifOrientation::Rotate270,
            _ => ExifOrientation::Normal,
        }
    }
}

/// A photo the book references.
#[derive(Debug, Clone, PartialEq)]
pub struct PhotoRecord {
    pub id: String,
    pub source: PhotoSource,
    pub orientation: ExifOrientation,
}

impl PhotoRecord {
    pub fn from_bytes(id: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            id: id.into(),
            source: PhotoSource::Encoded(bytes.into()),
            orientation: ExifOrientation::Normal,
        }
    }

    pub fn from_path(id: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            id: id.into(),
            source: PhotoSource::File(path.into()),
            orientation: ExifOrientation::Normal,
        }
    }

    pub fn with_orientation(mut self, orientation: ExifOrientation) -> Self {
        self.orientation = orientation;
        self
    }
}
