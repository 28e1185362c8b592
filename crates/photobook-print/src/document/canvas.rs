//! Drawing surface for one output page.
//!
//! Coordinates are PDF points with the origin at the bottom-left of the bleed
//! box, so a full-bleed fill is `Rect::new(0, 0, width, height)`.

use super::text::{ASCENT, DESCENT, FittedText, LINE_HEIGHT, encode_win_ansi, text_width_pt};
use super::xobject::image_stream;
use crate::imaging::{ProcessedImage, convert_pixel};
use crate::physical::ColorProfile;
use crate::types::Result;
use lopdf::Stream;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Resource name of the page font
pub(crate) const FONT_RESOURCE: &str = "F1";

/// Rectangle in points (x, y is bottom-left)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn top(&self) -> f64 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    /// Shrink by `amount` on every side
    pub fn inset(&self, amount: f64) -> Rect {
        Rect::new(
            self.x + amount,
            self.y + amount,
            (self.width - 2.0 * amount).max(0.0),
            (self.height - 2.0 * amount).max(0.0),
        )
    }

    /// Whether `other` lies entirely inside this rectangle (within `epsilon`)
    pub fn contains(&self, other: &Rect, epsilon: f64) -> bool {
        other.x >= self.x - epsilon
            && other.y >= self.y - epsilon
            && other.right() <= self.right() + epsilon
            && other.top() <= self.top() + epsilon
    }
}

/// An RGB color with components in 0.0..=1.0
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RgbColor {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl RgbColor {
    pub const WHITE: RgbColor = RgbColor::gray(1.0);
    pub const BLACK: RgbColor = RgbColor::gray(0.0);

    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    pub const fn gray(level: f64) -> Self {
        Self {
            r: level,
            g: level,
            b: level,
        }
    }

    fn to_bytes(self) -> [u8; 3] {
        [self.r, self.g, self.b].map(|v| (v.clamp(0.0, 1.0) * 255.0).round() as u8)
    }
}

/// Which device color space drawing operators target
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColorMode {
    Rgb,
    Cmyk(ColorProfile),
}

impl ColorMode {
    pub fn profile(&self) -> Option<ColorProfile> {
        match self {
            ColorMode::Rgb => None,
            ColorMode::Cmyk(profile) => Some(*profile),
        }
    }
}

/// Format a coordinate compactly and deterministically
fn num(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    let text = format!("{:.3}", rounded);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    match text {
        "" | "-0" => "0".to_string(),
        other => other.to_string(),
    }
}

/// Escape WinAnsi bytes into a PDF literal string
fn literal(text: &str) -> String {
    let mut out = String::from("(");
    for byte in encode_win_ansi(text) {
        match byte {
            b'(' | b')' | b'\\' => {
                out.push('\\');
                out.push(byte as char);
            }
            0x20..=0x7E => out.push(byte as char),
            _ => out.push_str(&format!("\\{:03o}", byte)),
        }
    }
    out.push(')');
    out
}

/// One page being drawn, plus the resources it refers to.
#[derive(Debug)]
pub struct PageCanvas {
    width_pt: f64,
    height_pt: f64,
    trim: Rect,
    mode: ColorMode,
    ops: String,
    images: Vec<(String, Stream)>,
    uses_font: bool,
}

impl PageCanvas {
    /// A blank `width_pt` x `height_pt` page whose trim box is `trim`.
    pub fn new(width_pt: f64, height_pt: f64, trim: Rect, mode: ColorMode) -> Self {
        Self {
            width_pt,
            height_pt,
            trim,
            mode,
            ops: String::new(),
            images: Vec::new(),
            uses_font: false,
        }
    }

    pub fn width_pt(&self) -> f64 {
        self.width_pt
    }

    pub fn height_pt(&self) -> f64 {
        self.height_pt
    }

    /// The full page, which is also the bleed box
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width_pt, self.height_pt)
    }

    pub fn trim(&self) -> Rect {
        self.trim
    }

    pub fn mode(&self) -> ColorMode {
        self.mode
    }

    fn fill_color(&self, color: RgbColor) -> String {
        match &self.mode {
            ColorMode::Rgb => format!("{} {} {} rg", num(color.r), num(color.g), num(color.b)),
            ColorMode::Cmyk(profile) => {
                let cmyk = convert_pixel(color.to_bytes(), profile);
                format!(
                    "{} {} {} {} k",
                    num(cmyk[0] as f64 / 255.0),
                    num(cmyk[1] as f64 / 255.0),
                    num(cmyk[2] as f64 / 255.0),
                    num(cmyk[3] as f64 / 255.0)
                )
            }
        }
    }

    pub fn fill_rect(&mut self, rect: Rect, color: RgbColor) {
        let fill = self.fill_color(color);
        self.ops.push_str(&format!(
            "q {} {} {} {} {} re f Q\n",
            fill,
            num(rect.x),
            num(rect.y),
            num(rect.width),
            num(rect.height)
        ));
    }

    /// Stretch `image` over `rect`.
    pub fn draw_image(&mut self, image: &ProcessedImage, rect: Rect) -> Result<()> {
        let name = format!("Im{}", self.images.len());
        let stream = image_stream(image)?;
        self.ops.push_str(&format!(
            "q {} 0 0 {} {} {} cm /{} Do Q\n",
            num(rect.width),
            num(rect.height),
            num(rect.x),
            num(rect.y),
            name
        ));
        self.images.push((name, stream));
        Ok(())
    }

    /// Draw one line with its baseline starting at (`x`, `y`).
    pub fn draw_text(&mut self, text: &str, x: f64, y: f64, size: f64, color: RgbColor) {
        let fill = self.fill_color(color);
        self.ops.push_str(&format!(
            "q {} BT /{} {} Tf {} {} Td {} Tj ET Q\n",
            fill,
            FONT_RESOURCE,
            num(size),
            num(x),
            num(y),
            literal(text)
        ));
        self.uses_font = true;
    }

    /// Draw `text` line by line, each centred on `center_x`, with the top of
    /// the first line's capitals at `top`.
    pub fn draw_text_block(&mut self, text: &FittedText, center_x: f64, top: f64, color: RgbColor) {
        let mut baseline = top - text.size * ASCENT;
        for line in &text.lines {
            let width = text_width_pt(line, text.size);
            self.draw_text(line, center_x - width / 2.0, baseline, text.size, color);
            baseline -= text.size * LINE_HEIGHT;
        }
    }

    /// Draw one line rotated to read top-to-bottom, centred in `clip` and
    /// clipped to it.
    pub fn draw_rotated_text_clipped(
        &mut self,
        text: &str,
        clip: Rect,
        size: f64,
        color: RgbColor,
    ) {
        let fill = self.fill_color(color);
        let length = text_width_pt(text, size);
        // Glyph "up" points along +x; centre the ascent/descent band across the clip
        let baseline_x = clip.center_x() - (ASCENT - DESCENT) * size / 2.0;
        let start_y = clip.center_y() + length / 2.0;
        self.ops.push_str(&format!(
            "q {} {} {} {} re W n {} BT /{} {} Tf 0 -1 1 0 {} {} Tm {} Tj ET Q\n",
            num(clip.x),
            num(clip.y),
            num(clip.width),
            num(clip.height),
            fill,
            FONT_RESOURCE,
            num(size),
            num(baseline_x),
            num(start_y),
            literal(text)
        ));
        self.uses_font = true;
    }

    pub(crate) fn into_parts(self) -> CanvasParts {
        CanvasParts {
            width_pt: self.width_pt,
            height_pt: self.height_pt,
            trim: self.trim,
            content: self.ops.into_bytes(),
            images: self.images,
            uses_font: self.uses_font,
        }
    }
}

/// A finished canvas, ready to become page objects
pub(crate) struct CanvasParts {
    pub width_pt: f64,
    pub height_pt: f64,
    pub trim: Rect,
    pub content: Vec<u8>,
    pub images: Vec<(String, Stream)>,
    pub uses_font: bool,
}
