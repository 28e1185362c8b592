//! Color handling for print: alpha removal and RGB to CMYK separation.

use crate::physical::ColorProfile;
use image::{DynamicImage, RgbImage};

/// Composite any alpha channel onto white paper.
pub fn flatten_alpha(image: &DynamicImage) -> RgbImage {
    if !image.color().has_alpha() {
        return image.to_rgb8();
    }

    let rgba = image.to_rgba8();
    let mut out = RgbImage::new(rgba.width(), rgba.height());
    for (dst, src) in out.pixels_mut().zip(rgba.pixels()) {
        let alpha = src[3] as u32;
        for c in 0..3 {
            let blended = (src[c] as u32 * alpha + 255 * (255 - alpha) + 127) / 255;
            dst[c] = blended as u8;
        }
    }
    out
}

/// Separate one RGB pixel into CMYK ink coverage.
///
/// Grey-component replacement moves `black_generation` of the shared
/// neutral into K, then C/M/Y are scaled down if the total would exceed
/// the profile's ink limit. K is never reduced by the limit.
pub fn convert_pixel(rgb: [u8; 3], profile: &ColorProfile) -> [u8; 4] {
    let c = 1.0 - rgb[0] as f64 / 255.0;
    let m = 1.0 - rgb[1] as f64 / 255.0;
    let y = 1.0 - rgb[2] as f64 / 255.0;

    let k = profile.black_generation.clamp(0.0, 1.0) * c.min(m).min(y);
    let (mut c, mut m, mut y) = if k >= 1.0 {
        (0.0, 0.0, 0.0)
    } else {
        ((c - k) / (1.0 - k), (m - k) / (1.0 - k), (y - k) / (1.0 - k))
    };

    let chroma = c + m + y;
    let limit = profile.total_ink_limit;
    if chroma + k > limit && chroma > 0.0 {
        let scale = ((limit - k) / chroma).max(0.0);
        c *= scale;
        m *= scale;
        y *= scale;
    }

    [to_byte(c), to_byte(m), to_byte(y), to_byte(k)]
}

fn to_byte(value: f64) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Interleaved CMYK bytes for a whole image.
pub fn rgb_to_cmyk(image: &RgbImage, profile: &ColorProfile) -> Vec<u8> {
    let mut out = Vec::with_capacity(image.width() as usize * image.height() as usize * 4);
    for pixel in image.pixels() {
        out.extend_from_slice(&convert_pixel(pixel.0, profile));
    }
    out
}
