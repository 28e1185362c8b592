//! Pure pixel geometry for crop and fit.
//!
//! Nothing here touches pixel data, so every rule can be tested with plain
//! numbers.

use crate::records::{FocalPoint, NormalizedRect};

/// An axis-aligned region of a source image, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Where a contained image sits inside its padded canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainLayout {
    pub canvas: (u32, u32),
    pub image: (u32, u32),
    pub offset: (u32, u32),
}

/// Map a fractional crop onto a `width` x `height` source.
///
/// The result is always at least one pixel and never leaves the source.
pub fn crop_to_pixels(crop: &NormalizedRect, width: u32, height: u32) -> PixelRect {
    let (x, w) = span(crop.x, crop.width, width);
    let (y, h) = span(crop.y, crop.height, height);
    PixelRect {
        x,
        y,
        width: w,
        height: h,
    }
}

fn span(start: f64, length: f64, extent: u32) -> (u32, u32) {
    let extent_f = extent as f64;
    let first = ((start * extent_f).floor().max(0.0) as u32).min(extent.saturating_sub(1));
    let end = ((start + length) * extent_f).round().min(extent_f) as u32;
    (first, end.saturating_sub(first).max(1))
}

/// The largest window of `target_aspect` (width / height) that fits in the
/// source, centred on `focal` and pushed back inside the edges when needed.
pub fn cover_window(width: u32, height: u32, target_aspect: f64, focal: FocalPoint) -> PixelRect {
    let source_aspect = width as f64 / height as f64;

    if source_aspect > target_aspect {
        // Wider than the target: full height, trim the sides
        let window_w = ((height as f64 * target_aspect).round() as u32).clamp(1, width);
        let x = place(focal.x, width, window_w);
        PixelRect {
            x,
            y: 0,
            width: window_w,
            height,
        }
    } else {
        // Taller (or equal): full width, trim top and bottom
        let window_h = ((width as f64 / target_aspect).round() as u32).clamp(1, height);
        let y = place(focal.y, height, window_h);
        PixelRect {
            x: 0,
            y,
            width,
            height: window_h,
        }
    }
}

fn place(focal: f64, extent: u32, window: u32) -> u32 {
    let centre = focal.clamp(0.0, 1.0) * extent as f64;
    let start = (centre - window as f64 / 2.0).round();
    start.clamp(0.0, (extent - window) as f64) as u32
}

/// Output size for a cover window. Windows smaller than the target keep their
/// native pixels; anything larger is downsampled to the target.
pub fn cover_output_size(window: (u32, u32), target: (u32, u32)) -> (u32, u32) {
    if window.0 <= target.0 || window.1 <= target.1 {
        window
    } else {
        target
    }
}

/// Fit `source` inside `target` without cropping, padding the remainder.
///
/// When the fit would upsample, the canvas shrinks instead so the image keeps
/// its native pixels and the padding keeps its proportion.
pub fn contain_layout(source: (u32, u32), target: (u32, u32)) -> ContainLayout {
    let (sw, sh) = (source.0 as f64, source.1 as f64);
    let (tw, th) = (target.0 as f64, target.1 as f64);
    let scale = (tw / sw).min(th / sh);

    if scale >= 1.0 {
        let canvas = (
            ((tw / scale).round() as u32).max(source.0),
            ((th / scale).round() as u32).max(source.1),
        );
        ContainLayout {
            canvas,
            image: source,
            offset: ((canvas.0 - source.0) / 2, (canvas.1 - source.1) / 2),
        }
    } else {
        let image = (
            ((sw * scale).round() as u32).clamp(1, target.0),
            ((sh * scale).round() as u32).clamp(1, target.1),
        );
        ContainLayout {
            canvas: target,
            image,
            offset: ((target.0 - image.0) / 2, (target.1 - image.1) / 2),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crop_to_pixels_quarters() {
        let rect = crop_to_pixels(&NormalizedRect::new(0.5, 0.25, 0.5, 0.5), 400, 200);
        assert_eq!(
            rect,
            PixelRect {
                x: 200,
                y: 50,
                width: 200,
                height: 100
            }
        );
    }

    #[test]
    fn test_crop_never_empty() {
        let rect = crop_to_pixels(&NormalizedRect::new(0.999, 0.0, 0.001, 1.0), 10, 10);
        assert_eq!(rect.x, 9);
        assert_eq!(rect.width, 1);
    }

    #[test]
    fn test_cover_window_centred() {
        let window = cover_window(800, 600, 1.0, FocalPoint::CENTER);
        assert_eq!(
            window,
            PixelRect {
                x: 100,
                y: 0,
                width: 600,
                height: 600
            }
        );
    }

    #[test]
    fn test_cover_window_focal_clamped() {
        let window = cover_window(800, 600, 1.0, FocalPoint { x: 1.0, y: 0.5 });
        assert_eq!(window.x, 200);

        let window = cover_window(600, 800, 1.0, FocalPoint { x: 0.5, y: 0.0 });
        assert_eq!(window.y, 0);
        assert_eq!(window.height, 600);
    }

    #[test]
    fn test_cover_output_never_upscales() {
        assert_eq!(cover_output_size((600, 600), (2400, 2400)), (600, 600));
        assert_eq!(cover_output_size((3000, 3000), (2400, 2400)), (2400, 2400));
    }

    #[test]
    fn test_contain_downscale() {
        let layout = contain_layout((400, 200), (300, 300));
        assert_eq!(layout.canvas, (300, 300));
        assert_eq!(layout.image, (300, 150));
        assert_eq!(layout.offset, (0, 75));
    }

    #[test]
    fn test_contain_no_upscale() {
        let layout = contain_layout((100, 50), (300, 300));
        assert_eq!(layout.canvas, (100, 100));
        assert_eq!(layout.image, (100, 50));
        assert_eq!(layout.offset, (0, 25));
    }
}
