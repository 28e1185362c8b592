//! Cover spread composition.
//!
//! The spread is one page laid out left to right as back cover, spine, front
//! cover. Each cover panel is a full bleed-size panel; the spine sits between
//! them and its width follows the interior page count.

use crate::document::text::{ASCENT, DESCENT};
use crate::document::{ColorMode, DocumentBuilder, PageCanvas, Rect, RgbColor, fit_text};
use crate::imaging::{ImageProcessingError, PrintTarget, ProcessedImage, process_photo};
use crate::options::PrintOptions;
use crate::physical::{
    BLEED_MARGIN_IN, BookSizeSpec, COVER_TITLE_SAFE_MARGIN_IN, MIN_LEGIBLE_FONT_SIZE_PT,
    SPINE_SAFE_MARGIN_IN, SPINE_TEXT_PADDING_IN, inches_to_points, spine_width_inches_with,
};
use crate::records::PhotoRecord;
use crate::types::{BinaryDocument, PrintError, Result};

/// Lines a title may wrap onto before it is truncated
const MAX_TITLE_LINES: usize = 3;

/// Cover composition request
#[derive(Debug, Clone, PartialEq)]
pub struct CoverSpec {
    pub book_size: BookSizeSpec,
    /// Interior page count; drives the spine width
    pub page_count: u32,
    pub front_image: PhotoRecord,
    pub back_image: Option<PhotoRecord>,
    pub title: Option<String>,
    pub spine_text: Option<String>,
}

/// The three regions of a cover spread, left to right
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverRegion {
    Back,
    Spine,
    Front,
}

/// Physical geometry of a cover spread.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverLayout {
    book_size: BookSizeSpec,
    spine_width_in: f64,
}

impl CoverLayout {
    pub fn new(book_size: BookSizeSpec, page_count: u32, paper_thickness_in: f64) -> Result<Self> {
        Ok(Self {
            book_size,
            spine_width_in: spine_width_inches_with(page_count, paper_thickness_in)?,
        })
    }

    pub fn spine_width_in(&self) -> f64 {
        self.spine_width_in
    }

    /// Two bleed-size panels plus the spine
    pub fn width_in(&self) -> f64 {
        2.0 * self.book_size.bleed_width_in() + self.spine_width_in
    }

    pub fn height_in(&self) -> f64 {
        self.book_size.bleed_height_in()
    }

    pub fn width_pt(&self) -> f64 {
        inches_to_points(self.width_in())
    }

    pub fn height_pt(&self) -> f64 {
        inches_to_points(self.height_in())
    }

    /// Horizontal extent of `region` in inches from the left edge
    pub fn region_span_in(&self, region: CoverRegion) -> (f64, f64) {
        let panel = self.book_size.bleed_width_in();
        match region {
            CoverRegion::Back => (0.0, panel),
            CoverRegion::Spine => (panel, panel + self.spine_width_in),
            CoverRegion::Front => (panel + self.spine_width_in, 2.0 * panel + self.spine_width_in),
        }
    }

    /// Width of `region` in inches
    pub fn region_width_in(&self, region: CoverRegion) -> f64 {
        match region {
            CoverRegion::Back | CoverRegion::Front => self.book_size.bleed_width_in(),
            CoverRegion::Spine => self.spine_width_in,
        }
    }

    /// Full-height rectangle of `region` in points.
    ///
    /// The width comes straight from the panel or spine size, so panel
    /// widths never depend on the page count.
    pub fn region_rect(&self, region: CoverRegion) -> Rect {
        let (start, _) = self.region_span_in(region);
        Rect::new(
            inches_to_points(start),
            0.0,
            inches_to_points(self.region_width_in(region)),
            self.height_pt(),
        )
    }

    /// Trim box of the whole spread
    pub fn trim_box(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width_pt(), self.height_pt())
            .inset(inches_to_points(BLEED_MARGIN_IN))
    }

    /// Trim area of the front panel
    pub fn front_trim(&self) -> Rect {
        self.region_rect(CoverRegion::Front)
            .inset(inches_to_points(BLEED_MARGIN_IN))
    }

    /// Where the title may be drawn: the front trim area less the title margin
    pub fn title_safe_area(&self) -> Rect {
        self.front_trim()
            .inset(inches_to_points(COVER_TITLE_SAFE_MARGIN_IN))
    }

    /// Where spine text may be drawn: padded off the folds and kept clear of
    /// the head and tail trim
    pub fn spine_text_area(&self) -> Rect {
        let spine = self.region_rect(CoverRegion::Spine);
        let padding = inches_to_points(SPINE_TEXT_PADDING_IN);
        let vertical = inches_to_points(BLEED_MARGIN_IN + SPINE_SAFE_MARGIN_IN);
        Rect::new(
            spine.x + padding,
            spine.y + vertical,
            (spine.width - 2.0 * padding).max(0.0),
            (spine.height - 2.0 * vertical).max(0.0),
        )
    }
}

fn prefixed(prefix: &str, warnings: &[String]) -> Vec<String> {
    warnings
        .iter()
        .map(|w| format!("{}: {}", prefix, w))
        .collect()
}

/// Compose the single-page cover spread.
///
/// A front photo that can't be decoded fails the cover with
/// [`PrintError::NoCoverImage`]. A back photo that can't be used leaves the
/// back panel white and adds a warning.
pub fn compose_cover(spec: &CoverSpec, options: &PrintOptions) -> Result<BinaryDocument> {
    let layout = CoverLayout::new(spec.book_size, spec.page_count, options.paper_thickness_in)?;
    let profile = options.color_profile_for(&spec.book_size);
    let mode = profile.map_or(ColorMode::Rgb, ColorMode::Cmyk);
    let mut warnings = Vec::new();

    let panel_target = PrintTarget::cover(
        spec.book_size.bleed_width_in(),
        spec.book_size.bleed_height_in(),
    )
    .with_color_profile(profile);

    let (front, back) = rayon::join(
        || process_photo(&spec.front_image, &panel_target),
        || {
            spec.back_image
                .as_ref()
                .map(|photo| process_photo(photo, &panel_target))
        },
    );

    let front: ProcessedImage = match front {
        Ok(image) => image,
        Err(e @ ImageProcessingError::Decode { .. }) => {
            log::warn!("Front cover photo {} unusable: {}", spec.front_image.id, e);
            return Err(PrintError::NoCoverImage);
        }
        Err(e) => return Err(e.into()),
    };
    warnings.extend(prefixed(
        &format!("Front cover photo {}", spec.front_image.id),
        &front.warnings,
    ));

    let mut canvas = PageCanvas::new(
        layout.width_pt(),
        layout.height_pt(),
        layout.trim_box(),
        mode,
    );
    // Paper has no alpha; anything not painted prints as white
    canvas.fill_rect(canvas.bounds(), RgbColor::WHITE);

    match (&spec.back_image, back) {
        (Some(photo), Some(Ok(image))) => {
            warnings.extend(prefixed(&format!("Back cover photo {}", photo.id), &image.warnings));
            canvas.draw_image(&image, layout.region_rect(CoverRegion::Back))?;
        }
        (Some(photo), Some(Err(e))) => {
            log::warn!("Back cover photo {} unusable: {}", photo.id, e);
            warnings.push(format!(
                "Back cover photo {} could not be used ({}); back cover left white",
                photo.id, e
            ));
        }
        _ => {}
    }

    canvas.draw_image(&front, layout.region_rect(CoverRegion::Front))?;
    canvas.fill_rect(layout.region_rect(CoverRegion::Spine), options.spine_background);

    if let Some(text) = spec.spine_text.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        draw_spine_text(&mut canvas, &layout, text, options, &mut warnings);
    }

    if let Some(title) = spec.title.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        let safe = layout.title_safe_area();
        match fit_text(
            title,
            safe.width,
            MAX_TITLE_LINES,
            options.title_font_size_pt,
            options.min_title_font_size_pt,
        ) {
            Some(fitted) => {
                if fitted.truncated {
                    warnings.push(format!("Cover title {:?} truncated to fit", title));
                }
                canvas.draw_text_block(&fitted, safe.center_x(), safe.top(), options.title_color);
            }
            None => warnings.push(format!("Cover title {:?} does not fit and was omitted", title)),
        }
    }

    let bytes = DocumentBuilder::new(spec.title.clone().unwrap_or_else(|| "Cover".to_string()))
        .with_output_intent(profile)
        .add_page(canvas)?
        .finish()?;

    log::info!(
        "Composed {} cover: {:.3}in x {:.3}in, spine {:.3}in, {} warnings",
        spec.book_size.code(),
        layout.width_in(),
        layout.height_in(),
        layout.spine_width_in(),
        warnings.len()
    );

    Ok(BinaryDocument {
        bytes,
        page_count: 1,
        warnings,
    })
}

fn draw_spine_text(
    canvas: &mut PageCanvas,
    layout: &CoverLayout,
    text: &str,
    options: &PrintOptions,
    warnings: &mut Vec<String>,
) {
    let area = layout.spine_text_area();
    if area.width < MIN_LEGIBLE_FONT_SIZE_PT {
        log::debug!(
            "Spine text area {:.2}pt is narrower than {}pt",
            area.width,
            MIN_LEGIBLE_FONT_SIZE_PT
        );
        warnings.push(format!(
            "Spine is too narrow for text ({:.3}in); spine text omitted",
            layout.spine_width_in()
        ));
        return;
    }

    let by_thickness = area.width / (ASCENT + DESCENT);
    let preferred = options.max_spine_font_size_pt.min(by_thickness);
    let minimum = MIN_LEGIBLE_FONT_SIZE_PT.min(preferred);

    match fit_text(text, area.height, 1, preferred, minimum) {
        Some(fitted) => {
            if fitted.truncated {
                warnings.push(format!("Spine text {:?} truncated to fit", text));
            }
            canvas.draw_rotated_text_clipped(
                &fitted.lines[0],
                area,
                fitted.size,
                options.spine_color,
            );
        }
        None => warnings.push(format!("Spine text {:?} does not fit and was omitted", text)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physical::book_size;

    #[test]
    fn test_regions_tile_the_spread() {
        let layout = CoverLayout::new(book_size("8x8").unwrap(), 40, 0.012).unwrap();
        let (back_start, back_end) = layout.region_span_in(CoverRegion::Back);
        let (spine_start, spine_end) = layout.region_span_in(CoverRegion::Spine);
        let (front_start, front_end) = layout.region_span_in(CoverRegion::Front);

        assert_eq!(back_start, 0.0);
        assert_eq!(back_end, spine_start);
        assert_eq!(spine_end, front_start);
        assert!((front_end - layout.width_in()).abs() < 1e-12);
        assert!((spine_end - spine_start - 0.24).abs() < 1e-12);
    }

    #[test]
    fn test_title_area_inside_front_trim() {
        let layout = CoverLayout::new(book_size("10x10").unwrap(), 20, 0.012).unwrap();
        let trim = layout.front_trim();
        let safe = layout.title_safe_area();
        assert!(trim.contains(&safe, 1e-9));
        assert!((safe.x - trim.x - 36.0).abs() < 1e-9);
        assert!((trim.top() - safe.top() - 36.0).abs() < 1e-9);
    }

    #[test]
    fn test_panel_widths_independent_of_page_count() {
        let size = book_size("8x8").unwrap();
        let panel = CoverLayout::new(size, 20, 0.012)
            .unwrap()
            .region_rect(CoverRegion::Front)
            .width;
        for pages in [21, 60, 99, 250, 401] {
            let layout = CoverLayout::new(size, pages, 0.012).unwrap();
            assert_eq!(layout.region_rect(CoverRegion::Front).width, panel);
            assert_eq!(layout.region_rect(CoverRegion::Back).width, panel);
            assert_eq!(layout.region_rect(CoverRegion::Front).width, 594.0);
        }
    }

    #[test]
    fn test_zero_pages_rejected() {
        assert!(CoverLayout::new(book_size("8x8").unwrap(), 0, 0.012).is_err());
    }
}
