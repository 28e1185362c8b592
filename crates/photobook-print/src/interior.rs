//! Interior block composition: one output page per book page.

use crate::cancel::CancelFlag;
use crate::document::{ColorMode, DocumentBuilder, PageCanvas, Rect, RgbColor, fit_text};
use crate::imaging::{ImageProcessingError, PrintTarget, ProcessedImage, process_photo};
use crate::options::PrintOptions;
use crate::physical::{
    BLEED_MARGIN_IN, BookSizeSpec, ColorProfile, INTERIOR_SAFE_MARGIN_IN,
    MIN_LEGIBLE_FONT_SIZE_PT, inches_to_points,
};
use crate::records::{PageLayout, PhotoRecord};
use crate::types::{BinaryDocument, PrintError, Result};
use rayon::prelude::*;

/// Lines a caption may wrap onto before it is truncated
const MAX_CAPTION_LINES: usize = 2;

/// A layout with its photo resolved, or `None` when the photo is missing
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedPhoto {
    pub layout: PageLayout,
    pub photo: Option<PhotoRecord>,
}

/// One interior page, built fresh for each generation run
#[derive(Debug, Clone, PartialEq)]
pub struct BookPage {
    /// 1-based
    pub page_number: u32,
    pub photos: Vec<PlacedPhoto>,
    pub text_content: Option<String>,
}

/// Page numbers must strictly increase. Gaps are fine.
pub fn validate_page_order(pages: &[BookPage]) -> Result<()> {
    let mut previous = 0;
    for page in pages {
        if page.page_number <= previous {
            return Err(PrintError::InvalidPageOrder {
                previous,
                found: page.page_number,
            });
        }
        previous = page.page_number;
    }
    Ok(())
}

enum Slot {
    Image(ProcessedImage),
    Placeholder(String),
}

/// Page rectangle for a layout position (fractions of the bleed box,
/// origin top-left) in PDF points.
fn placement_rect(layout: &PageLayout, page_width: f64, page_height: f64) -> Rect {
    let pos = &layout.position;
    Rect::new(
        pos.x * page_width,
        page_height - (pos.y + pos.height) * page_height,
        pos.width * page_width,
        pos.height * page_height,
    )
}

fn prepare(
    page_number: u32,
    placed: &PlacedPhoto,
    book_size: &BookSizeSpec,
    profile: Option<ColorProfile>,
) -> Result<Slot> {
    let photo_id = &placed.layout.photo_id;
    let Some(photo) = &placed.photo else {
        return Ok(Slot::Placeholder(format!(
            "Page {}: photo {} not found; placeholder used",
            page_number, photo_id
        )));
    };

    let target = PrintTarget::cover(
        placed.layout.position.width * book_size.bleed_width_in(),
        placed.layout.position.height * book_size.bleed_height_in(),
    )
    .with_crop(placed.layout.crop)
    .with_focal_point(placed.layout.focal_point)
    .with_color_profile(profile);

    match process_photo(photo, &target) {
        Ok(image) => Ok(Slot::Image(image)),
        Err(e @ ImageProcessingError::Decode { .. }) => Ok(Slot::Placeholder(format!(
            "Page {}: photo {} could not be decoded ({}); placeholder used",
            page_number, photo_id, e
        ))),
        Err(e) => Err(e.into()),
    }
}

/// Compose the interior block.
///
/// Pages and layouts are validated up front. Photos for a page are prepared
/// in parallel, then the page is written; missing or undecodable photos
/// become placeholders with a warning. `cancel` is checked between pages.
pub fn compose_interior(
    book_size: &BookSizeSpec,
    pages: &[BookPage],
    options: &PrintOptions,
    cancel: &CancelFlag,
) -> Result<BinaryDocument> {
    if pages.is_empty() {
        return Err(PrintError::NoPages);
    }
    validate_page_order(pages)?;
    for page in pages {
        for placed in &page.photos {
            placed.layout.validate(page.page_number)?;
        }
    }

    let profile = options.color_profile_for(book_size);
    let mode = profile.map_or(ColorMode::Rgb, ColorMode::Cmyk);
    let page_width = book_size.bleed_width_pt();
    let page_height = book_size.bleed_height_pt();
    let trim = Rect::new(0.0, 0.0, page_width, page_height)
        .inset(inches_to_points(BLEED_MARGIN_IN));
    let caption_area = trim.inset(inches_to_points(INTERIOR_SAFE_MARGIN_IN));

    let mut builder = DocumentBuilder::new("Interior").with_output_intent(profile);
    let mut warnings = Vec::new();

    for page in pages {
        cancel.check()?;

        let slots = page
            .photos
            .par_iter()
            .map(|placed| prepare(page.page_number, placed, book_size, profile))
            .collect::<Result<Vec<_>>>()?;

        let mut canvas = PageCanvas::new(page_width, page_height, trim, mode);
        canvas.fill_rect(canvas.bounds(), RgbColor::WHITE);

        for (placed, slot) in page.photos.iter().zip(slots) {
            let rect = placement_rect(&placed.layout, page_width, page_height);
            match slot {
                Slot::Image(image) => {
                    warnings.extend(image.warnings.iter().map(|w| {
                        format!(
                            "Page {}: photo {}: {}",
                            page.page_number, placed.layout.photo_id, w
                        )
                    }));
                    canvas.draw_image(&image, rect)?;
                }
                Slot::Placeholder(warning) => {
                    log::warn!("{}", warning);
                    canvas.fill_rect(rect, RgbColor::gray(options.placeholder_gray));
                    warnings.push(warning);
                }
            }
        }

        if let Some(text) = page.text_content.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            match fit_text(
                text,
                caption_area.width,
                MAX_CAPTION_LINES,
                options.caption_font_size_pt,
                MIN_LEGIBLE_FONT_SIZE_PT.min(options.caption_font_size_pt),
            ) {
                Some(fitted) => {
                    if fitted.truncated {
                        warnings.push(format!(
                            "Page {}: caption truncated to fit",
                            page.page_number
                        ));
                    }
                    let top = caption_area.y + fitted.block_height();
                    canvas.draw_text_block(
                        &fitted,
                        caption_area.center_x(),
                        top,
                        options.caption_color,
                    );
                }
                None => warnings.push(format!(
                    "Page {}: caption does not fit and was omitted",
                    page.page_number
                )),
            }
        }

        builder = builder.add_page(canvas)?;
        log::debug!(
            "Wrote interior page {} ({} photos)",
            page.page_number,
            page.photos.len()
        );
    }

    let page_count = builder.page_count();
    let bytes = builder.finish()?;
    log::info!(
        "Composed {} interior: {} pages, {} warnings",
        book_size.code(),
        page_count,
        warnings.len()
    );

    Ok(BinaryDocument {
        bytes,
        page_count,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::NormalizedRect;

    fn page(number: u32) -> BookPage {
        BookPage {
            page_number: number,
            photos: Vec::new(),
            text_content: None,
        }
    }

    #[test]
    fn test_gaps_allowed() {
        assert!(validate_page_order(&[page(1), page(2), page(5)]).is_ok());
    }

    #[test]
    fn test_page_zero_rejected() {
        assert!(matches!(
            validate_page_order(&[page(0)]),
            Err(PrintError::InvalidPageOrder { previous: 0, found: 0 })
        ));
    }

    #[test]
    fn test_placement_flips_to_pdf_origin() {
        let layout = PageLayout::new("p", NormalizedRect::new(0.0, 0.0, 0.5, 0.25));
        let rect = placement_rect(&layout, 600.0, 800.0);
        assert_eq!(rect, Rect::new(0.0, 600.0, 300.0, 200.0));
    }
}
