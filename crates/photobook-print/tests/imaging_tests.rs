mod common;

use common::*;
use image::{DynamicImage, Rgb, RgbImage};
use photobook_print::imaging::*;
use photobook_print::*;

fn solid(width: u32, height: u32, color: [u8; 3]) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb(color)))
}

fn pixel(image: &ProcessedImage, x: u32, y: u32) -> [u8; 3] {
    let i = ((y * image.width_px + x) * 3) as usize;
    [image.pixels[i], image.pixels[i + 1], image.pixels[i + 2]]
}

#[test]
fn test_cover_fit_small_source_keeps_native_pixels() {
    let source = solid(200, 100, [10, 20, 30]);
    let processed = process_for_print(&source, &PrintTarget::cover(1.0, 1.0)).unwrap();

    assert_eq!((processed.width_px, processed.height_px), (100, 100));
    assert_eq!(processed.format, PixelFormat::Rgb8);
    assert_eq!(processed.pixels.len(), 100 * 100 * 3);
    assert_eq!(processed.achieved_dpi, 100.0);
    assert_eq!(processed.warnings.len(), 1);
}

#[test]
fn test_cover_fit_downsamples_to_canonical_dpi() {
    let source = solid(900, 600, [10, 20, 30]);
    let processed = process_for_print(&source, &PrintTarget::cover(2.0, 1.0)).unwrap();

    assert_eq!((processed.width_px, processed.height_px), (600, 300));
    assert_eq!(processed.achieved_dpi, 450.0);
    assert!(processed.warnings.is_empty());
}

#[test]
fn test_crop_applies_before_fit() {
    let mut source = RgbImage::from_pixel(400, 400, Rgb([255, 0, 0]));
    for y in 0..400 {
        for x in 200..400 {
            source.put_pixel(x, y, Rgb([0, 0, 255]));
        }
    }
    let right_half = NormalizedRect::new(0.5, 0.0, 0.5, 1.0);
    let target = PrintTarget::cover(1.0, 1.0).with_crop(Some(right_half));
    let processed = process_for_print(&DynamicImage::ImageRgb8(source), &target).unwrap();

    assert_eq!((processed.width_px, processed.height_px), (200, 200));
    assert_eq!(pixel(&processed, 0, 0), [0, 0, 255]);
    assert_eq!(pixel(&processed, 199, 199), [0, 0, 255]);
}

#[test]
fn test_focal_point_moves_cover_window() {
    let mut source = RgbImage::from_pixel(300, 100, Rgb([255, 0, 0]));
    for y in 0..100 {
        for x in 200..300 {
            source.put_pixel(x, y, Rgb([0, 255, 0]));
        }
    }
    let target =
        PrintTarget::cover(1.0, 1.0).with_focal_point(Some(FocalPoint { x: 1.0, y: 0.5 }));
    let processed = process_for_print(&DynamicImage::ImageRgb8(source), &target).unwrap();

    assert_eq!((processed.width_px, processed.height_px), (100, 100));
    assert_eq!(pixel(&processed, 50, 50), [0, 255, 0]);
}

#[test]
fn test_contain_pads_with_white() {
    let source = solid(100, 50, [255, 0, 0]);
    let processed = process_for_print(&source, &PrintTarget::contain(1.0, 1.0)).unwrap();

    assert_eq!((processed.width_px, processed.height_px), (100, 100));
    assert_eq!(pixel(&processed, 50, 0), [255, 255, 255]);
    assert_eq!(pixel(&processed, 50, 50), [255, 0, 0]);
    assert_eq!(pixel(&processed, 50, 99), [255, 255, 255]);
}

#[test]
fn test_cmyk_conversion_after_scaling() {
    let source = solid(900, 600, [255, 255, 255]);
    let target = PrintTarget::cover(2.0, 1.0).with_color_profile(Some(ColorProfile::GRACOL_2013));
    let processed = process_for_print(&source, &target).unwrap();

    assert_eq!(processed.format, PixelFormat::Cmyk8);
    assert_eq!(processed.pixels.len(), 600 * 300 * 4);
    assert!(processed.pixels.iter().all(|&v| v == 0));
}

#[test]
fn test_invalid_dimensions() {
    let source = solid(10, 10, [0, 0, 0]);
    for (w, h) in [(0.0, 1.0), (1.0, -2.0), (f64::NAN, 1.0)] {
        match process_for_print(&source, &PrintTarget::cover(w, h)) {
            Err(ImageProcessingError::InvalidDimensions { .. }) => {}
            other => panic!("Expected InvalidDimensions for {}x{}, got {:?}", w, h, other),
        }
    }
}

#[test]
fn test_invalid_crop() {
    let source = solid(10, 10, [0, 0, 0]);
    let overflowing = NormalizedRect::new(0.5, 0.0, 0.6, 1.0);
    let target = PrintTarget::cover(1.0, 1.0).with_crop(Some(overflowing));
    assert!(matches!(
        process_for_print(&source, &target),
        Err(ImageProcessingError::InvalidCrop(_))
    ));
}

#[test]
fn test_undecodable_photo() {
    match process_photo(&broken_photo("x"), &PrintTarget::cover(1.0, 1.0)) {
        Err(ImageProcessingError::Decode { photo_id, .. }) => assert_eq!(photo_id, "x"),
        other => panic!("Expected Decode error, got {:?}", other),
    }
}

#[test]
fn test_orientation_applied_on_decode() {
    let photo = PhotoRecord::from_bytes("p", png_bytes(40, 20, [0, 0, 0]))
        .with_orientation(ExifOrientation::Rotate90);
    let image = decode_photo(&photo).unwrap();
    assert_eq!((image.width(), image.height()), (20, 40));
}

#[test]
fn test_decode_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("photo.png");
    std::fs::write(&path, png_bytes(30, 10, [1, 2, 3])).unwrap();

    let image = decode_photo(&PhotoRecord::from_path("f", &path)).unwrap();
    assert_eq!((image.width(), image.height()), (30, 10));

    let missing = PhotoRecord::from_path("m", dir.path().join("missing.png"));
    assert!(matches!(
        decode_photo(&missing),
        Err(ImageProcessingError::Decode { .. })
    ));
}

#[test]
fn test_same_photo_processed_independently() {
    let photo = photo("p");
    let small = process_photo(&photo, &PrintTarget::cover(0.1, 0.1)).unwrap();
    let large = process_photo(&photo, &PrintTarget::cover(1.0, 1.0)).unwrap();
    assert_eq!((small.width_px, small.height_px), (30, 30));
    assert_eq!((large.width_px, large.height_px), (60, 60));
}
