use super::ImageProcessingError;
use crate::records::{ExifOrientation, PhotoRecord, PhotoSource};
use image::{DynamicImage, ImageReader};

/// Decode a photo's pixels and turn them upright.
pub fn decode_photo(photo: &PhotoRecord) -> Result<DynamicImage, ImageProcessingError> {
    let decode_error = |message: String| ImageProcessingError::Decode {
        photo_id: photo.id.clone(),
        message,
    };

    let image = match &photo.source {
        PhotoSource::Encoded(bytes) => {
            image::load_from_memory(bytes).map_err(|e| decode_error(e.to_string()))?
        }
        PhotoSource::File(path) => ImageReader::open(path)
            .map_err(|e| decode_error(format!("{}: {}", path.display(), e)))?
            .with_guessed_format()
            .map_err(|e| decode_error(format!("{}: {}", path.display(), e)))?
            .decode()
            .map_err(|e| decode_error(format!("{}: {}", path.display(), e)))?,
    };

    if image.width() == 0 || image.height() == 0 {
        return Err(decode_error("image has no pixels".to_string()));
    }

    Ok(apply_orientation(image, photo.orientation))
}

pub fn apply_orientation(image: DynamicImage, orientation: ExifOrientation) -> DynamicImage {
    match orientation {
        ExifOrientation::Normal => image,
        ExifOrientation::FlipHorizontal => image.fliph(),
        ExifOrientation::Rotate180 => image.rotate180(),
        ExifOrientation::FlipVertical => image.flipv(),
        ExifOrientation::Transpose => image.rotate90().fliph(),
        ExifOrientation::Rotate90 => image.rotate90(),
        ExifOrientation::Transverse => image.rotate270().fliph(),
        ExifOrientation::Rotate270 => image.rotate270(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_rotate90_swaps_dimensions() {
        let image = DynamicImage::ImageRgb8(RgbImage::new(4, 2));
        let upright = apply_orientation(image, ExifOrientation::Rotate90);
        assert_eq!((upright.width(), upright.height()), (2, 4));
    }

    #[test]
    fn test_transpose_mirrors_diagonal() {
        let mut raw = RgbImage::new(3, 2);
        raw.put_pixel(2, 0, Rgb([255, 0, 0]));
        let upright = apply_orientation(DynamicImage::ImageRgb8(raw), ExifOrientation::Transpose);
        assert_eq!(upright.to_rgb8().get_pixel(0, 2).0, [255, 0, 0]);
    }

    #[test]
    fn test_garbage_bytes_are_decode_errors() {
        let photo = PhotoRecord::from_bytes("broken", vec![1u8, 2, 3, 4]);
        match decode_photo(&photo) {
            Err(ImageProcessingError::Decode { photo_id, .. }) => assert_eq!(photo_id, "broken"),
            other => panic!("Expected Decode error, got {:?}", other.map(|_| ())),
        }
    }
}
