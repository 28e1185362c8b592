//! Image XObjects for processed photos.

use crate::imaging::{PixelFormat, ProcessedImage};
use crate::types::Result;
use flate2::Compression;
use flate2::write::ZlibEncoder;
use lopdf::{Dictionary, Object, Stream};
use std::io::Write;

/// Build a FlateDecode image stream from processed pixels.
///
/// The zlib output depends only on the input bytes and the level, so the
/// same photo always produces the same stream.
pub fn image_stream(image: &ProcessedImage) -> Result<Stream> {
    let color_space = match image.format {
        PixelFormat::Rgb8 => "DeviceRGB",
        PixelFormat::Cmyk8 => "DeviceCMYK",
    };

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&image.pixels)?;
    let compressed = encoder.finish()?;

    let dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"XObject".to_vec())),
        ("Subtype", Object::Name(b"Image".to_vec())),
        ("Width", Object::Integer(image.width_px as i64)),
        ("Height", Object::Integer(image.height_px as i64)),
        ("ColorSpace", Object::Name(color_space.as_bytes().to_vec())),
        ("BitsPerComponent", Object::Integer(8)),
        ("Filter", Object::Name(b"FlateDecode".to_vec())),
    ]);

    // Already compressed; keep lopdf from compressing again
    Ok(Stream::new(dict, compressed).with_compression(false))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_decompresses_to_pixels() {
        let image = ProcessedImage {
            pixels: vec![10, 20, 30, 40, 50, 60],
            width_px: 2,
            height_px: 1,
            format: PixelFormat::Rgb8,
            achieved_dpi: 300.0,
            warnings: Vec::new(),
        };
        let stream = image_stream(&image).unwrap();
        assert_eq!(stream.decompressed_content().unwrap(), image.pixels);
        assert_eq!(
            stream.dict.get(b"ColorSpace").unwrap().as_name().unwrap(),
            b"DeviceRGB"
        );
    }
}
