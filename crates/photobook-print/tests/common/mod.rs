#![allow(dead_code)]

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId, Stream};
use photobook_print::*;
use std::io::Cursor;

/// Encode a solid-color PNG
pub fn png_bytes(width: u32, height: u32, color: [u8; 3]) -> Vec<u8> {
    encode_png(RgbImage::from_pixel(width, height, Rgb(color)))
}

pub fn encode_png(image: RgbImage) -> Vec<u8> {
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(image)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

/// A small solid-color photo
pub fn photo(id: &str) -> PhotoRecord {
    PhotoRecord::from_bytes(id, png_bytes(60, 60, [200, 120, 40]))
}

pub fn broken_photo(id: &str) -> PhotoRecord {
    PhotoRecord::from_bytes(id, b"definitely not an image".to_vec())
}

pub fn book(size_code: &str, page_count: u32) -> BookRecord {
    BookRecord {
        id: "book-1".to_string(),
        title: Some("Summer at the Lake".to_string()),
        size_code: size_code.to_string(),
        cover_photo_id: None,
        page_count,
        spine_text: None,
    }
}

/// A page with one full-bleed photo
pub fn full_page(page_number: u32, photo_id: &str) -> PageRecord {
    PageRecord {
        page_number,
        layouts: vec![PageLayout::new(photo_id, NormalizedRect::FULL)],
        text_content: None,
    }
}

pub fn book_page(page_number: u32, photos: Vec<PlacedPhoto>) -> BookPage {
    BookPage {
        page_number,
        photos,
        text_content: None,
    }
}

pub fn placed(photo_id: &str, position: NormalizedRect, photo: Option<PhotoRecord>) -> PlacedPhoto {
    PlacedPhoto {
        layout: PageLayout::new(photo_id, position),
        photo,
    }
}

pub fn load(bytes: &[u8]) -> Document {
    Document::load_mem(bytes).unwrap()
}

pub fn page_ids(doc: &Document) -> Vec<ObjectId> {
    doc.get_pages().values().copied().collect()
}

pub fn operations(doc: &Document, page_id: ObjectId) -> Vec<Operation> {
    let content = doc.get_page_content(page_id).unwrap();
    Content::decode(&content).unwrap().operations
}

pub fn count_ops(ops: &[Operation], operator: &str) -> usize {
    ops.iter().filter(|op| op.operator == operator).count()
}

pub fn number(obj: &Object) -> f64 {
    match obj {
        Object::Integer(i) => *i as f64,
        Object::Real(r) => *r as f64,
        other => panic!("Expected a number, got {:?}", other),
    }
}

pub fn page_box(doc: &Document, page_id: ObjectId, key: &[u8]) -> [f64; 4] {
    let array = doc
        .get_dictionary(page_id)
        .unwrap()
        .get(key)
        .unwrap()
        .as_array()
        .unwrap();
    [
        number(&array[0]),
        number(&array[1]),
        number(&array[2]),
        number(&array[3]),
    ]
}

pub fn image_streams(doc: &Document) -> Vec<&Stream> {
    doc.objects
        .values()
        .filter_map(|obj| match obj {
            Object::Stream(stream) => Some(stream),
            _ => None,
        })
        .filter(|stream| {
            let subtype = stream.dict.get(b"Subtype").and_then(Object::as_name);
            matches!(subtype, Ok(name) if name == b"Image")
        })
        .collect()
}

/// A shown line of text with its position and size
#[derive(Debug, Clone)]
pub struct ShownText {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub rotated: bool,
}

pub fn shown_text(ops: &[Operation]) -> Vec<ShownText> {
    let mut shown = Vec::new();
    let (mut x, mut y, mut size, mut rotated) = (0.0, 0.0, 0.0, false);
    for op in ops {
        match op.operator.as_str() {
            "Tf" => size = number(&op.operands[1]),
            "Td" => {
                x = number(&op.operands[0]);
                y = number(&op.operands[1]);
                rotated = false;
            }
            "Tm" => {
                x = number(&op.operands[4]);
                y = number(&op.operands[5]);
                rotated = number(&op.operands[0]) == 0.0;
            }
            "Tj" => {
                if let Object::String(bytes, _) = &op.operands[0] {
                    shown.push(ShownText {
                        text: String::from_utf8_lossy(bytes).into_owned(),
                        x,
                        y,
                        size,
                        rotated,
                    });
                }
            }
            _ => {}
        }
    }
    shown
}
