//! Append-only PDF assembly.

use super::canvas::{FONT_RESOURCE, PageCanvas, Rect};
use crate::physical::ColorProfile;
use crate::types::{PrintError, Result};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

const PRODUCER: &str = concat!("photobook-print ", env!("CARGO_PKG_VERSION"));

fn box_array(rect: Rect) -> Object {
    Object::Array(vec![
        Object::Real(rect.x as f32),
        Object::Real(rect.y as f32),
        Object::Real(rect.right() as f32),
        Object::Real(rect.top() as f32),
    ])
}

/// Builds a PDF one page at a time.
///
/// Pages are written in the order they are added and can't be revisited;
/// `add_page` consumes the builder and hands it back.
///
/// ```no_run
/// # use photobook_print::document::{ColorMode, DocumentBuilder, PageCanvas, Rect};
/// # fn main() -> photobook_print::Result<()> {
/// let page = PageCanvas::new(594.0, 594.0, Rect::new(9.0, 9.0, 576.0, 576.0), ColorMode::Rgb);
/// let bytes = DocumentBuilder::new("Holiday").add_page(page)?.finish()?;
/// # Ok(())
/// # }
/// ```
pub struct DocumentBuilder {
    doc: Document,
    pages_id: ObjectId,
    page_ids: Vec<ObjectId>,
    font_id: Option<ObjectId>,
    title: String,
    output_intent: Option<ColorProfile>,
}

impl DocumentBuilder {
    pub fn new(title: impl Into<String>) -> Self {
        let mut doc = Document::with_version("1.6");
        let pages_id = doc.new_object_id();
        Self {
            doc,
            pages_id,
            page_ids: Vec::new(),
            font_id: None,
            title: title.into(),
            output_intent: None,
        }
    }

    /// Declare the print condition the CMYK content was separated for.
    pub fn with_output_intent(mut self, profile: Option<ColorProfile>) -> Self {
        self.output_intent = profile;
        self
    }

    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    fn font(&mut self) -> ObjectId {
        if let Some(id) = self.font_id {
            return id;
        }
        let id = self.doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Font".to_vec())),
            ("Subtype", Object::Name(b"Type1".to_vec())),
            ("BaseFont", Object::Name(b"Helvetica".to_vec())),
            ("Encoding", Object::Name(b"WinAnsiEncoding".to_vec())),
        ]));
        self.font_id = Some(id);
        id
    }

    /// Append a finished page.
    pub fn add_page(mut self, canvas: PageCanvas) -> Result<Self> {
        let parts = canvas.into_parts();

        let mut xobjects = Dictionary::new();
        for (name, stream) in parts.images {
            let id = self.doc.add_object(stream);
            xobjects.set(name.as_bytes(), Object::Reference(id));
        }

        let mut resources = Dictionary::new();
        if !xobjects.is_empty() {
            resources.set("XObject", Object::Dictionary(xobjects));
        }
        if parts.uses_font {
            let font_id = self.font();
            let mut fonts = Dictionary::new();
            fonts.set(FONT_RESOURCE, Object::Reference(font_id));
            resources.set("Font", Object::Dictionary(fonts));
        }

        let content_id = self
            .doc
            .add_object(Stream::new(Dictionary::new(), parts.content));

        let bleed = Rect::new(0.0, 0.0, parts.width_pt, parts.height_pt);
        let page_id = self.doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(self.pages_id)),
            ("MediaBox", box_array(bleed)),
            ("BleedBox", box_array(bleed)),
            ("TrimBox", box_array(parts.trim)),
            ("Contents", Object::Reference(content_id)),
            ("Resources", Object::Dictionary(resources)),
        ]));
        self.page_ids.push(page_id);

        Ok(self)
    }

    /// Close the page tree and serialize.
    pub fn finish(mut self) -> Result<Vec<u8>> {
        if self.page_ids.is_empty() {
            return Err(PrintError::NoPages);
        }

        let count = self.page_ids.len() as i64;
        let kids = self
            .page_ids
            .iter()
            .map(|id| Object::Reference(*id))
            .collect();
        let pages_dict = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Kids", Object::Array(kids)),
            ("Count", Object::Integer(count)),
        ]);
        self.doc
            .objects
            .insert(self.pages_id, Object::Dictionary(pages_dict));

        let mut catalog = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(self.pages_id)),
        ]);
        if let Some(profile) = self.output_intent {
            let intent = Dictionary::from_iter(vec![
                ("Type", Object::Name(b"OutputIntent".to_vec())),
                ("S", Object::Name(b"GTS_PDFX".to_vec())),
                (
                    "OutputConditionIdentifier",
                    Object::string_literal(profile.output_condition_identifier),
                ),
                ("RegistryName", Object::string_literal(profile.registry_name)),
                ("Info", Object::string_literal(profile.name)),
            ]);
            catalog.set("OutputIntents", Object::Array(vec![Object::Dictionary(intent)]));
        }
        let catalog_id = self.doc.add_object(catalog);

        let info_id = self.doc.add_object(Dictionary::from_iter(vec![
            ("Title", Object::string_literal(self.title.as_str())),
            ("Producer", Object::string_literal(PRODUCER)),
        ]));

        self.doc.trailer.set("Root", catalog_id);
        self.doc.trailer.set("Info", info_id);

        let mut bytes = Vec::new();
        self.doc.save_to(&mut bytes)?;
        Ok(bytes)
    }
}
