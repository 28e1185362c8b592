//! Orchestration: cover and interior in, checksummed stored documents out.

use crate::cancel::CancelFlag;
use crate::checksum::md5_hex;
use crate::cover::{CoverSpec, compose_cover};
use crate::interior::{BookPage, PlacedPhoto, compose_interior, validate_page_order};
use crate::options::PrintOptions;
use crate::physical::{book_size, spine_width_inches_with};
use crate::records::{BookRecord, PageRecord, PhotoRecord};
use crate::storage::StorageBackend;
use crate::types::{BinaryDocument, PrintError, Result};
use std::collections::HashMap;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Photos chosen for the cover panels
#[derive(Debug, Clone, PartialEq)]
pub struct CoverImages {
    pub front: PhotoRecord,
    pub back: Option<PhotoRecord>,
    pub warnings: Vec<String>,
}

/// Pick the cover photos for `book`.
///
/// Front: the book's explicit cover photo, else the first photo. Back: the
/// last photo, unless that is the front photo. An explicit cover photo that
/// isn't among `photos` falls back to the first photo with a warning.
pub fn select_default_cover_images(
    book: &BookRecord,
    photos: &[PhotoRecord],
) -> Result<CoverImages> {
    let mut warnings = Vec::new();

    let explicit = match &book.cover_photo_id {
        Some(id) => {
            let found = photos.iter().find(|p| &p.id == id);
            if found.is_none() {
                warnings.push(format!(
                    "Cover photo {} not found; using the first photo instead",
                    id
                ));
            }
            found
        }
        None => None,
    };

    let front = explicit
        .or_else(|| photos.first())
        .ok_or(PrintError::NoCoverImage)?
        .clone();
    let back = photos.last().filter(|p| p.id != front.id).cloned();

    Ok(CoverImages {
        front,
        back,
        warnings,
    })
}

/// Both documents, rendered and checksummed but not stored
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedBook {
    pub cover: BinaryDocument,
    pub cover_checksum: String,
    pub interior: BinaryDocument,
    pub interior_checksum: String,
    pub page_count: u32,
    pub spine_width_in: f64,
    /// Selection warnings plus everything both composers reported
    pub warnings: Vec<String>,
}

/// Outcome of a successful generation run
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GenerationResult {
    pub cover_url: String,
    pub cover_checksum: String,
    pub interior_url: String,
    pub interior_checksum: String,
    pub page_count: u32,
    pub spine_width_in: f64,
    pub warnings: Vec<String>,
}

/// Turns book records into stored, verified print files.
///
/// Holds no state between runs; the same inputs always produce the same
/// bytes and checksums.
pub struct PrintGenerator {
    storage: Arc<dyn StorageBackend>,
    options: PrintOptions,
}

impl PrintGenerator {
    pub fn new(storage: Arc<dyn StorageBackend>, options: PrintOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { storage, options })
    }

    pub fn options(&self) -> &PrintOptions {
        &self.options
    }

    /// Render both documents without storing them.
    pub async fn render(
        &self,
        book: &BookRecord,
        pages: &[PageRecord],
        photos: &[PhotoRecord],
    ) -> Result<RenderedBook> {
        self.render_with_cancel(book, pages, photos, &CancelFlag::new())
            .await
    }

    pub async fn render_with_cancel(
        &self,
        book: &BookRecord,
        pages: &[PageRecord],
        photos: &[PhotoRecord],
        cancel: &CancelFlag,
    ) -> Result<RenderedBook> {
        let size = book_size(&book.size_code)?;
        if pages.is_empty() {
            return Err(PrintError::NoPages);
        }
        let cover_images = select_default_cover_images(book, photos)?;

        let by_id: HashMap<&str, &PhotoRecord> =
            photos.iter().map(|p| (p.id.as_str(), p)).collect();
        let book_pages: Vec<BookPage> = pages
            .iter()
            .map(|page| BookPage {
                page_number: page.page_number,
                photos: page
                    .layouts
                    .iter()
                    .map(|layout| PlacedPhoto {
                        layout: layout.clone(),
                        photo: by_id.get(layout.photo_id.as_str()).map(|p| (*p).clone()),
                    })
                    .collect(),
                text_content: page.text_content.clone(),
            })
            .collect();

        // Fail on bad input before any pixels are touched
        validate_page_order(&book_pages)?;
        for page in &book_pages {
            for placed in &page.photos {
                placed.layout.validate(page.page_number)?;
            }
        }

        let page_count = u32::try_from(book_pages.len())
            .map_err(|_| PrintError::Config("too many pages".to_string()))?;
        let spine_width_in = spine_width_inches_with(page_count, self.options.paper_thickness_in)?;

        let mut warnings = cover_images.warnings;
        if book.page_count != page_count {
            warnings.push(format!(
                "Book record lists {} pages but {} were supplied; spine sized for {}",
                book.page_count, page_count, page_count
            ));
        }

        let cover_spec = CoverSpec {
            book_size: size,
            page_count,
            front_image: cover_images.front,
            back_image: cover_images.back,
            title: book.title.clone(),
            spine_text: book.spine_text.clone().or_else(|| book.title.clone()),
        };

        log::info!(
            "Rendering book {} ({}, {} pages)",
            book.id,
            size.code(),
            page_count
        );

        let cover_options = self.options.clone();
        let interior_options = self.options.clone();
        let interior_cancel = cancel.clone();
        let (cover, interior) = tokio::try_join!(
            tokio::task::spawn_blocking(move || compose_cover(&cover_spec, &cover_options)),
            tokio::task::spawn_blocking(move || {
                compose_interior(&size, &book_pages, &interior_options, &interior_cancel)
            }),
        )?;
        let (cover, interior) = (cover?, interior?);
        cancel.check()?;

        warnings.extend(cover.warnings.iter().cloned());
        warnings.extend(interior.warnings.iter().cloned());

        Ok(RenderedBook {
            cover_checksum: md5_hex(&cover.bytes),
            interior_checksum: md5_hex(&interior.bytes),
            cover,
            interior,
            page_count,
            spine_width_in,
            warnings,
        })
    }

    /// Render, store and verify both documents.
    ///
    /// Either both documents end up stored or neither does: a failed
    /// interior publish withdraws the cover that was already stored.
    pub async fn generate(
        &self,
        book: &BookRecord,
        pages: &[PageRecord],
        photos: &[PhotoRecord],
    ) -> Result<GenerationResult> {
        self.generate_with_cancel(book, pages, photos, &CancelFlag::new())
            .await
    }

    pub async fn generate_with_cancel(
        &self,
        book: &BookRecord,
        pages: &[PageRecord],
        photos: &[PhotoRecord],
        cancel: &CancelFlag,
    ) -> Result<GenerationResult> {
        let rendered = self.render_with_cancel(book, pages, photos, cancel).await?;
        cancel.check()?;

        let cover_name = format!("{}-cover.pdf", book.id);
        let interior_name = format!("{}-interior.pdf", book.id);

        let cover_url = self
            .publish(&rendered.cover, &rendered.cover_checksum, &cover_name)
            .await?;
        let interior_url = match self
            .publish(&rendered.interior, &rendered.interior_checksum, &interior_name)
            .await
        {
            Ok(url) => url,
            Err(e) => {
                self.withdraw(&cover_name).await;
                return Err(e);
            }
        };

        log::info!(
            "Generated book {}: {} pages, {} warnings",
            book.id,
            rendered.page_count,
            rendered.warnings.len()
        );

        Ok(GenerationResult {
            cover_url,
            cover_checksum: rendered.cover_checksum,
            interior_url,
            interior_checksum: rendered.interior_checksum,
            page_count: rendered.page_count,
            spine_width_in: rendered.spine_width_in,
            warnings: rendered.warnings,
        })
    }

    /// Store one document and confirm the backend holds the same bytes. A
    /// mismatched object is removed again before the error is returned.
    async fn publish(
        &self,
        document: &BinaryDocument,
        checksum: &str,
        name: &str,
    ) -> Result<String> {
        let stored = self
            .storage
            .store(&document.bytes, name, PDF_CONTENT_TYPE)
            .await?;

        if !stored.checksum.eq_ignore_ascii_case(checksum) {
            log::warn!(
                "Checksum mismatch for {}: computed {}, storage reported {}",
                name,
                checksum,
                stored.checksum
            );
            self.withdraw(name).await;
            return Err(PrintError::ChecksumMismatch {
                name: name.to_string(),
                expected: checksum.to_string(),
                actual: stored.checksum,
            });
        }

        log::debug!("Stored {} at {}", name, stored.url);
        Ok(stored.url)
    }

    /// Best-effort removal; the error that caused it is what gets reported.
    async fn withdraw(&self, name: &str) {
        if let Err(e) = self.storage.remove(name).await {
            log::warn!("Could not remove {} after a failed publish: {}", name, e);
        }
    }
}
