//! Print-ready document generation for photo books.
//!
//! Turns a book's photos, page layouts and physical format into the two PDFs a
//! commercial print vendor expects: a single-page cover spread and a
//! multi-page interior block.
//!
//! Data flows leaves-first:
//! 1. [`physical`] - formats, unit conversions, spine width, resolution policy
//! 2. [`imaging`] - crop/fit/scale photos for a physical area
//! 3. [`compose_cover`] and [`compose_interior`] - assemble the PDFs
//! 4. [`PrintGenerator`] - orchestrates both, checksums and publishes them

mod cancel;
pub mod checksum;
mod cover;
pub mod document;
mod generator;
pub mod imaging;
mod interior;
mod options;
pub mod physical;
mod records;
pub mod storage;
mod types;
pub mod vendor;

pub use cancel::CancelFlag;
pub use cover::{CoverLayout, CoverRegion, CoverSpec, compose_cover};
pub use generator::{
    CoverImages, GenerationResult, PrintGenerator, RenderedBook, select_default_cover_images,
};
pub use interior::{BookPage, PlacedPhoto, compose_interior, validate_page_order};
pub use options::PrintOptions;
pub use physical::{BookSizeSpec, ColorProfile, ResolutionCheck, book_size, validate_resolution};
pub use records::*;
pub use types::*;
