use crate::imaging::ImageProcessingError;
use crate::storage::StorageError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PrintError {
    #[error("Unknown book size code: {0:?}")]
    UnknownSize(String),
    #[error("No usable cover image")]
    NoCoverImage,
    #[error("Invalid page order: page {found} cannot follow page {previous}")]
    InvalidPageOrder { previous: u32, found: u32 },
    #[error("Invalid layout on page {page} for photo {photo_id}: {reason}")]
    InvalidLayout {
        page: u32,
        photo_id: String,
        reason: String,
    },
    #[error("Invalid page count {0}: at least one page is required")]
    InvalidPageCount(u32),
    #[error("No pages to print")]
    NoPages,
    #[error("Checksum mismatch for {name}: computed {expected}, storage reported {actual}")]
    ChecksumMismatch {
        name: String,
        expected: String,
        actual: String,
    },
    #[error("Image error: {0}")]
    Image(#[from] ImageProcessingError),
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Generation cancelled")]
    Cancelled,
}

impl PrintError {
    /// Whether re-running the same request could succeed.
    ///
    /// Bad input data (unknown sizes, broken layouts, missing cover photos)
    /// fails the same way every time; storage and I/O failures may not.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PrintError::Storage(_)
                | PrintError::ChecksumMismatch { .. }
                | PrintError::Io(_)
                | PrintError::TaskJoin(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, PrintError>;

/// A finished PDF plus the recoverable problems met while composing it.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryDocument {
    pub bytes: Vec<u8>,
    pub page_count: usize,
    pub warnings: Vec<String>,
}
