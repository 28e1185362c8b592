//! Print-vendor collaborator.
//!
//! The generator never submits orders itself; the orchestration layer builds
//! a [`PrintOrder`] from a [`GenerationResult`] and hands it to a
//! [`PrintVendorClient`].

use crate::generator::GenerationResult;
use crate::records::BookRecord;
use async_trait::async_trait;
use std::sync::Mutex;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Error, Debug)]
pub enum VendorError {
    #[error("Order rejected: {0}")]
    Rejected(String),
    #[error("Vendor unavailable: {0}")]
    Unavailable(String),
}

/// Interior paper stock offered by the vendor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PaperType {
    #[default]
    Matte,
    Gloss,
    Lustre,
}

/// One file the vendor downloads
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PrintFile {
    pub url: String,
    pub md5: String,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PrintOrder {
    pub book_id: String,
    pub size_code: String,
    pub page_count: u32,
    pub paper_type: PaperType,
    pub cover: PrintFile,
    pub interior: PrintFile,
}

impl PrintOrder {
    pub fn from_generation(
        book: &BookRecord,
        result: &GenerationResult,
        paper_type: PaperType,
    ) -> Self {
        Self {
            book_id: book.id.clone(),
            size_code: book.size_code.clone(),
            page_count: result.page_count,
            paper_type,
            cover: PrintFile {
                url: result.cover_url.clone(),
                md5: result.cover_checksum.clone(),
            },
            interior: PrintFile {
                url: result.interior_url.clone(),
                md5: result.interior_checksum.clone(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrderReceipt {
    pub order_id: String,
}

#[async_trait]
pub trait PrintVendorClient: Send + Sync {
    async fn submit(&self, order: &PrintOrder) -> Result<OrderReceipt, VendorError>;
}

/// Vendor double that accepts everything and remembers what it was sent.
#[derive(Debug, Default)]
pub struct RecordingVendor {
    orders: Mutex<Vec<PrintOrder>>,
}

impl RecordingVendor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn orders(&self) -> Vec<PrintOrder> {
        self.orders.lock().map(|o| o.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl PrintVendorClient for RecordingVendor {
    async fn submit(&self, order: &PrintOrder) -> Result<OrderReceipt, VendorError> {
        let mut orders = self
            .orders
            .lock()
            .map_err(|_| VendorError::Unavailable("recorder lock poisoned".to_string()))?;
        orders.push(order.clone());
        Ok(OrderReceipt {
            order_id: format!("order-{}", orders.len()),
        })
    }
}
