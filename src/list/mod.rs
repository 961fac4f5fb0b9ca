//! The capture list domain.
//!
//! # Data Flow
//! ```text
//! handler
//!     → repository.rs (read-modify-write against the store)
//!     → codec.rs (bytes ⇄ CaptureList)
//!     → store (remote blob at DOCUMENT_PATH)
//! ```
//!
//! # Design Decisions
//! - The remote document is the only source of truth; nothing is cached
//! - Writes are last-writer-wins; concurrent mutations may be lost

pub mod codec;
pub mod repository;

use thiserror::Error;

use crate::store::StoreError;

pub use codec::CodecError;
pub use repository::{append_item, delete_item, download, upload, DOCUMENT_PATH};

/// Ordered list of captured items. Order is display and deletion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaptureList {
    items: Vec<String>,
}

impl CaptureList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn push(&mut self, item: impl Into<String>) {
        self.items.push(item.into());
    }

    /// Remove the item at `index`. Out of range is a no-op.
    pub fn remove_at(&mut self, index: usize) -> Option<String> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }
}

impl From<Vec<String>> for CaptureList {
    fn from(items: Vec<String>) -> Self {
        Self { items }
    }
}

impl<S: Into<String>> FromIterator<S> for CaptureList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Failures surfaced by repository operations.
#[derive(Debug, Error)]
pub enum ListError {
    #[error(transparent)]
    MalformedDocument(#[from] CodecError),

    #[error("store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),
}
