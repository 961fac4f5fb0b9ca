//! Remote document store.
//!
//! # Responsibilities
//! - Read and overwrite a single blob addressed by path
//! - Report "no such blob" as a value, distinct from every failure
//!
//! # Design Decisions
//! - Writes are unconditional overwrites; there is no version check
//! - No retries; transport timeouts come from the underlying client

pub mod dropbox;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

use crate::config::{StoreBackend, StoreConfig};

pub use dropbox::DropboxStore;
pub use memory::MemoryStore;

/// Outcome of a successful fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetched {
    Found(Bytes),
    NotFound,
}

/// Errors from the document store. Not-found is never one of these.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Connection, TLS, or timeout failure.
    #[error("store transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The store answered with a non-success status.
    #[error("store returned {status} for {path}: {body}")]
    Status {
        status: u16,
        path: String,
        body: String,
    },

    /// The store's own response could not be interpreted.
    #[error("unexpected store response for {path}: {message}")]
    Decode { path: String, message: String },
}

/// Capability to read and write a single named blob.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch the blob at `path`.
    async fn fetch(&self, path: &str) -> Result<Fetched, StoreError>;

    /// Overwrite the blob at `path` with `contents`.
    async fn put(&self, path: &str, contents: Bytes) -> Result<(), StoreError>;
}

/// Build the configured store implementation.
pub fn from_config(config: &StoreConfig) -> Result<Arc<dyn DocumentStore>, StoreError> {
    let store: Arc<dyn DocumentStore> = match config.backend {
        StoreBackend::Dropbox => Arc::new(DropboxStore::new(config)?),
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory document store; contents are lost on exit");
            Arc::new(MemoryStore::new())
        }
    };
    Ok(store)
}
