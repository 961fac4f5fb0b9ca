//! In-process document store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;

use crate::store::{DocumentStore, Fetched, StoreError};

/// Document store holding blobs in a map. Used for tests and local runs.
#[derive(Default)]
pub struct MemoryStore {
    blobs: RwLock<HashMap<String, Bytes>>,
    fail: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw contents at `path`, bypassing the trait.
    pub async fn get(&self, path: &str) -> Option<Bytes> {
        self.blobs.read().await.get(path).cloned()
    }

    /// Seed `path` with raw contents without counting a write.
    pub async fn insert(&self, path: &str, contents: impl Into<Bytes>) {
        self.blobs.write().await.insert(path.to_string(), contents.into());
    }

    /// Make every subsequent call fail as if the store were unreachable.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.fail.store(unavailable, Ordering::SeqCst);
    }

    /// Number of successful `put` calls.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn check_available(&self, path: &str) -> Result<(), StoreError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(StoreError::Status {
                status: 503,
                path: path.to_string(),
                body: "memory store marked unavailable".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn fetch(&self, path: &str) -> Result<Fetched, StoreError> {
        self.check_available(path)?;
        Ok(match self.blobs.read().await.get(path) {
            Some(contents) => Fetched::Found(contents.clone()),
            None => Fetched::NotFound,
        })
    }

    async fn put(&self, path: &str, contents: Bytes) -> Result<(), StoreError> {
        self.check_available(path)?;
        self.blobs.write().await.insert(path.to_string(), contents);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
