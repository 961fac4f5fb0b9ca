//! JSON encoding of the stored document: `{"list": [string, ...]}`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::list::CaptureList;

/// The stored bytes are not a capture list document.
#[derive(Debug, Error)]
#[error("malformed document: {0}")]
pub struct CodecError(#[from] serde_json::Error);

#[derive(Deserialize)]
struct StoredDocument {
    list: Vec<String>,
}

#[derive(Serialize)]
struct StoredDocumentRef<'a> {
    list: &'a [String],
}

/// Parse stored bytes. Extra top-level fields are ignored.
pub fn decode(bytes: &[u8]) -> Result<CaptureList, CodecError> {
    let doc: StoredDocument = serde_json::from_slice(bytes)?;
    Ok(CaptureList::from(doc.list))
}

/// Serialize a list as compact JSON.
pub fn encode(list: &CaptureList) -> Vec<u8> {
    // Serializing a slice of strings into a Vec cannot fail.
    serde_json::to_vec(&StoredDocumentRef { list: list.items() }).unwrap_or_default()
}
