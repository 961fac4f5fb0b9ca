//! Read-modify-write operations on the stored capture list.
//!
//! Every operation reads the document fresh. Mutations upload the whole list
//! unconditionally, so two concurrent mutations race and the later upload
//! wins.

use bytes::Bytes;

use crate::context::RequestContext;
use crate::list::{codec, CaptureList, ListError};
use crate::store::Fetched;

/// Location of the single stored document.
pub const DOCUMENT_PATH: &str = "/capture.json";

/// Fetch the current list, creating an empty document if none exists yet.
pub async fn download(ctx: &RequestContext) -> Result<CaptureList, ListError> {
    match ctx.store.fetch(DOCUMENT_PATH).await? {
        Fetched::Found(contents) => Ok(codec::decode(&contents)?),
        Fetched::NotFound => {
            tracing::info!(path = DOCUMENT_PATH, "No stored list, initializing empty document");
            let list = CaptureList::new();
            upload(&list, ctx).await?;
            Ok(list)
        }
    }
}

/// Overwrite the stored document with `list`.
pub async fn upload(list: &CaptureList, ctx: &RequestContext) -> Result<(), ListError> {
    let contents = Bytes::from(codec::encode(list));
    ctx.store.put(DOCUMENT_PATH, contents).await?;
    tracing::debug!(items = list.len(), "Stored list");
    Ok(())
}

/// Append `item` to the end of the list.
pub async fn append_item(item: String, ctx: &RequestContext) -> Result<(), ListError> {
    let mut list = download(ctx).await?;
    list.push(item);
    upload(&list, ctx).await
}

/// Remove the item at `index`. An out of range index leaves the list as is.
pub async fn delete_item(index: usize, ctx: &RequestContext) -> Result<(), ListError> {
    let mut list = download(ctx).await?;
    if list.remove_at(index).is_none() {
        tracing::debug!(index, items = list.len(), "Delete index out of range");
    }
    upload(&list, ctx).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use std::sync::Arc;

    fn context(store: &Arc<MemoryStore>) -> RequestContext {
        RequestContext::new(store.clone(), "https://example.com", "token")
    }

    async fn seeded(items: &[&str]) -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        let list: CaptureList = items.iter().copied().collect();
        store.insert(DOCUMENT_PATH, codec::encode(&list)).await;
        store
    }

    async fn stored(store: &MemoryStore) -> CaptureList {
        codec::decode(&store.get(DOCUMENT_PATH).await.unwrap()).unwrap()
    }

    #[tokio::test]
    async fn first_download_creates_empty_document() {
        let store = Arc::new(MemoryStore::new());
        let list = download(&context(&store)).await.unwrap();

        assert!(list.is_empty());
        assert_eq!(store.get(DOCUMENT_PATH).await.unwrap().as_ref(), br#"{"list":[]}"#);
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn existing_document_is_not_rewritten_on_read() {
        let store = seeded(&["a"]).await;
        let list = download(&context(&store)).await.unwrap();

        assert_eq!(list.items(), ["a"]);
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn append_to_empty_list() {
        let store = Arc::new(MemoryStore::new());
        append_item("milk".into(), &context(&store)).await.unwrap();
        assert_eq!(stored(&store).await.items(), ["milk"]);
    }

    #[tokio::test]
    async fn delete_valid_index() {
        let store = seeded(&["a", "b", "c"]).await;
        delete_item(1, &context(&store)).await.unwrap();
        assert_eq!(stored(&store).await.items(), ["a", "c"]);
    }

    #[tokio::test]
    async fn delete_out_of_range_is_noop() {
        let store = seeded(&["a", "b", "c"]).await;
        delete_item(5, &context(&store)).await.unwrap();
        assert_eq!(stored(&store).await.items(), ["a", "b", "c"]);
    }

    #[tokio::test]
    async fn concurrent_mutations_last_writer_wins() {
        let store = seeded(&["a"]).await;
        let first = context(&store);
        let second = context(&store);

        let mut seen_by_first = download(&first).await.unwrap();
        let mut seen_by_second = download(&second).await.unwrap();

        seen_by_first.push("x".to_string());
        upload(&seen_by_first, &first).await.unwrap();

        seen_by_second.push("y".to_string());
        upload(&seen_by_second, &second).await.unwrap();

        assert_eq!(stored(&store).await.items(), ["a", "y"]);
        assert_eq!(store.write_count(), 2);
    }

    #[tokio::test]
    async fn malformed_document_is_reported_and_kept() {
        let store = Arc::new(MemoryStore::new());
        store.insert(DOCUMENT_PATH, &b"{\"items\":[]}"[..]).await;

        let err = append_item("x".into(), &context(&store)).await.unwrap_err();
        assert!(matches!(err, ListError::MalformedDocument(_)));
        assert_eq!(store.write_count(), 0);
        assert_eq!(store.get(DOCUMENT_PATH).await.unwrap().as_ref(), b"{\"items\":[]}");
    }

    #[tokio::test]
    async fn store_failure_is_not_swallowed() {
        let store = Arc::new(MemoryStore::new());
        store.set_unavailable(true);

        let err = download(&context(&store)).await.unwrap_err();
        assert!(matches!(err, ListError::StoreUnavailable(_)));
        assert_eq!(store.write_count(), 0);
    }
}
